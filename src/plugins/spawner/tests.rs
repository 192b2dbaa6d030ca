use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{advance_gameplay, gameplay_time_at, run_system_once};
use crate::plugins::enemies::Enemy;

fn tuning() -> SpawnTuning {
    SpawnTuning::default()
}

fn world_with_schedule(next_spawn_at: f32) -> World {
    let mut world = World::new();
    world.insert_resource(gameplay_time_at(0.0));
    world.insert_resource(Tunables::default());
    world.insert_resource(GameRng::seeded(5));
    world.insert_resource(SpawnSchedule { level_started_at: 0.0, next_spawn_at });
    world
}

fn enemy_count(world: &mut World) -> usize {
    world.query::<&Enemy>().iter(world).count()
}

#[test]
fn bounds_start_at_configured_interval() {
    assert_eq!(interval_bounds(&tuning(), 0.0), (5.0, 10.0));
}

#[test]
fn bounds_shrink_monotonically_and_respect_floor() {
    let t = tuning();
    let mut prev = interval_bounds(&t, 0.0);

    for step in 1..=2000 {
        let elapsed = step as f32 * 0.1;
        let (min, max) = interval_bounds(&t, elapsed);
        assert!(min <= prev.0 && max <= prev.1, "grew at {elapsed}");
        assert!(min >= t.min_allowed_interval && max >= t.min_allowed_interval);
        assert!(min <= max);
        prev = (min, max);
    }

    assert_eq!(interval_bounds(&t, 1000.0), (0.5, 0.5));
}

#[test]
fn start_draws_first_wait_from_full_range() {
    let mut rng = GameRng::seeded(1);
    let s = SpawnSchedule::start(3.0, &tuning(), &mut rng);

    assert_eq!(s.level_started_at, 3.0);
    assert!((8.0..=13.0).contains(&s.next_spawn_at));
}

#[test]
fn spawns_one_enemy_wired_to_player_when_due() {
    let mut world = world_with_schedule(1.0);
    let player = world.spawn_empty().id();
    world.insert_resource(PlayerEntity(Some(player)));

    run_system_once(&mut world, run_spawn_schedule);
    assert_eq!(enemy_count(&mut world), 0);

    advance_gameplay(&mut world, 1.0);
    run_system_once(&mut world, run_spawn_schedule);
    assert_eq!(enemy_count(&mut world), 1);

    let t = tuning();
    let (enemy, tf) = world.query::<(&Enemy, &Transform)>().single(&world).unwrap();
    assert_eq!(enemy.target, player);
    assert!((t.min_x..=t.max_x).contains(&tf.translation.x));
    assert_eq!(tf.translation.y, t.spawn_y);

    // Next wait drawn from the bounds at elapsed = 1s.
    let next = world.resource::<SpawnSchedule>().next_spawn_at;
    assert!((5.8..=11.0).contains(&next), "next at {next}");
}

#[test]
fn missing_player_skips_spawn() {
    let mut world = world_with_schedule(0.0);
    world.insert_resource(PlayerEntity(None));

    run_system_once(&mut world, run_spawn_schedule);

    assert_eq!(enemy_count(&mut world), 0);
}

#[test]
fn same_seed_same_spawn_positions() {
    let positions = |seed: u64| {
        let mut world = world_with_schedule(0.0);
        world.insert_resource(GameRng::seeded(seed));
        let player = world.spawn_empty().id();
        world.insert_resource(PlayerEntity(Some(player)));

        let mut xs = Vec::new();
        for _ in 0..3 {
            let next = world.resource::<SpawnSchedule>().next_spawn_at;
            let now = world.resource::<Time<Virtual>>().elapsed_secs();
            advance_gameplay(&mut world, (next - now).max(0.0) + 0.01);
            run_system_once(&mut world, run_spawn_schedule);
        }
        for tf in world.query_filtered::<&Transform, With<Enemy>>().iter(&world) {
            xs.push(tf.translation.x);
        }
        xs.sort_by(f32::total_cmp);
        xs
    };

    let a = positions(99);
    assert_eq!(a.len(), 3);
    assert_eq!(a, positions(99));
}
