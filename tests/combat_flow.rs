mod common;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::Virtual;

use blade_rush::common::animator::Animator;
use blade_rush::common::layers::enemy_layers;
use blade_rush::common::score::Score;
use blade_rush::common::state::GameState;
use blade_rush::common::rng::GameRng;
use blade_rush::common::tunables::{EnemyTuning, Tunables};
use blade_rush::plugins::combat::Damageable;
use blade_rush::plugins::enemies::{spawn_enemy, Enemy};
use blade_rush::plugins::game_over::GameOverSequence;
use blade_rush::plugins::input::{Action, ActionInput};
use blade_rush::plugins::player::PlayerCombat;

/// A motionless enemy body on the enemy layer: found by the attack query, but
/// not driven by the AI (no velocity or facing).
fn spawn_dummy_enemy(app: &mut App, at: Vec2) -> Entity {
    let target = common::player(app);
    let tuning = EnemyTuning::default();
    app.world_mut()
        .spawn((
            Enemy::new(target, &tuning, f32::MAX),
            Transform::from_xyz(at.x, at.y, 1.0),
            RigidBody::Static,
            Collider::rectangle(tuning.size_x, tuning.size_y),
            enemy_layers(),
        ))
        .id()
}

fn press(app: &mut App, action: Action) {
    let mut input = app.world_mut().resource_mut::<ActionInput>();
    input.release(action);
    input.press(action);
}

#[test]
fn one_swing_kills_every_overlapping_enemy() {
    let mut app = common::app_headless();
    common::tick(&mut app, 2);

    // Player faces right; the hitbox sits 40px ahead.
    let p = common::player_position(&app);
    let a = spawn_dummy_enemy(&mut app, p + Vec2::new(40.0, 0.0));
    let b = spawn_dummy_enemy(&mut app, p + Vec2::new(46.0, 6.0));
    let far = spawn_dummy_enemy(&mut app, p + Vec2::new(400.0, 0.0));

    // Let the physics step index the new colliders.
    common::tick(&mut app, 3);

    press(&mut app, Action::Attack);
    common::tick(&mut app, 1);

    assert_eq!(app.world().resource::<Score>().value(), 200);
    assert!(app.world().get::<Enemy>(a).unwrap().is_dead());
    assert!(app.world().get::<Enemy>(b).unwrap().is_dead());
    assert!(!app.world().get::<Enemy>(far).unwrap().is_dead());

    // Dead enemies pay nothing on a second swing.
    press(&mut app, Action::Attack);
    common::tick(&mut app, 1);
    assert_eq!(app.world().resource::<Score>().value(), 200);
}

#[test]
fn losing_the_last_life_ends_the_game() {
    let mut tunables = common::test_tunables();
    tunables.player.lives = 1;
    tunables.game_over.fade_duration = 0.5;
    let mut app = common::app_headless_with(tunables);
    common::tick(&mut app, 2);

    // A live enemy already in attack range.
    let p = common::player_position(&app);
    let target = common::player(&app);
    let enemy = {
        let world = app.world_mut();
        let tunables = world.resource::<Tunables>().clone();
        let mut rng = world.resource::<GameRng>().clone();
        let id = {
            let mut commands = world.commands();
            spawn_enemy(&mut commands, &tunables, &mut rng, target, p + Vec2::new(30.0, 0.0), 0.0)
        };
        world.flush();
        id
    };
    assert!(app.world().get::<Animator>(enemy).is_some());

    let mut died_at = None;
    for frame in 0..600 {
        app.update();
        if died_at.is_none() && app.world().get::<PlayerCombat>(target).is_some_and(|c| c.is_dead()) {
            died_at = Some(frame);
            assert!(app.world().resource::<Time<Virtual>>().is_paused());
            assert!(app.world().get_resource::<GameOverSequence>().is_some());
        }
        if common::state(&app) == GameState::GameOver {
            break;
        }
    }

    let died_at = died_at.expect("enemy attack should kill a one-life player");
    // 0.7s windup at 60 fps.
    assert!(died_at >= 40, "died after {died_at} frames");
    assert_eq!(common::state(&app), GameState::GameOver);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    assert!(app.world().get_resource::<GameOverSequence>().is_none());
}
