//! Spawner plugin: drops enemies from above at a rate that speeds up over
//! level time.
//!
//! The schedule is one resume-at timestamp on the gameplay clock. Each time it
//! passes, one enemy spawns and the next wait is drawn from the interval
//! bounds for the current elapsed time.

use bevy::prelude::*;
use bevy::time::Virtual;

use crate::common::rng::GameRng;
use crate::common::state::{gameplay_running, GameState};
use crate::common::tunables::{SpawnTuning, Tunables};
use crate::plugins::enemies::spawn_enemy;
use crate::plugins::player::PlayerEntity;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SpawnSchedule {
    pub level_started_at: f32,
    pub next_spawn_at: f32,
}

/// `(min, max)` wait for a level that has been running `elapsed` seconds.
///
/// Both bounds shrink linearly with `acceleration` and are floored at
/// `min_allowed_interval`.
pub fn interval_bounds(tuning: &SpawnTuning, elapsed: f32) -> (f32, f32) {
    let shrink = tuning.acceleration * elapsed.max(0.0);
    let floor = tuning.min_allowed_interval;

    let min = (tuning.min_spawn_interval - shrink).max(floor);
    let max = (tuning.max_spawn_interval - shrink).max(floor);
    (min, max)
}

impl SpawnSchedule {
    pub fn start(now: f32, tuning: &SpawnTuning, rng: &mut GameRng) -> Self {
        let mut schedule = Self { level_started_at: now, next_spawn_at: now };
        schedule.schedule_next(now, tuning, rng);
        schedule
    }

    pub fn elapsed(&self, now: f32) -> f32 {
        now - self.level_started_at
    }

    pub fn due(&self, now: f32) -> bool {
        now >= self.next_spawn_at
    }

    fn schedule_next(&mut self, now: f32, tuning: &SpawnTuning, rng: &mut GameRng) {
        let (min, max) = interval_bounds(tuning, self.elapsed(now));
        self.next_spawn_at = now + rng.range_f32(min, max);
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), start_spawn_schedule)
        .add_systems(OnExit(GameState::InGame), stop_spawn_schedule)
        .add_systems(
            Update,
            run_spawn_schedule.run_if(in_state(GameState::InGame).and(gameplay_running)),
        );
}

fn start_spawn_schedule(
    mut commands: Commands,
    time: Res<Time<Virtual>>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
) {
    let schedule = SpawnSchedule::start(time.elapsed_secs(), &tunables.spawn, &mut rng);
    debug!("First enemy at {:.2}s", schedule.next_spawn_at);
    commands.insert_resource(schedule);
}

fn stop_spawn_schedule(mut commands: Commands) {
    commands.remove_resource::<SpawnSchedule>();
}

/// At most one spawn per frame; the next wait starts from now.
pub(crate) fn run_spawn_schedule(
    mut commands: Commands,
    time: Res<Time<Virtual>>,
    tunables: Res<Tunables>,
    player: Res<PlayerEntity>,
    mut rng: ResMut<GameRng>,
    schedule: Option<ResMut<SpawnSchedule>>,
) {
    let Some(mut schedule) = schedule else {
        return;
    };
    let now = time.elapsed_secs();
    if !schedule.due(now) {
        return;
    }

    let Some(target) = player.0 else {
        warn_once!("No player to target; enemy spawns skipped");
        return;
    };

    let tuning = &tunables.spawn;
    let x = rng.range_f32(tuning.min_x, tuning.max_x);
    let id = spawn_enemy(&mut commands, &tunables, &mut rng, target, Vec2::new(x, tuning.spawn_y), now);

    schedule.schedule_next(now, tuning, &mut rng);
    info!(
        "Spawned enemy {id:?} at x={x:.0}; next in {:.2}s",
        schedule.next_spawn_at - now
    );
}

#[cfg(test)]
mod tests;
