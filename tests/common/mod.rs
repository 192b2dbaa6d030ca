//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `blade_rush::game::configure_headless` to install gameplay plugins.
//! - every update advances both clocks by a fixed 1/60 s, so timings are frame counts.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use blade_rush::common::state::GameState;
use blade_rush::common::tunables::Tunables;
use blade_rush::plugins::player::PlayerEntity;

pub const FRAME: f32 = 1.0 / 60.0;

/// Seeded tunables without gravity, so bodies stay where a test puts them.
pub fn test_tunables() -> Tunables {
    let mut t = Tunables::default();
    t.seed = Some(1234);
    t.gravity = 0.0;
    t
}

pub fn app_headless() -> App {
    app_headless_with(test_tunables())
}

pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(FRAME)));
    app.insert_resource(tunables);

    blade_rush::game::configure_headless(&mut app);
    // `App::run` would do this; plugins such as avian finish setup here.
    app.finish();
    app.cleanup();
    app
}

pub fn tick(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

pub fn player(app: &App) -> Entity {
    app.world()
        .resource::<PlayerEntity>()
        .0
        .expect("player spawned on entering InGame")
}

pub fn player_position(app: &App) -> Vec2 {
    app.world()
        .get::<Transform>(player(app))
        .expect("player has a transform")
        .translation
        .truncate()
}
