//! Core plugin: shared resources and global settings.
//!
//! `Tunables` may be inserted before the plugins are registered (the full app
//! loads them from disk, tests build them in code); otherwise defaults are used.

use bevy::prelude::*;

use crate::common::animator::clear_animation_triggers;
use crate::common::rng::GameRng;
use crate::common::score::Score;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }
    let seed = app.world().resource::<Tunables>().seed;

    app.insert_resource(GameRng::from_seed_option(seed));
    app.init_resource::<Score>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));

    app.add_systems(OnEnter(GameState::InGame), reset_score)
        .add_systems(Last, clear_animation_triggers);
}

fn reset_score(mut score: ResMut<Score>) {
    *score = Score::default();
}

#[cfg(test)]
mod tests;
