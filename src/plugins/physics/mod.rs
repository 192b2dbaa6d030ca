use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::motion::detect_ground;
use crate::common::state::{gameplay_running, GameState};
use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>();
    let ppm = tunables.pixels_per_meter;
    let gravity = tunables.gravity;

    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    app.insert_resource(Gravity(Vec2::new(0.0, -gravity)));

    // Ground contact is probed before anything reads it this tick.
    app.add_systems(
        FixedUpdate,
        detect_ground.run_if(in_state(GameState::InGame).and(gameplay_running)),
    );
}
