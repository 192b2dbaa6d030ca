//! World plugin: spawns the arena floor and side walls.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::ground_layers;
use crate::common::state::GameState;

/// Half extents of the playable area.
const HALF_W: f32 = 704.0;
const HALF_H: f32 = 360.0;
/// Top surface of the floor.
pub const FLOOR_Y: f32 = -HALF_H + 64.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let thickness = 64.0;

    let mut spawn_block = |name: &str, pos: Vec3, size: Vec2| {
        commands.spawn((
            Name::new(name.to_string()),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            ground_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    };

    spawn_block(
        "Floor",
        Vec3::new(0.0, FLOOR_Y - thickness * 0.5, 0.0),
        Vec2::new(HALF_W * 2.0 + thickness * 2.0, thickness),
    );
    spawn_block(
        "WallLeft",
        Vec3::new(-HALF_W - thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H * 4.0),
    );
    spawn_block(
        "WallRight",
        Vec3::new(HALF_W + thickness * 0.5, 0.0, 0.0),
        Vec2::new(thickness, HALF_H * 4.0),
    );
}

#[cfg(test)]
mod tests;
