//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Ground,
    Player,
    Enemy,
    Corpse,
}

/// The player stands on ground; enemies pass through it.
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::Ground])
}

/// Enemies are found by the player's attack query and stand on ground.
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::Ground])
}

/// Collision layers for a dead enemy.
///
/// It leaves the `Enemy` membership so attack queries skip it, but keeps
/// resting on the ground until it is removed.
pub fn corpse_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Corpse, [Layer::Ground])
}

pub fn ground_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Ground, [Layer::Player, Layer::Enemy, Layer::Corpse])
}
