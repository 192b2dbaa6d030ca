//! Buffered combat messages.
//!
//! Producers only describe what happened; the consumers own the state they
//! mutate (enemy brains, player lives, score).

use bevy::prelude::*;

/// The player swung: a circular hitbox in world space.
#[derive(Message, Clone, Copy, Debug)]
pub struct MeleeStrike {
    pub attacker: Entity,
    pub center: Vec2,
    pub radius: f32,
    /// Score credited per kill.
    pub reward: u32,
}

/// Enemies found under one strike's hitbox.
#[derive(Message, Clone, Debug)]
pub struct MeleeVictims {
    pub attacker: Entity,
    pub victims: Vec<Entity>,
    pub reward: u32,
}

/// An enemy attack resolved in range of its target.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerHit {
    pub attacker: Entity,
    pub target: Entity,
}

/// The player lost the last life.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerDied {
    pub player: Entity,
    pub position: Vec2,
}
