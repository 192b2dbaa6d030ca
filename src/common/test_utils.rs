//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system in tests without building a full schedule.
//!
//! Systems that use `Commands` enqueue structural changes; we call `world.flush()` after
//! running so queued commands are applied before assertions.

use std::time::{Duration, Instant};

use bevy::ecs::message::Messages;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;
use bevy::time::{Real, Virtual};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Gameplay clock whose elapsed time is exactly `secs`.
pub fn gameplay_time_at(secs: f32) -> Time<Virtual> {
    let mut t = Time::<Virtual>::default();
    t.advance_by(Duration::from_secs_f32(secs));
    t
}

/// Move the world's gameplay clock forward by `secs`.
pub fn advance_gameplay(world: &mut World, secs: f32) {
    world
        .resource_mut::<Time<Virtual>>()
        .advance_by(Duration::from_secs_f32(secs));
}

/// Real clock whose elapsed time is exactly `secs`.
///
/// The first update of a `Time<Real>` only records the start instant, so the
/// clock is primed with a zero step before advancing.
pub fn real_time_at(secs: f32) -> Time<Real> {
    let mut t = Time::<Real>::new(Instant::now());
    t.update_with_duration(Duration::ZERO);
    t.update_with_duration(Duration::from_secs_f32(secs));
    t
}

/// Move the world's real clock forward by `secs`.
pub fn advance_real(world: &mut World, secs: f32) {
    world
        .resource_mut::<Time<Real>>()
        .update_with_duration(Duration::from_secs_f32(secs));
}

/// Make sure the message buffer for `M` exists.
pub fn ensure_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// Drain every message of type `M` currently buffered.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    ensure_messages::<M>(world);
    world.resource_mut::<Messages<M>>().drain().collect()
}
