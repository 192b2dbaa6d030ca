//! Global state machine.

use bevy::prelude::*;
use bevy::time::Virtual;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
}

/// Run condition: the gameplay clock is ticking.
///
/// Player death pauses `Time<Virtual>`; everything gated on this condition
/// freezes with it while the end sequence keeps running on real time.
pub fn gameplay_running(time: Res<Time<Virtual>>) -> bool {
    !time.is_paused()
}
