//! Input plugin: keyboard -> named actions.
//!
//! Gameplay reads `ActionInput`, never `ButtonInput<KeyCode>` directly, so
//! headless tests drive the player by pressing actions on the resource.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Block,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Attack,
        Action::Block,
    ];

    /// Primary key first, alternate second.
    pub fn keys(self) -> [KeyCode; 2] {
        match self {
            Action::MoveLeft => [KeyCode::KeyA, KeyCode::ArrowLeft],
            Action::MoveRight => [KeyCode::KeyD, KeyCode::ArrowRight],
            Action::Jump => [KeyCode::KeyW, KeyCode::ArrowUp],
            Action::Attack => [KeyCode::Space, KeyCode::KeyJ],
            Action::Block => [KeyCode::ShiftLeft, KeyCode::KeyK],
        }
    }
}

/// Level ("held") and edge ("pressed this frame") state per action.
#[derive(Resource, Debug, Default, Clone)]
pub struct ActionInput {
    held: HashSet<Action>,
    just: HashSet<Action>,
}

impl ActionInput {
    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
        self.just.remove(&action);
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just.contains(&action)
    }

    /// Forget this frame's edges; held actions stay held.
    pub fn clear_just_pressed(&mut self) {
        self.just.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.just.clear();
    }

    /// -1, 0 or 1. Left wins when both directions are held.
    pub fn horizontal_axis(&self) -> f32 {
        if self.pressed(Action::MoveLeft) {
            -1.0
        } else if self.pressed(Action::MoveRight) {
            1.0
        } else {
            0.0
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ActionInput>()
        .add_systems(PreUpdate, sample_actions)
        .add_systems(Last, clear_action_edges);
}

/// Mirror the keyboard into `ActionInput`.
///
/// Without an input backend (headless) the resource is left to whoever drives it.
pub fn sample_actions(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<ActionInput>) {
    let Some(keys) = keys else {
        return;
    };

    for action in Action::ALL {
        let [primary, alternate] = action.keys();
        if keys.any_just_pressed([primary, alternate]) {
            input.press(action);
        } else if keys.any_pressed([primary, alternate]) {
            input.held.insert(action);
        } else {
            input.release(action);
        }
    }
}

fn clear_action_edges(mut input: ResMut<ActionInput>) {
    input.clear_just_pressed();
}
