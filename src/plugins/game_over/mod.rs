//! Game-over plugin: camera zoom toward the fallen player, fade to black, then
//! the `GameOver` state.
//!
//! Player death pauses the gameplay clock, so everything here samples
//! `Time<Real>` and runs without the `gameplay_running` gate.
//!
//! ```text
//! PlayerDied ─▶ start_game_over ─▶ GameOverSequence { Zoom ─▶ Fade ─▶ Done }
//!                                                              └─▶ NextState(GameOver)
//! ```

use bevy::color::Alpha;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::time::{Real, Virtual};

use crate::common::state::GameState;
use crate::common::tunables::{GameOverTuning, Tunables};
use crate::plugins::camera::MainCamera;
use crate::plugins::combat::PlayerDied;

/// Overlay drawn above everything during the fade.
const OVERLAY_Z: f32 = 900.0;
const OVERLAY_SIZE: f32 = 8192.0;

/// Full-screen black sprite, transparent until the fade.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct FadeOverlay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequencePhase {
    Zoom {
        started_at: f32,
        camera: Entity,
        from_scale: f32,
        to_scale: f32,
        from: Vec2,
        to: Vec2,
    },
    Fade {
        started_at: f32,
    },
    Done,
}

/// The running end sequence. Its presence means the sequence has started.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameOverSequence {
    pub phase: SequencePhase,
}

/// Linear progress through a phase, clamped to `[0, 1]`.
///
/// A non-positive duration completes immediately.
pub fn phase_progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_fade_overlay)
        .add_systems(OnExit(GameState::InGame), end_game_over_sequence);

    app.add_systems(
        Update,
        (
            start_game_over.after(crate::plugins::player::receive_hits),
            run_game_over_sequence
                .after(start_game_over)
                .run_if(resource_exists::<GameOverSequence>),
        )
            .run_if(in_state(GameState::InGame)),
    );
}

fn spawn_fade_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("FadeOverlay"),
        FadeOverlay,
        Sprite {
            color: Color::BLACK.with_alpha(0.0),
            custom_size: Some(Vec2::splat(OVERLAY_SIZE)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, OVERLAY_Z),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Start the sequence on the first death; later deaths are ignored.
pub(crate) fn start_game_over(
    mut commands: Commands,
    mut died: MessageReader<PlayerDied>,
    existing: Option<Res<GameOverSequence>>,
    time: Res<Time<Real>>,
    tunables: Res<Tunables>,
    q_cam: Query<(Entity, &Transform, &Projection), With<MainCamera>>,
) {
    let Some(death) = died.read().last().copied() else {
        return;
    };
    if existing.is_some() {
        return;
    }

    let now = time.elapsed_secs();
    let phase = zoom_phase(now, death.position, &tunables.game_over, &q_cam).unwrap_or_else(|| {
        error_once!("No orthographic main camera; game-over zoom skipped");
        SequencePhase::Fade { started_at: now }
    });

    info!("Game over sequence started");
    commands.insert_resource(GameOverSequence { phase });
}

fn zoom_phase(
    now: f32,
    focus: Vec2,
    tuning: &GameOverTuning,
    q_cam: &Query<(Entity, &Transform, &Projection), With<MainCamera>>,
) -> Option<SequencePhase> {
    let (camera, tf, projection) = q_cam.single().ok()?;
    let Projection::Orthographic(ortho) = projection else {
        return None;
    };

    Some(SequencePhase::Zoom {
        started_at: now,
        camera,
        from_scale: ortho.scale,
        to_scale: ortho.scale * tuning.zoom_factor,
        from: tf.translation.truncate(),
        to: focus,
    })
}

/// Step the current phase on the real clock.
pub(crate) fn run_game_over_sequence(
    time: Res<Time<Real>>,
    tunables: Res<Tunables>,
    mut sequence: ResMut<GameOverSequence>,
    mut next_state: ResMut<NextState<GameState>>,
    mut q_cam: Query<(&mut Transform, &mut Projection), (With<MainCamera>, Without<FadeOverlay>)>,
    mut q_overlay: Query<(&mut Sprite, &mut Transform), (With<FadeOverlay>, Without<MainCamera>)>,
) {
    let now = time.elapsed_secs();
    let tuning = &tunables.game_over;

    let phase = sequence.phase;
    match phase {
        SequencePhase::Zoom { started_at, camera, from_scale, to_scale, from, to } => {
            let t = phase_progress(now - started_at, tuning.zoom_duration);

            if let Ok((mut tf, mut projection)) = q_cam.get_mut(camera) {
                let pos = from.lerp(to, t);
                tf.translation.x = pos.x;
                tf.translation.y = pos.y;
                if let Projection::Orthographic(ortho) = &mut *projection {
                    ortho.scale = from_scale + (to_scale - from_scale) * t;
                }
            }

            if t >= 1.0 {
                sequence.phase = SequencePhase::Fade { started_at: now };
            }
        }
        SequencePhase::Fade { started_at } => {
            let t = phase_progress(now - started_at, tuning.fade_duration);
            let focus = q_cam.iter().next().map(|(tf, _)| tf.translation.truncate());

            let mut faded = false;
            for (mut sprite, mut tf) in &mut q_overlay {
                sprite.color.set_alpha(t);
                if let Some(focus) = focus {
                    tf.translation.x = focus.x;
                    tf.translation.y = focus.y;
                }
                faded = true;
            }
            if !faded {
                warn_once!("No fade overlay; game-over fade skipped");
            }

            if t >= 1.0 || !faded {
                sequence.phase = SequencePhase::Done;
                next_state.set(GameState::GameOver);
                info!("Game over");
            }
        }
        SequencePhase::Done => {}
    }
}

/// Leaving play hands the gameplay clock back and forgets the sequence.
fn end_game_over_sequence(mut commands: Commands, mut time: ResMut<Time<Virtual>>) {
    time.unpause();
    commands.remove_resource::<GameOverSequence>();
}
