//! HUD plugin: lives and score text, rewritten every frame, plus the final
//! score on the game-over screen.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::score::Score;
use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerCombat};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Lives,
    Score,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnEnter(GameState::GameOver), spawn_final_score)
        .add_systems(Update, update_hud.run_if(in_state(GameState::InGame)));
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Hud"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|parent| {
            parent.spawn((HudText::Lives, Text::new("Lives: 0")));
            parent.spawn((HudText::Score, Text::new("Score: 0")));
        });
}

pub fn lives_label(lives: u32) -> String {
    format!("Lives: {lives}")
}

pub fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

pub(crate) fn update_hud(
    score: Res<Score>,
    q_player: Query<&PlayerCombat, With<Player>>,
    mut q_text: Query<(&HudText, &mut Text)>,
) {
    let lives = q_player.iter().next().map_or(0, PlayerCombat::lives);

    for (kind, mut text) in &mut q_text {
        let label = match kind {
            HudText::Lives => lives_label(lives),
            HudText::Score => score_label(score.value()),
        };
        if text.0 != label {
            text.0 = label;
        }
    }
}

fn spawn_final_score(mut commands: Commands, score: Res<Score>) {
    commands.spawn((
        Name::new("FinalScore"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(45.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Text::new(format!("GAME OVER\n{}", score_label(score.value()))),
        DespawnOnExit(GameState::GameOver),
    ));
}
