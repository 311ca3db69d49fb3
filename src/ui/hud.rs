//! In-game HUD - door prompts and the order clue.

use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::ui::IsDefaultUiCamera;

use crate::core::{GameState, NotifyEvent};
use crate::player::Player;
use crate::world::{House, PuzzleProgress, PuzzleStage};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Prompt line above the crosshair.
#[derive(Component)]
pub struct PromptText;

/// Door order, readable from inside the final house.
#[derive(Component)]
pub struct ClueText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_prompt, update_clue).run_if(in_state(GameState::InGame)),
        );
}

/// Door order as shown on the clue, e.g. "21  13  33  11".
pub fn clue_line(combo: &[u32]) -> String {
    combo
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("  ")
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Drawn over whichever world camera is live
    commands.spawn((
        Camera2d,
        Camera {
            order: 2,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
        HudRoot,
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.8)),
                Node {
                    margin: UiRect::top(Val::Px(120.0)),
                    ..default()
                },
                PromptText,
            ));
        });

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Start,
                padding: UiRect::top(Val::Px(60.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.55, 0.08, 0.06)),
                ClueText,
            ));
        });
}

/// Show the latest prompt.
fn update_prompt(
    mut notes: EventReader<NotifyEvent>,
    mut prompt: Query<&mut Text, With<PromptText>>,
) {
    let Some(note) = notes.read().last() else {
        return;
    };
    if let Ok(mut text) = prompt.get_single_mut() {
        text.0 = note.message.clone();
    }
}

/// Show the door order while the player stands in the final house.
fn update_clue(
    progress: Option<Res<PuzzleProgress>>,
    players: Query<&GlobalTransform, With<Player>>,
    houses: Query<&House>,
    mut clue: Query<&mut Text, With<ClueText>>,
) {
    let Ok(mut text) = clue.get_single_mut() else {
        return;
    };
    let (Some(progress), Ok(player)) = (progress, players.get_single()) else {
        return;
    };

    let dealt = matches!(progress.stage(), PuzzleStage::FindCombo | PuzzleStage::UseCombo);
    let inside = houses
        .iter()
        .any(|house| house.is_final && house.footprint.contains(player.translation()));

    let line = if dealt && inside {
        clue_line(progress.combo())
    } else {
        String::new()
    };
    if text.0 != line {
        text.0 = line;
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clue_lists_addresses_in_order() {
        assert_eq!(clue_line(&[21, 13, 33, 11]), "21  13  33  11");
        assert_eq!(clue_line(&[]), "");
    }
}
