//! UI plugin - HUD and the ending screen.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::Finished), setup_ending)
            .add_systems(Update, ending_input.run_if(in_state(GameState::Finished)));
    }
}

/// Marker for ending screen entities.
#[derive(Component)]
struct EndingUi;

/// Set up the ending screen.
fn setup_ending(mut commands: Commands) {
    commands.spawn((Camera2d, EndingUi));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            EndingUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("The singing stops."),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.65, 0.6)),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new("Press Escape to leave"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.4, 0.42)),
            ));
        });
}

/// Leave the game from the ending screen.
fn ending_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}
