//! Player plugin - movement, camera, and death handling.

use bevy::prelude::*;

use super::components::PlayerConfig;
use super::{death, movement};
use crate::core::{load_or_default, GameState};

/// Player plugin - handles input, movement, and the camera views.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<PlayerConfig>()
            .add_systems(Startup, load_player_config)
            .add_systems(OnEnter(GameState::InGame), movement::grab_cursor)
            .add_systems(OnEnter(GameState::Finished), movement::release_cursor)
            .add_systems(
                Update,
                (
                    movement::mouse_look,
                    movement::player_movement,
                    movement::player_footsteps,
                    movement::read_interact_input,
                    death::handle_player_caught,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            // Runs in every state so the view is right while the level reloads
            .add_systems(Update, death::switch_active_view);
    }
}

fn load_player_config(mut commands: Commands) {
    commands.insert_resource(load_or_default::<PlayerConfig>("assets/data/player.ron"));
}
