//! Hollow Lights - a first-person flashlight horror game in Bevy.
//!
//! The player walks a dark street holding a flashlight. Enemies are drawn to
//! the light, stare when caught in the beam, then charge. Closed houses are
//! the only shelter, and the houses hide a door-order puzzle.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, tuning, fixed simulation tick
//! - **Player**: First-person movement, camera, death view
//! - **Flashlight**: Delayed switch, beam target, perception cone
//! - **Enemies**: Behaviour state machine, navigation, animation
//! - **World**: Street layout, houses, safe zones, door puzzle
//! - **Audio**: Sound cues and looping songs
//! - **UI**: Door prompts, clue, ending screen

pub mod audio;
pub mod core;
pub mod enemies;
pub mod flashlight;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct HollowLightsPlugin;

impl Plugin for HollowLightsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Flashlight and perception
            .add_plugins(flashlight::FlashlightPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Audio systems
            .add_plugins(audio::GameAudioPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
