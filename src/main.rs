//! Hollow Lights - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Space / Right click: Flashlight
//! - Left click: Doors

use bevy::audio::AudioPlugin as BevyAudioPlugin;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins; sound goes through kira instead
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Hollow Lights".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<BevyAudioPlugin>(),
        )

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(hollow_lights::HollowLightsPlugin)

        .run();
}
