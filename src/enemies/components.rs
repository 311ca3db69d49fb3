//! Enemy-related components and resources.

use bevy::prelude::*;
use bevy_kira_audio::AudioInstance;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Sensor around an enemy body that reports touching the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct ContactZone(pub Entity);

/// The ambient song an enemy carries with it. Filled in by the audio plugin
/// once the loop starts.
#[derive(Component, Default)]
pub struct EnemySong(pub Option<Handle<AudioInstance>>);

/// Enemy the flashlight may drop into the beam when it turns on.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct TeleportTarget(pub Option<Entity>);
