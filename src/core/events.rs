//! Global events used for cross-system communication.
//!
//! The enemy brain never talks to the flashlight, the camera or the audio
//! backend directly. It emits these events and the owning plugin reacts,
//! which keeps every piece testable on its own.

use bevy::prelude::*;

/// Sent by the perception sweep when the flashlight cone strikes an enemy.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LightHitEvent {
    pub enemy: Entity,
}

/// Sent when an enemy physically touches the player.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerContactEvent {
    pub enemy: Entity,
}

/// Sent when turning the flashlight on drops an enemy into the beam.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TeleportAheadEvent {
    pub enemy: Entity,
}

/// Request to flip the flashlight switch. Dropped while a switch is pending.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct FlashlightToggleRequest;

/// High-level presentation cue for a single enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Idle,
    Run,
    Kill,
}

/// Sent by the enemy brain for the animation layer.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyCue {
    pub enemy: Entity,
    pub cue: Cue,
}

/// Door sounds, in the order the house sound bank stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSound {
    Open,
    Close,
    Locked,
}

/// Fire-and-forget sound requests for the audio plugin.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Play clip `clip` of the enemy footstep bank.
    EnemyFootstep { enemy: Entity, clip: usize },
    /// Play clip `clip` of the player footstep bank.
    PlayerFootstep { clip: usize },
    FlashlightOn,
    FlashlightOff,
    /// One of the three death screams.
    DeathScream { variant: usize },
    DeathFade,
    /// Silence the looping song carried by an enemy.
    StopSong { enemy: Entity },
    Door(DoorSound),
    /// Start or stop the singing coming out of an unopened house.
    HouseSinging { house: Entity, playing: bool },
}

/// Sent once when an enemy starts killing the player.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerCaughtEvent {
    pub enemy: Entity,
    pub enemy_position: Vec3,
}

/// Which camera renders the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// The player's eyes.
    Main,
    /// The blacked-out view used while the light is off and after death.
    Death,
}

/// Switch the rendering camera.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActiveViewEvent(pub ActiveView);

/// Rebuild the current level from scratch.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SceneReloadEvent;

/// Short message for the player (door prompts, death taunts).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct NotifyEvent {
    pub message: String,
}

impl NotifyEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// The player clicked to interact with whatever is in front of them.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct InteractEvent;

/// Spawn a fresh enemy (sent when a puzzle reset finds none alive).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyRespawnRequest {
    pub position: Vec3,
}
