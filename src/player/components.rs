//! Player-related components.

use bevy::prelude::*;
use serde::Deserialize;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Present while an enemy is killing the player. Input is ignored.
#[derive(Component)]
pub struct Dying;

/// Tracks player movement state for physics.
#[derive(Component)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            vertical_velocity: 0.0,
        }
    }
}

/// Camera the player sees through.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Black camera shown while the light is off and after death.
#[derive(Component)]
pub struct DeathCamera;

/// Distance-driven footstep timing, like a walking cycle.
#[derive(Component, Debug, Clone, Default)]
pub struct StepCycle {
    cycle: f32,
    next_step: f32,
}

impl StepCycle {
    /// Advance the cycle. Returns true when a step should play.
    ///
    /// The cycle only grows while the player is trying to move and actually
    /// moving, by the distance covered plus a stride term.
    pub fn advance(&mut self, moved: f32, speed: f32, has_input: bool, interval: f32, dt: f32) -> bool {
        if moved > 0.0 && has_input {
            self.cycle += moved + 3.0 * speed * dt;
        }

        if self.cycle <= self.next_step {
            return false;
        }
        self.next_step = self.cycle + interval;
        true
    }
}

/// Configuration for the first-person controller (assets/data/player.ron).
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Movement speed in units per second
    pub walk_speed: f32,
    /// Gravity acceleration
    pub gravity: f32,
    /// Stride length between footsteps
    pub step_interval: f32,
    /// Height of the eyes above the body's centre
    pub eye_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            walk_speed: 4.0,
            gravity: 15.0,
            step_interval: 5.0,
            eye_height: 0.6,
        }
    }
}
