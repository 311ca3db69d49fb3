//! Timed behaviour sequences.
//!
//! Each sequence is plain state advanced by the fixed tick. Suspension points
//! are timers stored in the variant, so stepping simulated time in a test
//! walks a sequence exactly as the game does.

use bevy::prelude::*;
use std::time::Duration;

/// Stare-then-pursue attack run by an enemy caught in the light.
#[derive(Debug, Clone)]
pub enum AttackSequence {
    /// Frozen, turning to face the player until the timer runs out.
    Stare { timer: Timer },
    /// Running at the player while the light stays on.
    Pursue,
}

impl AttackSequence {
    pub fn stare(seconds: f32) -> Self {
        Self::Stare {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }

    pub fn is_staring(&self) -> bool {
        matches!(self, Self::Stare { .. })
    }

    /// Length of the stare, or `None` once pursuing.
    pub fn stare_duration(&self) -> Option<f32> {
        match self {
            Self::Stare { timer } => Some(timer.duration().as_secs_f32()),
            Self::Pursue => None,
        }
    }
}

/// Flashlight flicker played while the player is being killed.
///
/// Runs at most once per enemy; every step asks the flashlight to toggle,
/// and the flashlight's own switch guard decides whether it actually flips.
#[derive(Debug, Clone)]
pub struct FlickerSequence {
    delays: Vec<f32>,
    next: usize,
    timer: Timer,
}

impl FlickerSequence {
    pub fn new(delays: &[f32]) -> Self {
        let first = delays.first().copied().unwrap_or(0.0);
        Self {
            delays: delays.to_vec(),
            next: 0,
            timer: Timer::from_seconds(first, TimerMode::Once),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.delays.len()
    }

    /// Advance the flicker. Returns true when a toggle is due this tick.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_finished() {
            return false;
        }

        self.timer.tick(dt);
        if !self.timer.finished() {
            return false;
        }

        self.next += 1;
        if let Some(delay) = self.delays.get(self.next) {
            self.timer = Timer::from_seconds(*delay, TimerMode::Once);
        }
        true
    }
}

/// Footstep cadence: one step every `1 / speed` seconds while moving.
#[derive(Debug, Clone, Default)]
pub struct FootstepCadence {
    wait: Option<Timer>,
}

impl FootstepCadence {
    pub fn is_active(&self) -> bool {
        self.wait.is_some()
    }

    /// Start the loop. The first step is due immediately, so this always
    /// returns true.
    pub fn start(&mut self, speed: f32) -> bool {
        self.after_step(speed);
        true
    }

    /// Advance the loop. Returns true when a step is due this tick.
    pub fn advance(&mut self, dt: Duration, speed: f32) -> bool {
        let Some(timer) = self.wait.as_mut() else {
            return false;
        };

        timer.tick(dt);
        if !timer.finished() {
            return false;
        }

        self.after_step(speed);
        true
    }

    /// A step just played: end the loop if standing still, else wait.
    fn after_step(&mut self, speed: f32) {
        self.wait = if speed == 0.0 {
            None
        } else {
            Some(Timer::from_seconds(1.0 / speed, TimerMode::Once))
        };
    }
}
