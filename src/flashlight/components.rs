//! Flashlight state and the resources the perception systems publish.

use bevy::prelude::*;
use std::time::Duration;

/// Direction a switch is heading in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

/// The player's flashlight.
///
/// Flipping the switch takes a moment. While a switch is pending any
/// further request is dropped, so a flicker can never queue up toggles.
#[derive(Component, Debug, Clone, Default)]
pub struct Flashlight {
    on: bool,
    pending: Option<(Switch, Timer)>,
}

impl Flashlight {
    pub fn new(on: bool) -> Self {
        Self { on, pending: None }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn turning_on(&self) -> bool {
        matches!(self.pending, Some((Switch::On, _)))
    }

    pub fn turning_off(&self) -> bool {
        matches!(self.pending, Some((Switch::Off, _)))
    }

    /// Start flipping the switch. Returns the direction, or `None` when a
    /// switch is already on its way.
    pub fn toggle(&mut self, delay_seconds: f32) -> Option<Switch> {
        let switch = match (self.on, &self.pending) {
            (false, None) => Switch::On,
            (true, None) => Switch::Off,
            (_, Some(_)) => return None,
        };
        self.pending = Some((switch, Timer::from_seconds(delay_seconds, TimerMode::Once)));
        Some(switch)
    }

    /// Advance a pending switch. Returns it once the light has changed.
    pub fn advance(&mut self, dt: Duration) -> Option<Switch> {
        let (switch, timer) = self.pending.as_mut()?;
        timer.tick(dt);
        if !timer.finished() {
            return None;
        }

        let switch = *switch;
        self.pending = None;
        self.on = switch == Switch::On;
        Some(switch)
    }
}

/// World point the beam currently lands on. The origin means "not yet known".
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct BeamTarget(pub Vec3);

/// Where a short ray along the player's view hits, if anything.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LookProbe(pub Option<Vec3>);

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn switch_takes_effect_after_delay() {
        let mut light = Flashlight::new(false);
        assert_eq!(light.toggle(0.35), Some(Switch::On));
        assert!(light.turning_on());

        assert_eq!(light.advance(secs(0.2)), None);
        assert!(!light.is_on());
        assert_eq!(light.advance(secs(0.2)), Some(Switch::On));
        assert!(light.is_on());
        assert!(!light.turning_on());
    }

    #[test]
    fn requests_during_a_switch_are_dropped() {
        let mut light = Flashlight::new(true);
        assert_eq!(light.toggle(0.35), Some(Switch::Off));
        assert_eq!(light.toggle(0.35), None);
        assert_eq!(light.toggle(0.35), None);

        assert_eq!(light.advance(secs(0.4)), Some(Switch::Off));
        assert!(!light.is_on());
        assert_eq!(light.advance(secs(1.0)), None);
        assert_eq!(light.toggle(0.35), Some(Switch::On));
    }
}
