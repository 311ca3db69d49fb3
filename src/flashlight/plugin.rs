//! Flashlight plugin.

use bevy::prelude::*;

use super::components::{BeamTarget, LookProbe};
use super::systems::*;
use crate::core::{GameState, SimulationSet};

/// Flashlight plugin - switch handling and light perception.
pub struct FlashlightPlugin;

impl Plugin for FlashlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BeamTarget>()
            .init_resource::<LookProbe>()
            .add_systems(Update, read_toggle_input.run_if(in_state(GameState::InGame)))
            .add_systems(
                FixedUpdate,
                (update_beam_target, probe_look, scan_cone).in_set(SimulationSet::Perceive),
            )
            .add_systems(
                FixedUpdate,
                (apply_toggle_requests, advance_flashlight)
                    .chain()
                    .in_set(SimulationSet::Switch),
            );
    }
}
