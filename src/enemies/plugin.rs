//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use super::components::TeleportTarget;
use super::navigation::{steer_agents, sync_obstacles, WalkableArea};
use super::spawning::{handle_respawn_requests, track_teleport_target};
use crate::core::{GameState, SimulationSet};

/// Enemy plugin - handles enemy spawning, AI, navigation, and animations.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TeleportTarget>()
            .init_resource::<WalkableArea>()
            // Decisions run on the fixed tick, after perception
            .add_systems(
                FixedUpdate,
                (
                    ai::process_light_hits,
                    ai::apply_teleport_ahead,
                    ai::think,
                    ai::detect_player_contact,
                    ai::handle_player_contact,
                )
                    .chain()
                    .in_set(SimulationSet::Decide),
            )
            .add_systems(FixedUpdate, sync_obstacles.in_set(SimulationSet::Perceive))
            .add_systems(FixedUpdate, steer_agents.in_set(SimulationSet::Move))
            .add_systems(
                FixedUpdate,
                (animation::sync_run_speed, animation::advance_kill_choreography)
                    .in_set(SimulationSet::Present),
            )
            // Presentation and bookkeeping follow the frame rate
            .add_systems(
                Update,
                (
                    animation::apply_enemy_cues,
                    animation::setup_enemy_animations,
                    animation::play_animations,
                    handle_respawn_requests,
                    track_teleport_target,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
