//! Core plugin that sets up game states, events, tuning, and scene flow.

use bevy::prelude::*;

use super::config::load_tuning;
use super::events::*;
use super::rng::GameRng;
use super::states::*;

/// Simulation tick rate for AI, navigation, and perception.
pub const FIXED_TICK_HZ: f64 = 50.0;

/// Stages of one simulation tick, run in order in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Ray queries, beam target, safe-zone status.
    Perceive,
    /// Flashlight switch requests, so decisions see this tick's light.
    Switch,
    /// Enemy decisions.
    Decide,
    /// Navigation steering.
    Move,
    /// Animation parameters and timelines.
    Present,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Reloading, Finished)
/// - Global events shared by the gameplay plugins
/// - Tuning resources and the shared RNG
/// - Scene reload flow
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game state
            .init_state::<GameState>()

            // Fixed simulation tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_TICK_HZ))
            .init_resource::<GameRng>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Perceive,
                    SimulationSet::Switch,
                    SimulationSet::Decide,
                    SimulationSet::Move,
                    SimulationSet::Present,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )

            // Register global events
            .add_event::<LightHitEvent>()
            .add_event::<PlayerContactEvent>()
            .add_event::<TeleportAheadEvent>()
            .add_event::<FlashlightToggleRequest>()
            .add_event::<EnemyCue>()
            .add_event::<SoundCue>()
            .add_event::<PlayerCaughtEvent>()
            .add_event::<ActiveViewEvent>()
            .add_event::<SceneReloadEvent>()
            .add_event::<NotifyEvent>()
            .add_event::<InteractEvent>()
            .add_event::<EnemyRespawnRequest>()

            // Tuning must exist before anything enters InGame
            .add_systems(Startup, load_tuning)
            .add_systems(OnEnter(GameState::Loading), enter_game)

            // Reload goes InGame -> Reloading -> InGame so OnExit/OnEnter rebuild the level
            .add_systems(
                Update,
                handle_scene_reload.run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(GameState::Reloading), enter_game)
            .add_systems(Update, log_notifications);
    }
}

/// Move into gameplay. Data files are read synchronously at startup.
fn enter_game(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Tear the level down when a reload is requested.
fn handle_scene_reload(
    mut reloads: EventReader<SceneReloadEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if reloads.read().last().is_some() {
        info!("Reloading scene");
        next_state.set(GameState::Reloading);
    }
}

/// Mirror player-facing messages into the log.
fn log_notifications(mut notifications: EventReader<NotifyEvent>) {
    for notification in notifications.read() {
        if !notification.message.is_empty() {
            info!("\"{}\"", notification.message);
        }
    }
}
