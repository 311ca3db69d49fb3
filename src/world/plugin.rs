//! World plugin - the street, its houses, and the door puzzle.

use bevy::prelude::*;

use crate::core::{load_or_default, EnemyTuning, FlashlightTuning, GameState, SimulationSet};
use crate::enemies::{spawn_enemy, WalkableArea};
use crate::player::{spawn_player, PlayerConfig};

use super::builder::{build_level, LevelEntity};
use super::interaction::{
    animate_doors, apply_puzzle_effects, detect_door_triggers, handle_interact, NearbyDoor,
};
use super::layout::LevelLayout;
use super::puzzle::{PuzzleEffect, PuzzleProgress};
use super::safe_zone::{update_safe_zone, SafeZone};

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SafeZone>()
            .init_resource::<NearbyDoor>()
            .add_event::<PuzzleEffect>()
            .add_systems(Startup, load_layout)
            .add_systems(OnEnter(GameState::InGame), setup_level)
            .add_systems(OnExit(GameState::InGame), cleanup_level)
            .add_systems(FixedUpdate, update_safe_zone.in_set(SimulationSet::Perceive))
            .add_systems(
                Update,
                (detect_door_triggers, handle_interact, apply_puzzle_effects, animate_doors)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

/// Load the street layout, falling back to the built-in one if it cannot host the puzzle.
fn load_layout(mut commands: Commands) {
    let layout = load_or_default::<LevelLayout>("assets/data/level.ron");
    let layout = match layout.validate() {
        Ok(()) => layout,
        Err(e) => {
            error!("Invalid level layout: {}. Using the default street.", e);
            LevelLayout::default()
        }
    };
    commands.insert_resource(layout);
}

/// Build the street and everyone on it.
#[allow(clippy::too_many_arguments)]
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    layout: Res<LevelLayout>,
    tuning: Res<EnemyTuning>,
    flashlight: Res<FlashlightTuning>,
    player_config: Res<PlayerConfig>,
) {
    info!("Building street with {} houses", layout.houses.len());

    commands.insert_resource(PuzzleProgress::new(layout.combo.clone()));
    commands.insert_resource(WalkableArea::new(layout.walkable.clone()));
    commands.insert_resource(SafeZone::default());
    commands.insert_resource(NearbyDoor::default());

    build_level(&mut commands, &mut meshes, &mut materials, &layout);

    spawn_player(
        &mut commands,
        layout.player_spawn(),
        layout.player_yaw,
        &player_config,
        &flashlight,
    );

    for &position in &layout.enemy_spawns {
        spawn_enemy(
            &mut commands,
            &mut meshes,
            &mut materials,
            &asset_server,
            &tuning.model,
            Vec3::from(position),
        );
    }
}

/// Clean up level entities when leaving InGame state.
fn cleanup_level(mut commands: Commands, level_query: Query<Entity, With<LevelEntity>>) {
    for entity in level_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
