//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::animation::{AnimatorParams, NeedsAnimationSetup};
use super::brain::EnemyBrain;
use super::components::{ContactZone, Enemy, EnemySong, TeleportTarget};
use super::navigation::{NavAgent, NavMesh, WalkableArea};
use crate::audio::{FootstepPool, RotatingPool, ENEMY_FOOTSTEP_CLIPS};
use crate::core::{EnemyModel, EnemyRespawnRequest, EnemyTuning};
use crate::world::LevelEntity;

const CONTACT_MARGIN: f32 = 0.15;

/// Spawn one enemy standing at `position` (feet on the ground).
pub fn spawn_enemy(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    model: &EnemyModel,
    position: Vec3,
) -> Entity {
    let (half_height, radius) = model.collider;
    let center = half_height + radius;

    let enemy = commands
        .spawn((
            Enemy,
            EnemyBrain::default(),
            NavAgent::at(position),
            AnimatorParams::default(),
            FootstepPool(RotatingPool::new(ENEMY_FOOTSTEP_CLIPS.len())),
            EnemySong::default(),
            Transform::from_translation(position),
            Visibility::default(),
            // The body's origin is at its feet, like the navigation points it walks to
            RigidBody::KinematicPositionBased,
            Collider::compound(vec![(
                Vec3::Y * center,
                Quat::IDENTITY,
                Collider::capsule_y(half_height, radius),
            )]),
            LevelEntity,
        ))
        .id();

    // Slightly larger sensor so touching the player is reported even though
    // the character controller never lets the two bodies overlap
    commands.entity(enemy).with_children(|parent| {
        parent.spawn((
            ContactZone(enemy),
            Collider::capsule_y(half_height, radius + CONTACT_MARGIN),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_KINEMATIC,
            Transform::from_xyz(0.0, center, 0.0),
        ));
    });

    match model.scene_path.as_deref() {
        Some(path) => {
            commands.entity(enemy).insert(NeedsAnimationSetup).with_children(|parent| {
                parent.spawn((
                    SceneRoot(asset_server.load(path.to_string())),
                    Transform::from_scale(Vec3::splat(model.scale)),
                ));
            });
        }
        None => {
            let mesh = meshes.add(Capsule3d::new(radius, half_height * 2.0));
            let material = materials.add(StandardMaterial {
                base_color: Color::srgb(0.08, 0.07, 0.07),
                perceptual_roughness: 1.0,
                ..default()
            });
            commands.entity(enemy).with_children(|parent| {
                parent.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    Transform::from_xyz(0.0, center, 0.0).with_scale(Vec3::splat(model.scale)),
                ));
            });
        }
    }

    info!("Spawned enemy at {}", position);
    enemy
}

/// Spawn enemies asked for by the puzzle, snapped onto walkable ground.
pub fn handle_respawn_requests(
    mut commands: Commands,
    mut requests: EventReader<EnemyRespawnRequest>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    tuning: Res<EnemyTuning>,
    area: Res<WalkableArea>,
) {
    for request in requests.read() {
        let position = area
            .sample_point(request.position, tuning.sample_radius)
            .unwrap_or_else(|e| {
                warn!("Respawning enemy off the walkable area: {}", e);
                request.position
            });

        spawn_enemy(
            &mut commands,
            &mut meshes,
            &mut materials,
            &asset_server,
            &tuning.model,
            position,
        );
    }
}

/// Keep the teleport target pointing at a live enemy.
pub fn track_teleport_target(
    enemies: Query<Entity, With<Enemy>>,
    mut target: ResMut<TeleportTarget>,
) {
    if target.0.is_some_and(|enemy| enemies.contains(enemy)) {
        return;
    }

    let next = enemies.iter().next();
    if target.0 != next {
        debug!("Teleport target is now {:?}", next);
        target.0 = next;
    }
}
