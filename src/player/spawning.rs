//! Player spawning: body, eyes, flashlight, and the death camera.

use bevy::pbr::FogFalloff;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::render::view::RenderLayers;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::movement::PLAYER_COLLIDER;
use crate::audio::{FootstepPool, RotatingPool, PLAYER_FOOTSTEP_CLIPS};
use crate::core::FlashlightTuning;
use crate::flashlight::Flashlight;
use crate::world::LevelEntity;

/// Layer nothing is drawn on; the death camera only shows its clear colour.
const EMPTY_LAYER: usize = 7;

/// Spawn the player entity with camera and flashlight.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec3,
    yaw_degrees: f32,
    config: &PlayerConfig,
    flashlight: &FlashlightTuning,
) -> Entity {
    let (half_height, radius) = PLAYER_COLLIDER;

    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            StepCycle::default(),
            FootstepPool(RotatingPool::new(PLAYER_FOOTSTEP_CLIPS.len())),
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_y(yaw_degrees.to_radians())),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(half_height, radius),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_KINEMATIC,
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.3),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
            LevelEntity,
        ))
        .id();

    let light_visibility = if flashlight.start_on {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    commands.entity(player).with_children(|parent| {
        parent
            .spawn((
                Camera3d::default(),
                Camera {
                    clear_color: ClearColorConfig::Custom(Color::BLACK),
                    is_active: flashlight.start_on,
                    ..default()
                },
                DistanceFog {
                    color: Color::srgb(0.01, 0.01, 0.015),
                    falloff: FogFalloff::ExponentialSquared { density: 0.08 },
                    ..default()
                },
                PlayerCamera::default(),
                Transform::from_xyz(0.0, config.eye_height, 0.0),
            ))
            .with_children(|eyes| {
                eyes.spawn((
                    Flashlight::new(flashlight.start_on),
                    SpotLight {
                        color: Color::srgb(1.0, 0.95, 0.85),
                        intensity: 2_000_000.0,
                        range: flashlight.beam_range * 2.0,
                        outer_angle: 30_f32.to_radians(),
                        inner_angle: 18_f32.to_radians(),
                        shadows_enabled: true,
                        ..default()
                    },
                    Transform::from_xyz(0.15, -0.1, 0.0),
                    light_visibility,
                ));

                eyes.spawn((
                    DeathCamera,
                    Camera3d::default(),
                    Camera {
                        order: 1,
                        clear_color: ClearColorConfig::Custom(Color::BLACK),
                        is_active: !flashlight.start_on,
                        ..default()
                    },
                    Transform::default(),
                    RenderLayers::layer(EMPTY_LAYER),
                ));
            });
    });

    info!("Spawned player at {}", position);
    player
}
