//! First-person movement, mouse look, and player input.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::audio::FootstepPool;
use crate::core::{GameRng, InteractEvent, SoundCue};

/// Capsule half height and radius of the player body.
pub const PLAYER_COLLIDER: (f32, f32) = (0.5, 0.3);

/// Grab and hide cursor when entering gameplay.
pub fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor once the game is over.
pub fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Handle mouse movement for looking around.
///
/// Rotates the player entity horizontally (yaw) and the camera vertically (pitch).
/// The camera is a child of the player, so horizontal rotation affects both.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, (With<Player>, Without<Dying>)>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    // Clamped to about 80 degrees so the view never flips
    camera.pitch -= delta.y * sensitivity * y_invert;
    camera.pitch = camera.pitch.clamp(-1.4, 1.4);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// WASD movement with gravity, through Rapier's character controller.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<
        (Entity, &Transform, &mut MovementState, &mut KinematicCharacterController),
        (With<Player>, Without<Dying>),
    >,
) {
    let Ok((player_entity, transform, mut movement_state, mut controller)) =
        player_query.get_single_mut()
    else {
        return;
    };

    // Short ray just above the bottom of the capsule
    let (half_height, radius) = PLAYER_COLLIDER;
    let is_grounded = match rapier_context.get_single() {
        Ok(context) => context
            .cast_ray(
                transform.translation - Vec3::Y * (half_height + radius - 0.05),
                Vec3::NEG_Y,
                0.15,
                true,
                QueryFilter::default().exclude_collider(player_entity).exclude_sensors(),
            )
            .is_some(),
        Err(_) => true,
    };
    movement_state.is_grounded = is_grounded;

    if is_grounded {
        if movement_state.vertical_velocity < 0.0 {
            movement_state.vertical_velocity = 0.0;
        }
    } else {
        movement_state.vertical_velocity -= config.gravity * time.delta_secs();
    }

    let direction = input_direction(&keyboard);
    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let horizontal = Quat::from_rotation_y(yaw) * direction * config.walk_speed * time.delta_secs();
    let vertical = Vec3::Y * movement_state.vertical_velocity * time.delta_secs();

    controller.translation = Some(horizontal + vertical);
}

/// Local movement direction from WASD, normalized.
fn input_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

/// Play a footstep whenever the walking cycle passes the next stride.
pub fn player_footsteps(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut rng: ResMut<GameRng>,
    mut players: Query<
        (&KinematicCharacterControllerOutput, &mut StepCycle, &mut FootstepPool),
        (With<Player>, Without<Dying>),
    >,
    mut sounds: EventWriter<SoundCue>,
) {
    let Ok((output, mut cycle, mut pool)) = players.get_single_mut() else {
        return;
    };

    let moved = output.effective_translation.xz().length();
    let has_input = input_direction(&keyboard) != Vec3::ZERO;
    let step = cycle.advance(
        moved,
        config.walk_speed,
        has_input,
        config.step_interval,
        time.delta_secs(),
    );

    if step && output.grounded {
        if let Some(clip) = pool.0.draw(&mut rng.0) {
            sounds.send(SoundCue::PlayerFootstep { clip });
        }
    }
}

/// Left click interacts with whatever door the player stands at.
pub fn read_interact_input(
    mouse: Res<ButtonInput<MouseButton>>,
    dying: Query<(), (With<Player>, With<Dying>)>,
    mut interactions: EventWriter<InteractEvent>,
) {
    if dying.is_empty() && mouse.just_pressed(MouseButton::Left) {
        interactions.send(InteractEvent);
    }
}
