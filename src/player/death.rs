//! Being caught: freeze the player facing the enemy, and switch cameras.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;

use super::components::*;
use crate::core::{ActiveView, ActiveViewEvent, EnemyTuning, PlayerCaughtEvent};

/// Yaw and pitch (radians) that point eyes at `eye` towards `target`.
pub fn aim_angles(eye: Vec3, target: Vec3) -> (f32, f32) {
    let offset = target - eye;
    let yaw = (-offset.x).atan2(-offset.z);
    let pitch = offset.y.atan2(offset.xz().length());
    (yaw, pitch)
}

/// Lock the player in place, staring at whoever caught them.
pub fn handle_player_caught(
    mut commands: Commands,
    mut caught: EventReader<PlayerCaughtEvent>,
    tuning: Res<EnemyTuning>,
    config: Res<PlayerConfig>,
    mut players: Query<(Entity, &mut Transform), (With<Player>, Without<Dying>)>,
    mut cameras: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let Some(event) = caught.read().last() else {
        return;
    };
    let Ok((player, mut body)) = players.get_single_mut() else {
        return;
    };

    commands.entity(player).insert((Dying, ColliderDisabled));

    let (half_height, radius) = tuning.model.collider;
    let face = event.enemy_position + Vec3::Y * (2.0 * half_height + radius);
    let eye = body.translation + Vec3::Y * config.eye_height;
    let (yaw, pitch) = aim_angles(eye, face);

    body.rotation = Quat::from_rotation_y(yaw);
    if let Ok((mut camera_transform, mut camera)) = cameras.get_single_mut() {
        camera.pitch = pitch;
        camera_transform.rotation = Quat::from_rotation_x(pitch);
    }

    info!("Player caught by {:?}", event.enemy);
}

/// Render through whichever camera was asked for.
pub fn switch_active_view(
    mut views: EventReader<ActiveViewEvent>,
    mut main: Query<&mut Camera, (With<PlayerCamera>, Without<DeathCamera>)>,
    mut death: Query<&mut Camera, (With<DeathCamera>, Without<PlayerCamera>)>,
) {
    let Some(ActiveViewEvent(view)) = views.read().last().copied() else {
        return;
    };

    for mut camera in main.iter_mut() {
        camera.is_active = view == ActiveView::Main;
    }
    for mut camera in death.iter_mut() {
        camera.is_active = view == ActiveView::Death;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_after(yaw: f32, pitch: f32) -> Vec3 {
        Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch) * Vec3::NEG_Z
    }

    #[test]
    fn aims_straight_at_target() {
        let eye = Vec3::new(1.0, 1.6, 2.0);
        for target in [
            Vec3::new(5.0, 1.6, 2.0),
            Vec3::new(1.0, 0.0, -3.0),
            Vec3::new(-4.0, 3.0, 6.0),
        ] {
            let (yaw, pitch) = aim_angles(eye, target);
            let expected = (target - eye).normalize();
            assert!(forward_after(yaw, pitch).distance(expected) < 1e-4);
        }
    }
}
