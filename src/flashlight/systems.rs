//! Flashlight systems: input, the delayed switch, and perception.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::components::{BeamTarget, Flashlight, LookProbe, Switch};
use super::perception::{query_beam_target, scan_for_lit_targets, PhysicsRayCaster, RayCaster, Viewpoint};
use crate::core::{
    ActiveView, ActiveViewEvent, EnemyTuning, FlashlightToggleRequest, FlashlightTuning, GameRng,
    LightHitEvent, SoundCue, TeleportAheadEvent,
};
use crate::enemies::{Enemy, TeleportTarget};
use crate::player::{Dying, Player, PlayerCamera};
use crate::world::SafeZone;

/// Whether turning the light on should drop an enemy into the beam.
pub fn should_teleport_ahead(dying: bool, safe: bool, roll: f32, chance: f32) -> bool {
    !dying && !safe && roll > 1.0 - chance
}

/// Space or right click flips the switch.
pub fn read_toggle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    dying: Query<(), (With<Player>, With<Dying>)>,
    mut requests: EventWriter<FlashlightToggleRequest>,
) {
    if !dying.is_empty() {
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Right) {
        requests.send(FlashlightToggleRequest);
    }
}

/// Start a switch for each request the flashlight will take.
pub fn apply_toggle_requests(
    mut requests: EventReader<FlashlightToggleRequest>,
    tuning: Res<FlashlightTuning>,
    mut lights: Query<&mut Flashlight>,
    mut sounds: EventWriter<SoundCue>,
) {
    let Ok(mut light) = lights.get_single_mut() else {
        requests.clear();
        return;
    };

    for _ in requests.read() {
        match light.toggle(tuning.switch_seconds) {
            Some(Switch::On) => sounds.send(SoundCue::FlashlightOn),
            Some(Switch::Off) => sounds.send(SoundCue::FlashlightOff),
            None => continue,
        };
    }
}

/// Finish pending switches.
#[allow(clippy::too_many_arguments)]
pub fn advance_flashlight(
    time: Res<Time>,
    tuning: Res<FlashlightTuning>,
    safe_zone: Res<SafeZone>,
    target: Res<TeleportTarget>,
    mut rng: ResMut<GameRng>,
    dying: Query<(), (With<Player>, With<Dying>)>,
    mut lights: Query<(&mut Flashlight, &mut Visibility)>,
    mut views: EventWriter<ActiveViewEvent>,
    mut teleports: EventWriter<TeleportAheadEvent>,
) {
    for (mut light, mut visibility) in lights.iter_mut() {
        let Some(switch) = light.advance(time.delta()) else {
            continue;
        };

        match switch {
            Switch::On => {
                // Keeps flashing the light from being a safe strategy
                let roll = rng.0.gen::<f32>();
                if should_teleport_ahead(!dying.is_empty(), safe_zone.0, roll, tuning.teleport_chance) {
                    if let Some(enemy) = target.0 {
                        teleports.send(TeleportAheadEvent { enemy });
                    }
                }
                *visibility = Visibility::Inherited;
                views.send(ActiveViewEvent(ActiveView::Main));
            }
            Switch::Off => {
                *visibility = Visibility::Hidden;
                views.send(ActiveViewEvent(ActiveView::Death));
            }
        }
        debug!("Flashlight switched {:?}", switch);
    }
}

/// Track where the beam lands.
pub fn update_beam_target(
    rapier: Query<&RapierContext>,
    tuning: Res<FlashlightTuning>,
    lights: Query<&GlobalTransform, With<Flashlight>>,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    players: Query<Entity, With<Player>>,
    mut beam: ResMut<BeamTarget>,
) {
    let Ok(context) = rapier.get_single() else {
        return;
    };
    let (Ok(light), Ok(camera)) = (lights.get_single(), cameras.get_single()) else {
        return;
    };

    let caster = PhysicsRayCaster {
        context,
        exclude: players.get_single().ok(),
    };
    beam.0 = query_beam_target(
        Viewpoint::from_global(light),
        Viewpoint::from_global(camera),
        tuning.beam_range,
        &caster,
    );
}

/// Short ray along the view, used to catch enemies right under the player's nose.
pub fn probe_look(
    rapier: Query<&RapierContext>,
    tuning: Res<EnemyTuning>,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    players: Query<Entity, With<Player>>,
    mut probe: ResMut<LookProbe>,
) {
    let Ok(context) = rapier.get_single() else {
        return;
    };
    let Ok(camera) = cameras.get_single() else {
        return;
    };

    let caster = PhysicsRayCaster {
        context,
        exclude: players.get_single().ok(),
    };
    let view = Viewpoint::from_global(camera);
    probe.0 = caster
        .cast_ray(view.position, view.forward, tuning.catch_ray_length)
        .map(|hit| hit.point);
}

/// Sweep the light cone and report the first enemy caught in it.
#[allow(clippy::too_many_arguments)]
pub fn scan_cone(
    rapier: Query<&RapierContext>,
    tuning: Res<FlashlightTuning>,
    lights: Query<&Flashlight>,
    cameras: Query<&GlobalTransform, With<PlayerCamera>>,
    players: Query<Entity, With<Player>>,
    dying: Query<(), (With<Player>, With<Dying>)>,
    enemies: Query<(), With<Enemy>>,
    mut hits: EventWriter<LightHitEvent>,
) {
    if !dying.is_empty() {
        return;
    }
    let Ok(context) = rapier.get_single() else {
        return;
    };
    let Ok(camera) = cameras.get_single() else {
        return;
    };

    let light_on = lights.get_single().is_ok_and(Flashlight::is_on);
    let caster = PhysicsRayCaster {
        context,
        exclude: players.get_single().ok(),
    };

    if let Some(enemy) = scan_for_lit_targets(
        light_on,
        Viewpoint::from_global(camera),
        &tuning.cone,
        &caster,
        |entity| enemies.contains(entity),
    ) {
        hits.send(LightHitEvent { enemy });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teleport_needs_a_high_roll() {
        assert!(!should_teleport_ahead(false, false, 0.5, 0.07));
        assert!(!should_teleport_ahead(false, false, 0.92, 0.07));
        assert!(should_teleport_ahead(false, false, 0.95, 0.07));
    }

    #[test]
    fn no_teleport_while_dying_or_safe() {
        assert!(!should_teleport_ahead(true, false, 0.99, 0.07));
        assert!(!should_teleport_ahead(false, true, 0.99, 0.07));
    }
}
