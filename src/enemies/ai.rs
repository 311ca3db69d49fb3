//! Enemy AI systems.
//!
//! Thin ECS glue around [`EnemyBrain`]: gather what the enemy can sense, run
//! the brain, and turn its [`Reactions`] into events and commands.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::brain::{EnemyBrain, Environment, Reactions, Surroundings};
use super::components::{ContactZone, Enemy};
use super::navigation::{NavAgent, NavMesh, WalkableArea};
use crate::audio::{death_scream_variant, FootstepPool};
use crate::core::{
    EnemyCue, EnemyTuning, FlashlightToggleRequest, GameRng, LightHitEvent, NotifyEvent,
    PlayerCaughtEvent, PlayerContactEvent, SoundCue, TeleportAheadEvent,
};
use crate::flashlight::{BeamTarget, Flashlight, LookProbe};
use crate::player::{Dying, Player, PlayerCamera};
use crate::world::SafeZone;

/// Everything an enemy can perceive about the player this tick.
#[derive(SystemParam)]
pub struct Senses<'w, 's> {
    safe_zone: Res<'w, SafeZone>,
    beam: Res<'w, BeamTarget>,
    probe: Res<'w, LookProbe>,
    flashlights: Query<'w, 's, &'static Flashlight>,
    player: Query<'w, 's, &'static GlobalTransform, With<Player>>,
    camera: Query<'w, 's, &'static GlobalTransform, With<PlayerCamera>>,
}

impl Senses<'_, '_> {
    /// Snapshot of the world, or `None` while the player is missing.
    pub fn surroundings(&self) -> Option<Surroundings> {
        let player = self.player.get_single().ok()?;
        let camera = self.camera.get_single().ok()?;
        let light_on = self.flashlights.get_single().is_ok_and(Flashlight::is_on);

        Some(Surroundings {
            player_safe: self.safe_zone.0,
            light_on,
            beam_target: self.beam.0,
            player_position: player.translation(),
            camera_forward: *camera.forward(),
            look_hit: self.probe.0,
        })
    }
}

/// Turns brain reactions into events and commands.
#[derive(SystemParam)]
pub struct Reactor<'w, 's> {
    commands: Commands<'w, 's>,
    cues: EventWriter<'w, EnemyCue>,
    sounds: EventWriter<'w, SoundCue>,
    toggles: EventWriter<'w, FlashlightToggleRequest>,
    caught: EventWriter<'w, PlayerCaughtEvent>,
    notes: EventWriter<'w, NotifyEvent>,
}

impl Reactor<'_, '_> {
    pub fn apply(
        &mut self,
        enemy: Entity,
        transform: &mut Transform,
        footsteps: &mut FootstepPool,
        rng: &mut impl Rng,
        reactions: Reactions,
    ) {
        for cue in reactions.cues {
            self.cues.send(EnemyCue { enemy, cue });
        }

        if reactions.footstep {
            if let Some(clip) = footsteps.0.draw(rng) {
                self.sounds.send(SoundCue::EnemyFootstep { enemy, clip });
            }
        }

        if let Some(target) = reactions.face {
            face(transform, target);
        }

        for _ in 0..reactions.flashlight_toggles {
            self.toggles.send(FlashlightToggleRequest);
        }

        if reactions.kill_started {
            self.sounds.send(SoundCue::StopSong { enemy });
            self.sounds.send(SoundCue::DeathScream {
                variant: death_scream_variant(rng.gen()),
            });
            self.caught.send(PlayerCaughtEvent {
                enemy,
                enemy_position: transform.translation,
            });
            self.commands.entity(enemy).insert(ColliderDisabled);
            self.notes
                .send(NotifyEvent::new("I don't think it likes that flashlight..."));
        }
    }
}

/// Turn to face a point, staying upright.
fn face(transform: &mut Transform, target: Vec3) {
    let level_target = Vec3::new(target.x, transform.translation.y, target.z);
    if level_target.distance_squared(transform.translation) > 1e-6 {
        transform.look_at(level_target, Vec3::Y);
    }
}

/// Deliver flashlight hits to the enemies they struck.
pub fn process_light_hits(
    mut hits: EventReader<LightHitEvent>,
    tuning: Res<EnemyTuning>,
    safe_zone: Res<SafeZone>,
    mut rng: ResMut<GameRng>,
    mut reactor: Reactor,
    mut enemies: Query<(&mut Transform, &mut EnemyBrain, &mut NavAgent, &mut FootstepPool), With<Enemy>>,
) {
    for LightHitEvent { enemy } in hits.read().copied() {
        let Ok((mut transform, mut brain, mut agent, mut footsteps)) = enemies.get_mut(enemy) else {
            continue;
        };

        let reactions = brain.hit_by_light(
            transform.translation,
            safe_zone.0,
            &mut agent,
            &tuning,
            &mut rng.0,
        );
        reactor.apply(enemy, &mut transform, &mut footsteps, &mut rng.0, reactions);
    }
}

/// Run every enemy's state machine for one tick.
#[allow(clippy::too_many_arguments)]
pub fn think(
    time: Res<Time>,
    tuning: Res<EnemyTuning>,
    area: Res<WalkableArea>,
    senses: Senses,
    mut rng: ResMut<GameRng>,
    mut reactor: Reactor,
    mut enemies: Query<
        (Entity, &mut Transform, &mut EnemyBrain, &mut NavAgent, &mut FootstepPool),
        With<Enemy>,
    >,
) {
    let Some(world) = senses.surroundings() else {
        return;
    };
    let env = Environment { tuning: &tuning, nav: &*area };

    for (enemy, mut transform, mut brain, mut agent, mut footsteps) in enemies.iter_mut() {
        let reactions = brain.update(
            time.delta(),
            transform.translation,
            &world,
            &mut agent,
            &env,
            &mut rng.0,
        );
        reactor.apply(enemy, &mut transform, &mut footsteps, &mut rng.0, reactions);
    }
}

/// Turn the player entering an enemy's contact zone into events.
pub fn detect_player_contact(
    mut collisions: EventReader<CollisionEvent>,
    players: Query<(), (With<Player>, Without<Dying>)>,
    zones: Query<&ContactZone>,
    mut contacts: EventWriter<PlayerContactEvent>,
) {
    for collision in collisions.read() {
        let (a, b) = match collision {
            CollisionEvent::Started(a, b, _) => (*a, *b),
            CollisionEvent::Stopped(..) => continue,
        };

        let zone = if players.contains(a) {
            zones.get(b)
        } else if players.contains(b) {
            zones.get(a)
        } else {
            continue;
        };
        if let Ok(ContactZone(enemy)) = zone {
            contacts.send(PlayerContactEvent { enemy: *enemy });
        }
    }
}

/// Kill or relocate enemies that touched the player.
#[allow(clippy::too_many_arguments)]
pub fn handle_player_contact(
    mut contacts: EventReader<PlayerContactEvent>,
    tuning: Res<EnemyTuning>,
    area: Res<WalkableArea>,
    senses: Senses,
    mut rng: ResMut<GameRng>,
    mut reactor: Reactor,
    mut enemies: Query<(&mut Transform, &mut EnemyBrain, &mut NavAgent, &mut FootstepPool), With<Enemy>>,
) {
    if contacts.is_empty() {
        return;
    }
    let Some(world) = senses.surroundings() else {
        contacts.clear();
        return;
    };
    let env = Environment { tuning: &tuning, nav: &*area };

    for PlayerContactEvent { enemy } in contacts.read().copied() {
        let Ok((mut transform, mut brain, mut agent, mut footsteps)) = enemies.get_mut(enemy) else {
            continue;
        };

        let reactions =
            brain.touched_player(transform.translation, &world, &mut agent, &env, &mut rng.0);
        reactor.apply(enemy, &mut transform, &mut footsteps, &mut rng.0, reactions);
    }
}

/// Drop the chosen enemy into the beam and send it at the player.
pub fn apply_teleport_ahead(
    mut teleports: EventReader<TeleportAheadEvent>,
    tuning: Res<EnemyTuning>,
    area: Res<WalkableArea>,
    beam: Res<BeamTarget>,
    mut rng: ResMut<GameRng>,
    mut reactor: Reactor,
    mut enemies: Query<(&mut Transform, &mut EnemyBrain, &mut NavAgent, &mut FootstepPool), With<Enemy>>,
) {
    for TeleportAheadEvent { enemy } in teleports.read().copied() {
        let Ok((mut transform, mut brain, mut agent, mut footsteps)) = enemies.get_mut(enemy) else {
            continue;
        };

        let point = match area.sample_point(beam.0, tuning.sample_radius) {
            Ok(point) => point,
            Err(e) => {
                warn!("Teleport ahead skipped: {}", e);
                continue;
            }
        };

        info!("Enemy {:?} appears in the beam at {}", enemy, point);
        agent.warp(point);
        let reactions = brain.teleported_ahead(point, &mut agent, &tuning, &mut rng.0);
        reactor.apply(enemy, &mut transform, &mut footsteps, &mut rng.0, reactions);
    }
}
