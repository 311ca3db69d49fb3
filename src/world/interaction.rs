//! Doors: prompts, clicks, and what the puzzle does in response.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::builder::{spawn_interior, TutorialFence};
use super::house::{Door, DoorOutcome, DoorTrigger, House, Interior};
use super::layout::LevelLayout;
use super::puzzle::{PuzzleEffect, PuzzleProgress};
use crate::core::{
    DoorSound, EnemyRespawnRequest, GameRng, GameState, InteractEvent, NotifyEvent, SoundCue,
};
use crate::enemies::Enemy;
use crate::player::Player;

/// Fraction of a full swing per second.
const DOOR_SWING_RATE: f32 = 1.5;

/// House whose doorway the player is standing in.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct NearbyDoor(pub Option<Entity>);

/// Every house, in address order, ready for the puzzle to work on.
fn street<'a>(houses: &'a mut Query<(Entity, &mut House)>) -> Vec<(Entity, Mut<'a, House>)> {
    let mut street: Vec<_> = houses.iter_mut().collect();
    street.sort_by_key(|(_, house)| house.address);
    street
}

/// Track which doorway the player stands in and show the matching prompt.
#[allow(clippy::too_many_arguments)]
pub fn detect_door_triggers(
    mut collisions: EventReader<CollisionEvent>,
    players: Query<(), With<Player>>,
    triggers: Query<&DoorTrigger>,
    mut houses: Query<(Entity, &mut House)>,
    enemies: Query<(), With<Enemy>>,
    mut progress: ResMut<PuzzleProgress>,
    mut nearby: ResMut<NearbyDoor>,
    mut notes: EventWriter<NotifyEvent>,
    mut effects: EventWriter<PuzzleEffect>,
) {
    for collision in collisions.read() {
        let (a, b, entered) = match collision {
            CollisionEvent::Started(a, b, _) => (*a, *b, true),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, false),
        };

        let trigger = if players.contains(a) {
            triggers.get(b)
        } else if players.contains(b) {
            triggers.get(a)
        } else {
            continue;
        };
        let Ok(&DoorTrigger(house_entity)) = trigger else {
            continue;
        };
        let Ok((_, house)) = houses.get(house_entity) else {
            continue;
        };

        if entered {
            nearby.0 = Some(house_entity);
            notes.send(NotifyEvent::new(house.prompt()));
            continue;
        }

        if nearby.0 == Some(house_entity) {
            nearby.0 = None;
        }
        notes.send(NotifyEvent::new(""));

        if house.is_final {
            let enemies_alive = !enemies.is_empty();
            let mut street = street(&mut houses);
            effects.send_batch(progress.begin_use_combo(&mut street, enemies_alive));
        }
    }
}

/// Open, close, or reset through the door the player is standing at.
#[allow(clippy::too_many_arguments)]
pub fn handle_interact(
    mut interactions: EventReader<InteractEvent>,
    nearby: Res<NearbyDoor>,
    mut houses: Query<(Entity, &mut House)>,
    enemies: Query<(), With<Enemy>>,
    mut progress: ResMut<PuzzleProgress>,
    mut rng: ResMut<GameRng>,
    mut sounds: EventWriter<SoundCue>,
    mut notes: EventWriter<NotifyEvent>,
    mut effects: EventWriter<PuzzleEffect>,
) {
    for _ in interactions.read() {
        let Some(house_entity) = nearby.0 else {
            continue;
        };
        let Ok((_, mut house)) = houses.get_mut(house_entity) else {
            continue;
        };

        if house.door_open {
            house.close_door();
            sounds.send(SoundCue::Door(DoorSound::Close));
            notes.send(NotifyEvent::new(house.prompt()));
            continue;
        }

        let outcome = house.open_door();
        match outcome {
            DoorOutcome::Locked => {
                sounds.send(SoundCue::Door(DoorSound::Locked));
                notes.send(NotifyEvent::new("Incorrect."));
                info!("House {} was locked, resetting doors", house.address);
            }
            DoorOutcome::FirstOpening | DoorOutcome::Opened => {
                sounds.send(SoundCue::Door(DoorSound::Open));
                sounds.send(SoundCue::HouseSinging {
                    house: house_entity,
                    playing: false,
                });
                notes.send(NotifyEvent::new(house.prompt()));
            }
        }

        let enemies_alive = !enemies.is_empty();
        let mut street = street(&mut houses);
        let outcome_effects = match outcome {
            DoorOutcome::Locked => progress.close_all_doors(&mut street, enemies_alive),
            DoorOutcome::FirstOpening => {
                progress.first_opening(house_entity, &mut street, &mut rng.0)
            }
            DoorOutcome::Opened => Vec::new(),
        };
        effects.send_batch(outcome_effects);
    }
}

/// Carry out what the puzzle asked for.
#[allow(clippy::too_many_arguments)]
pub fn apply_puzzle_effects(
    mut commands: Commands,
    mut effects: EventReader<PuzzleEffect>,
    layout: Res<LevelLayout>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    interiors: Query<Entity, With<Interior>>,
    fences: Query<Entity, With<TutorialFence>>,
    houses: Query<Entity, With<House>>,
    mut sounds: EventWriter<SoundCue>,
    mut respawns: EventWriter<EnemyRespawnRequest>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for effect in effects.read().copied() {
        match effect {
            PuzzleEffect::LoadInterior { house, interior } => match layout.interiors.get(interior) {
                Some(def) => {
                    spawn_interior(&mut commands, &mut meshes, &mut materials, house, def);
                    debug!("Loaded interior {} into {:?}", interior, house);
                }
                None => warn!("No interior number {} in the layout", interior),
            },
            PuzzleEffect::StartSinging { house } => {
                sounds.send(SoundCue::HouseSinging { house, playing: true });
            }
            PuzzleEffect::FindComboStarted => {
                for fence in fences.iter() {
                    commands.entity(fence).despawn_recursive();
                }
            }
            PuzzleEffect::DoorsClosed => {
                sounds.send(SoundCue::Door(DoorSound::Close));
                for house in houses.iter() {
                    sounds.send(SoundCue::HouseSinging { house, playing: false });
                }
            }
            PuzzleEffect::ClearInteriors => {
                for interior in interiors.iter() {
                    commands.entity(interior).despawn_recursive();
                }
            }
            PuzzleEffect::RespawnEnemy => {
                info!("No enemies left, respawning one");
                respawns.send(EnemyRespawnRequest {
                    position: layout.enemy_respawn(),
                });
            }
            PuzzleEffect::Completed => {
                info!("Puzzle complete");
                next_state.set(GameState::Finished);
            }
        }
    }
}

/// Swing door panels towards their house's door state.
pub fn animate_doors(
    time: Res<Time>,
    houses: Query<&House>,
    mut doors: Query<(&mut Door, &mut Transform)>,
) {
    for (mut door, mut transform) in doors.iter_mut() {
        let Ok(house) = houses.get(door.house) else {
            continue;
        };
        transform.rotation = door.advance(house.door_open, DOOR_SWING_RATE, time.delta_secs());
    }
}
