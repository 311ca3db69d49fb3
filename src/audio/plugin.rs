//! Audio plugin - plays sound cues through kira.

use bevy::prelude::*;
use bevy::utils::HashMap;
use bevy_kira_audio::{
    Audio, AudioControl, AudioInstance, AudioPlugin as KiraAudioPlugin, AudioSource as KiraSource,
    AudioTween,
};

use super::bank::SoundBank;
use crate::core::{DoorSound, GameState, SoundCue};
use crate::enemies::EnemySong;

/// The door swings shut before the close sound plays.
const DOOR_CLOSE_DELAY: f32 = 0.8;

/// Looping instances that outlive a single cue.
#[derive(Resource, Default)]
pub struct LoopingSounds {
    ambiance: Option<Handle<AudioInstance>>,
    houses: HashMap<Entity, Handle<AudioInstance>>,
}

/// Clips waiting for their start time.
#[derive(Resource, Default)]
pub struct DelayedSounds(Vec<(Timer, Handle<KiraSource>)>);

/// Audio plugin - sound bank, cue playback, and looping ambience.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_plugins(KiraAudioPlugin)
            .init_resource::<LoopingSounds>()
            .init_resource::<DelayedSounds>()
            .add_systems(Startup, load_sound_bank)
            .add_systems(OnEnter(GameState::InGame), start_ambiance)
            .add_systems(OnExit(GameState::InGame), stop_level_sounds)
            .add_systems(OnEnter(GameState::Finished), start_end_ambiance)
            .add_systems(
                Update,
                (start_enemy_songs, play_sound_cues, play_delayed_sounds).chain(),
            );
    }
}

fn load_sound_bank(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundBank::load(&asset_server));
}

fn stop(instances: &mut Assets<AudioInstance>, handle: &Handle<AudioInstance>) {
    if let Some(instance) = instances.get_mut(handle) {
        instance.stop(AudioTween::default());
    }
}

fn start_ambiance(audio: Res<Audio>, bank: Res<SoundBank>, mut loops: ResMut<LoopingSounds>) {
    loops.ambiance = Some(audio.play(bank.ambiance.clone()).looped().handle());
}

fn start_end_ambiance(audio: Res<Audio>, bank: Res<SoundBank>) {
    audio.play(bank.end_ambiance.clone()).looped();
}

/// Silence everything tied to the level being torn down.
fn stop_level_sounds(
    mut loops: ResMut<LoopingSounds>,
    mut delayed: ResMut<DelayedSounds>,
    mut instances: ResMut<Assets<AudioInstance>>,
    songs: Query<&EnemySong>,
) {
    if let Some(handle) = loops.ambiance.take() {
        stop(&mut instances, &handle);
    }
    for (_, handle) in loops.houses.drain() {
        stop(&mut instances, &handle);
    }
    for song in songs.iter() {
        if let Some(handle) = &song.0 {
            stop(&mut instances, handle);
        }
    }
    delayed.0.clear();
}

/// Every enemy carries its own looping song.
fn start_enemy_songs(
    audio: Res<Audio>,
    bank: Option<Res<SoundBank>>,
    mut songs: Query<&mut EnemySong, Added<EnemySong>>,
) {
    let Some(bank) = bank else {
        return;
    };
    for mut song in songs.iter_mut() {
        song.0 = Some(audio.play(bank.enemy_song.clone()).looped().handle());
    }
}

fn play_sound_cues(
    mut cues: EventReader<SoundCue>,
    audio: Res<Audio>,
    bank: Option<Res<SoundBank>>,
    mut loops: ResMut<LoopingSounds>,
    mut delayed: ResMut<DelayedSounds>,
    mut instances: ResMut<Assets<AudioInstance>>,
    mut songs: Query<&mut EnemySong>,
) {
    let Some(bank) = bank else {
        cues.clear();
        return;
    };

    for cue in cues.read() {
        let clip = match *cue {
            SoundCue::EnemyFootstep { clip, .. } => bank.enemy_footsteps.get(clip).cloned(),
            SoundCue::PlayerFootstep { clip } => bank.player_footsteps.get(clip).cloned(),
            SoundCue::FlashlightOn => Some(bank.flashlight_on.clone()),
            SoundCue::FlashlightOff => Some(bank.flashlight_off.clone()),
            SoundCue::DeathScream { variant } => bank.death_screams.get(variant).cloned(),
            SoundCue::DeathFade => Some(bank.death_fade.clone()),
            SoundCue::Door(DoorSound::Close) => {
                let timer = Timer::from_seconds(DOOR_CLOSE_DELAY, TimerMode::Once);
                delayed.0.push((timer, bank.door(DoorSound::Close)));
                None
            }
            SoundCue::Door(sound) => Some(bank.door(sound)),
            SoundCue::StopSong { enemy } => {
                if let Ok(mut song) = songs.get_mut(enemy) {
                    if let Some(handle) = song.0.take() {
                        stop(&mut instances, &handle);
                    }
                }
                None
            }
            SoundCue::HouseSinging { house, playing: true } => {
                if !loops.houses.contains_key(&house) {
                    let handle = audio.play(bank.house_song.clone()).looped().handle();
                    loops.houses.insert(house, handle);
                }
                None
            }
            SoundCue::HouseSinging { house, playing: false } => {
                if let Some(handle) = loops.houses.remove(&house) {
                    stop(&mut instances, &handle);
                }
                None
            }
        };

        match clip {
            Some(clip) => {
                audio.play(clip);
            }
            None => trace!("No one-shot clip for {:?}", cue),
        }
    }
}

fn play_delayed_sounds(time: Res<Time>, audio: Res<Audio>, mut delayed: ResMut<DelayedSounds>) {
    delayed.0.retain_mut(|(timer, clip)| {
        timer.tick(time.delta());
        if timer.finished() {
            audio.play(clip.clone());
            return false;
        }
        true
    });
}
