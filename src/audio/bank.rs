//! Every sound clip the game plays, loaded once at startup.

use bevy::prelude::*;
use bevy_kira_audio::AudioSource as KiraSource;

use crate::core::DoorSound;

pub const ENEMY_FOOTSTEP_CLIPS: [&str; 4] = [
    "audio/enemy/step_1.ogg",
    "audio/enemy/step_2.ogg",
    "audio/enemy/step_3.ogg",
    "audio/enemy/step_4.ogg",
];

pub const PLAYER_FOOTSTEP_CLIPS: [&str; 4] = [
    "audio/player/step_1.ogg",
    "audio/player/step_2.ogg",
    "audio/player/step_3.ogg",
    "audio/player/step_4.ogg",
];

const DEATH_SCREAM_CLIPS: [&str; 3] = [
    "audio/death/scream_1.ogg",
    "audio/death/scream_2.ogg",
    "audio/death/scream_3.ogg",
];

/// Pick one of the three death screams from a roll in `0.0..1.0`.
pub fn death_scream_variant(roll: f32) -> usize {
    if roll < 0.33 {
        0
    } else if roll < 0.66 {
        1
    } else {
        2
    }
}

/// Loaded clip handles.
#[derive(Resource)]
pub struct SoundBank {
    pub door_open: Handle<KiraSource>,
    pub door_close: Handle<KiraSource>,
    pub door_locked: Handle<KiraSource>,
    pub flashlight_on: Handle<KiraSource>,
    pub flashlight_off: Handle<KiraSource>,
    pub death_screams: Vec<Handle<KiraSource>>,
    pub death_fade: Handle<KiraSource>,
    pub ambiance: Handle<KiraSource>,
    pub end_ambiance: Handle<KiraSource>,
    pub enemy_song: Handle<KiraSource>,
    pub house_song: Handle<KiraSource>,
    pub enemy_footsteps: Vec<Handle<KiraSource>>,
    pub player_footsteps: Vec<Handle<KiraSource>>,
}

impl SoundBank {
    pub fn load(asset_server: &AssetServer) -> Self {
        let load_all = |paths: &[&str]| -> Vec<Handle<KiraSource>> {
            paths.iter().map(|path| asset_server.load(*path)).collect()
        };

        Self {
            door_open: asset_server.load("audio/house/door_open.ogg"),
            door_close: asset_server.load("audio/house/door_close.ogg"),
            door_locked: asset_server.load("audio/house/door_locked.ogg"),
            flashlight_on: asset_server.load("audio/flashlight/on.wav"),
            flashlight_off: asset_server.load("audio/flashlight/off.wav"),
            death_screams: load_all(&DEATH_SCREAM_CLIPS),
            death_fade: asset_server.load("audio/death/fade.ogg"),
            ambiance: asset_server.load("audio/ambiance/night.ogg"),
            end_ambiance: asset_server.load("audio/ambiance/end.ogg"),
            enemy_song: asset_server.load("audio/enemy/song.ogg"),
            house_song: asset_server.load("audio/house/singing.ogg"),
            enemy_footsteps: load_all(&ENEMY_FOOTSTEP_CLIPS),
            player_footsteps: load_all(&PLAYER_FOOTSTEP_CLIPS),
        }
    }

    pub fn door(&self, sound: DoorSound) -> Handle<KiraSource> {
        match sound {
            DoorSound::Open => self.door_open.clone(),
            DoorSound::Close => self.door_close.clone(),
            DoorSound::Locked => self.door_locked.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screams_split_the_roll_in_thirds() {
        assert_eq!(death_scream_variant(0.0), 0);
        assert_eq!(death_scream_variant(0.329), 0);
        assert_eq!(death_scream_variant(0.33), 1);
        assert_eq!(death_scream_variant(0.659), 1);
        assert_eq!(death_scream_variant(0.66), 2);
        assert_eq!(death_scream_variant(0.999), 2);
    }
}
