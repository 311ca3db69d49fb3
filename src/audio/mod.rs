//! Audio module - sound bank, clip pools, and cue playback.

mod bank;
mod plugin;
mod pool;

pub use bank::{death_scream_variant, SoundBank, ENEMY_FOOTSTEP_CLIPS, PLAYER_FOOTSTEP_CLIPS};
pub use plugin::GameAudioPlugin;
pub use pool::{FootstepPool, RotatingPool};
