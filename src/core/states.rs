//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy AI and
//! player input only run while `InGame`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while tuning and level data are read
/// - `InGame` while the level is alive
/// - `Reloading` is a one-frame hop used to rebuild the level after a death
/// - `Finished` once the final door has been opened
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Level torn down, about to be rebuilt
    Reloading,
    /// Puzzle solved, gameplay over
    Finished,
}
