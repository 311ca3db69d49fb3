//! World module - the street, houses, safe zones, and the door puzzle.

mod builder;
mod error;
mod house;
mod interaction;
mod layout;
mod materials;
mod plugin;
mod puzzle;
mod safe_zone;

pub use builder::LevelEntity;
pub use error::LayoutError;
pub use house::{DoorOutcome, Footprint, House};
pub use layout::LevelLayout;
pub use plugin::WorldPlugin;
pub use puzzle::{shuffle, PuzzleEffect, PuzzleProgress, PuzzleStage};
pub use safe_zone::{is_player_safe, SafeZone};
