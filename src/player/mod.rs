//! Player module - player entity, movement, camera control, and death.

mod components;
mod death;
mod movement;
mod plugin;
mod spawning;

pub use components::*;
pub use death::{aim_angles, handle_player_caught};
pub use movement::PLAYER_COLLIDER;
pub use plugin::PlayerPlugin;
pub use spawning::spawn_player;
