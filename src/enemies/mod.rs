//! Enemies module - behaviour core, navigation, presentation, and spawning.

pub mod ai;
pub mod animation;
pub mod brain;
mod components;
pub mod navigation;
mod plugin;
pub mod sequences;
mod spawning;

pub use brain::{BehaviorState, EnemyBrain, Surroundings};
pub use components::*;
pub use navigation::{NavAgent, NavMesh, NavObstacle, WalkableArea, WalkableRegion};
pub use plugin::EnemyPlugin;
pub use spawning::spawn_enemy;
