//! Core game module - states, events, tuning, and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod plugin;
mod rng;
mod states;

pub use config::*;
pub use error::*;
pub use events::*;
pub use plugin::{CorePlugin, SimulationSet, FIXED_TICK_HZ};
pub use rng::GameRng;
pub use states::*;
