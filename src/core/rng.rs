//! Shared random number generator.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Game-wide RNG. Seedable so simulations can be replayed in tests.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}
