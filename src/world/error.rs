//! Errors found while checking level data.

use thiserror::Error;

/// Level layouts the door puzzle cannot be played on.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// The puzzle needs an exact number of ordinary houses.
    #[error("Expected {expected} puzzle houses, found {found}")]
    HouseCount { expected: usize, found: usize },

    /// Two houses share an address.
    #[error("Address {0} is used by more than one house")]
    DuplicateAddress(u32),

    /// The door order names a house that does not exist, or misses one.
    #[error("Door order {combo:?} does not match house addresses {addresses:?}")]
    ComboMismatch { combo: Vec<u32>, addresses: Vec<u32> },

    /// Nowhere to start the real attempt from.
    #[error("Layout has no final house")]
    NoFinalHouse,
}
