//! Error types for data loading and world queries.

use bevy::math::Vec3;
use thiserror::Error;

/// Errors that can occur when loading tuning or level data.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Errors raised by geometric queries against the navigable world.
#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    /// No walkable point lies within the search radius.
    #[error("No walkable point within {radius} units of {near}")]
    NoWalkablePoint { near: Vec3, radius: f32 },

    /// The player is below the map and sampling around them is meaningless.
    #[error("Player height {height} is below the sampling floor {floor}")]
    BelowMap { height: f32, floor: f32 },
}
