//! Gameplay tuning loaded from external RON files.
//!
//! Every value has a default matching the shipped feel of the game, so a
//! missing or broken file never blocks play.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::ConfigLoadError;

/// Read and parse a RON file.
pub fn load_ron<T: DeserializeOwned>(path: &str) -> Result<T, ConfigLoadError> {
    if !Path::new(path).exists() {
        return Err(ConfigLoadError::FileNotFound(path.to_string()));
    }

    let contents = fs::read_to_string(path).map_err(|e| ConfigLoadError::ReadError {
        path: path.to_string(),
        details: e.to_string(),
    })?;

    ron::from_str(&contents).map_err(|e| ConfigLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

/// Load a RON file, falling back to `T::default()` and logging why.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &str) -> T {
    match load_ron(path) {
        Ok(value) => {
            info!("Loaded {}", path);
            value
        }
        Err(ConfigLoadError::FileNotFound(_)) => {
            warn!("Could not find {}. Using defaults.", path);
            T::default()
        }
        Err(e) => {
            error!("{}. Using defaults.", e);
            T::default()
        }
    }
}

/// Enemy behaviour tuning (assets/data/enemy.ron).
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Agent speed while idle or chasing the light.
    pub walk_speed: f32,
    /// Agent speed while chasing the player.
    pub chase_speed: f32,
    /// Distance to destination under which a dark enemy gives up.
    pub goal_threshold: f32,
    /// Player distance beyond which the enemy is warped back nearby.
    pub leash_distance: f32,
    /// Distance from the player at which relocated enemies appear.
    pub respawn_distance: f32,
    /// Search radius when snapping points onto walkable ground.
    pub sample_radius: f32,
    /// Rotation range (whole degrees, end exclusive) applied to the camera
    /// forward when picking a relocation direction.
    pub respawn_angle_degrees: (i32, i32),
    /// Player heights at or below this never trigger relocation.
    pub min_player_height: f32,
    /// Stare duration range in seconds (end exclusive).
    pub stare_seconds: (f32, f32),
    /// Length of the look ray used for the close-range catch.
    pub catch_ray_length: f32,
    /// How close the look ray hit must be to the enemy for a catch.
    pub catch_radius: f32,
    /// Footsteps start when `1 / speed` drops below this.
    pub footstep_threshold: f32,
    /// Delay before the death view is shown.
    pub kill_reveal_seconds: f32,
    /// Delay between the death view and the scene reload.
    pub kill_reload_seconds: f32,
    /// Waits between flashlight toggles while the player is being killed.
    pub flicker_delays: Vec<f32>,
    /// Visual model.
    pub model: EnemyModel,
}

/// Animation clip indices inside an enemy model.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ModelAnimations {
    pub idle: u32,
    pub run: u32,
    pub kill: u32,
}

/// How an enemy looks. Without a scene it is drawn as a plain capsule.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyModel {
    /// glTF scene, e.g. `models/enemy.glb#Scene0`.
    pub scene_path: Option<String>,
    pub scale: f32,
    pub animations: Option<ModelAnimations>,
    /// Capsule collider half height and radius.
    pub collider: (f32, f32),
}

impl Default for EnemyModel {
    fn default() -> Self {
        Self {
            scene_path: None,
            scale: 1.0,
            animations: None,
            collider: (0.6, 0.4),
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            chase_speed: 4.0,
            goal_threshold: 1.1,
            leash_distance: 30.0,
            respawn_distance: 10.0,
            sample_radius: 10.0,
            respawn_angle_degrees: (95, 265),
            min_player_height: -5.0,
            stare_seconds: (0.5, 1.5),
            catch_ray_length: 2.0,
            catch_radius: 1.5,
            footstep_threshold: 0.5,
            kill_reveal_seconds: 1.25,
            kill_reload_seconds: 2.7,
            flicker_delays: vec![0.45, 0.25, 0.05, 0.05],
            model: EnemyModel::default(),
        }
    }
}

/// Layout of the ray grid swept by the flashlight each tick.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConeLayout {
    /// Vertical sweep in whole degrees, inclusive.
    pub rows: (i32, i32),
    /// Horizontal sweep in whole degrees, inclusive.
    pub columns: (i32, i32),
    /// Angle between neighbouring rays.
    pub step_degrees: i32,
    /// Initial yaw of the first ray (positive turns left).
    pub yaw_offset_degrees: f32,
    /// Initial pitch of the first ray (positive tilts up).
    pub pitch_offset_degrees: f32,
    /// Rays start this far ahead of the camera.
    pub origin_offset: f32,
    /// Maximum length of every ray.
    pub max_distance: f32,
}

impl Default for ConeLayout {
    fn default() -> Self {
        Self {
            rows: (-90, 90),
            columns: (-20, 20),
            step_degrees: 5,
            yaw_offset_degrees: 30.0,
            pitch_offset_degrees: 30.0,
            origin_offset: 1.0,
            max_distance: 30.0,
        }
    }
}

/// Flashlight tuning (assets/data/flashlight.ron).
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FlashlightTuning {
    /// Delay between pressing the switch and the light changing.
    pub switch_seconds: f32,
    /// Chance that turning the light on drops an enemy right in the beam.
    pub teleport_chance: f32,
    /// Range of the beam-target ray.
    pub beam_range: f32,
    /// Whether the light is on when the level loads.
    pub start_on: bool,
    /// Perception cone layout.
    pub cone: ConeLayout,
}

impl Default for FlashlightTuning {
    fn default() -> Self {
        Self {
            switch_seconds: 0.35,
            teleport_chance: 0.07,
            beam_range: 10.0,
            start_on: true,
            cone: ConeLayout::default(),
        }
    }
}

/// System to load tuning files at startup.
pub fn load_tuning(mut commands: Commands) {
    commands.insert_resource(load_or_default::<EnemyTuning>("assets/data/enemy.ron"));
    commands.insert_resource(load_or_default::<FlashlightTuning>("assets/data/flashlight.ron"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let result = load_ron::<EnemyTuning>("assets/data/does_not_exist.ron");
        assert!(matches!(result, Err(ConfigLoadError::FileNotFound(_))));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let tuning: EnemyTuning = ron::from_str("(chase_speed: 5.5)").unwrap();
        assert_eq!(tuning.chase_speed, 5.5);
        assert_eq!(tuning.walk_speed, 3.0);
        assert_eq!(tuning.flicker_delays, vec![0.45, 0.25, 0.05, 0.05]);
    }

    #[test]
    fn default_cone_has_37_rows_and_9_columns() {
        let cone = ConeLayout::default();
        let rows = (cone.rows.1 - cone.rows.0) / cone.step_degrees + 1;
        let columns = (cone.columns.1 - cone.columns.0) / cone.step_degrees + 1;
        assert_eq!((rows, columns), (37, 9));
    }
}
