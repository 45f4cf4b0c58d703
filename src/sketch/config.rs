//! Sketch Configuration
//!
//! Tunable constants for the sketch editor. `Default` returns the values
//! the tool has always used; a JSON file named by `SKETCH_CONFIG` may
//! override any subset of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "SKETCH_CONFIG";

/// How a dragged vertex handle finds its new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexPlacement {
    /// Both handles of the pair follow the ground point in x/z.
    #[default]
    GroundPlane,
    /// The dragged handle follows a camera-facing plane through itself;
    /// its partner follows in x/z only.
    ViewPlane,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Height of extruded prisms (world units)
    pub extrusion_height: f32,
    /// Seconds a notification stays visible
    pub notification_duration_secs: f32,
    /// Diameter of vertex handle spheres
    pub handle_diameter: f32,
    /// Diameter of the markers placed while drawing
    pub marker_diameter: f32,
    /// Half the side length of the square ground
    pub ground_half_extent: f32,
    pub vertex_placement: VertexPlacement,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            extrusion_height: 3.0,
            notification_duration_secs: 2.0,
            handle_diameter: 0.2,
            marker_diameter: 0.1,
            ground_half_extent: 10.0,
            vertex_placement: VertexPlacement::GroundPlane,
        }
    }
}

impl SketchConfig {
    /// Read a config from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config from `SKETCH_CONFIG`, or defaults if it is unset or unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = PathBuf::from(path);

        match Self::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded sketch config");
                config
            }
            Err(err) => {
                warn!(error = %err, "using default sketch config");
                Self::default()
            }
        }
    }
}
