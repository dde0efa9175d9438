//! Viewer configuration loaded from JSON.
//!
//! Every field is optional in the file; missing values fall back to the
//! workspace `constants`.

use constants::projection::{DEFAULT_CONVERGENCE, DEFAULT_EYE_SEPARATION};
use constants::transition::{TRANSITION_ANIMATION_Y, TRANSITION_TIME, TRANSITION_WAIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

/// Timing and shape of camera-to-camera flights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Seconds per flight leg.
    pub time: f32,
    /// Altitude of the deviated path.
    pub animation_y: f32,
    /// Pause between deviated legs.
    pub wait: f32,
    /// Always fly direct, even through obstacles.
    pub force_direct: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            time: TRANSITION_TIME,
            animation_y: TRANSITION_ANIMATION_Y,
            wait: TRANSITION_WAIT,
            force_direct: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoConfig {
    pub eye_separation: f32,
    pub convergence: f32,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            eye_separation: DEFAULT_EYE_SEPARATION,
            convergence: DEFAULT_CONVERGENCE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub transition: TransitionConfig,
    pub stereo: StereoConfig,
    /// Camera id activated at start instead of the first registered one.
    pub default_camera: Option<String>,
    /// Where persisted settings live; in-memory only when absent.
    pub settings_path: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
