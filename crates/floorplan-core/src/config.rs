//! Editor configuration.

use crate::snap::DEFAULT_GRID_SIZE;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the interaction controller and view.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Half-extent of the square around the bottom-right corner that starts a resize.
    pub resize_hit_region: f64,
    /// Smallest width/height a resize may produce.
    pub min_element_size: f64,
    /// Offset applied to a duplicated element.
    pub duplicate_offset: Vec2,
    /// Degrees added by one rotate action.
    pub rotation_step: i64,
    /// Appended to the name of a duplicated element.
    pub copy_suffix: String,
    /// Whether the grid is visible when a view opens.
    pub show_grid: bool,
    /// Grid pitch for new plans.
    pub default_grid_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resize_hit_region: 10.0,
            min_element_size: 20.0,
            duplicate_offset: Vec2::new(20.0, 20.0),
            rotation_step: 90,
            copy_suffix: " (copie)".to_string(),
            show_grid: true,
            default_grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("loaded editor config from {}", path.display());
        Ok(config)
    }
}
