//! Engine configuration, loadable from JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collision::ContactPolicy;
use crate::error::EngineError;
use crate::render::{Font, Palette};
use crate::world::DEFAULT_GRAVITY;

/// Configuration values for the window, the tick loop and the game rules.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Pause between ticks of the game loop.
    pub tick_interval_ms: u64,
    pub gravity: f32,
    /// Thickness of the screen-edge borders.
    pub border_size: f32,
    pub solid_borders: bool,
    pub roam_contact: ContactPolicy,
    pub palette: Palette,
    pub menu_font: Font,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "boxengine".into(),
            width: 640,
            height: 480,
            tick_interval_ms: 5,
            gravity: DEFAULT_GRAVITY,
            border_size: 10.0,
            solid_borders: true,
            roam_contact: ContactPolicy::default(),
            palette: Palette::default(),
            menu_font: Font::default(),
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Canvas size in pixels as floats, the unit entities live in.
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.gravity.is_finite() {
            return Err(EngineError::InvalidGravity(self.gravity));
        }
        if !self.border_size.is_finite() || self.border_size < 0.0 {
            return Err(EngineError::InvalidDimensions {
                width: self.border_size,
                height: self.border_size,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("malformed engine config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in config {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
