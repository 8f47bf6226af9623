//! Application configuration, loaded from TOML.
//!
//! ```toml
//! [gesture]
//! action_dwell_ms = 800
//!
//! [ink]
//! stroke_color = "#1a237e"
//! stroke_width = 4
//!
//! [canvas]
//! width  = 1280
//! height = 720
//!
//! [output]
//! dir = "signatures"
//! ```
//!
//! Every table and field is optional.

use std::path::{Path, PathBuf};

use hand_gesture::GestureConfig;
use ink_engine::InkStyle;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkySignError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkySignConfig {
    pub gesture: GestureConfig,
    pub ink:     InkStyle,
    pub canvas:  CanvasConfig,
    pub output:  OutputConfig,
}

/// Size of the ink surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width:  usize,
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig { width: 960, height: 540 }
    }
}

/// Where saved signatures are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { dir: PathBuf::from("signatures") }
    }
}

impl SkySignConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: SkySignConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None    => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.gesture.validate()?;
        self.ink.validate()?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SkySignError::Config(format!(
                "canvas must have a non-zero size, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.canvas.width > 8192 || self.canvas.height > 8192 {
            return Err(SkySignError::Config(format!(
                "canvas {}x{} exceeds 8192x8192",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }
}
