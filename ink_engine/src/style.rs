//! Stroke appearance and point smoothing settings.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{InkError, Result};

/// Fixed per engine instance; changing it requires a redraw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkStyle {
    pub stroke_color: Rgba,
    /// Line width in surface pixels.
    pub stroke_width: f32,
    /// Blend constant (0–1] for [`SmoothingMode::Builtin`]:
    /// `smoothed = last + (raw − last) × smoothing`.
    pub smoothing:    f32,
}

impl Default for InkStyle {
    fn default() -> Self {
        InkStyle {
            stroke_color: Rgba::WHITE,
            stroke_width: 3.0,
            smoothing:    0.3,
        }
    }
}

impl InkStyle {
    pub fn validate(&self) -> Result<()> {
        if !(self.stroke_width > 0.0 && self.stroke_width.is_finite()) {
            return Err(InkError::InvalidStyle {
                field:  "stroke_width",
                reason: format!("must be a positive number, got {}", self.stroke_width),
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(InkError::InvalidStyle {
                field:  "smoothing",
                reason: format!("must be in (0, 1], got {}", self.smoothing),
            });
        }
        Ok(())
    }
}

/// Who is responsible for smoothing incoming points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingMode {
    /// The engine applies the fixed exponential blend from [`InkStyle`].
    #[default]
    Builtin,
    /// Points arrive already smoothed (e.g. from the gesture tracker).
    External,
}
