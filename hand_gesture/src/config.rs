//! Tunable thresholds for classification, debouncing and cursor smoothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A config value outside its accepted range.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid gesture config: {field} {reason}")]
pub struct ConfigError {
    pub field:  &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError { field, reason: reason.into() }
    }
}

/// Thresholds used by [`GestureTracker`](crate::GestureTracker).
///
/// Every field has a default, so a partial `[gesture]` TOML table is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Fingertip within this normalised distance of a frame edge forces `idle`.
    pub edge_margin: f32,
    /// Finger extended iff tip→wrist > ratio × pip→wrist.
    pub finger_extension_ratio: f32,
    /// Thumb extended iff tip→indexMCP > ratio × ip→indexMCP.
    pub thumb_extension_ratio: f32,
    /// Dwell before `save`/`clear` is promoted (ms).
    pub action_dwell_ms: f64,
    /// Dwell before `drawing`/`idle` is promoted (ms).
    pub motion_dwell_ms: f64,
    /// Minimum gap between two fired actions (ms).
    pub action_cooldown_ms: f64,
    /// Cursor blend factor = clamp(distance × gain, min, max).
    pub cursor_gain: f32,
    pub cursor_min_blend: f32,
    pub cursor_max_blend: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            edge_margin:            0.02,
            finger_extension_ratio: 1.05,
            thumb_extension_ratio:  1.2,
            action_dwell_ms:        1000.0,
            motion_dwell_ms:        50.0,
            action_cooldown_ms:     2000.0,
            cursor_gain:            15.0,
            cursor_min_blend:       0.1,
            cursor_max_blend:       0.6,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..0.5).contains(&self.edge_margin) {
            return Err(ConfigError::new("edge_margin", "must be in [0, 0.5)"));
        }
        if !(self.finger_extension_ratio > 0.0) {
            return Err(ConfigError::new("finger_extension_ratio", "must be positive"));
        }
        if !(self.thumb_extension_ratio > 0.0) {
            return Err(ConfigError::new("thumb_extension_ratio", "must be positive"));
        }
        for (field, v) in [
            ("action_dwell_ms",    self.action_dwell_ms),
            ("motion_dwell_ms",    self.motion_dwell_ms),
            ("action_cooldown_ms", self.action_cooldown_ms),
        ] {
            if !(v >= 0.0) {
                return Err(ConfigError::new(field, "must be non-negative"));
            }
        }
        if !(self.cursor_gain > 0.0) {
            return Err(ConfigError::new("cursor_gain", "must be positive"));
        }
        if !(0.0 < self.cursor_min_blend && self.cursor_max_blend <= 1.0) {
            return Err(ConfigError::new("cursor_min_blend", "blend bounds must lie in (0, 1]"));
        }
        if self.cursor_min_blend > self.cursor_max_blend {
            return Err(ConfigError::new(
                "cursor_min_blend",
                format!("{} exceeds cursor_max_blend {}", self.cursor_min_blend, self.cursor_max_blend),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GestureConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_blend_bounds_rejected() {
        let cfg = GestureConfig { cursor_min_blend: 0.7, ..GestureConfig::default() };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field, "cursor_min_blend");
    }

    #[test]
    fn nan_ratio_rejected() {
        let cfg = GestureConfig { finger_extension_ratio: f32::NAN, ..GestureConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn huge_margin_rejected() {
        let cfg = GestureConfig { edge_margin: 0.5, ..GestureConfig::default() };
        assert_eq!(cfg.validate().unwrap_err().field, "edge_margin");
    }
}
