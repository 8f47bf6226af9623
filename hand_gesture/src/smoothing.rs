//! Adaptive exponential smoothing of the fingertip cursor.
//!
//! Small movements (camera jitter) get a low blend factor and are damped
//! hard; large deliberate movements get a high factor and are tracked
//! closely.

use crate::config::GestureConfig;
use crate::landmarks::Point2;

#[derive(Clone, Debug)]
pub struct CursorSmoother {
    gain:      f32,
    min_blend: f32,
    max_blend: f32,
    last:      Option<Point2>,
}

impl CursorSmoother {
    pub fn new(config: &GestureConfig) -> Self {
        CursorSmoother {
            gain:      config.cursor_gain,
            min_blend: config.cursor_min_blend,
            max_blend: config.cursor_max_blend,
            last:      None,
        }
    }

    /// Blend factor applied for a jump of `distance`.
    pub fn blend_for(&self, distance: f32) -> f32 {
        (distance * self.gain).max(self.min_blend).min(self.max_blend)
    }

    /// Smooth one raw fingertip sample.  The very first sample passes through.
    pub fn smooth(&mut self, raw: Point2) -> Point2 {
        let next = match self.last {
            None => raw,
            Some(prev) => {
                let k = self.blend_for(prev.distance(&raw));
                Point2::new(
                    prev.x + k * (raw.x - prev.x),
                    prev.y + k * (raw.y - prev.y),
                )
            }
        };
        self.last = Some(next);
        next
    }

    pub fn last(&self) -> Option<Point2> { self.last }

    pub fn reset(&mut self) { self.last = None; }
}
