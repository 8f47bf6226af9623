//! Per-frame driver tying classification, debouncing and smoothing together.
//!
//! All state lives in the [`GestureTracker`] value; construct one per
//! tracking session and drop it when tracking stops.

use tracing::trace;

use crate::classify::{classify, Gesture, GestureAction};
use crate::config::GestureConfig;
use crate::debounce::GestureDebouncer;
use crate::landmarks::{LandmarkFrame, Point2};
use crate::smoothing::CursorSmoother;

/// Everything the downstream ink stage needs from one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    /// Instantaneous classification (for diagnostics).
    pub raw:          Gesture,
    /// Debounced gesture to act on.
    pub effective:    Gesture,
    /// Smoothed index fingertip, `None` when no hand is present.
    pub fingertip:    Option<Point2>,
    pub hand_present: bool,
    /// One-shot action fired this frame.
    pub fired:        Option<GestureAction>,
}

impl FrameOutput {
    /// Idle, no hand, nothing fired.
    pub fn idle() -> Self {
        FrameOutput {
            raw:          Gesture::Idle,
            effective:    Gesture::Idle,
            fingertip:    None,
            hand_present: false,
            fired:        None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.effective == Gesture::Drawing
    }
}

#[derive(Clone, Debug)]
pub struct GestureTracker {
    config:    GestureConfig,
    debouncer: GestureDebouncer,
    smoother:  CursorSmoother,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        GestureTracker {
            debouncer: GestureDebouncer::new(config.clone()),
            smoother:  CursorSmoother::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig { &self.config }

    pub fn active(&self) -> Gesture { self.debouncer.active() }

    /// Process one frame.  `None` means the detector saw no hand.
    pub fn process(&mut self, frame: Option<&LandmarkFrame>, now_ms: f64) -> FrameOutput {
        let Some(frame) = frame else {
            self.debouncer.reset();
            self.smoother.reset();
            trace!(at_ms = now_ms, "no hand");
            return FrameOutput::idle();
        };

        let raw       = classify(frame, &self.config);
        let outcome   = self.debouncer.update(raw, now_ms);
        let fingertip = self.smoother.smooth(frame.fingertip());

        trace!(
            at_ms = now_ms, raw = %raw, effective = %outcome.effective,
            x = fingertip.x, y = fingertip.y,
            "frame"
        );

        FrameOutput {
            raw,
            effective:    outcome.effective,
            fingertip:    Some(fingertip),
            hand_present: true,
            fired:        outcome.fired,
        }
    }

    /// Drop cursor history so the next fingertip is taken as-is.  Gesture
    /// state and the action cooldown are kept.
    pub fn reset_cursor(&mut self) {
        self.smoother.reset();
    }

    /// Forget everything except configuration.
    pub fn reset(&mut self) {
        self.debouncer = GestureDebouncer::new(self.config.clone());
        self.smoother.reset();
    }
}
