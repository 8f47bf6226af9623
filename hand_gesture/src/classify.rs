//! Single-frame classification: finger extension flags → raw gesture.
//!
//! Extension is judged by distance ratios rather than joint angles, so the
//! same thresholds hold whether the hand is close to the camera or far away.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;
use crate::landmarks::{Finger, HandLandmark, LandmarkFrame, Point2};

// ════════════════════════════════════════════════════════════════════════════
// Gesture / GestureAction
// ════════════════════════════════════════════════════════════════════════════

/// What the hand is doing in one frame (raw) or stably (effective).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    #[default]
    Idle,
    /// Index finger alone extended: ink follows the fingertip.
    Drawing,
    /// Thumbs-up: export the signature.
    Save,
    /// Open palm: wipe the signature.
    Clear,
}

impl Gesture {
    pub fn as_str(self) -> &'static str {
        match self {
            Gesture::Idle    => "idle",
            Gesture::Drawing => "drawing",
            Gesture::Save    => "save",
            Gesture::Clear   => "clear",
        }
    }

    /// `save` and `clear` fire one-shot actions; the others are continuous.
    pub fn is_action(self) -> bool {
        matches!(self, Gesture::Save | Gesture::Clear)
    }

    pub fn action(self) -> Option<GestureAction> {
        match self {
            Gesture::Save  => Some(GestureAction::Save),
            Gesture::Clear => Some(GestureAction::Clear),
            _              => None,
        }
    }

    /// How long this gesture must be held before it is promoted.
    pub fn dwell_ms(self, cfg: &GestureConfig) -> f64 {
        if self.is_action() { cfg.action_dwell_ms } else { cfg.motion_dwell_ms }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete, rate-limited event fired by an action gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureAction {
    Save,
    Clear,
}

impl GestureAction {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureAction::Save  => "save",
            GestureAction::Clear => "clear",
        }
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Extension tests
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger extension flags for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerStates {
    /// Extended count over the four non-thumb fingers.
    pub fn extended_count(&self) -> usize {
        [self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&e| e)
            .count()
    }
}

/// Tip further from the wrist than `ratio` × the PIP joint is.
pub fn is_finger_extended(frame: &LandmarkFrame, finger: Finger, ratio: f32) -> bool {
    let wrist = frame.get(HandLandmark::Wrist);
    let tip   = frame.get(finger.tip()).distance(&wrist);
    let pip   = frame.get(finger.pip()).distance(&wrist);
    tip > ratio * pip
}

/// Thumb tip further from the index MCP than `ratio` × the thumb IP joint is.
pub fn is_thumb_extended(frame: &LandmarkFrame, ratio: f32) -> bool {
    let anchor = frame.get(HandLandmark::IndexMcp);
    let tip    = frame.get(HandLandmark::ThumbTip).distance(&anchor);
    let ip     = frame.get(HandLandmark::ThumbIp).distance(&anchor);
    tip > ratio * ip
}

pub fn finger_states(frame: &LandmarkFrame, cfg: &GestureConfig) -> FingerStates {
    let r = cfg.finger_extension_ratio;
    FingerStates {
        thumb:  is_thumb_extended(frame, cfg.thumb_extension_ratio),
        index:  is_finger_extended(frame, Finger::Index,  r),
        middle: is_finger_extended(frame, Finger::Middle, r),
        ring:   is_finger_extended(frame, Finger::Ring,   r),
        pinky:  is_finger_extended(frame, Finger::Pinky,  r),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Raw classification
// ════════════════════════════════════════════════════════════════════════════

/// True when `p` lies inside the `margin` band along any frame edge.
pub fn near_edge(p: Point2, margin: f32) -> bool {
    p.x < margin || p.x > 1.0 - margin || p.y < margin || p.y > 1.0 - margin
}

/// Classify finger flags.  First matching rule wins.
pub fn classify_fingers(f: &FingerStates) -> Gesture {
    if f.extended_count() >= 4 {
        Gesture::Clear
    } else if f.thumb && !f.index && !f.middle && !f.ring {
        Gesture::Save
    } else if f.index && !f.middle && !f.ring {
        Gesture::Drawing
    } else {
        Gesture::Idle
    }
}

/// Classify one frame.  A fingertip in the edge band is always `idle`.
pub fn classify(frame: &LandmarkFrame, cfg: &GestureConfig) -> Gesture {
    if near_edge(frame.fingertip(), cfg.edge_margin) {
        return Gesture::Idle;
    }
    classify_fingers(&finger_states(frame, cfg))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synthesize, HandPose};

    fn cfg() -> GestureConfig { GestureConfig::default() }

    #[test]
    fn poses_classify_as_expected() {
        let at = Point2::new(0.5, 0.4);
        assert_eq!(classify(&synthesize(HandPose::Fist,     at), &cfg()), Gesture::Idle);
        assert_eq!(classify(&synthesize(HandPose::Point,    at), &cfg()), Gesture::Drawing);
        assert_eq!(classify(&synthesize(HandPose::ThumbsUp, at), &cfg()), Gesture::Save);
        assert_eq!(classify(&synthesize(HandPose::OpenPalm, at), &cfg()), Gesture::Clear);
    }

    #[test]
    fn edge_band_forces_idle() {
        for pose in [HandPose::Point, HandPose::ThumbsUp, HandPose::OpenPalm] {
            let frame = synthesize(pose, Point2::new(0.01, 0.5));
            assert_eq!(classify(&frame, &cfg()), Gesture::Idle, "{:?}", pose);
        }
        let frame = synthesize(HandPose::Point, Point2::new(0.5, 0.99));
        assert_eq!(classify(&frame, &cfg()), Gesture::Idle);
    }

    #[test]
    fn near_edge_boundaries() {
        assert!(near_edge(Point2::new(0.019, 0.5), 0.02));
        assert!(!near_edge(Point2::new(0.02, 0.5), 0.02));
        assert!(near_edge(Point2::new(0.5, 0.981), 0.02));
        assert!(!near_edge(Point2::new(0.5, 0.5), 0.02));
    }

    #[test]
    fn four_fingers_beat_thumb() {
        let f = FingerStates { thumb: true, index: true, middle: true, ring: true, pinky: true };
        assert_eq!(classify_fingers(&f), Gesture::Clear);
    }

    #[test]
    fn pinky_does_not_block_drawing() {
        let f = FingerStates { index: true, pinky: true, ..FingerStates::default() };
        assert_eq!(classify_fingers(&f), Gesture::Drawing);
    }

    #[test]
    fn thumb_and_index_is_not_save() {
        let f = FingerStates { thumb: true, index: true, ..FingerStates::default() };
        assert_eq!(classify_fingers(&f), Gesture::Drawing);
    }

    #[test]
    fn dwell_depends_on_kind() {
        let c = cfg();
        assert_eq!(Gesture::Save.dwell_ms(&c), 1000.0);
        assert_eq!(Gesture::Clear.dwell_ms(&c), 1000.0);
        assert_eq!(Gesture::Drawing.dwell_ms(&c), 50.0);
        assert_eq!(Gesture::Idle.dwell_ms(&c), 50.0);
    }
}
