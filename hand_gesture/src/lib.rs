//! # hand_gesture
//!
//! Turns a stream of 21-point hand-landmark frames into a stable, low-noise
//! gesture plus a smoothed fingertip cursor.
//!
//! ## Gesture → meaning
//!
//! | Pose | Raw gesture | Dwell | Effect |
//! |---|---|---|---|
//! | Index finger extended, middle + ring curled | `drawing` | 50 ms | ink follows fingertip |
//! | Thumb out, index/middle/ring curled | `save` | 1000 ms | one-shot `save` |
//! | All four fingers extended | `clear` | 1000 ms | one-shot `clear` |
//! | Anything else, or fingertip within 2% of a frame edge | `idle` | 50 ms | pen up |
//!
//! One-shot actions are rate limited to one per 2000 ms.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{GestureConfig, GestureTracker, Point2};
//! use hand_gesture::synth::{synthesize, HandPose};
//!
//! let mut tracker = GestureTracker::new(GestureConfig::default());
//! let frame = synthesize(HandPose::Point, Point2::new(0.5, 0.5));
//! let mut out = tracker.process(Some(&frame), 0.0);
//! for i in 1..4 {
//!     out = tracker.process(Some(&frame), i as f64 * 33.0);
//! }
//! assert!(out.is_drawing());
//! ```

pub mod landmarks;
pub mod config;
pub mod classify;
pub mod debounce;
pub mod smoothing;
pub mod tracker;
pub mod synth;

pub use landmarks::{Finger, HandLandmark, LandmarkError, LandmarkFrame, Point2, Point3, LANDMARK_COUNT};
pub use config::{ConfigError, GestureConfig};
pub use classify::{classify, finger_states, FingerStates, Gesture, GestureAction};
pub use debounce::{DebounceOutcome, GestureDebouncer};
pub use smoothing::CursorSmoother;
pub use tracker::{FrameOutput, GestureTracker};
