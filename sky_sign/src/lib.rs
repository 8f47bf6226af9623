//! # sky_sign
//!
//! Sign your name in the air.  A hand-landmark stream drives a
//! [`TrackingSession`](session::TrackingSession): the gesture tracker decides
//! when the index finger is drawing and when a save or clear was
//! deliberately held, and the ink engine turns the smoothed fingertip into a
//! signature that can be exported as SVG or PNG.
//!
//! ```text
//! LandmarkSource ──frames──▶ TrackingSession ──events──▶ SessionObserver
//!   (sim / replay / leap)     GestureTracker → InkEngine
//! ```
//!
//! ## Gestures
//!
//! | Hand | Effect |
//! |---|---|
//! | Index finger up | Draw |
//! | Thumbs up, held 1 s | Save (SVG + PNG) |
//! | Open palm, held 1 s | Clear |
//! | Anything else, or fingertip at the frame edge | Pen up |
//!
//! Saves and clears fire at most once every 2 s while held.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse is the fingertip, keys pick
//!   the pose.
//! * `leap` — **Hardware mode**: polls a LeapMotion controller via LeapC.
//!
//! ### Simulation keys
//!
//! | Key | Pose |
//! |---|---|
//! | `D` held | Pointing (draw) |
//! | `S` held | Thumbs up (save) |
//! | `C` held | Open palm (clear) |
//! | `H` held | Hand hidden |
//! | none | Fist |
//! | `Q` / `Esc` | Quit |

pub mod error;
pub mod config;
pub mod events;
pub mod session;
pub mod recording;
pub mod source;
pub mod visualizer;
pub mod app;
pub mod cli;

pub use config::SkySignConfig;
pub use error::{Result, SkySignError};
pub use events::{ChannelObserver, NullObserver, SessionEvent, SessionObserver, SignatureExport};
pub use session::{LiveFlag, SessionState, TrackingSession};
