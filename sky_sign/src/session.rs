//! One tracking session: landmark frames in, ink and notifications out.
//!
//! A session owns every piece of per-session state (gesture debouncing,
//! cursor smoothing, the ink surface).  The frame loop calls
//! [`TrackingSession::process_frame`] once per detector frame, strictly in
//! arrival order.
//!
//! Teardown goes through a [`LiveFlag`]: once it is killed every later frame
//! is a no-op, whichever thread it arrives from.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hand_gesture::{FrameOutput, GestureAction, GestureTracker, LandmarkFrame, Point3};
use ink_engine::{InkEngine, SmoothingMode};
use tracing::{debug, error, info, warn};

use crate::config::SkySignConfig;
use crate::error::Result;
use crate::events::{SessionObserver, SignatureExport};

// ════════════════════════════════════════════════════════════════════════════
// LiveFlag
// ════════════════════════════════════════════════════════════════════════════

/// Shared liveness gate.  Clones observe the same flag.
#[derive(Clone, Debug)]
pub struct LiveFlag(Arc<AtomicBool>);

impl LiveFlag {
    pub fn new() -> Self {
        LiveFlag(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for LiveFlag {
    fn default() -> Self { Self::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// SessionState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the first frame from the source.
    Starting,
    Tracking,
    Stopped,
    /// Acquisition failed.  Terminal; a new session must be created.
    Failed(String),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped | SessionState::Failed(_))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingSession
// ════════════════════════════════════════════════════════════════════════════

pub struct TrackingSession {
    tracker:     GestureTracker,
    ink:         InkEngine,
    observer:    Box<dyn SessionObserver>,
    live:        LiveFlag,
    state:       SessionState,
    last_export: Option<SignatureExport>,
    frames:      u64,
}

impl TrackingSession {
    /// The ink engine runs in external-smoothing mode: the tracker's
    /// adaptive smoother already filtered the fingertip.
    pub fn new(cfg: &SkySignConfig, observer: Box<dyn SessionObserver>, live: LiveFlag) -> Result<Self> {
        cfg.validate()?;
        let ink = InkEngine::with_mode(
            cfg.canvas.width,
            cfg.canvas.height,
            cfg.ink.clone(),
            SmoothingMode::External,
        );
        info!(width = cfg.canvas.width, height = cfg.canvas.height, "tracking session created");
        Ok(TrackingSession {
            tracker:     GestureTracker::new(cfg.gesture.clone()),
            ink,
            observer,
            live,
            state:       SessionState::Starting,
            last_export: None,
            frames:      0,
        })
    }

    pub fn ink(&self)         -> &InkEngine               { &self.ink }
    pub fn state(&self)       -> &SessionState            { &self.state }
    pub fn live(&self)        -> &LiveFlag                { &self.live }
    pub fn frames(&self)      -> u64                      { self.frames }
    pub fn last_export(&self) -> Option<&SignatureExport> { self.last_export.as_ref() }

    /// Resize the ink surface; strokes are kept and repainted.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.ink.resize(width, height);
    }

    /// Process one detector frame.  `None` = no hand in view.
    ///
    /// Returns `None` once the session is stopped or failed.
    pub fn process_frame(&mut self, frame: Option<&LandmarkFrame>, now_ms: f64) -> Option<FrameOutput> {
        if !self.live.is_live() || self.state.is_terminal() {
            return None;
        }
        if self.state == SessionState::Starting {
            info!("tracking started");
            self.state = SessionState::Tracking;
        }
        self.frames += 1;

        let out = self.tracker.process(frame, now_ms);

        match out.fingertip {
            Some(tip) => {
                let drawing = out.is_drawing();
                self.observer.on_position_update(tip.x, tip.y, drawing);
                self.ink.add_point(tip.x, tip.y, drawing);
            }
            None => self.ink.end_stroke(),
        }

        if let Some(action) = out.fired {
            self.apply_action(action);
            self.observer.on_gesture(action);
        }

        Some(out)
    }

    /// Like [`process_frame`](Self::process_frame) but takes raw points.
    /// A malformed frame is logged and reported as idle; it changes nothing.
    pub fn process_points(&mut self, points: Option<&[Point3]>, now_ms: f64) -> Option<FrameOutput> {
        let Some(points) = points else {
            return self.process_frame(None, now_ms);
        };
        match LandmarkFrame::new(points) {
            Ok(frame) => self.process_frame(Some(&frame), now_ms),
            Err(e) => {
                if !self.live.is_live() || self.state.is_terminal() {
                    return None;
                }
                warn!(at_ms = now_ms, error = %e, "dropping malformed landmark frame");
                Some(FrameOutput::idle())
            }
        }
    }

    fn apply_action(&mut self, action: GestureAction) {
        match action {
            GestureAction::Save => {
                let export = self.export();
                info!(strokes = export.strokes, png = export.png.is_some(), "signature saved");
                self.observer.on_export(&export);
                self.last_export = Some(export);
            }
            GestureAction::Clear => {
                info!(strokes = self.ink.stroke_count(), "signature cleared");
                self.ink.clear();
                self.tracker.reset_cursor();
            }
        }
    }

    /// Snapshot the current signature.  PNG failure is soft.
    pub fn export(&self) -> SignatureExport {
        let png = match self.ink.export_png() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "PNG export failed; keeping SVG only");
                None
            }
        };
        SignatureExport {
            svg:     self.ink.export_svg(),
            png,
            strokes: self.ink.stroke_count(),
        }
    }

    /// Acquisition failed.  The session stays failed.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        let reason = reason.into();
        error!(%reason, "tracking session failed");
        self.live.kill();
        self.ink.end_stroke();
        self.state = SessionState::Failed(reason);
    }

    /// Stop tracking.  The flag is killed before anything else so frames
    /// racing with teardown are ignored.  Idempotent.
    pub fn stop(&mut self) {
        self.live.kill();
        if self.state.is_terminal() {
            return;
        }
        self.ink.end_stroke();
        self.tracker.reset();
        debug!(frames = self.frames, "tracking session stopped");
        self.state = SessionState::Stopped;
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.live.kill();
    }
}
