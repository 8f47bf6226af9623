//! Application loops.
//!
//! * [`run_live`]: a landmark source thread feeds a [`TrackingSession`]; the
//!   preview window renders the ink and saved signatures land in the output
//!   directory.
//! * [`run_replay`]: headless and synchronous, for recordings.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use hand_gesture::{FrameOutput, GestureAction};
use tracing::{info, warn};

use crate::config::SkySignConfig;
use crate::error::{Result, SkySignError};
use crate::events::{ChannelObserver, SessionEvent, SignatureExport};
use crate::recording::{RecordedFrame, Recording, RecordingWriter};
use crate::session::{LiveFlag, SessionState, TrackingSession};
use crate::source::{spawn_landmark_source, LandmarkSource, ReplaySource, SimLandmarkSource, TrackerInput};
use crate::visualizer::{Cursor, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// Options
// ════════════════════════════════════════════════════════════════════════════

/// Where live frames come from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InputMode {
    /// Mouse and keyboard in the preview window.
    #[default]
    Simulated,
    /// A JSON-lines recording, played at its own pace.
    Replay(PathBuf),
    /// LeapMotion hardware.
    #[cfg(feature = "leap")]
    Leap,
}

#[derive(Clone, Debug, Default)]
pub struct LiveOptions {
    pub input:  InputMode,
    /// Overrides `[output] dir`.
    pub out:    Option<PathBuf>,
    /// Write every frame to this JSON-lines file.
    pub record: Option<PathBuf>,
}

// ════════════════════════════════════════════════════════════════════════════
// Status line
// ════════════════════════════════════════════════════════════════════════════

/// Short human status for the preview window.
fn status_line(out: Option<&FrameOutput>, state: &SessionState, strokes: usize, saved: usize, note: &str) -> String {
    let what = match (state, out) {
        (SessionState::Failed(r), _)       => return format!("failed: {r}"),
        (SessionState::Stopped, _)         => "stopped".to_string(),
        (_, Some(o)) if o.hand_present     => o.effective.to_string(),
        (SessionState::Starting, _)        => "starting".to_string(),
        _                                  => "no hand".to_string(),
    };
    if note.is_empty() {
        format!("{what}  strokes: {strokes}  saved: {saved}")
    } else {
        format!("{what}  strokes: {strokes}  saved: {saved}  {note}")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Export files
// ════════════════════════════════════════════════════════════════════════════

/// Write `signature-N.svg` (and `.png` when present) into `dir`.
pub fn write_export(dir: &Path, n: usize, export: &SignatureExport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let svg = dir.join(format!("signature-{n}.svg"));
    std::fs::write(&svg, &export.svg)?;
    if let Some(png) = &export.png {
        std::fs::write(dir.join(format!("signature-{n}.png")), png)?;
    }
    Ok(svg)
}

/// Write the next numbered export.  `saved` only advances when the files
/// land, so numbering on disk has no gaps.  Returns the status note.
fn save_export(out_dir: &Path, saved: &mut usize, export: &SignatureExport) -> String {
    match write_export(out_dir, *saved + 1, export) {
        Ok(path) => {
            *saved += 1;
            info!(path = %path.display(), strokes = export.strokes, "signature written");
            format!("wrote {}", path.display())
        }
        Err(e) => {
            warn!(error = %e, "could not write signature");
            "save failed".to_string()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run_live()
// ════════════════════════════════════════════════════════════════════════════

/// Run the interactive application until the window closes or the user
/// quits.
pub fn run_live(cfg: &SkySignConfig, opts: LiveOptions) -> Result<()> {
    let out_dir = opts.out.clone().unwrap_or_else(|| cfg.output.dir.clone());
    let live = LiveFlag::new();

    // ── Landmark source ───────────────────────────────────────────────────
    let (sim_tx, source): (_, Box<dyn LandmarkSource>) = match &opts.input {
        InputMode::Simulated => {
            let (tx, rx) = mpsc::channel();
            (Some(tx), Box::new(SimLandmarkSource { rx }))
        }
        InputMode::Replay(path) => (None, Box::new(ReplaySource::new(Recording::load(path)?, true))),
        #[cfg(feature = "leap")]
        InputMode::Leap => (None, Box::new(crate::source::LeapLandmarkSource)),
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.canvas.width, cfg.canvas.height, sim_tx)?;

    // ── Session ───────────────────────────────────────────────────────────
    let (event_tx, event_rx) = mpsc::channel();
    let mut session = TrackingSession::new(cfg, Box::new(ChannelObserver::actions_only(event_tx)), live.clone())?;
    let frames_rx = spawn_landmark_source(source, live.clone());

    let mut recorder = opts.record.as_deref().map(RecordingWriter::create).transpose()?;

    info!(input = ?opts.input, out = %out_dir.display(), "live session running");

    let result = live_loop(&mut vis, &mut session, &frames_rx, &event_rx, &out_dir, recorder.as_mut());

    // ── Teardown ──────────────────────────────────────────────────────────
    let failure = match session.state() {
        SessionState::Failed(reason) => Some(reason.clone()),
        _ => None,
    };
    session.stop();
    if let Some(rec) = recorder {
        rec.finish()?;
    }
    result?;
    match failure {
        Some(reason) => Err(SkySignError::Acquisition(reason)),
        None         => Ok(()),
    }
}

fn live_loop(
    vis:       &mut Visualizer,
    session:   &mut TrackingSession,
    frames_rx: &Receiver<TrackerInput>,
    event_rx:  &Receiver<SessionEvent>,
    out_dir:   &Path,
    mut recorder: Option<&mut RecordingWriter>,
) -> Result<()> {
    let mut last_out: Option<FrameOutput> = None;
    let mut saved = 0usize;
    let mut note = String::new();
    let mut source_done = false;

    while vis.is_open() {
        // 1. Poll window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Drain frames
        while !source_done {
            match frames_rx.try_recv() {
                Ok(TrackerInput::Frame { t_ms, landmarks }) => {
                    if let Some(rec) = recorder.as_deref_mut() {
                        rec.write(&RecordedFrame::new(t_ms, landmarks.as_deref()))?;
                    }
                    if let Some(out) = session.process_points(landmarks.as_deref(), t_ms) {
                        last_out = Some(out);
                    }
                }
                Ok(TrackerInput::Failed(reason)) => {
                    session.fail(reason);
                    source_done = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("landmark source finished");
                    source_done = true;
                }
            }
        }

        // 3. Drain session events
        for event in event_rx.try_iter() {
            match event {
                SessionEvent::Exported(export) => note = save_export(out_dir, &mut saved, &export),
                SessionEvent::Gesture(GestureAction::Clear) => note = "cleared".to_string(),
                SessionEvent::Gesture(GestureAction::Save) | SessionEvent::Position { .. } => {}
            }
        }

        // 4. Render
        let cursor = last_out.and_then(|o| o.fingertip.map(|at| Cursor { at, gesture: o.effective }));
        let status = status_line(last_out.as_ref(), session.state(), session.ink().stroke_count(), saved, &note);
        vis.render(session.ink().canvas(), cursor, &status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// run_replay()
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub frames:  usize,
    pub strokes: usize,
    pub saves:   usize,
    pub clears:  usize,
}

/// Run a recording through a session without a window, then write the final
/// signature.  Gesture timing follows the recorded timestamps.
pub fn run_replay(
    cfg:     &SkySignConfig,
    input:   &Path,
    svg_out: Option<&Path>,
    png_out: Option<&Path>,
) -> Result<ReplaySummary> {
    let recording = Recording::load(input)?;
    let (event_tx, event_rx) = mpsc::channel();
    let mut session = TrackingSession::new(cfg, Box::new(ChannelObserver::actions_only(event_tx)), LiveFlag::new())?;

    let frames = replay_into(&mut session, &recording);
    let mut summary = ReplaySummary { frames, ..ReplaySummary::default() };
    for event in event_rx.try_iter() {
        match event {
            SessionEvent::Gesture(GestureAction::Save)  => summary.saves += 1,
            SessionEvent::Gesture(GestureAction::Clear) => summary.clears += 1,
            _ => {}
        }
    }
    session.stop();
    summary.strokes = session.ink().stroke_count();

    if let Some(path) = svg_out {
        std::fs::write(path, session.ink().export_svg())?;
        info!(path = %path.display(), "SVG written");
    }
    if let Some(path) = png_out {
        std::fs::write(path, session.ink().export_png()?)?;
        info!(path = %path.display(), "PNG written");
    }

    info!(
        frames = summary.frames, strokes = summary.strokes,
        saves = summary.saves, clears = summary.clears,
        "replay complete"
    );
    Ok(summary)
}

/// Feed every frame of `recording` into `session`.  Returns frames processed.
pub fn replay_into(session: &mut TrackingSession, recording: &Recording) -> usize {
    recording
        .frames
        .iter()
        .filter(|f| session.process_points(f.points().as_deref(), f.t_ms).is_some())
        .count()
}
