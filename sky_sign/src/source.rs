//! Landmark sources: hardware, simulation and recorded replay.
//!
//! Every source runs on its own thread and delivers [`TrackerInput`] over a
//! one-slot channel.  A frame that arrives while the consumer is still busy
//! with the previous one is dropped, the way a camera pipeline skips frames.
//! Consumers don't need to know where the frames came from.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::synth::{synthesize, HandPose};
use hand_gesture::{Point2, Point3};
use tracing::{debug, trace};

use crate::recording::Recording;
use crate::session::LiveFlag;

/// Simulated camera rate.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ════════════════════════════════════════════════════════════════════════════
// TrackerInput
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum TrackerInput {
    /// One detector frame.  `landmarks: None` = no hand in view.
    Frame { t_ms: f64, landmarks: Option<Vec<Point3>> },
    /// The source could not be brought up, or died.  Always the last input.
    Failed(String),
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver landmark frames over a channel.
///
/// `run` returns when the liveness flag goes down, when the receiver is
/// dropped, or when the source is exhausted.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: SyncSender<TrackerInput>, live: LiveFlag);
}

/// Spawn a source on its own thread and return the receiving end.
pub fn spawn_landmark_source(source: Box<dyn LandmarkSource>, live: LiveFlag) -> Receiver<TrackerInput> {
    let (tx, rx) = mpsc::sync_channel(1);
    thread::spawn(move || source.run(tx, live));
    rx
}

/// Offer a frame without blocking.  Returns `false` once nobody is listening.
fn offer(tx: &SyncSender<TrackerInput>, input: TrackerInput) -> bool {
    match tx.try_send(input) {
        Ok(())                           => true,
        Err(TrySendError::Full(_))       => { trace!("consumer busy, frame dropped"); true }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — mouse + keyboard (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the preview window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalised to the canvas.
    Pointer { x: f32, y: f32 },
    /// Pose currently held; `None` hides the hand.
    Pose(Option<HandPose>),
    Quit,
}

/// Synthesises a hand at the pointer in whatever pose the keys say.
///
/// The window sends [`SimInput`] here; this source turns the latest state
/// into a frame every [`FRAME_INTERVAL`].
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: SyncSender<TrackerInput>, live: LiveFlag) {
        let start = Instant::now();
        let mut pointer = Point2::new(0.5, 0.5);
        let mut pose    = Some(HandPose::Fist);

        while live.is_live() {
            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::Pointer { x, y }) => pointer = Point2::new(x, y),
                    Ok(SimInput::Pose(p))          => pose = p,
                    Ok(SimInput::Quit) | Err(TryRecvError::Disconnected) => {
                        debug!("simulated source finished");
                        return;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            let landmarks = pose.map(|p| synthesize(p, pointer).points().to_vec());
            if !offer(&tx, TrackerInput::Frame { t_ms: elapsed_ms(start), landmarks }) {
                return;
            }
            thread::sleep(FRAME_INTERVAL);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — recorded JSON-lines
// ════════════════════════════════════════════════════════════════════════════

/// Plays a [`Recording`] back, paced by its own timestamps.
pub struct ReplaySource {
    recording: Recording,
    /// Wall-clock pacing.  Off = as fast as the consumer takes them, and
    /// nothing is dropped.
    realtime:  bool,
}

impl ReplaySource {
    pub fn new(recording: Recording, realtime: bool) -> Self {
        ReplaySource { recording, realtime }
    }
}

impl LandmarkSource for ReplaySource {
    fn run(self: Box<Self>, tx: SyncSender<TrackerInput>, live: LiveFlag) {
        let start = Instant::now();
        let t0 = self.recording.frames.first().map_or(0.0, |f| f.t_ms);

        for frame in &self.recording.frames {
            if !live.is_live() { return; }
            let input = TrackerInput::Frame { t_ms: frame.t_ms, landmarks: frame.points() };

            if self.realtime {
                let due = Duration::from_secs_f64(((frame.t_ms - t0) / 1000.0).max(0.0));
                if let Some(wait) = due.checked_sub(start.elapsed()) {
                    thread::sleep(wait);
                }
                if !offer(&tx, input) { return; }
            } else if tx.send(input).is_err() {
                return;
            }
        }
        debug!(frames = self.recording.len(), "replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmarks from a LeapMotion controller.
///
/// Requires the `leap` feature and the LeapC shared library.  The first hand
/// in each tracking frame is mapped onto the 21-point layout:
///
/// * wrist: mean of the four finger metacarpal bases
/// * thumb: proximal base (CMC), intermediate base (MCP), distal base (IP), tip
/// * fingers: proximal base (MCP), intermediate base (PIP), distal base (DIP), tip
///
/// Millimetres are normalised over a fixed interaction box above the device,
/// with y flipped so "up" matches image coordinates.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: SyncSender<TrackerInput>, live: LiveFlag) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(TrackerInput::Failed(format!("LeapC connection: {e:?}")));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(TrackerInput::Failed(format!("LeapMotion device: {e:?}")));
            return;
        }

        let start = Instant::now();
        while live.is_live() {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let landmarks = frame.hands().next().and_then(|hand| leap_hand_points(&hand));
                if !offer(&tx, TrackerInput::Frame { t_ms: elapsed_ms(start), landmarks }) {
                    return;
                }
            }
        }
    }
}

// Interaction box in device millimetres.
#[cfg(feature = "leap")]
const LEAP_X_SPAN:   f32 = 400.0;
#[cfg(feature = "leap")]
const LEAP_Y_MIN:    f32 = 100.0;
#[cfg(feature = "leap")]
const LEAP_Y_SPAN:   f32 = 300.0;
#[cfg(feature = "leap")]
const LEAP_Z_SPAN:   f32 = 400.0;

#[cfg(feature = "leap")]
fn leap_hand_points(hand: &leaprs::HandRef) -> Option<Vec<Point3>> {
    let norm = |v: leaprs::LeapVectorRef| {
        Point3::new(
            0.5 + v.x / LEAP_X_SPAN,
            1.0 - (v.y - LEAP_Y_MIN) / LEAP_Y_SPAN,
            v.z / LEAP_Z_SPAN,
        )
    };

    let digits: Vec<DigitJoints> = hand
        .digits()
        .map(|d| [
            norm(d.metacarpal().prev_joint()),
            norm(d.proximal().prev_joint()),
            norm(d.intermediate().prev_joint()),
            norm(d.distal().prev_joint()),
            norm(d.distal().next_joint()),
        ])
        .collect();
    let points = hand_from_digits(&digits);
    if points.is_none() {
        tracing::warn!(digits = digits.len(), "incomplete Leap hand; treating as no hand");
    }
    points
}

/// One digit's joints, base to tip: metacarpal base, then the proximal,
/// intermediate and distal bases, then the distal tip.
#[cfg(any(feature = "leap", test))]
type DigitJoints = [Point3; 5];

/// Assemble the 21-point frame from five digits, thumb first.  The wrist is
/// the mean of the four finger metacarpal bases.  `None` unless exactly five
/// digits are present.
#[cfg(any(feature = "leap", test))]
fn hand_from_digits(digits: &[DigitJoints]) -> Option<Vec<Point3>> {
    if digits.len() != 5 {
        return None;
    }
    let mut points = vec![Point3::default(); hand_gesture::LANDMARK_COUNT];

    let mut wrist = Point3::default();
    for d in &digits[1..] {
        wrist = Point3::new(wrist.x + d[0].x / 4.0, wrist.y + d[0].y / 4.0, wrist.z + d[0].z / 4.0);
    }
    points[0] = wrist;

    for (i, d) in digits.iter().enumerate() {
        points[1 + i * 4..5 + i * 4].copy_from_slice(&d[1..]);
    }
    Some(points)
}
