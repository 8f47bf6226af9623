//! Synthetic hand poses.
//!
//! Builds plausible 21-point frames for the four poses the classifier knows,
//! with the index fingertip pinned to a requested position.  Used by the
//! keyboard/mouse simulator and by tests that need landmark streams without a
//! camera.

use crate::landmarks::{Finger, HandLandmark, LandmarkFrame, Point2, Point3, LANDMARK_COUNT};

/// Poses that map onto each [`Gesture`](crate::Gesture).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandPose {
    /// Everything curled → `idle`.
    Fist,
    /// Index extended → `drawing`.
    Point,
    /// Thumb extended → `save`.
    ThumbsUp,
    /// Everything extended → `clear`.
    OpenPalm,
}

impl HandPose {
    fn thumb_extended(self) -> bool {
        matches!(self, HandPose::ThumbsUp | HandPose::OpenPalm)
    }

    fn finger_extended(self, finger: Finger) -> bool {
        match self {
            HandPose::Fist | HandPose::ThumbsUp => false,
            HandPose::Point    => finger == Finger::Index,
            HandPose::OpenPalm => true,
        }
    }
}

// Offsets from the wrist at unit hand scale, y growing downward as in image
// coordinates so fingers point "up" the frame.
const MCP_Y: f32 = -0.10;
const EXTENDED: [f32; 3] = [-0.14, -0.17, -0.20]; // pip, dip, tip
const CURLED:   [f32; 3] = [-0.13, -0.10, -0.085];

const THUMB_CMC:        (f32, f32) = (-0.03, -0.03);
const THUMB_MCP:        (f32, f32) = (-0.06, -0.05);
const THUMB_IP:         (f32, f32) = (-0.09, -0.08);
const THUMB_TIP_OPEN:   (f32, f32) = (-0.11, -0.14);
const THUMB_TIP_CURLED: (f32, f32) = (-0.05, -0.11);

fn column(finger: Finger) -> f32 {
    match finger {
        Finger::Index  => -0.03,
        Finger::Middle =>  0.0,
        Finger::Ring   =>  0.03,
        Finger::Pinky  =>  0.055,
    }
}

/// Landmark offsets relative to the wrist for `pose` at `scale`.
fn offsets(pose: HandPose, scale: f32) -> [(f32, f32); LANDMARK_COUNT] {
    let mut out = [(0.0, 0.0); LANDMARK_COUNT];
    let s = |(x, y): (f32, f32)| (x * scale, y * scale);

    out[HandLandmark::ThumbCmc.index()] = s(THUMB_CMC);
    out[HandLandmark::ThumbMcp.index()] = s(THUMB_MCP);
    out[HandLandmark::ThumbIp.index()]  = s(THUMB_IP);
    out[HandLandmark::ThumbTip.index()] = s(if pose.thumb_extended() {
        THUMB_TIP_OPEN
    } else {
        THUMB_TIP_CURLED
    });

    for finger in Finger::ALL {
        let x = column(finger);
        let [pip, dip, tip] = if pose.finger_extended(finger) { EXTENDED } else { CURLED };
        let mcp = finger.mcp().index();
        out[mcp]     = s((x, MCP_Y));
        out[mcp + 1] = s((x, pip));
        out[mcp + 2] = s((x, dip));
        out[mcp + 3] = s((x, tip));
    }
    out
}

/// Build a frame for `pose` whose index fingertip sits at `fingertip`.
pub fn synthesize(pose: HandPose, fingertip: Point2) -> LandmarkFrame {
    synthesize_scaled(pose, fingertip, 1.0)
}

/// As [`synthesize`], with the hand scaled (camera distance).
pub fn synthesize_scaled(pose: HandPose, fingertip: Point2, scale: f32) -> LandmarkFrame {
    let offs  = offsets(pose, scale);
    let (tx, ty) = offs[HandLandmark::IndexTip.index()];
    let wrist = (fingertip.x - tx, fingertip.y - ty);

    let mut points = [Point3::default(); LANDMARK_COUNT];
    for (p, (dx, dy)) in points.iter_mut().zip(offs.iter()) {
        *p = Point3::new(wrist.0 + dx, wrist.1 + dy, 0.0);
    }
    LandmarkFrame::from_array(points)
}
