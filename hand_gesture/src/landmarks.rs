//! Hand-landmark frames as delivered by an external detector.
//!
//! One frame carries 21 points for a single hand, in the detector's fixed
//! anatomical order.  `x`/`y` are normalised to the camera frame (0.0–1.0),
//! `z` is relative depth.  The joint-distance tests measure in all three
//! axes; the edge test and the cursor use `x`/`y` only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Points
// ════════════════════════════════════════════════════════════════════════════

/// A landmark position in normalised frame coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }

    /// Euclidean distance in all three axes.
    pub fn distance(&self, other: &Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx*dx + dy*dy + dz*dz).sqrt()
    }

    /// Drop the depth component.
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A 2-D position, normalised unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx*dx + dy*dy).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmark — the anatomical numbering
// ════════════════════════════════════════════════════════════════════════════

/// The 21 landmarks of one hand, in detector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist     = 0,
    ThumbCmc  = 1,
    ThumbMcp  = 2,
    ThumbIp   = 3,
    ThumbTip  = 4,
    IndexMcp  = 5,
    IndexPip  = 6,
    IndexDip  = 7,
    IndexTip  = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp   = 13,
    RingPip   = 14,
    RingDip   = 15,
    RingTip   = 16,
    PinkyMcp  = 17,
    PinkyPip  = 18,
    PinkyDip  = 19,
    PinkyTip  = 20,
}

impl HandLandmark {
    /// Array index of this landmark within a frame.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wrist     => "wrist",
            Self::ThumbCmc  => "thumb-cmc",
            Self::ThumbMcp  => "thumb-mcp",
            Self::ThumbIp   => "thumb-ip",
            Self::ThumbTip  => "thumb-tip",
            Self::IndexMcp  => "index-mcp",
            Self::IndexPip  => "index-pip",
            Self::IndexDip  => "index-dip",
            Self::IndexTip  => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp   => "ring-mcp",
            Self::RingPip   => "ring-pip",
            Self::RingDip   => "ring-dip",
            Self::RingTip   => "ring-tip",
            Self::PinkyMcp  => "pinky-mcp",
            Self::PinkyPip  => "pinky-pip",
            Self::PinkyDip  => "pinky-dip",
            Self::PinkyTip  => "pinky-tip",
        }
    }
}

/// The four non-thumb fingers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Index  => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring   => HandLandmark::RingTip,
            Finger::Pinky  => HandLandmark::PinkyTip,
        }
    }

    pub fn pip(self) -> HandLandmark {
        match self {
            Finger::Index  => HandLandmark::IndexPip,
            Finger::Middle => HandLandmark::MiddlePip,
            Finger::Ring   => HandLandmark::RingPip,
            Finger::Pinky  => HandLandmark::PinkyPip,
        }
    }

    pub fn mcp(self) -> HandLandmark {
        match self {
            Finger::Index  => HandLandmark::IndexMcp,
            Finger::Middle => HandLandmark::MiddleMcp,
            Finger::Ring   => HandLandmark::RingMcp,
            Finger::Pinky  => HandLandmark::PinkyMcp,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// Reasons a detector frame is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One detected hand.  Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Point3; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Validate and wrap a detector result.
    pub fn new(points: &[Point3]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        let mut out = [Point3::default(); LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(LandmarkFrame { points: out })
    }

    /// Wrap points that are known to be well formed.
    pub(crate) fn from_array(points: [Point3; LANDMARK_COUNT]) -> Self {
        LandmarkFrame { points }
    }

    /// Build from `[x, y, z]` triples, the shape most detectors serialise.
    pub fn from_triples(triples: &[[f32; 3]]) -> Result<Self, LandmarkError> {
        let points: Vec<Point3> = triples.iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        Self::new(&points)
    }

    pub fn get(&self, landmark: HandLandmark) -> Point3 {
        self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Point3; LANDMARK_COUNT] {
        &self.points
    }

    /// The drawing cursor: the index fingertip.
    pub fn fingertip(&self) -> Point2 {
        self.get(HandLandmark::IndexTip).xy()
    }

    pub fn to_triples(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|p| [p.x, p.y, p.z]).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
