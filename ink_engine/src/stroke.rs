use serde::{Deserialize, Serialize};

use crate::path::{stroke_segments, InkPoint, PathSegment};

/// A sealed stroke: normalised points in drawing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<InkPoint>,
}

impl Stroke {
    pub fn new(points: Vec<InkPoint>) -> Self {
        Stroke { points }
    }

    pub fn points(&self) -> &[InkPoint] { &self.points }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// A single point has no segment to draw.
    pub fn is_drawable(&self) -> bool { self.points.len() >= 2 }

    pub fn segments(&self) -> Vec<PathSegment> {
        stroke_segments(&self.points)
    }
}
