//! Midpoint / quadratic path synthesis.
//!
//! A stroke `p0 … pn` is drawn as
//!
//! ```text
//!   line  p0        → m(p0,p1)
//!   quad  m(pi-1,pi) → m(pi,pi+1)   control pi      for each interior pi
//!   line  m(pn-1,pn) → pn
//! ```
//!
//! Consecutive pieces meet at midpoints with matching tangents, which gives a
//! C¹ curve through noisy samples without storing tangents.  The incremental
//! painter, full redraw and SVG export all go through this module so they can
//! never disagree.

use serde::{Deserialize, Serialize};

/// A point; normalised (0–1) when stored, pixels once scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InkPoint {
    pub x: f32,
    pub y: f32,
}

impl InkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        InkPoint { x, y }
    }

    pub fn midpoint(self, other: InkPoint) -> InkPoint {
        InkPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: InkPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx*dx + dy*dy).sqrt()
    }

    pub fn scaled(self, sx: f32, sy: f32) -> InkPoint {
        InkPoint::new(self.x * sx, self.y * sy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    Line { from: InkPoint, to: InkPoint },
    Quad { from: InkPoint, ctrl: InkPoint, to: InkPoint },
}

impl PathSegment {
    pub fn start(&self) -> InkPoint {
        match *self {
            PathSegment::Line { from, .. } | PathSegment::Quad { from, .. } => from,
        }
    }

    pub fn end(&self) -> InkPoint {
        match *self {
            PathSegment::Line { to, .. } | PathSegment::Quad { to, .. } => to,
        }
    }

    /// Map every control point through a per-axis scale.
    pub fn scaled(&self, sx: f32, sy: f32) -> PathSegment {
        match *self {
            PathSegment::Line { from, to } => PathSegment::Line {
                from: from.scaled(sx, sy),
                to:   to.scaled(sx, sy),
            },
            PathSegment::Quad { from, ctrl, to } => PathSegment::Quad {
                from: from.scaled(sx, sy),
                ctrl: ctrl.scaled(sx, sy),
                to:   to.scaled(sx, sy),
            },
        }
    }

    /// Evaluate at parameter `t` ∈ [0, 1].
    pub fn point_at(&self, t: f32) -> InkPoint {
        match *self {
            PathSegment::Line { from, to } => InkPoint::new(
                from.x + (to.x - from.x) * t,
                from.y + (to.y - from.y) * t,
            ),
            PathSegment::Quad { from, ctrl, to } => {
                let u = 1.0 - t;
                InkPoint::new(
                    u*u*from.x + 2.0*u*t*ctrl.x + t*t*to.x,
                    u*u*from.y + 2.0*u*t*ctrl.y + t*t*to.y,
                )
            }
        }
    }
}

/// The piece to paint right after a point was appended to `buf`.
///
/// Nothing for the first point; a lead-in line for the second; a quadratic
/// through the previous point for every later one.
pub fn segment_on_append(buf: &[InkPoint]) -> Option<PathSegment> {
    match buf.len() {
        0 | 1 => None,
        2 => Some(PathSegment::Line { from: buf[0], to: buf[0].midpoint(buf[1]) }),
        n => {
            let (p0, p1, p2) = (buf[n - 3], buf[n - 2], buf[n - 1]);
            Some(PathSegment::Quad {
                from: p0.midpoint(p1),
                ctrl: p1,
                to:   p1.midpoint(p2),
            })
        }
    }
}

/// The piece that finishes a stroke at its true last point.
pub fn closing_segment(buf: &[InkPoint]) -> Option<PathSegment> {
    match buf.len() {
        0 | 1 => None,
        n => {
            let (a, b) = (buf[n - 2], buf[n - 1]);
            Some(PathSegment::Line { from: a.midpoint(b), to: b })
        }
    }
}

/// Segments painted so far for an in-progress buffer.
pub fn open_segments(points: &[InkPoint]) -> Vec<PathSegment> {
    (2..=points.len())
        .filter_map(|k| segment_on_append(&points[..k]))
        .collect()
}

/// Every segment of a sealed stroke, in paint order.
pub fn stroke_segments(points: &[InkPoint]) -> Vec<PathSegment> {
    let mut segs = open_segments(points);
    segs.extend(closing_segment(points));
    segs
}
