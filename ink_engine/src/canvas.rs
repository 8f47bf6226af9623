//! Software raster the ink is painted onto.
//!
//! Pixels are packed ARGB (`0xAARRGGBB`), row major, and start fully
//! transparent.  Painting is opaque replacement (no blending), so the final
//! image depends only on *which* segments were painted, never on the order.
//! That is what makes a full redraw pixel-identical to the incremental draw.

use crate::path::{InkPoint, PathSegment};

/// Upper bound on chords per quadratic; keeps a pathological control point
/// from stalling a frame.
const MAX_CHORDS: usize = 64;
/// Target chord length in pixels when flattening quadratics.
const CHORD_PX: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    pub const BLANK: u32 = 0x0000_0000;

    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, pixels: vec![Self::BLANK; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Not laid out yet: drawing is silently skipped.
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Self::BLANK);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == Self::BLANK)
    }

    /// Straight RGBA bytes, for encoders.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &argb in &self.pixels {
            out.extend_from_slice(&[
                (argb >> 16) as u8,
                (argb >>  8) as u8,
                 argb        as u8,
                (argb >> 24) as u8,
            ]);
        }
        out
    }

    // ── Stroking ─────────────────────────────────────────────────────────

    /// Paint a segment already in pixel space.
    pub fn stroke_segment(&mut self, seg: &PathSegment, color: u32, width: f32) {
        match *seg {
            PathSegment::Line { from, to } => self.stroke_line(from, to, color, width),
            PathSegment::Quad { from, ctrl, to } => self.stroke_quad(from, ctrl, to, color, width),
        }
    }

    /// Round-capped line: every pixel whose centre lies within `width / 2`
    /// of the segment.
    pub fn stroke_line(&mut self, a: InkPoint, b: InkPoint, color: u32, width: f32) {
        if self.is_zero_area() { return; }
        let r = (width / 2.0).max(0.5);

        let min_x = (a.x.min(b.x) - r).floor().max(0.0);
        let min_y = (a.y.min(b.y) - r).floor().max(0.0);
        let max_x = (a.x.max(b.x) + r).ceil().min(self.width  as f32 - 1.0);
        let max_y = (a.y.max(b.y) + r).ceil().min(self.height as f32 - 1.0);
        if !(min_x <= max_x && min_y <= max_y) { return; }

        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx*dx + dy*dy;
        let r2 = r * r;

        for py in min_y as usize..=max_y as usize {
            for px in min_x as usize..=max_x as usize {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                let t = if len2 > 0.0 {
                    (((cx - a.x) * dx + (cy - a.y) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = a.x + t * dx - cx;
                let ey = a.y + t * dy - cy;
                if ex*ex + ey*ey <= r2 {
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }

    /// Quadratic Bézier, flattened into chords of roughly [`CHORD_PX`].
    pub fn stroke_quad(&mut self, from: InkPoint, ctrl: InkPoint, to: InkPoint, color: u32, width: f32) {
        if self.is_zero_area() { return; }
        let seg = PathSegment::Quad { from, ctrl, to };
        let n = chord_count(from, ctrl, to);
        let mut prev = from;
        for i in 1..=n {
            let next = if i == n { to } else { seg.point_at(i as f32 / n as f32) };
            self.stroke_line(prev, next, color, width);
            prev = next;
        }
    }
}

fn chord_count(from: InkPoint, ctrl: InkPoint, to: InkPoint) -> usize {
    let hull = from.distance(ctrl) + ctrl.distance(to);
    if !hull.is_finite() { return 1; }
    ((hull / CHORD_PX).ceil() as usize).clamp(1, MAX_CHORDS)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
