//! The ink engine: (position, pen-down) samples in, painted strokes out.
//!
//! Points are kept in normalised units and only scaled to pixels when
//! painted, so a resize is just "new canvas + redraw" and nothing on screen
//! is ever in a stale coordinate space.

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::export::{data_url, encode_png, svg_document, ExportFormat};
use crate::path::{closing_segment, open_segments, segment_on_append, InkPoint, PathSegment};
use crate::stroke::Stroke;
use crate::style::{InkStyle, SmoothingMode};

#[derive(Clone, Debug)]
pub struct InkEngine {
    style:         InkStyle,
    mode:          SmoothingMode,
    canvas:        Canvas,
    strokes:       Vec<Stroke>,
    /// In-progress stroke buffer; empty while the pen is up.
    current:       Vec<InkPoint>,
    drawing:       bool,
    last_smoothed: Option<InkPoint>,
}

impl InkEngine {
    pub fn new(width: usize, height: usize, style: InkStyle) -> Self {
        Self::with_mode(width, height, style, SmoothingMode::Builtin)
    }

    pub fn with_mode(width: usize, height: usize, style: InkStyle, mode: SmoothingMode) -> Self {
        InkEngine {
            style,
            mode,
            canvas:        Canvas::new(width, height),
            strokes:       Vec::new(),
            current:       Vec::new(),
            drawing:       false,
            last_smoothed: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn style(&self)   -> &InkStyle    { &self.style }
    pub fn canvas(&self)  -> &Canvas      { &self.canvas }
    pub fn strokes(&self) -> &[Stroke]    { &self.strokes }
    pub fn current(&self) -> &[InkPoint]  { &self.current }
    pub fn stroke_count(&self) -> usize   { self.strokes.len() }
    pub fn is_drawing(&self) -> bool      { self.drawing }

    /// Any sealed stroke, or an in-progress one with at least one point.
    pub fn has_content(&self) -> bool {
        !self.strokes.is_empty() || !self.current.is_empty()
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Feed one sample.  `x`/`y` are normalised to the surface (0–1).
    pub fn add_point(&mut self, x: f32, y: f32, drawing: bool) {
        if !drawing {
            self.end_stroke();
            return;
        }
        if self.canvas.is_zero_area() {
            return;
        }

        let p = self.filter(InkPoint::new(x, y));

        if !self.drawing {
            self.drawing = true;
            self.current.clear();
            self.current.push(p);
            return;
        }

        self.current.push(p);
        if let Some(seg) = segment_on_append(&self.current) {
            self.paint(&seg);
        }
    }

    /// Pen up: close the curve at its true last point and seal the stroke.
    /// A no-op while not drawing.
    pub fn end_stroke(&mut self) {
        if !self.drawing {
            return;
        }
        if let Some(seg) = closing_segment(&self.current) {
            self.paint(&seg);
        }
        let points = std::mem::take(&mut self.current);
        debug!(points = points.len(), index = self.strokes.len(), "stroke sealed");
        self.strokes.push(Stroke::new(points));
        self.drawing = false;
        self.last_smoothed = None;
    }

    fn filter(&mut self, raw: InkPoint) -> InkPoint {
        let p = match (self.mode, self.last_smoothed) {
            (SmoothingMode::Builtin, Some(last)) => {
                let k = self.style.smoothing;
                InkPoint::new(last.x + (raw.x - last.x) * k, last.y + (raw.y - last.y) * k)
            }
            _ => raw,
        };
        self.last_smoothed = Some(p);
        p
    }

    fn paint(&mut self, seg: &PathSegment) {
        let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);
        let color = self.style.stroke_color.to_argb();
        self.canvas.stroke_segment(&seg.scaled(w, h), color, self.style.stroke_width);
    }

    // ── Whole-signature operations ───────────────────────────────────────

    /// Drop every stroke and blank the surface.  There is no undo.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current.clear();
        self.drawing = false;
        self.last_smoothed = None;
        self.canvas.clear();
    }

    /// Repaint everything from stored stroke data.
    ///
    /// A pure function of the strokes and the current style: the result is
    /// pixel-identical to what incremental drawing produced.  The part of an
    /// in-progress stroke that had already been painted is repainted too.
    pub fn redraw(&mut self) {
        self.canvas.clear();
        let segs: Vec<PathSegment> = self.strokes.iter()
            .flat_map(|s| s.segments())
            .chain(open_segments(&self.current))
            .collect();
        for seg in &segs {
            self.paint(seg);
        }
    }

    /// Swap in a surface of a new size and repaint.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.canvas.width(), self.canvas.height()) {
            return;
        }
        debug!(width, height, "ink surface resized");
        self.canvas = Canvas::new(width, height);
        self.redraw();
    }

    pub fn set_style(&mut self, style: InkStyle) {
        self.style = style;
        self.redraw();
    }

    // ── Export ───────────────────────────────────────────────────────────

    pub fn export_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.canvas)
    }

    pub fn export_svg(&self) -> String {
        svg_document(&self.strokes, self.canvas.width(), self.canvas.height(), &self.style)
    }

    /// Export as a `data:` URL, or `None` if encoding failed.
    pub fn export_data_url(&self, format: ExportFormat) -> Option<String> {
        let bytes = match format {
            ExportFormat::Png => match self.export_png() {
                Ok(b) => b,
                Err(e) => {
                    warn!(error = %e, "PNG export failed");
                    return None;
                }
            },
            ExportFormat::Svg => self.export_svg().into_bytes(),
        };
        Some(data_url(format, &bytes))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InkEngine {
        InkEngine::with_mode(100, 100, InkStyle::default(), SmoothingMode::External)
    }

    /// Pixel points → normalised samples on a 100×100 surface.
    fn draw(e: &mut InkEngine, px: &[(f32, f32)]) {
        for &(x, y) in px {
            e.add_point(x / 100.0, y / 100.0, true);
        }
        e.add_point(0.0, 0.0, false);
    }

    #[test]
    fn first_point_starts_stroke_without_painting() {
        let mut e = engine();
        e.add_point(0.2, 0.2, true);
        assert!(e.is_drawing());
        assert_eq!(e.current().len(), 1);
        assert!(e.canvas().is_blank());
        assert!(e.has_content());
    }

    #[test]
    fn second_point_paints_lead_in() {
        let mut e = engine();
        e.add_point(0.2, 0.2, true);
        e.add_point(0.6, 0.2, true);
        assert!(!e.canvas().is_blank());
        // Lead-in stops at the midpoint: the far end is still untouched.
        assert_eq!(e.canvas().pixel(55, 20), Some(Canvas::BLANK));
    }

    #[test]
    fn pen_up_seals_stroke() {
        let mut e = engine();
        draw(&mut e, &[(10.0, 10.0), (20.0, 12.0), (35.0, 30.0)]);
        assert!(!e.is_drawing());
        assert_eq!(e.stroke_count(), 1);
        assert_eq!(e.strokes()[0].len(), 3);
        assert!(e.current().is_empty());
    }

    #[test]
    fn idle_samples_are_noops() {
        let mut e = engine();
        e.add_point(0.5, 0.5, false);
        e.add_point(0.6, 0.5, false);
        assert_eq!(e.stroke_count(), 0);
        assert!(!e.has_content());
        assert!(e.canvas().is_blank());
    }

    #[test]
    fn single_point_stroke_renders_nothing() {
        let mut e = engine();
        draw(&mut e, &[(50.0, 50.0)]);
        assert_eq!(e.stroke_count(), 1);
        assert!(e.canvas().is_blank());
        assert!(!e.export_svg().contains("<path"));
    }

    #[test]
    fn redraw_matches_incremental() {
        let mut e = engine();
        draw(&mut e, &[(10.0, 10.0), (20.0, 12.0), (35.0, 30.0), (50.0, 45.0)]);
        draw(&mut e, &[(60.0, 20.0), (70.0, 25.0)]);
        let incremental = e.canvas().clone();
        e.redraw();
        assert_eq!(e.canvas(), &incremental);
    }

    #[test]
    fn redraw_keeps_open_stroke() {
        let mut e = engine();
        for &(x, y) in &[(0.1, 0.1), (0.3, 0.2), (0.5, 0.5)] {
            e.add_point(x, y, true);
        }
        let before = e.canvas().clone();
        e.redraw();
        assert_eq!(e.canvas(), &before);
        assert!(e.is_drawing());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut e = engine();
        e.clear();
        assert!(!e.has_content());
        draw(&mut e, &[(10.0, 10.0), (40.0, 40.0)]);
        e.clear();
        e.clear();
        assert!(!e.has_content());
        assert!(e.canvas().is_blank());
        assert_eq!(e.stroke_count(), 0);
    }

    #[test]
    fn clear_mid_stroke_restarts_cleanly() {
        let mut e = engine();
        e.add_point(0.1, 0.1, true);
        e.add_point(0.2, 0.2, true);
        e.clear();
        assert!(!e.is_drawing());
        e.add_point(0.5, 0.5, true);
        assert_eq!(e.current().len(), 1);
    }

    #[test]
    fn zero_area_surface_ignores_points() {
        let mut e = InkEngine::new(0, 0, InkStyle::default());
        e.add_point(0.5, 0.5, true);
        e.add_point(0.6, 0.6, true);
        e.add_point(0.6, 0.6, false);
        assert!(!e.has_content());
        assert_eq!(e.export_data_url(ExportFormat::Png), None);
    }

    #[test]
    fn resize_rescales_existing_strokes() {
        let mut e = engine();
        draw(&mut e, &[(10.0, 50.0), (50.0, 50.0), (90.0, 50.0)]);
        e.resize(200, 100);
        assert_eq!(e.canvas().width(), 200);
        // The horizontal stroke now spans x = 20..180 at y = 50.
        assert!(e.canvas().pixel(170, 50).map_or(false, |p| p != Canvas::BLANK));
        assert_eq!(e.canvas().pixel(195, 50), Some(Canvas::BLANK));

        let mut fresh = InkEngine::with_mode(200, 100, InkStyle::default(), SmoothingMode::External);
        fresh.strokes = e.strokes.clone();
        fresh.redraw();
        assert_eq!(fresh.canvas(), e.canvas());
    }

    #[test]
    fn builtin_smoothing_blends_toward_raw() {
        let mut e = InkEngine::new(100, 100, InkStyle::default());
        e.add_point(0.0, 0.0, true);
        e.add_point(1.0, 0.0, true);
        let p = e.current()[1];
        assert!((p.x - 0.3).abs() < 1e-6);
        e.end_stroke();
        // Smoothing restarts with the next stroke.
        e.add_point(0.8, 0.8, true);
        assert_eq!(e.current()[0], InkPoint::new(0.8, 0.8));
    }

    #[test]
    fn style_change_repaints_in_new_colour() {
        let mut e = engine();
        draw(&mut e, &[(10.0, 10.0), (90.0, 90.0)]);
        let red = crate::color::Rgba::rgb(0xFF, 0, 0);
        e.set_style(InkStyle { stroke_color: red, ..InkStyle::default() });
        let painted: Vec<u32> = e.canvas().pixels().iter().copied()
            .filter(|&p| p != Canvas::BLANK)
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&p| p == red.to_argb()));
    }

    #[test]
    fn data_urls() {
        let mut e = engine();
        draw(&mut e, &[(10.0, 10.0), (90.0, 90.0)]);
        let svg = e.export_data_url(ExportFormat::Svg).unwrap();
        assert!(svg.starts_with("data:image/svg+xml;base64,"));
        let png = e.export_data_url(ExportFormat::Png).unwrap();
        assert!(png.starts_with("data:image/png;base64,"));
    }
}
