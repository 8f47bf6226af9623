//! PNG and SVG renderings of a signature, and `data:` URLs for both.
//!
//! The SVG path of a stroke spells out exactly the segments the canvas
//! paints (see [`crate::path`]), so the two exports are visually the same
//! drawing.

use std::fmt::Write as _;
use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbaImage};

use crate::canvas::Canvas;
use crate::error::{InkError, Result};
use crate::path::{stroke_segments, InkPoint, PathSegment};
use crate::stroke::Stroke;
use crate::style::InkStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(format: ExportFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.mime(),
        base64::engine::general_purpose::STANDARD.encode(bytes),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// PNG
// ════════════════════════════════════════════════════════════════════════════

pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    if canvas.is_zero_area() {
        return Err(InkError::EmptySurface);
    }
    let img = RgbaImage::from_raw(
        canvas.width() as u32,
        canvas.height() as u32,
        canvas.to_rgba_bytes(),
    )
    .ok_or(InkError::EmptySurface)?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

// ════════════════════════════════════════════════════════════════════════════
// SVG
// ════════════════════════════════════════════════════════════════════════════

/// Shortest decimal form with at most two fractional digits.
fn num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn push_point(d: &mut String, p: InkPoint) {
    let _ = write!(d, " {} {}", num(p.x), num(p.y));
}

/// `d` attribute for one stroke in pixel space; `None` below two points.
pub fn svg_path_data(points: &[InkPoint], width: f32, height: f32) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let mut d = String::from("M");
    if let [a, b] = points {
        // Both halves of the split line are collinear; draw it as one.
        push_point(&mut d, a.scaled(width, height));
        d.push_str(" L");
        push_point(&mut d, b.scaled(width, height));
        return Some(d);
    }

    let segs = stroke_segments(points);
    let first = segs.first()?.start().scaled(width, height);
    push_point(&mut d, first);
    for seg in segs.iter().map(|s| s.scaled(width, height)) {
        match seg {
            PathSegment::Line { to, .. } => {
                d.push_str(" L");
                push_point(&mut d, to);
            }
            PathSegment::Quad { ctrl, to, .. } => {
                d.push_str(" Q");
                push_point(&mut d, ctrl);
                push_point(&mut d, to);
            }
        }
    }
    Some(d)
}

/// A standalone SVG document with one `<path>` per drawable stroke.
pub fn svg_document(strokes: &[Stroke], width: usize, height: usize, style: &InkStyle) -> String {
    let (w, h) = (width as f32, height as f32);
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
    );

    let opacity = if style.stroke_color.a == 0xFF {
        String::new()
    } else {
        format!(r#" stroke-opacity="{}""#, num(style.stroke_color.opacity()))
    };

    for d in strokes.iter().filter_map(|s| svg_path_data(s.points(), w, h)) {
        let _ = write!(
            svg,
            r#"<path d="{d}" stroke="{}" stroke-width="{}"{opacity} fill="none" stroke-linecap="round" stroke-linejoin="round"/>"#,
            style.stroke_color.to_css(),
            num(style.stroke_width),
        );
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f32, f32)]) -> Vec<InkPoint> {
        v.iter().map(|&(x, y)| InkPoint::new(x, y)).collect()
    }

    #[test]
    fn number_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(1.23456), "1.23");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(0.0), "0");
    }

    #[test]
    fn single_point_yields_no_path() {
        assert_eq!(svg_path_data(&pts(&[(0.5, 0.5)]), 100.0, 100.0), None);
    }

    #[test]
    fn two_point_path() {
        let d = svg_path_data(&pts(&[(0.1, 0.1), (0.5, 0.1)]), 100.0, 100.0).unwrap();
        assert_eq!(d, "M 10 10 L 50 10");
    }

    #[test]
    fn three_point_path_mirrors_canvas_segments() {
        let d = svg_path_data(&pts(&[(0.0, 0.0), (0.1, 0.1), (0.2, 0.0)]), 100.0, 100.0).unwrap();
        assert_eq!(d, "M 0 0 L 5 5 Q 10 10 15 5 L 20 0");
    }

    #[test]
    fn document_skips_degenerate_strokes() {
        let strokes = vec![
            Stroke::new(pts(&[(0.5, 0.5)])),
            Stroke::new(pts(&[(0.1, 0.1), (0.2, 0.2), (0.3, 0.1)])),
        ];
        let svg = svg_document(&strokes, 200, 100, &InkStyle::default());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\""));
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r##"stroke="#ffffff" stroke-width="3""##));
        assert!(!svg.contains("stroke-opacity"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn data_url_prefix() {
        assert_eq!(data_url(ExportFormat::Svg, b"<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
        assert!(data_url(ExportFormat::Png, &[1, 2, 3]).starts_with("data:image/png;base64,"));
    }

    #[test]
    fn png_of_zero_area_is_an_error() {
        assert!(matches!(encode_png(&Canvas::new(0, 0)), Err(InkError::EmptySurface)));
    }

    #[test]
    fn png_decodes_back_to_canvas_pixels() {
        let mut c = Canvas::new(4, 3);
        c.stroke_line(InkPoint::new(0.0, 1.5), InkPoint::new(4.0, 1.5), 0xFF_10_20_30, 1.0);
        let bytes = encode_png(&c).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 3));
        assert_eq!(back.get_pixel(2, 1).0, [0x10, 0x20, 0x30, 0xFF]);
        assert_eq!(back.get_pixel(2, 0).0[3], 0);
    }
}
