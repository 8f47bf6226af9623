//! # ink_engine
//!
//! Turns a stream of `(x, y, pen_down)` samples into smooth ink on a
//! software raster, keeps the strokes so the drawing can be replayed
//! exactly, and exports the result as PNG or SVG.
//!
//! Curves are drawn "through midpoints with control at vertices": each new
//! sample adds one quadratic from the midpoint of the previous pair to the
//! midpoint of the newest pair.  See [`path`] for the decomposition.
//!
//! ## Quick start
//!
//! ```rust
//! use ink_engine::{ExportFormat, InkEngine, InkStyle};
//!
//! let mut ink = InkEngine::new(400, 200, InkStyle::default());
//! for &(x, y) in &[(0.1, 0.5), (0.3, 0.4), (0.5, 0.6), (0.7, 0.5)] {
//!     ink.add_point(x, y, true);
//! }
//! ink.add_point(0.0, 0.0, false); // pen up seals the stroke
//!
//! assert_eq!(ink.stroke_count(), 1);
//! let url = ink.export_data_url(ExportFormat::Svg).unwrap();
//! assert!(url.starts_with("data:image/svg+xml;base64,"));
//! ```

pub mod error;
pub mod color;
pub mod style;
pub mod path;
pub mod canvas;
pub mod stroke;
pub mod export;
pub mod engine;

pub use error::{InkError, Result};
pub use color::Rgba;
pub use style::{InkStyle, SmoothingMode};
pub use path::{InkPoint, PathSegment};
pub use canvas::Canvas;
pub use stroke::Stroke;
pub use export::ExportFormat;
pub use engine::InkEngine;
