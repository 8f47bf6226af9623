//! JSON-lines landmark recordings.
//!
//! One frame per line:
//!
//! ```text
//! {"t_ms": 0.0,  "landmarks": [[0.51, 0.80, 0.0], ... 21 triples ...]}
//! {"t_ms": 33.3, "landmarks": null}
//! ```
//!
//! `null` landmarks mean the detector saw no hand.  Blank lines and lines
//! starting with `#` are ignored.  Timestamps must not go backwards.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hand_gesture::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SkySignError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub t_ms:      f64,
    pub landmarks: Option<Vec<[f32; 3]>>,
}

impl RecordedFrame {
    pub fn new(t_ms: f64, points: Option<&[Point3]>) -> Self {
        RecordedFrame {
            t_ms,
            landmarks: points.map(|ps| ps.iter().map(|p| [p.x, p.y, p.z]).collect()),
        }
    }

    /// Landmarks as points.  Count and finiteness are checked later, by
    /// `LandmarkFrame::new`.
    pub fn points(&self) -> Option<Vec<Point3>> {
        self.landmarks
            .as_ref()
            .map(|ts| ts.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let rec = Self::parse(path, &text)?;
        debug!(path = %path.display(), frames = rec.len(), duration_ms = rec.duration_ms(), "recording loaded");
        Ok(rec)
    }

    /// Parse recording text.  `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let err = |line: usize, reason: String| SkySignError::Recording {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut frames: Vec<RecordedFrame> = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            let frame: RecordedFrame = serde_json::from_str(raw).map_err(|e| err(line, e.to_string()))?;
            if !frame.t_ms.is_finite() {
                return Err(err(line, "t_ms is not finite".into()));
            }
            if let Some(prev) = frames.last() {
                if frame.t_ms < prev.t_ms {
                    return Err(err(line, format!("t_ms {} goes backwards (previous {})", frame.t_ms, prev.t_ms)));
                }
            }
            frames.push(frame);
        }
        Ok(Recording { frames })
    }

    pub fn len(&self) -> usize { self.frames.len() }

    pub fn is_empty(&self) -> bool { self.frames.is_empty() }

    /// Time span from first to last frame.
    pub fn duration_ms(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(a), Some(b)) => b.t_ms - a.t_ms,
            _ => 0.0,
        }
    }
}

/// Appends frames to a JSON-lines file.
pub struct RecordingWriter {
    path:    PathBuf,
    out:     BufWriter<File>,
    written: usize,
}

impl RecordingWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(RecordingWriter { path: path.to_path_buf(), out: BufWriter::new(file), written: 0 })
    }

    pub fn write(&mut self, frame: &RecordedFrame) -> Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize { self.written }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        debug!(path = %self.path.display(), frames = self.written, "recording written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::LANDMARK_COUNT;

    fn p() -> &'static Path { Path::new("test.jsonl") }

    #[test]
    fn parses_frames_and_no_hand() {
        let hand = vec![[0.5_f32, 0.5, 0.0]; LANDMARK_COUNT];
        let text = format!(
            "# header\n{}\n\n{{\"t_ms\": 33.3, \"landmarks\": null}}\n",
            serde_json::to_string(&RecordedFrame { t_ms: 0.0, landmarks: Some(hand) }).unwrap(),
        );
        let rec = Recording::parse(p(), &text).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.frames[0].points().unwrap().len(), LANDMARK_COUNT);
        assert!(rec.frames[1].points().is_none());
        assert!((rec.duration_ms() - 33.3).abs() < 1e-9);
    }

    #[test]
    fn bad_json_reports_line() {
        let err = Recording::parse(p(), "{\"t_ms\": 0, \"landmarks\": null}\nnot json\n").unwrap_err();
        match err {
            SkySignError::Recording { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn backwards_time_rejected() {
        let text = "{\"t_ms\": 10, \"landmarks\": null}\n{\"t_ms\": 5, \"landmarks\": null}\n";
        assert!(matches!(
            Recording::parse(p(), text),
            Err(SkySignError::Recording { line: 2, .. })
        ));
    }

    #[test]
    fn writer_output_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let mut w = RecordingWriter::create(&path).unwrap();
        let pts = [Point3::new(0.1, 0.2, 0.3); LANDMARK_COUNT];
        w.write(&RecordedFrame::new(0.0, Some(&pts))).unwrap();
        w.write(&RecordedFrame::new(33.0, None)).unwrap();
        assert_eq!(w.written(), 2);
        w.finish().unwrap();

        let rec = Recording::load(&path).unwrap();
        assert_eq!(rec.frames[0].points().unwrap()[0], Point3::new(0.1, 0.2, 0.3));
        assert_eq!(rec.frames[1], RecordedFrame::new(33.0, None));
    }
}
