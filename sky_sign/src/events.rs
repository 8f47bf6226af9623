//! Outbound notifications from a tracking session.
//!
//! The session calls a [`SessionObserver`]; [`ChannelObserver`] turns those
//! calls into [`SessionEvent`]s on an `mpsc` channel, so consumers don't need
//! to share state with the frame loop.

use std::sync::mpsc::Sender;

use hand_gesture::GestureAction;
use ink_engine::export::{data_url, ExportFormat};

/// A signature captured by a `save` gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureExport {
    pub svg:     String,
    /// `None` when PNG encoding failed; the SVG is still usable.
    pub png:     Option<Vec<u8>>,
    pub strokes: usize,
}

impl SignatureExport {
    pub fn svg_data_url(&self) -> String {
        data_url(ExportFormat::Svg, self.svg.as_bytes())
    }

    pub fn png_data_url(&self) -> Option<String> {
        self.png.as_deref().map(|b| data_url(ExportFormat::Png, b))
    }
}

/// Injected callbacks.
pub trait SessionObserver: Send {
    /// Every frame a hand is present.
    fn on_position_update(&mut self, x: f32, y: f32, drawing: bool);

    /// Once per debounced, rate-limited action.
    fn on_gesture(&mut self, action: GestureAction);

    /// After a `save` produced an export.
    fn on_export(&mut self, _export: &SignatureExport) {}
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_position_update(&mut self, _x: f32, _y: f32, _drawing: bool) {}
    fn on_gesture(&mut self, _action: GestureAction) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Position { x: f32, y: f32, drawing: bool },
    Gesture(GestureAction),
    Exported(SignatureExport),
}

/// Publishes [`SessionEvent`]s.  A dropped receiver is not an error.
pub struct ChannelObserver {
    tx:        Sender<SessionEvent>,
    positions: bool,
}

impl ChannelObserver {
    pub fn new(tx: Sender<SessionEvent>) -> Self {
        ChannelObserver { tx, positions: true }
    }

    /// Skip the per-frame position events.
    pub fn actions_only(tx: Sender<SessionEvent>) -> Self {
        ChannelObserver { tx, positions: false }
    }
}

impl SessionObserver for ChannelObserver {
    fn on_position_update(&mut self, x: f32, y: f32, drawing: bool) {
        if self.positions {
            let _ = self.tx.send(SessionEvent::Position { x, y, drawing });
        }
    }

    fn on_gesture(&mut self, action: GestureAction) {
        let _ = self.tx.send(SessionEvent::Gesture(action));
    }

    fn on_export(&mut self, export: &SignatureExport) {
        let _ = self.tx.send(SessionEvent::Exported(export.clone()));
    }
}
