//! Software-rendered preview window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                                              │
//! │   ink canvas (canvas.width × canvas.height)  │
//! │                 ◎ cursor                     │
//! │                                              │
//! ├──────────────────────────────────────────────┤
//! │  status bar                                  │
//! │  key legend                                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! In simulation mode the window is also the input device: the mouse is the
//! index fingertip and held keys choose the hand pose.

use std::sync::mpsc::Sender;

use hand_gesture::synth::HandPose;
use hand_gesture::{Gesture, Point2};
use ink_engine::Canvas;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::error::{Result, SkySignError};
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:     usize = 36;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const TEXT_BG:      u32   = 0xFF0F3460;
const TEXT_COLOR:   u32   = 0xFFEEEEEE;
const LEGEND_COLOR: u32   = 0xFF888888;
const CURSOR_R:     usize = 6;

fn gesture_color(g: Gesture) -> u32 {
    match g {
        Gesture::Idle    => 0xFF9E9E9E,
        Gesture::Drawing => 0xFF66BB6A,
        Gesture::Save    => 0xFFFFD700,  // gold
        Gesture::Clear   => 0xFFEF5350,
    }
}

/// What the window shows besides the ink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub at:      Point2,
    pub gesture: Gesture,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:    Window,
    buf:       Vec<u32>,
    width:     usize,
    height:    usize,
    canvas_h:  usize,
    sim_tx:    Option<Sender<SimInput>>,
    last_ptr:  Option<(f32, f32)>,
    last_pose: Option<Option<HandPose>>,
}

impl Visualizer {
    /// `sim_tx` is `Some` when the window drives the simulated hand.
    pub fn new(canvas_w: usize, canvas_h: usize, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let (width, height) = (canvas_w, canvas_h + STATUS_H);
        let mut window = Window::new(
            "SkySign — gesture signature",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| SkySignError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            canvas_h,
            sim_tx,
            last_ptr: None,
            last_pose: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keys.  In simulation mode, forward them as [`SimInput`].
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let quit = self.window.is_key_pressed(Key::Q, KeyRepeat::No)
                || self.window.is_key_pressed(Key::Escape, KeyRepeat::No);
        if quit {
            self.send(SimInput::Quit);
            return false;
        }
        if self.sim_tx.is_none() { return true; }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let p = (mx / self.width as f32, my / self.canvas_h as f32);
            if self.last_ptr != Some(p) {
                self.last_ptr = Some(p);
                self.send(SimInput::Pointer { x: p.0, y: p.1 });
            }
        }

        let down = |k: Key| self.window.is_key_down(k);
        let pose = pose_for_keys(down(Key::H), down(Key::D), down(Key::S), down(Key::C));
        if self.last_pose != Some(pose) {
            self.last_pose = Some(pose);
            self.send(SimInput::Pose(pose));
        }
        true
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(&mut self, ink: &Canvas, cursor: Option<Cursor>, status: &str) {
        // ── Ink over background ───────────────────────────────────────────
        self.buf.fill(BG_COLOR);
        let w = ink.width().min(self.width);
        for y in 0..ink.height().min(self.canvas_h) {
            for x in 0..w {
                if let Some(px) = ink.pixel(x, y) {
                    self.buf[y * self.width + x] = composite(px, BG_COLOR);
                }
            }
        }

        // ── Cursor ────────────────────────────────────────────────────────
        if let Some(c) = cursor {
            let cx = (c.at.x * self.width as f32) as isize;
            let cy = (c.at.y * self.canvas_h as f32) as isize;
            self.draw_ring(cx, cy, CURSOR_R, gesture_color(c.gesture));
        }

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = self.canvas_h;
        self.fill_rect(0, status_y, self.width, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, status_y + 8, TEXT_COLOR);
        let legend = if self.sim_tx.is_some() {
            "mouse=finger  D=draw  S=save  C=clear  H=hide hand  Q=quit"
        } else {
            "Q=quit"
        };
        self.draw_label(legend, 10, status_y + 22, LEGEND_COLOR);

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.height) {
            for col in x..(x+w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.canvas_h {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn draw_ring(&mut self, cx: isize, cy: isize, r: usize, color: u32) {
        let r = r as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && d2 >= (r - 2) * (r - 2) {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
        self.set_pixel(cx, cy, color);
    }

    /// Minimal bitmap font, 3×5 characters.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    let (px, py) = (cx + col, y + row);
                    if bits & (1 << (2 - col)) != 0 && px < self.width && py < self.height {
                        self.buf[py * self.width + px] = color;
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width { break; }
        }
    }
}

/// Pose for the held keys.  Hiding wins, then draw, save, clear; nothing
/// held is a fist.
fn pose_for_keys(hide: bool, draw: bool, save: bool, clear: bool) -> Option<HandPose> {
    if hide       { None }
    else if draw  { Some(HandPose::Point) }
    else if save  { Some(HandPose::ThumbsUp) }
    else if clear { Some(HandPose::OpenPalm) }
    else          { Some(HandPose::Fist) }
}

/// Composite one ink pixel over an opaque background.
fn composite(ink: u32, bg: u32) -> u32 {
    let alpha = ink >> 24;
    match alpha {
        0    => bg,
        0xFF => ink,
        a    => blend(bg, ink | 0xFF000000, a as f32 / 255.0),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ink_shows_background() {
        assert_eq!(composite(Canvas::BLANK, BG_COLOR), BG_COLOR);
    }

    #[test]
    fn opaque_ink_replaces_background() {
        assert_eq!(composite(0xFFFFFFFF, BG_COLOR), 0xFFFFFFFF);
    }

    #[test]
    fn translucent_ink_blends() {
        let px = composite(0x80FFFFFF, 0xFF000000);
        let r = (px >> 16) & 0xFF;
        assert!((127..=129).contains(&r), "{px:08x}");
        assert_eq!(px >> 24, 0xFF);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFFF0E0D0, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFFF0E0D0, 1.0), 0xFFF0E0D0);
    }

    #[test]
    fn key_priority() {
        assert_eq!(pose_for_keys(false, false, false, false), Some(HandPose::Fist));
        assert_eq!(pose_for_keys(false, true,  true,  false), Some(HandPose::Point));
        assert_eq!(pose_for_keys(false, false, true,  true),  Some(HandPose::ThumbsUp));
        assert_eq!(pose_for_keys(false, false, false, true),  Some(HandPose::OpenPalm));
        assert_eq!(pose_for_keys(true,  true,  false, false), None);
    }

    #[test]
    fn every_status_character_has_a_glyph() {
        let fallback = char_glyph('~');
        for ch in "tracking saved cleared idle drawing strokes:0123456789".chars() {
            if ch != ' ' {
                assert_ne!(char_glyph(ch), fallback, "{ch}");
            }
        }
    }
}
