//! Synthetic 30 fps landmark streams through a full `TrackingSession`.

use std::sync::mpsc::{self, Receiver};

use hand_gesture::synth::{synthesize, HandPose};
use hand_gesture::{GestureAction, Point2, Point3, LANDMARK_COUNT};
use proptest::prelude::*;
use proptest::test_runner::Config;
use sky_sign::{ChannelObserver, LiveFlag, SessionEvent, SessionState, SkySignConfig, TrackingSession};

const FRAME_MS: f64 = 33.0;

fn session() -> (TrackingSession, Receiver<SessionEvent>, LiveFlag) {
    let (tx, rx) = mpsc::channel();
    let live = LiveFlag::new();
    let s = TrackingSession::new(&SkySignConfig::default(), Box::new(ChannelObserver::new(tx)), live.clone())
        .unwrap();
    (s, rx, live)
}

/// Hold `pose` at `at` for frames in `[from, to)`.
fn hold(s: &mut TrackingSession, pose: HandPose, at: Point2, from: f64, to: f64) -> f64 {
    let frame = synthesize(pose, at);
    let mut t = from;
    while t < to {
        s.process_frame(Some(&frame), t);
        t += FRAME_MS;
    }
    t
}

fn actions(rx: &Receiver<SessionEvent>) -> Vec<GestureAction> {
    rx.try_iter()
        .filter_map(|e| match e {
            SessionEvent::Gesture(a) => Some(a),
            _ => None,
        })
        .collect()
}

fn center() -> Point2 { Point2::new(0.5, 0.5) }

#[test]
fn save_held_under_a_second_does_not_fire() {
    let (mut s, rx, _) = session();
    hold(&mut s, HandPose::ThumbsUp, center(), 0.0, 999.0);
    s.process_frame(Some(&synthesize(HandPose::ThumbsUp, center())), 999.0);
    assert!(actions(&rx).is_empty());
    assert!(s.last_export().is_none());
}

#[test]
fn save_held_a_second_fires_once() {
    let (mut s, rx, _) = session();
    hold(&mut s, HandPose::ThumbsUp, center(), 0.0, 999.0);
    s.process_frame(Some(&synthesize(HandPose::ThumbsUp, center())), 1000.0);
    assert_eq!(actions(&rx), vec![GestureAction::Save]);
}

#[test]
fn three_seconds_of_save_fires_once() {
    let (mut s, rx, _) = session();
    hold(&mut s, HandPose::ThumbsUp, center(), 0.0, 3000.0);
    assert_eq!(actions(&rx), vec![GestureAction::Save]);
}

#[test]
fn five_seconds_of_save_fires_at_most_twice() {
    let (mut s, rx, _) = session();
    hold(&mut s, HandPose::ThumbsUp, center(), 0.0, 5000.0);
    assert_eq!(actions(&rx), vec![GestureAction::Save, GestureAction::Save]);
}

#[test]
fn draw_then_save_exports_the_stroke() {
    let (mut s, rx, _) = session();
    let mut t = 0.0;
    for i in 0..30 {
        let at = Point2::new(0.2 + i as f32 * 0.015, 0.5 + (i as f32 * 0.3).sin() * 0.05);
        s.process_frame(Some(&synthesize(HandPose::Point, at)), t);
        t += FRAME_MS;
    }
    assert!(s.ink().is_drawing());

    hold(&mut s, HandPose::ThumbsUp, Point2::new(0.6, 0.5), t, t + 1200.0);
    assert_eq!(s.ink().stroke_count(), 1);

    let export = s.last_export().expect("save should export");
    assert_eq!(export.strokes, 1);
    assert_eq!(export.svg.matches("<path").count(), 1);
    assert!(export.png.as_ref().is_some_and(|p| p.starts_with(b"\x89PNG")));
    assert!(export.svg_data_url().starts_with("data:image/svg+xml;base64,"));

    let exported = rx.try_iter().filter(|e| matches!(e, SessionEvent::Exported(_))).count();
    assert_eq!(exported, 1);
}

#[test]
fn losing_the_hand_seals_the_stroke() {
    let (mut s, _rx, _) = session();
    let t = hold(&mut s, HandPose::Point, Point2::new(0.4, 0.4), 0.0, 400.0);
    assert!(s.ink().is_drawing());
    let out = s.process_frame(None, t).unwrap();
    assert!(!out.hand_present);
    assert!(!s.ink().is_drawing());
    assert_eq!(s.ink().stroke_count(), 1);
}

#[test]
fn fingertip_at_the_edge_lifts_the_pen() {
    let (mut s, _rx, _) = session();
    let t = hold(&mut s, HandPose::Point, Point2::new(0.4, 0.4), 0.0, 400.0);
    assert!(s.ink().is_drawing());
    hold(&mut s, HandPose::Point, Point2::new(0.01, 0.4), t, t + 200.0);
    assert!(!s.ink().is_drawing());
}

#[test]
fn open_palm_clears_the_signature() {
    let (mut s, rx, _) = session();
    let t = hold(&mut s, HandPose::Point, Point2::new(0.3, 0.3), 0.0, 300.0);
    let t = hold(&mut s, HandPose::Point, Point2::new(0.5, 0.6), t, 600.0);
    let t = hold(&mut s, HandPose::Fist, center(), t, 700.0);
    assert!(s.ink().has_content());

    hold(&mut s, HandPose::OpenPalm, center(), t, t + 1100.0);
    assert!(!s.ink().has_content());
    assert!(s.ink().canvas().is_blank());
    assert_eq!(actions(&rx), vec![GestureAction::Clear]);
}

#[test]
fn positions_are_reported_every_hand_frame() {
    let (mut s, rx, _) = session();
    hold(&mut s, HandPose::Fist, center(), 0.0, 10.0 * FRAME_MS);
    s.process_frame(None, 400.0);
    let positions = rx.try_iter().filter(|e| matches!(e, SessionEvent::Position { .. })).count();
    assert_eq!(positions, 10);
}

#[test]
fn stopped_session_ignores_frames() {
    let (mut s, rx, live) = session();
    hold(&mut s, HandPose::Point, center(), 0.0, 200.0);
    s.stop();
    assert!(!live.is_live());
    assert_eq!(s.state(), &SessionState::Stopped);
    rx.try_iter().for_each(drop);

    let frames = s.frames();
    assert!(s.process_frame(Some(&synthesize(HandPose::ThumbsUp, center())), 5000.0).is_none());
    assert_eq!(s.frames(), frames);
    assert!(rx.try_iter().next().is_none());
}

#[test]
fn killing_the_flag_from_elsewhere_stops_processing() {
    let (mut s, _rx, live) = session();
    let other = live.clone();
    std::thread::spawn(move || other.kill()).join().unwrap();
    assert!(s.process_frame(None, 0.0).is_none());
}

#[test]
fn acquisition_failure_is_terminal() {
    let (mut s, _rx, live) = session();
    s.fail("camera permission denied");
    assert_eq!(s.state(), &SessionState::Failed("camera permission denied".into()));
    assert!(!live.is_live());
    assert!(s.process_frame(None, 0.0).is_none());
}

#[test]
fn malformed_frame_is_idle_and_harmless() {
    let (mut s, _rx, _) = session();
    let t = hold(&mut s, HandPose::Point, center(), 0.0, 300.0);
    assert!(s.ink().is_drawing());

    let mut bad = [Point3::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    bad[3] = Point3::new(f32::NAN, 0.5, 0.0);
    let out = s.process_points(Some(&bad), t).unwrap();
    assert!(!out.is_drawing());
    assert!(s.ink().is_drawing(), "a bad frame must not touch session state");
}

proptest! {
    #![proptest_config(Config::with_cases(48))]

    /// However poses are interleaved, actions never fire closer than the
    /// cooldown.
    #[test]
    fn actions_respect_cooldown(poses in prop::collection::vec(0u8..5, 1..60)) {
        let (tx, rx) = mpsc::channel();
        let mut s = TrackingSession::new(
            &SkySignConfig::default(), Box::new(ChannelObserver::actions_only(tx)), LiveFlag::new(),
        ).unwrap();

        let mut t = 0.0;
        let mut fired_at = Vec::new();
        for p in poses {
            // Each pose held ~0.5 s.
            for _ in 0..15 {
                let frame = match p {
                    0 => None,
                    1 => Some(synthesize(HandPose::Fist, center())),
                    2 => Some(synthesize(HandPose::Point, center())),
                    3 => Some(synthesize(HandPose::ThumbsUp, center())),
                    _ => Some(synthesize(HandPose::OpenPalm, center())),
                };
                s.process_frame(frame.as_ref(), t);
                if rx.try_iter().any(|e| matches!(e, SessionEvent::Gesture(_))) {
                    fired_at.push(t);
                }
                t += FRAME_MS;
            }
        }
        for w in fired_at.windows(2) {
            prop_assert!(w[1] - w[0] > 2000.0, "{:?}", fired_at);
        }
    }
}
