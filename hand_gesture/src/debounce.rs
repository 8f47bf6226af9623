//! Dwell-time debouncing of raw per-frame gestures.
//!
//! A raw gesture must repeat for its dwell time before it becomes the active
//! gesture.  While a candidate is still dwelling the effective gesture is
//! forced to `idle`, so the ink never starts on a half-confirmed pose.
//! Action gestures additionally fire a one-shot [`GestureAction`], rate
//! limited by a cooldown.

use tracing::{debug, info};

use crate::classify::{Gesture, GestureAction};
use crate::config::GestureConfig;

/// Result of feeding one raw gesture through the debouncer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceOutcome {
    /// The gesture the rest of the pipeline should act on this frame.
    pub effective: Gesture,
    /// Set on the frame an action fires.
    pub fired:     Option<GestureAction>,
}

/// The debounce state machine.
#[derive(Clone, Debug)]
pub struct GestureDebouncer {
    config:         GestureConfig,
    pending:        Gesture,
    pending_since:  f64,
    active:         Gesture,
    last_action_at: Option<f64>,
}

impl GestureDebouncer {
    pub fn new(config: GestureConfig) -> Self {
        GestureDebouncer {
            config,
            pending:        Gesture::Idle,
            pending_since:  0.0,
            active:         Gesture::Idle,
            last_action_at: None,
        }
    }

    pub fn active(&self) -> Gesture { self.active }
    pub fn pending(&self) -> Gesture { self.pending }
    pub fn last_action_at(&self) -> Option<f64> { self.last_action_at }

    /// Feed this frame's raw gesture observed at `now_ms`.
    pub fn update(&mut self, raw: Gesture, now_ms: f64) -> DebounceOutcome {
        let effective = if raw != self.pending {
            self.pending       = raw;
            self.pending_since = now_ms;
            self.active
        } else if raw != self.active {
            let elapsed = now_ms - self.pending_since;
            if elapsed >= raw.dwell_ms(&self.config) {
                debug!(from = %self.active, to = %raw, elapsed_ms = elapsed, "gesture promoted");
                self.active = raw;
                raw
            } else {
                Gesture::Idle
            }
        } else {
            self.active
        };

        // Only a confirmed pose fires: the frame that breaks a held action
        // still reports the old effective gesture but must not act on it.
        let fired = if raw == effective { self.try_fire(effective, now_ms) } else { None };
        DebounceOutcome { effective, fired }
    }

    fn try_fire(&mut self, effective: Gesture, now_ms: f64) -> Option<GestureAction> {
        let action = effective.action()?;
        if let Some(last) = self.last_action_at {
            if now_ms - last <= self.config.action_cooldown_ms {
                return None;
            }
        }
        self.last_action_at = Some(now_ms);
        info!(action = %action, at_ms = now_ms, "gesture action fired");
        Some(action)
    }

    /// Hand lost: drop straight back to `idle` with no dwell.
    ///
    /// The action cooldown survives, so briefly leaving the frame does not
    /// re-arm a save.
    pub fn reset(&mut self) {
        self.pending = Gesture::Idle;
        self.active  = Gesture::Idle;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer() -> GestureDebouncer {
        GestureDebouncer::new(GestureConfig::default())
    }

    /// Feed `raw` every `step` ms over `[from, to)`; collect fired actions.
    fn run(d: &mut GestureDebouncer, raw: Gesture, from: f64, to: f64, step: f64)
        -> Vec<(f64, GestureAction)>
    {
        let mut fired = Vec::new();
        let mut t = from;
        while t < to {
            if let Some(a) = d.update(raw, t).fired { fired.push((t, a)); }
            t += step;
        }
        fired
    }

    #[test]
    fn first_change_keeps_previous_effective() {
        let mut d = debouncer();
        let out = d.update(Gesture::Drawing, 0.0);
        assert_eq!(out.effective, Gesture::Idle);
        assert_eq!(d.pending(), Gesture::Drawing);
        assert_eq!(d.active(), Gesture::Idle);
    }

    #[test]
    fn drawing_promotes_after_motion_dwell() {
        let mut d = debouncer();
        d.update(Gesture::Drawing, 0.0);
        assert_eq!(d.update(Gesture::Drawing, 33.0).effective, Gesture::Idle);
        assert_eq!(d.update(Gesture::Drawing, 66.0).effective, Gesture::Drawing);
        assert_eq!(d.active(), Gesture::Drawing);
    }

    #[test]
    fn unconfirmed_candidate_is_forced_idle() {
        let mut d = debouncer();
        run(&mut d, Gesture::Drawing, 0.0, 200.0, 33.0);
        assert_eq!(d.active(), Gesture::Drawing);
        // Switching to save: first frame keeps drawing, then idle while dwelling.
        assert_eq!(d.update(Gesture::Save, 200.0).effective, Gesture::Drawing);
        assert_eq!(d.update(Gesture::Save, 233.0).effective, Gesture::Idle);
        assert_eq!(d.update(Gesture::Save, 900.0).effective, Gesture::Idle);
    }

    #[test]
    fn save_under_dwell_never_fires() {
        let mut d = debouncer();
        assert!(run(&mut d, Gesture::Save, 0.0, 999.5, 33.0).is_empty());
        assert!(d.update(Gesture::Save, 999.0).fired.is_none());
    }

    #[test]
    fn save_fires_once_at_dwell() {
        let mut d = debouncer();
        run(&mut d, Gesture::Save, 0.0, 999.5, 33.0);
        let out = d.update(Gesture::Save, 1000.0);
        assert_eq!(out.effective, Gesture::Save);
        assert_eq!(out.fired, Some(GestureAction::Save));
        assert!(d.update(Gesture::Save, 1033.0).fired.is_none());
    }

    #[test]
    fn held_save_rearms_after_cooldown() {
        let mut d = debouncer();
        let fired = run(&mut d, Gesture::Save, 0.0, 5000.0, 33.0);
        assert_eq!(fired.len(), 2);
        assert!(fired[1].0 - fired[0].0 > 2000.0);
    }

    #[test]
    fn leaving_save_as_cooldown_expires_does_not_fire() {
        let mut d = debouncer();
        let fired = run(&mut d, Gesture::Save, 0.0, 3003.0, 33.0);
        assert_eq!(fired.len(), 1);
        let first = fired[0].0;
        // Cooldown has run out, but the hand has already switched to drawing.
        let t = first + 2013.0;
        let out = d.update(Gesture::Drawing, t);
        assert_eq!(out.effective, Gesture::Save);
        assert!(out.fired.is_none());
        assert!(run(&mut d, Gesture::Drawing, t + 33.0, t + 500.0, 33.0).is_empty());
        assert_eq!(d.last_action_at(), Some(first));
    }

    #[test]
    fn three_seconds_of_save_fires_once() {
        let mut d = debouncer();
        let fired = run(&mut d, Gesture::Save, 0.0, 3000.0, 1000.0 / 30.0);
        assert_eq!(fired.len(), 1);
        assert!(fired[0].0 >= 1000.0 && fired[0].0 < 1100.0);
    }

    #[test]
    fn reset_drops_to_idle_but_keeps_cooldown() {
        let mut d = debouncer();
        run(&mut d, Gesture::Clear, 0.0, 1100.0, 33.0);
        assert_eq!(d.active(), Gesture::Clear);
        let fired_at = d.last_action_at();
        assert!(fired_at.is_some());

        d.reset();
        assert_eq!(d.active(), Gesture::Idle);
        assert_eq!(d.pending(), Gesture::Idle);
        assert_eq!(d.last_action_at(), fired_at);

        // Re-entering clear within the cooldown promotes but does not fire.
        let fired = run(&mut d, Gesture::Clear, 1200.0, 2300.0, 33.0);
        assert!(fired.is_empty());
        assert_eq!(d.active(), Gesture::Clear);
    }

    #[test]
    fn clear_fires_clear() {
        let mut d = debouncer();
        let fired = run(&mut d, Gesture::Clear, 0.0, 1500.0, 50.0);
        assert_eq!(fired, vec![(1000.0, GestureAction::Clear)]);
    }
}
