// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition: one or more quick down/up pairs.
//!
//! ## Phases
//!
//! - The first down moves to `Began` with a count of zero.
//! - Each up that arrives within [`TapConfig::max_inter_tap_delay`] of its down
//!   increments the count. Reaching [`TapConfig::required_tap_count`] moves
//!   through `Ended` to `Completed`; otherwise the recognizer re-arms in
//!   `Changed` and waits for the next down.
//! - A press held longer than the delay cancels the attempt.
//! - A down arriving after the delay has elapsed since the last up abandons
//!   the pending sequence and starts counting again from this tap.
//! - Cancel resets the count and moves to `Cancelled`.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{Gesture, GesturePhase, PointerEvent, TapConfig, TapGesture};
//!
//! let ms = Duration::from_millis;
//! let mut double = TapGesture::new(TapConfig::default().with_required_tap_count(2)).unwrap();
//!
//! double.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! double.handle_event(&PointerEvent::up((0.0, 0.0), ms(80))).unwrap();
//! assert_eq!(double.phase(), GesturePhase::Changed);
//! assert_eq!(*double.value(), 1);
//!
//! double.handle_event(&PointerEvent::down((0.0, 0.0), ms(200))).unwrap();
//! double.handle_event(&PointerEvent::up((0.0, 0.0), ms(260))).unwrap();
//! assert_eq!(double.phase(), GesturePhase::Completed);
//! assert_eq!(*double.value(), 2);
//! ```

use core::time::Duration;

use crate::error::positive_duration;
use crate::{
    ConfigError, Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent,
    PointerEventKind, Transition,
};

/// Parameters for [`TapGesture`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TapConfig {
    /// Taps needed to complete. Defaults to 1.
    pub required_tap_count: u32,
    /// Longest allowed press, and longest allowed gap between taps. Defaults to 300 ms.
    pub max_inter_tap_delay: Duration,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            required_tap_count: 1,
            max_inter_tap_delay: Duration::from_millis(300),
        }
    }
}

impl TapConfig {
    /// Sets [`TapConfig::required_tap_count`].
    #[must_use]
    pub fn with_required_tap_count(mut self, count: u32) -> Self {
        self.required_tap_count = count;
        self
    }

    /// Sets [`TapConfig::max_inter_tap_delay`].
    #[must_use]
    pub fn with_max_inter_tap_delay(mut self, delay: Duration) -> Self {
        self.max_inter_tap_delay = delay;
        self
    }

    /// Rejects a zero tap count or a zero delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required_tap_count == 0 {
            return Err(ConfigError::ZeroTapCount);
        }
        positive_duration(self.max_inter_tap_delay, "max_inter_tap_delay")
    }
}

/// Recognizes `required_tap_count` consecutive taps. The value is the tap count.
#[derive(Clone, Debug)]
pub struct TapGesture {
    config: TapConfig,
    state: GestureValue<u32>,
    pressed: bool,
    last_down: Duration,
    last_up: Option<Duration>,
}

impl Default for TapGesture {
    fn default() -> Self {
        Self::from_valid(TapConfig::default())
    }
}

impl TapGesture {
    /// Creates a recognizer, validating `config`.
    pub fn new(config: TapConfig) -> Result<Self, GestureError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Shorthand for a recognizer requiring `count` taps with the default delay.
    pub fn count(count: u32) -> Result<Self, GestureError> {
        Self::new(TapConfig::default().with_required_tap_count(count))
    }

    fn from_valid(config: TapConfig) -> Self {
        Self {
            config,
            state: GestureValue::new(0),
            pressed: false,
            last_down: Duration::ZERO,
            last_up: None,
        }
    }

    /// The recognizer's parameters.
    #[must_use]
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    fn transition(&self, event: &PointerEvent) -> Option<Transition<u32>> {
        use GesturePhase::{Began, Cancelled, Changed, Completed, Ended};

        let phase = self.state.phase;
        let count = self.state.value;
        let delay = self.config.max_inter_tap_delay;
        match event.kind {
            PointerEventKind::Down => {
                if phase.is_idle() {
                    return Some(Transition::to(Began, 0));
                }
                if phase == Changed && !self.pressed && self.gap_expired(event.timestamp) {
                    // Too slow for the pending sequence; this tap starts a new one.
                    return Some(Transition::through([Cancelled, Began], 0));
                }
                if phase == Changed && !self.pressed {
                    return Some(Transition::stay(count));
                }
                // A second down while pressed.
                Some(Transition::to(Began, count))
            }
            PointerEventKind::Up => {
                if phase.is_idle() {
                    return Some(Transition::to(Ended, count));
                }
                if !self.pressed {
                    // Stray release while re-armed between taps.
                    return None;
                }
                if event.timestamp.saturating_sub(self.last_down) > delay {
                    return Some(Transition::to(Cancelled, 0));
                }
                let count = count.saturating_add(1);
                if count >= self.config.required_tap_count {
                    Some(Transition::through([Ended, Completed], count))
                } else {
                    Some(Transition::to(Changed, count))
                }
            }
            PointerEventKind::Cancel if phase.is_active() => Some(Transition::to(Cancelled, 0)),
            PointerEventKind::Move | PointerEventKind::Cancel => None,
        }
    }

    fn gap_expired(&self, now: Duration) -> bool {
        self.last_up
            .is_some_and(|up| now.saturating_sub(up) > self.config.max_inter_tap_delay)
    }
}

impl Gesture for TapGesture {
    type Value = u32;

    fn gesture_value(&self) -> &GestureValue<u32> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        let Some(transition) = self.transition(event) else {
            return Ok(PhaseChange::unchanged(self.state.phase));
        };
        let change = self.state.apply(transition)?;
        match event.kind {
            PointerEventKind::Down => {
                self.pressed = true;
                self.last_down = event.timestamp;
            }
            PointerEventKind::Up => {
                self.pressed = false;
                self.last_up = Some(event.timestamp);
            }
            PointerEventKind::Cancel => {
                self.pressed = false;
                self.last_up = None;
            }
            PointerEventKind::Move => {}
        }
        if change.entered(GesturePhase::Completed) {
            tracing::debug!(taps = self.state.value, "tap recognized");
        }
        Ok(change)
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        if self.state.phase == GesturePhase::Changed && !self.pressed && self.gap_expired(now) {
            self.last_up = None;
            tracing::debug!(taps = self.state.value, "tap sequence expired");
            return self
                .state
                .apply(Transition::to(GesturePhase::Cancelled, 0));
        }
        Ok(PhaseChange::unchanged(self.state.phase))
    }

    fn reset(&mut self) {
        self.state.reset(0);
        self.pressed = false;
        self.last_up = None;
    }

    fn fail(&mut self) -> PhaseChange {
        self.pressed = false;
        self.last_up = None;
        self.state.force_fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GesturePhase::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn tap(g: &mut TapGesture, down: u64, up: u64) -> PhaseChange {
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(down)))
            .unwrap();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(up))).unwrap()
    }

    #[test]
    fn single_tap_completes() {
        let mut g = TapGesture::default();
        let change = g
            .handle_event(&PointerEvent::down((0.0, 0.0), ms(0)))
            .unwrap();
        assert_eq!(change.current, Began);
        let change = g.handle_event(&PointerEvent::up((0.0, 0.0), ms(50))).unwrap();
        assert!(change.entered(Ended), "completion passes through ended");
        assert_eq!(g.phase(), Completed);
        assert_eq!(*g.value(), 1);
    }

    #[test]
    fn required_count_within_window_completes() {
        for required in 1..=4 {
            let mut g = TapGesture::count(required).unwrap();
            let mut t = 0;
            for _ in 0..required {
                tap(&mut g, t, t + 100);
                t += 300;
            }
            assert_eq!(g.phase(), Completed, "{required} taps");
            assert_eq!(*g.value(), required);
        }
    }

    #[test]
    fn gap_beyond_delay_restarts_counting() {
        let mut g = TapGesture::count(2).unwrap();
        tap(&mut g, 0, 100);
        assert_eq!(*g.value(), 1);

        // 900 ms after the previous up: the pending sequence is abandoned.
        let change = g
            .handle_event(&PointerEvent::down((0.0, 0.0), ms(1_000)))
            .unwrap();
        assert!(change.entered(Cancelled));
        assert_eq!(change.current, Began);
        assert_eq!(*g.value(), 0);

        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(1_100))).unwrap();
        assert_eq!(g.phase(), Changed);
        assert_eq!(*g.value(), 1);

        tap(&mut g, 1_200, 1_300);
        assert_eq!(g.phase(), Completed);
        assert_eq!(*g.value(), 2);
    }

    #[test]
    fn press_longer_than_delay_cancels() {
        let mut g = TapGesture::default();
        let change = tap(&mut g, 0, 400);
        assert_eq!(change.current, Cancelled);
        assert_eq!(*g.value(), 0);
    }

    #[test]
    fn cancel_resets_count() {
        let mut g = TapGesture::count(3).unwrap();
        tap(&mut g, 0, 100);
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(200)))
            .unwrap();
        g.handle_event(&PointerEvent::cancel((0.0, 0.0), ms(210)))
            .unwrap();
        assert_eq!(g.phase(), Cancelled);
        assert_eq!(*g.value(), 0);

        // Cancel while idle is ignored.
        let change = g
            .handle_event(&PointerEvent::cancel((0.0, 0.0), ms(220)))
            .unwrap();
        assert!(!change.moved());
    }

    #[test]
    fn up_without_down_is_invalid() {
        let mut g = TapGesture::default();
        let err = g
            .handle_event(&PointerEvent::up((0.0, 0.0), ms(0)))
            .unwrap_err();
        assert_eq!(err, GestureError::InvalidTransition { from: None, to: Ended });
        assert_eq!(g.phase(), None);
    }

    #[test]
    fn second_down_while_pressed_is_invalid() {
        let mut g = TapGesture::default();
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0)))
            .unwrap();
        let err = g
            .handle_event(&PointerEvent::down((0.0, 0.0), ms(10)))
            .unwrap_err();
        assert_eq!(err, GestureError::InvalidTransition { from: Began, to: Began });
    }

    #[test]
    fn up_after_completion_is_invalid() {
        let mut g = TapGesture::default();
        tap(&mut g, 0, 10);
        assert!(g.handle_event(&PointerEvent::up((0.0, 0.0), ms(20))).is_err());
        assert_eq!(g.phase(), Completed);
    }

    #[test]
    fn moves_are_ignored() {
        let mut g = TapGesture::default();
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0)))
            .unwrap();
        let change = g
            .handle_event(&PointerEvent::moved((40.0, 0.0), ms(10)))
            .unwrap();
        assert!(!change.moved());
        assert_eq!(g.phase(), Began);
    }

    #[test]
    fn new_interaction_after_completion_restarts_count() {
        let mut g = TapGesture::default();
        tap(&mut g, 0, 10);
        let change = g
            .handle_event(&PointerEvent::down((0.0, 0.0), ms(1_000)))
            .unwrap();
        assert_eq!(change.previous, Completed);
        assert_eq!(change.current, Began);
        assert_eq!(*g.value(), 0);
    }

    #[test]
    fn poll_expires_pending_sequence() {
        let mut g = TapGesture::count(2).unwrap();
        tap(&mut g, 0, 100);
        assert!(!g.poll(ms(300)).unwrap().moved(), "still inside the window");
        let change = g.poll(ms(401)).unwrap();
        assert_eq!(change.current, Cancelled);
        assert_eq!(*g.value(), 0);
    }

    #[test]
    fn fail_and_reset() {
        let mut g = TapGesture::count(2).unwrap();
        tap(&mut g, 0, 100);
        assert!(g.fail().entered(Failed));
        g.reset();
        assert_eq!(g.gesture_value(), &GestureValue::new(0));
    }

    #[test]
    fn config_rejects_zero_values() {
        assert_eq!(
            TapGesture::count(0).unwrap_err(),
            GestureError::Configuration(ConfigError::ZeroTapCount)
        );
        let err = TapGesture::new(TapConfig::default().with_max_inter_tap_delay(Duration::ZERO))
            .unwrap_err();
        assert_eq!(
            err,
            GestureError::Configuration(ConfigError::NonPositiveDuration {
                parameter: "max_inter_tap_delay"
            })
        );
    }
}
