// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press recognition: hold still for a minimum duration.
//!
//! The value is `true` once the press has lasted [`LongPressConfig::minimum_duration`].
//! A move further than [`LongPressConfig::maximum_distance`] from the down
//! location fails the gesture; releasing early fails it too. A release is
//! judged on elapsed time alone.
//!
//! Without pointer movement nothing tells the recognizer that time has
//! passed, so hosts should call [`Gesture::poll`] from a timer if they want
//! the value to flip to `true` before the pointer is released.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{Gesture, GesturePhase, LongPressGesture, PointerEvent};
//!
//! let ms = Duration::from_millis;
//! let mut press = LongPressGesture::default();
//!
//! press.handle_event(&PointerEvent::down((10.0, 10.0), ms(0))).unwrap();
//! press.poll(ms(600)).unwrap();
//! assert_eq!(press.phase(), GesturePhase::Changed);
//! assert!(*press.value());
//!
//! press.handle_event(&PointerEvent::up((12.0, 11.0), ms(700))).unwrap();
//! assert_eq!(press.phase(), GesturePhase::Completed);
//! ```

use core::time::Duration;

use kurbo::Point;

use crate::error::{positive_distance, positive_duration};
use crate::{
    ConfigError, Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent,
    PointerEventKind, Transition,
};

/// Parameters for [`LongPressGesture`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LongPressConfig {
    /// How long the press must last. Defaults to 500 ms.
    pub minimum_duration: Duration,
    /// How far the pointer may wander from the down location. Defaults to 10.
    pub maximum_distance: f64,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            minimum_duration: Duration::from_millis(500),
            maximum_distance: 10.0,
        }
    }
}

impl LongPressConfig {
    /// Sets [`LongPressConfig::minimum_duration`].
    #[must_use]
    pub fn with_minimum_duration(mut self, duration: Duration) -> Self {
        self.minimum_duration = duration;
        self
    }

    /// Sets [`LongPressConfig::maximum_distance`].
    #[must_use]
    pub fn with_maximum_distance(mut self, distance: f64) -> Self {
        self.maximum_distance = distance;
        self
    }

    /// Rejects a zero duration and a non-positive distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_duration(self.minimum_duration, "minimum_duration")?;
        positive_distance(self.maximum_distance, "maximum_distance")
    }
}

/// Recognizes a press held in place. The value is "has been held long enough".
#[derive(Clone, Debug)]
pub struct LongPressGesture {
    config: LongPressConfig,
    state: GestureValue<bool>,
    start_time: Duration,
    start_location: Point,
}

impl Default for LongPressGesture {
    fn default() -> Self {
        Self::from_valid(LongPressConfig::default())
    }
}

impl LongPressGesture {
    /// Creates a recognizer, validating `config`.
    pub fn new(config: LongPressConfig) -> Result<Self, GestureError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: LongPressConfig) -> Self {
        Self {
            config,
            state: GestureValue::new(false),
            start_time: Duration::ZERO,
            start_location: Point::ORIGIN,
        }
    }

    /// The recognizer's parameters.
    #[must_use]
    pub fn config(&self) -> &LongPressConfig {
        &self.config
    }

    fn held_long_enough(&self, now: Duration) -> bool {
        now.saturating_sub(self.start_time) >= self.config.minimum_duration
    }

    fn wandered(&self, position: Point) -> bool {
        (position - self.start_location).hypot() > self.config.maximum_distance
    }

    fn transition(&self, event: &PointerEvent) -> Option<Transition<bool>> {
        use GesturePhase::{Began, Cancelled, Changed, Completed, Ended, Failed};

        let phase = self.state.phase;
        match event.kind {
            PointerEventKind::Down => Some(Transition::to(Began, false)),
            PointerEventKind::Move | PointerEventKind::Up | PointerEventKind::Cancel
                if !phase.is_active() =>
            {
                // Only a release needs a live press; the graph rejects it.
                (event.kind == PointerEventKind::Up).then(|| Transition::to(Ended, false))
            }
            PointerEventKind::Move => {
                if self.wandered(event.position) {
                    Some(Transition::through([Ended, Failed], false))
                } else if phase == Began && self.held_long_enough(event.timestamp) {
                    Some(Transition::to(Changed, true))
                } else {
                    None
                }
            }
            PointerEventKind::Up => {
                // Only moves are checked against the slop; the release position is not.
                if self.held_long_enough(event.timestamp) {
                    Some(Transition::through([Ended, Completed], true))
                } else {
                    Some(Transition::through([Ended, Failed], false))
                }
            }
            PointerEventKind::Cancel => Some(Transition::to(Cancelled, false)),
        }
    }
}

impl Gesture for LongPressGesture {
    type Value = bool;

    fn gesture_value(&self) -> &GestureValue<bool> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        let Some(transition) = self.transition(event) else {
            return Ok(PhaseChange::unchanged(self.state.phase));
        };
        let change = self.state.apply(transition)?;
        if event.is_down() {
            self.start_time = event.timestamp;
            self.start_location = event.position;
        }
        if change.entered(GesturePhase::Completed) {
            tracing::debug!("long press recognized");
        } else if change.entered(GesturePhase::Failed) {
            tracing::debug!(kind = ?event.kind, "long press rejected");
        }
        Ok(change)
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        if self.state.phase == GesturePhase::Began && self.held_long_enough(now) {
            return self
                .state
                .apply(Transition::to(GesturePhase::Changed, true));
        }
        Ok(PhaseChange::unchanged(self.state.phase))
    }

    fn reset(&mut self) {
        self.state.reset(false);
    }

    fn fail(&mut self) -> PhaseChange {
        let change = self.state.force_fail();
        self.state.value = false;
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GesturePhase::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn pressed_at_origin() -> LongPressGesture {
        let mut g = LongPressGesture::default();
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0)))
            .unwrap();
        g
    }

    #[test]
    fn down_begins_unrecognized() {
        let g = pressed_at_origin();
        assert_eq!(g.phase(), Began);
        assert!(!*g.value());
    }

    #[test]
    fn release_after_minimum_duration_completes() {
        let mut g = pressed_at_origin();
        let change = g.handle_event(&PointerEvent::up((3.0, 4.0), ms(500))).unwrap();
        assert!(change.entered(Ended));
        assert_eq!(g.phase(), Completed);
        assert!(*g.value());
    }

    #[test]
    fn release_position_is_not_checked_against_the_slop() {
        let mut g = pressed_at_origin();
        g.handle_event(&PointerEvent::up((50.0, 0.0), ms(600))).unwrap();
        assert_eq!(g.phase(), Completed);
        assert!(*g.value());
    }

    #[test]
    fn early_release_fails() {
        let mut g = pressed_at_origin();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(200))).unwrap();
        assert_eq!(g.phase(), Failed);
        assert!(!*g.value());
    }

    #[test]
    fn moving_too_far_fails() {
        let mut g = pressed_at_origin();
        // Distance 5 is fine.
        g.handle_event(&PointerEvent::moved((3.0, 4.0), ms(100)))
            .unwrap();
        assert_eq!(g.phase(), Began);
        // Distance 13 is not.
        let change = g
            .handle_event(&PointerEvent::moved((5.0, 12.0), ms(150)))
            .unwrap();
        assert_eq!(change.current, Failed);
        assert!(!change.entered(Completed));

        // Later events of the same interaction are rejected by the graph.
        assert!(g.handle_event(&PointerEvent::up((0.0, 0.0), ms(900))).is_err());
        assert_eq!(g.phase(), Failed);
    }

    #[test]
    fn moving_after_minimum_duration_reports_recognized() {
        let mut g = pressed_at_origin();
        let change = g
            .handle_event(&PointerEvent::moved((1.0, 0.0), ms(600)))
            .unwrap();
        assert_eq!(change.current, Changed);
        assert!(*g.value());

        let change = g
            .handle_event(&PointerEvent::moved((2.0, 0.0), ms(650)))
            .unwrap();
        assert!(!change.moved(), "stays in changed without a new value");
    }

    #[test]
    fn failing_after_recognition_still_possible() {
        let mut g = pressed_at_origin();
        g.poll(ms(600)).unwrap();
        g.handle_event(&PointerEvent::moved((30.0, 0.0), ms(700)))
            .unwrap();
        assert_eq!(g.phase(), Failed);
        assert!(!*g.value());
    }

    #[test]
    fn cancel_from_active_phase() {
        let mut g = pressed_at_origin();
        g.handle_event(&PointerEvent::cancel((0.0, 0.0), ms(10)))
            .unwrap();
        assert_eq!(g.phase(), Cancelled);
    }

    #[test]
    fn idle_events_other_than_up_are_ignored() {
        let mut g = LongPressGesture::default();
        assert!(!g.handle_event(&PointerEvent::moved((1.0, 1.0), ms(0))).unwrap().moved());
        assert!(!g.handle_event(&PointerEvent::cancel((1.0, 1.0), ms(0))).unwrap().moved());
        assert_eq!(
            g.handle_event(&PointerEvent::up((1.0, 1.0), ms(0))).unwrap_err(),
            GestureError::InvalidTransition { from: None, to: Ended }
        );
    }

    #[test]
    fn next_down_restarts_timer() {
        let mut g = pressed_at_origin();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(100))).unwrap();
        g.handle_event(&PointerEvent::down((50.0, 50.0), ms(1_000)))
            .unwrap();
        g.handle_event(&PointerEvent::up((50.0, 50.0), ms(1_400)))
            .unwrap();
        assert_eq!(g.phase(), Failed, "timer restarted at the second down");
    }

    #[test]
    fn config_rejects_non_positive_values() {
        let err = LongPressGesture::new(LongPressConfig::default().with_maximum_distance(0.0))
            .unwrap_err();
        assert_eq!(
            err,
            GestureError::Configuration(ConfigError::NonPositiveDistance {
                parameter: "maximum_distance"
            })
        );
        assert!(
            LongPressGesture::new(
                LongPressConfig::default().with_minimum_duration(Duration::ZERO)
            )
            .is_err()
        );
    }
}
