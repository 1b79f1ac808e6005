// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag recognition: translation from a start location.
//!
//! ## Usage
//!
//! 1) A down records the start location and moves to `Began`; translation stays zero.
//! 2) Moves recompute `translation = location - start_location`. The gesture
//!    becomes active (`Changed`) once the translation reaches
//!    [`DragConfig::minimum_distance`]; smaller movements are not reported.
//! 3) An up completes an active drag and fails one that never became active.
//!
//! Predicted end values project the adapter's velocity estimate with a fixed
//! deceleration, see [`DragValue::project`].
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use understory_gesture::{DragConfig, DragGesture, Gesture, GesturePhase, PointerEvent};
//!
//! let mut drag = DragGesture::new(DragConfig::default().with_minimum_distance(5.0)).unwrap();
//!
//! drag.handle_event(&PointerEvent::down((0.0, 0.0), Duration::ZERO)).unwrap();
//! drag.handle_event(&PointerEvent::moved((20.0, 0.0), Duration::from_millis(16))).unwrap();
//!
//! assert_eq!(drag.phase(), GesturePhase::Changed);
//! assert_eq!(drag.value().translation, Vec2::new(20.0, 0.0));
//! ```

use kurbo::{Point, Vec2};

use crate::error::positive_distance;
use crate::{
    ConfigError, Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent,
    PointerEventKind, Transition,
};

/// Seconds of travel used to project velocity to a resting position.
///
/// This is a deceleration rate of 0.998 per millisecond integrated to rest:
/// `r / (1 - r) / 1000`.
pub const PROJECTION_SECONDS: f64 = 0.998 / (1.0 - 0.998) / 1000.0;

/// Parameters for [`DragGesture`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Translation needed before the drag is reported. Defaults to 10.
    pub minimum_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            minimum_distance: 10.0,
        }
    }
}

impl DragConfig {
    /// Sets [`DragConfig::minimum_distance`].
    #[must_use]
    pub fn with_minimum_distance(mut self, distance: f64) -> Self {
        self.minimum_distance = distance;
        self
    }

    /// Rejects a non-positive distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_distance(self.minimum_distance, "minimum_distance")
    }
}

/// What a drag currently measures.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragValue {
    /// Location of the down event.
    pub start_location: Point,
    /// Location of the latest event.
    pub location: Point,
    /// Where the pointer would come to rest if released now.
    pub predicted_end_location: Point,
    /// `location - start_location`.
    pub translation: Vec2,
    /// `predicted_end_location - start_location`.
    pub predicted_end_translation: Vec2,
}

impl DragValue {
    /// A value at rest at `location`.
    #[must_use]
    pub fn at_rest(location: Point) -> Self {
        Self {
            start_location: location,
            location,
            predicted_end_location: location,
            translation: Vec2::ZERO,
            predicted_end_translation: Vec2::ZERO,
        }
    }

    /// Derives every field from the start, the current location and a velocity.
    ///
    /// The prediction is `translation + velocity * PROJECTION_SECONDS`; the
    /// same inputs always produce the same value.
    #[must_use]
    pub fn project(start_location: Point, location: Point, velocity: Vec2) -> Self {
        let translation = location - start_location;
        let predicted_end_translation = translation + velocity * PROJECTION_SECONDS;
        Self {
            start_location,
            location,
            predicted_end_location: start_location + predicted_end_translation,
            translation,
            predicted_end_translation,
        }
    }
}

/// Start and last pointer positions of the press being tracked.
#[derive(Debug, Clone, Default, Copy)]
pub(crate) struct DragTracker {
    start_pos: Option<Point>,
    last_pos: Option<Point>,
}

impl DragTracker {
    fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Records `pos` if a press is being tracked.
    fn update(&mut self, pos: Point) {
        if self.start_pos.is_some() {
            self.last_pos = Some(pos);
        }
    }

    fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }
}

/// Recognizes a pointer moved at least [`DragConfig::minimum_distance`] while pressed.
#[derive(Clone, Debug)]
pub struct DragGesture {
    config: DragConfig,
    state: GestureValue<DragValue>,
    tracker: DragTracker,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::from_valid(DragConfig::default())
    }
}

impl DragGesture {
    /// Creates a recognizer, validating `config`.
    pub fn new(config: DragConfig) -> Result<Self, GestureError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: DragConfig) -> Self {
        Self {
            config,
            state: GestureValue::default(),
            tracker: DragTracker::default(),
        }
    }

    /// The recognizer's parameters.
    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// The tracker's last recorded position, including sub-threshold movement.
    #[must_use]
    pub fn last_location(&self) -> Option<Point> {
        self.tracker.last_pos
    }

    fn transition(&self, event: &PointerEvent) -> Option<Transition<DragValue>> {
        use GesturePhase::{Began, Cancelled, Changed, Completed, Ended, Failed};

        let phase = self.state.phase;
        let current = self.state.value;
        match event.kind {
            PointerEventKind::Down => Some(Transition::to(Began, DragValue::at_rest(event.position))),
            PointerEventKind::Up if !phase.is_active() => Some(Transition::to(Ended, current)),
            PointerEventKind::Move | PointerEventKind::Cancel if !phase.is_active() => None,
            PointerEventKind::Move => {
                let value =
                    DragValue::project(current.start_location, event.position, event.velocity);
                // Once active, every move is reported.
                (phase == Changed || value.translation.hypot() >= self.config.minimum_distance)
                    .then(|| Transition::to(Changed, value))
            }
            PointerEventKind::Up if phase == Changed => {
                let value =
                    DragValue::project(current.start_location, event.position, event.velocity);
                Some(Transition::through([Ended, Completed], value))
            }
            PointerEventKind::Up => Some(Transition::through([Ended, Failed], current)),
            PointerEventKind::Cancel => Some(Transition::to(Cancelled, current)),
        }
    }
}

impl Gesture for DragGesture {
    type Value = DragValue;

    fn gesture_value(&self) -> &GestureValue<DragValue> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        let transition = self.transition(event);
        if self.state.phase.is_active() && event.kind == PointerEventKind::Move {
            self.tracker.update(event.position);
        }
        let Some(transition) = transition else {
            return Ok(PhaseChange::unchanged(self.state.phase));
        };
        let change = self.state.apply(transition)?;
        match event.kind {
            PointerEventKind::Down => self.tracker.start(event.position),
            PointerEventKind::Up | PointerEventKind::Cancel => self.tracker.end(),
            PointerEventKind::Move => {}
        }
        if change.entered(GesturePhase::Changed) && change.previous == GesturePhase::Began {
            tracing::debug!(
                translation = ?self.state.value.translation,
                "drag passed minimum distance"
            );
        }
        Ok(change)
    }

    fn reset(&mut self) {
        self.state.reset(DragValue::default());
        self.tracker.end();
    }

    fn fail(&mut self) -> PhaseChange {
        self.tracker.end();
        self.state.force_fail()
    }
}
