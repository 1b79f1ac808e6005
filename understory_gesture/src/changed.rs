// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run an action whenever a gesture reports a new in-progress value.

use core::fmt;
use core::time::Duration;

use crate::{Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent};

/// Wraps a gesture and calls an action each time it lands in
/// [`GesturePhase::Changed`] with a value it has not just reported.
///
/// Entering `Changed` from another phase always fires. Staying in `Changed`
/// fires only if the value differs from the value before the step.
pub struct OnChanged<G, F> {
    gesture: G,
    action: F,
}

impl<G, F> OnChanged<G, F>
where
    G: Gesture,
    G::Value: PartialEq + Clone,
    F: FnMut(&G::Value),
{
    /// Wraps `gesture`. See [`GestureExt::on_changed`](crate::GestureExt::on_changed).
    pub fn new(gesture: G, action: F) -> Self {
        Self { gesture, action }
    }

    /// The wrapped gesture.
    pub fn inner(&self) -> &G {
        &self.gesture
    }

    fn step(
        &mut self,
        run: impl FnOnce(&mut G) -> Result<PhaseChange, GestureError>,
    ) -> Result<PhaseChange, GestureError> {
        let before = self.gesture.value().clone();
        let change = run(&mut self.gesture)?;
        if change.current == GesturePhase::Changed
            && (change.previous != GesturePhase::Changed || *self.gesture.value() != before)
        {
            (self.action)(self.gesture.value());
        }
        Ok(change)
    }
}

impl<G, F> Gesture for OnChanged<G, F>
where
    G: Gesture,
    G::Value: PartialEq + Clone,
    F: FnMut(&G::Value),
{
    type Value = G::Value;

    fn gesture_value(&self) -> &GestureValue<G::Value> {
        self.gesture.gesture_value()
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        self.step(|g| g.handle_event(event))
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        self.step(|g| g.poll(now))
    }

    fn reset(&mut self) {
        self.gesture.reset();
    }

    fn fail(&mut self) -> PhaseChange {
        self.gesture.fail()
    }
}

impl<G: fmt::Debug, F> fmt::Debug for OnChanged<G, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnChanged")
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}
