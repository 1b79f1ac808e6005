// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run an action when a gesture completes.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use core::time::Duration;
//! use understory_gesture::{Gesture, GestureExt, PointerEvent, TapGesture};
//!
//! let taps = Cell::new(0);
//! let mut gesture = TapGesture::default().on_ended(|_| taps.set(taps.get() + 1));
//!
//! gesture.handle_event(&PointerEvent::down((0.0, 0.0), Duration::ZERO)).unwrap();
//! gesture.handle_event(&PointerEvent::up((0.0, 0.0), Duration::from_millis(50))).unwrap();
//! assert_eq!(taps.get(), 1);
//! ```

use core::fmt;
use core::time::Duration;

use crate::{Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent};

/// Wraps a gesture and calls an action with its final value on completion.
///
/// The action is edge-triggered: it runs once per step that enters
/// [`GesturePhase::Completed`], never while the gesture rests there. Failed
/// and cancelled interactions never run it.
pub struct OnEnded<G, F> {
    gesture: G,
    action: F,
}

impl<G, F> OnEnded<G, F>
where
    G: Gesture,
    F: FnMut(&G::Value),
{
    /// Wraps `gesture`. See [`GestureExt::on_ended`](crate::GestureExt::on_ended).
    pub fn new(gesture: G, action: F) -> Self {
        Self { gesture, action }
    }

    /// The wrapped gesture.
    pub fn inner(&self) -> &G {
        &self.gesture
    }

    fn after(&mut self, change: PhaseChange) -> PhaseChange {
        if change.entered(GesturePhase::Completed) {
            (self.action)(self.gesture.value());
        }
        change
    }
}

impl<G, F> Gesture for OnEnded<G, F>
where
    G: Gesture,
    F: FnMut(&G::Value),
{
    type Value = G::Value;

    fn gesture_value(&self) -> &GestureValue<G::Value> {
        self.gesture.gesture_value()
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        let change = self.gesture.handle_event(event)?;
        Ok(self.after(change))
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        let change = self.gesture.poll(now)?;
        Ok(self.after(change))
    }

    fn reset(&mut self) {
        self.gesture.reset();
    }

    fn fail(&mut self) -> PhaseChange {
        self.gesture.fail()
    }
}

impl<G: fmt::Debug, F> fmt::Debug for OnEnded<G, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnEnded")
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}
