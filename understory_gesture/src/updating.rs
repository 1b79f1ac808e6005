// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mirror a gesture's in-progress value into shared, read-only state.
//!
//! A [`GestureState`] is a small shared cell: the gesture writes it while the
//! interaction is in progress, and any number of readers (typically the view
//! that renders pressed or dragged feedback) hold clones of the handle. When
//! the gesture reaches a terminal phase the state falls back to its initial
//! value.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{Gesture, GestureExt, GestureState, LongPressGesture, PointerEvent};
//!
//! let ms = Duration::from_millis;
//! let pressing = GestureState::new(false);
//! let mut press = LongPressGesture::default().updating(&pressing, |_| true);
//!
//! press.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! assert!(pressing.get());
//!
//! press.handle_event(&PointerEvent::up((0.0, 0.0), ms(600))).unwrap();
//! assert!(!pressing.get(), "back to the initial value once finished");
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use crate::{Gesture, GestureError, GestureValue, PhaseChange, PointerEvent};

struct Shared<S> {
    initial: S,
    current: RefCell<S>,
}

/// Transient state written by a gesture while it is in progress.
///
/// Cloning produces another handle to the same cell.
pub struct GestureState<S> {
    shared: Rc<Shared<S>>,
}

impl<S: Clone> GestureState<S> {
    /// Creates a state holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            shared: Rc::new(Shared {
                current: RefCell::new(initial.clone()),
                initial,
            }),
        }
    }

    /// A copy of the current value.
    #[must_use]
    pub fn get(&self) -> S {
        self.shared.current.borrow().clone()
    }

    /// The value the state returns to after each interaction.
    #[must_use]
    pub fn initial(&self) -> &S {
        &self.shared.initial
    }

    /// Restores the initial value.
    pub fn reset(&self) {
        self.set(self.shared.initial.clone());
    }

    pub(crate) fn set(&self, value: S) {
        *self.shared.current.borrow_mut() = value;
    }
}

impl<S> GestureState<S> {
    /// Calls `f` with a borrow of the current value.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.shared.current.borrow())
    }
}

impl<S> Clone for GestureState<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for GestureState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureState")
            .field("current", &self.shared.current)
            .field("initial", &self.shared.initial)
            .finish()
    }
}

/// Wraps a gesture and writes `transform(&value)` into a [`GestureState`]
/// after each step that lands in `Began` or `Changed`.
///
/// Entering a terminal phase, [`Gesture::reset`] and [`Gesture::fail`]
/// restore the state's initial value.
pub struct Updating<G, S, F> {
    gesture: G,
    state: GestureState<S>,
    transform: F,
}

impl<G, S, F> Updating<G, S, F>
where
    G: Gesture,
    S: Clone,
    F: FnMut(&G::Value) -> S,
{
    /// Wraps `gesture`. See [`GestureExt::updating`](crate::GestureExt::updating).
    pub fn new(gesture: G, state: GestureState<S>, transform: F) -> Self {
        Self {
            gesture,
            state,
            transform,
        }
    }

    /// The wrapped gesture.
    pub fn inner(&self) -> &G {
        &self.gesture
    }

    /// The state this wrapper writes.
    pub fn state(&self) -> &GestureState<S> {
        &self.state
    }

    fn after(&mut self, change: PhaseChange) -> PhaseChange {
        if change.current.is_active() && change.moved() {
            let value = (self.transform)(self.gesture.value());
            self.state.set(value);
        } else if change.finished() {
            self.state.reset();
        }
        change
    }
}

impl<G, S, F> Gesture for Updating<G, S, F>
where
    G: Gesture,
    S: Clone,
    F: FnMut(&G::Value) -> S,
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
        self.state.reset();
    }

    fn fail(&mut self) -> PhaseChange {
        let change = self.gesture.fail();
        self.state.reset();
        change
    }
}

impl<G: fmt::Debug, S: fmt::Debug, F> fmt::Debug for Updating<G, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updating")
            .field("gesture", &self.gesture)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DragGesture, GestureExt, GesturePhase, TapGesture};
    use kurbo::Vec2;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn clones_share_the_cell() {
        let a = GestureState::new(1_u8);
        let b = a.clone();
        a.set(7);
        assert_eq!(b.get(), 7);
        b.reset();
        assert_eq!(a.get(), 1);
        assert_eq!(a.with(|v| *v + 1), 2);
    }

    #[test]
    fn drag_translation_is_mirrored_while_active() {
        let offset = GestureState::new(Vec2::ZERO);
        let mut g = DragGesture::default().updating(&offset, |v| v.translation);

        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        assert_eq!(offset.get(), Vec2::ZERO);
        g.handle_event(&PointerEvent::moved((30.0, 5.0), ms(16))).unwrap();
        assert_eq!(offset.get(), Vec2::new(30.0, 5.0));
        g.handle_event(&PointerEvent::moved((35.0, 5.0), ms(32))).unwrap();
        assert_eq!(offset.get(), Vec2::new(35.0, 5.0));

        g.handle_event(&PointerEvent::up((35.0, 5.0), ms(48))).unwrap();
        assert_eq!(g.phase(), GesturePhase::Completed);
        assert_eq!(offset.get(), Vec2::ZERO, "terminal phase restores the initial value");
    }

    #[test]
    fn failed_step_leaves_state_alone() {
        let count = GestureState::new(0_u32);
        let mut g = TapGesture::count(2).unwrap().updating(&count, |c| *c);
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(50))).unwrap();
        assert_eq!(count.get(), 1);

        // Re-armed down keeps the count; a second down while pressed is rejected.
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(100))).unwrap();
        assert!(g.handle_event(&PointerEvent::down((0.0, 0.0), ms(110))).is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn fail_and_reset_restore_initial_value() {
        let pressing = GestureState::new(false);
        let mut g = DragGesture::default().updating(&pressing, |_| true);
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        assert!(pressing.get());
        g.fail();
        assert!(!pressing.get());

        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(100))).unwrap();
        assert!(pressing.get());
        g.reset();
        assert!(!pressing.get());
        assert_eq!(g.phase(), GesturePhase::None);
    }
}
