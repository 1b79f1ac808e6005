// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased gestures.
//!
//! Combinators nest concrete types, so a tap with an action and a drag with
//! state extraction have unrelated types even when they report the same
//! value. [`AnyGesture`] boxes any gesture behind the object-safe [`Gesture`]
//! trait so heterogeneous gestures can be stored together.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{
//!     AnyGesture, DragGesture, Gesture, GestureExt, GesturePhase, PointerEvent, TapGesture,
//! };
//!
//! let ms = Duration::from_millis;
//! let mut gestures: Vec<AnyGesture<()>> = vec![
//!     TapGesture::default().on_ended(|_| {}).boxed().map_value(|_| ()),
//!     DragGesture::default().boxed().map_value(|_| ()),
//! ];
//!
//! for gesture in &mut gestures {
//!     gesture.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! }
//! assert!(gestures.iter().all(|g| g.phase() == GesturePhase::Began));
//! ```

use alloc::boxed::Box;
use core::fmt;
use core::time::Duration;

use crate::{Gesture, GestureError, GestureValue, PhaseChange, PointerEvent};

/// A boxed gesture with value type `V`.
pub struct AnyGesture<V> {
    inner: Box<dyn Gesture<Value = V>>,
}

impl<V: 'static> AnyGesture<V> {
    /// Erases `gesture`.
    pub fn new<G>(gesture: G) -> Self
    where
        G: Gesture<Value = V> + 'static,
    {
        Self {
            inner: Box::new(gesture),
        }
    }

    /// Erases a gesture after projecting its value through `map`.
    ///
    /// The projection runs after every step, so the mapped value always
    /// reflects the inner gesture's current value.
    pub fn map_value<W, F>(self, map: F) -> AnyGesture<W>
    where
        W: 'static,
        F: FnMut(&V) -> W + 'static,
    {
        AnyGesture::new(Mapped::new(self, map))
    }
}

impl<V> Gesture for AnyGesture<V> {
    type Value = V;

    fn gesture_value(&self) -> &GestureValue<V> {
        self.inner.gesture_value()
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        self.inner.handle_event(event)
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        self.inner.poll(now)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn fail(&mut self) -> PhaseChange {
        self.inner.fail()
    }
}

impl<V: fmt::Debug> fmt::Debug for AnyGesture<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyGesture")
            .field("state", self.inner.gesture_value())
            .finish_non_exhaustive()
    }
}

/// Keeps a projected copy of an inner gesture's value.
struct Mapped<V, W, F> {
    inner: AnyGesture<V>,
    map: F,
    state: GestureValue<W>,
}

impl<V, W, F> Mapped<V, W, F>
where
    F: FnMut(&V) -> W,
{
    fn new(inner: AnyGesture<V>, mut map: F) -> Self {
        let state = GestureValue {
            phase: inner.phase(),
            value: map(inner.value()),
        };
        Self { inner, map, state }
    }

    fn sync(&mut self, change: PhaseChange) -> PhaseChange {
        self.state.phase = self.inner.phase();
        self.state.value = (self.map)(self.inner.value());
        change
    }
}

impl<V, W, F> Gesture for Mapped<V, W, F>
where
    F: FnMut(&V) -> W,
{
    type Value = W;

    fn gesture_value(&self) -> &GestureValue<W> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        let change = self.inner.handle_event(event)?;
        Ok(self.sync(change))
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        let change = self.inner.poll(now)?;
        Ok(self.sync(change))
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.sync(PhaseChange::unchanged(self.inner.phase()));
    }

    fn fail(&mut self) -> PhaseChange {
        let change = self.inner.fail();
        self.sync(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GestureExt, GesturePhase, LongPressGesture, TapGesture};
    use alloc::vec::Vec;
    use core::cell::Cell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn boxed_gesture_behaves_like_the_unboxed_one() {
        let mut boxed = TapGesture::count(2).unwrap().boxed();
        boxed.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        boxed.handle_event(&PointerEvent::up((0.0, 0.0), ms(40))).unwrap();
        assert_eq!(boxed.phase(), GesturePhase::Changed);
        assert_eq!(*boxed.value(), 1);
        assert!(boxed.handle_event(&PointerEvent::up((0.0, 0.0), ms(50))).is_ok());
        boxed.reset();
        assert_eq!(boxed.phase(), GesturePhase::None);
    }

    #[test]
    fn erased_wrappers_keep_their_callbacks() {
        let fired = alloc::rc::Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut boxed: AnyGesture<bool> = LongPressGesture::default()
            .on_ended(move |_| flag.set(true))
            .boxed();
        boxed.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        boxed.handle_event(&PointerEvent::up((0.0, 0.0), ms(600))).unwrap();
        assert!(fired.get());
    }

    #[test]
    fn mapped_values_follow_the_inner_gesture() {
        let mut gestures: Vec<AnyGesture<bool>> = Vec::new();
        gestures.push(TapGesture::default().boxed().map_value(|count| *count > 0));
        gestures.push(LongPressGesture::default().boxed());

        for g in &mut gestures {
            g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        }
        for g in &mut gestures {
            g.handle_event(&PointerEvent::up((0.0, 0.0), ms(100))).unwrap();
        }
        assert_eq!(gestures[0].phase(), GesturePhase::Completed);
        assert!(*gestures[0].value());
        assert_eq!(gestures[1].phase(), GesturePhase::Failed);

        gestures[0].fail();
        gestures[0].reset();
        assert_eq!(gestures[0].phase(), GesturePhase::None);
        assert!(!*gestures[0].value());
    }
}
