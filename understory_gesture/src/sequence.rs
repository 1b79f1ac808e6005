// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognize one gesture, then another.
//!
//! Events go to the first gesture until it completes; every event after that
//! goes to the second. While the first gesture is in progress the sequence
//! mirrors its phase, so a failed first gesture fails the sequence and the
//! second never starts. Once the first completes the sequence stays in
//! `Changed` until the second reaches a terminal phase, which the sequence
//! then adopts.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{
//!     DragGesture, Gesture, GestureExt, GesturePhase, LongPressGesture, PointerEvent,
//!     SequenceValue,
//! };
//!
//! let ms = Duration::from_millis;
//! let mut press_then_drag = LongPressGesture::default().sequenced(DragGesture::default());
//!
//! press_then_drag.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! press_then_drag.handle_event(&PointerEvent::up((0.0, 0.0), ms(600))).unwrap();
//! assert_eq!(press_then_drag.phase(), GesturePhase::Changed);
//! assert!(matches!(press_then_drag.value(), SequenceValue::Second(true, None)));
//!
//! press_then_drag.handle_event(&PointerEvent::down((0.0, 0.0), ms(700))).unwrap();
//! press_then_drag.handle_event(&PointerEvent::moved((40.0, 0.0), ms(720))).unwrap();
//! press_then_drag.handle_event(&PointerEvent::up((40.0, 0.0), ms(740))).unwrap();
//! assert_eq!(press_then_drag.phase(), GesturePhase::Completed);
//! ```

use core::fmt;
use core::time::Duration;

use crate::gesture::{feed, observed, poll_child};
use crate::{Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent};

/// The value of a [`Sequence`] gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SequenceValue<A, B> {
    /// The first gesture has not completed yet.
    First(A),
    /// The first gesture completed; the second one's value once it starts.
    Second(A, Option<B>),
}

/// Two gestures recognized one after the other.
pub struct Sequence<A: Gesture, B: Gesture> {
    first: A,
    second: B,
    state: GestureValue<SequenceValue<A::Value, B::Value>>,
}

impl<A, B> Sequence<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    /// Chains `second` after `first`.
    ///
    /// See [`GestureExt::sequenced`](crate::GestureExt::sequenced).
    pub fn new(first: A, second: B) -> Self {
        let state = GestureValue::new(SequenceValue::First(first.value().clone()));
        Self {
            first,
            second,
            state,
        }
    }

    /// The first child.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The second child.
    pub fn second(&self) -> &B {
        &self.second
    }

    fn first_done(&self) -> bool {
        self.first.phase() == GesturePhase::Completed
    }

    fn sync(&mut self) -> PhaseChange {
        let (phase, value) = if self.first_done() {
            let second = self.second.phase();
            let phase = if second.is_terminal() {
                second
            } else {
                GesturePhase::Changed
            };
            let value = SequenceValue::Second(self.first.value().clone(), observed(&self.second));
            (phase, value)
        } else {
            (
                self.first.phase(),
                SequenceValue::First(self.first.value().clone()),
            )
        };
        let change = self.state.advance_to(phase, value);
        if change.entered(GesturePhase::Changed)
            && change.previous != GesturePhase::Changed
            && matches!(self.state.value, SequenceValue::Second(..))
        {
            tracing::debug!("sequence handed over to its second gesture");
        }
        change
    }
}

impl<A, B> Gesture for Sequence<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    type Value = SequenceValue<A::Value, B::Value>;

    fn gesture_value(&self) -> &GestureValue<Self::Value> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        if event.is_down() && self.state.phase.is_idle() {
            self.first.reset();
            self.second.reset();
        }
        if self.first_done() {
            feed(&mut self.second, event)?;
        } else {
            feed(&mut self.first, event)?;
        }
        Ok(self.sync())
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        if self.first_done() {
            poll_child(&mut self.second, now)?;
        } else {
            poll_child(&mut self.first, now)?;
        }
        Ok(self.sync())
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
        self.state
            .reset(SequenceValue::First(self.first.value().clone()));
    }

    fn fail(&mut self) -> PhaseChange {
        self.first.fail();
        self.second.fail();
        self.state.force_fail()
    }
}

impl<A, B> fmt::Debug for Sequence<A, B>
where
    A: Gesture + fmt::Debug,
    B: Gesture + fmt::Debug,
    A::Value: fmt::Debug,
    B::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DragGesture, GestureExt, LongPressGesture, TapGesture};
    use core::cell::Cell;
    use kurbo::Vec2;
    use GesturePhase::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn second_sees_every_event_after_first_completes() {
        let mut g = TapGesture::default().sequenced(DragGesture::default());

        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        assert_eq!(g.phase(), Began);
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(40))).unwrap();
        assert_eq!(g.phase(), Changed);
        assert_eq!(*g.value(), SequenceValue::Second(1, Option::None));

        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(100))).unwrap();
        assert_eq!(g.second().phase(), Began);
        // The tap never saw the second down.
        assert_eq!(g.first().phase(), Completed);
        assert_eq!(*g.first().value(), 1);

        g.handle_event(&PointerEvent::moved((20.0, 0.0), ms(120))).unwrap();
        assert_eq!(g.phase(), Changed);
        match g.value() {
            SequenceValue::Second(1, Some(drag)) => {
                assert_eq!(drag.translation, Vec2::new(20.0, 0.0));
            }
            other => panic!("unexpected value {other:?}"),
        }

        g.handle_event(&PointerEvent::up((20.0, 0.0), ms(140))).unwrap();
        assert_eq!(g.phase(), Completed);
    }

    #[test]
    fn failed_first_keeps_second_idle() {
        let mut g = LongPressGesture::default().sequenced(TapGesture::default());
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        let change = g
            .handle_event(&PointerEvent::up((0.0, 0.0), ms(100)))
            .unwrap();
        assert_eq!(change.current, Failed);
        assert!(change.entered(Ended));
        assert_eq!(g.second().phase(), None);
        assert_eq!(*g.value(), SequenceValue::First(false));

        // A new down restarts the first gesture, not the second.
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(500))).unwrap();
        assert_eq!(g.first().phase(), Began);
        assert_eq!(g.second().phase(), None);
    }

    #[test]
    fn second_failure_fails_the_sequence() {
        let mut g = TapGesture::default().sequenced(LongPressGesture::default());
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(40))).unwrap();
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(100))).unwrap();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(200))).unwrap();
        assert_eq!(g.second().phase(), Failed);
        assert_eq!(g.phase(), Failed);
    }

    #[test]
    fn completion_fires_once() {
        let fired = Cell::new(0);
        let mut g = TapGesture::default()
            .sequenced(TapGesture::default())
            .on_ended(|_| fired.set(fired.get() + 1));
        for t in [0, 100] {
            g.handle_event(&PointerEvent::down((0.0, 0.0), ms(t))).unwrap();
            g.handle_event(&PointerEvent::up((0.0, 0.0), ms(t + 30))).unwrap();
        }
        assert_eq!(fired.get(), 1);
        assert_eq!(*g.value(), SequenceValue::Second(1, Some(1)));
    }

    #[test]
    fn poll_reaches_the_active_child() {
        let mut g = TapGesture::default().sequenced(LongPressGesture::default());
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
        g.handle_event(&PointerEvent::up((0.0, 0.0), ms(40))).unwrap();
        g.handle_event(&PointerEvent::down((0.0, 0.0), ms(100))).unwrap();
        g.poll(ms(700)).unwrap();
        assert_eq!(g.second().phase(), Changed);
        assert_eq!(*g.value(), SequenceValue::Second(1, Some(true)));
    }
}
