// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognize two gestures from the same events.
//!
//! ## Phase derivation
//!
//! The combined phase is derived from both children, first match wins:
//!
//! | children                                   | combined    |
//! |--------------------------------------------|-------------|
//! | either `Failed`                            | `Failed`    |
//! | either `Cancelled`                         | `Cancelled` |
//! | both `Completed`                           | `Completed` |
//! | both `None`                                | `None`      |
//! | either `Changed`, `Ended` or `Completed`   | `Changed`   |
//! | otherwise                                  | `Began`     |
//!
//! The combined phase follows the transition graph; see
//! [`GestureValue::advance_to`].
//!
//! ## Errors
//!
//! Both children see every event even when one of them rejects it. The other
//! child keeps its step and the combined phase is re-derived before the first
//! error is returned, so an `Err` from a `Simultaneous` does not mean nothing
//! changed.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{
//!     Gesture, GestureExt, GesturePhase, LongPressGesture, PointerEvent, TapGesture,
//! };
//!
//! let ms = Duration::from_millis;
//! let mut both = TapGesture::default().simultaneously(LongPressGesture::default());
//!
//! both.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! assert_eq!(both.phase(), GesturePhase::Began);
//!
//! // Too quick for the long press.
//! both.handle_event(&PointerEvent::up((0.0, 0.0), ms(80))).unwrap();
//! assert_eq!(both.phase(), GesturePhase::Failed);
//! assert_eq!(both.value().first, Some(1));
//! ```

use core::fmt;
use core::time::Duration;

use crate::gesture::{feed, observed, poll_child};
use crate::{Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent};

/// The value of a [`Simultaneous`] gesture.
///
/// Each side is `None` until that child starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimultaneousValue<A, B> {
    /// The first child's value.
    pub first: Option<A>,
    /// The second child's value.
    pub second: Option<B>,
}

impl<A, B> Default for SimultaneousValue<A, B> {
    fn default() -> Self {
        Self {
            first: None,
            second: None,
        }
    }
}

/// Two gestures fed the same events.
pub struct Simultaneous<A: Gesture, B: Gesture> {
    first: A,
    second: B,
    state: GestureValue<SimultaneousValue<A::Value, B::Value>>,
}

impl<A, B> Simultaneous<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    /// Combines `first` and `second`.
    ///
    /// See [`GestureExt::simultaneously`](crate::GestureExt::simultaneously).
    pub fn new(first: A, second: B) -> Self {
        let mut this = Self {
            first,
            second,
            state: GestureValue::new(SimultaneousValue::default()),
        };
        this.sync();
        this
    }

    /// The first child.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The second child.
    pub fn second(&self) -> &B {
        &self.second
    }

    fn sync(&mut self) -> PhaseChange {
        let phase = derive_phase(self.first.phase(), self.second.phase());
        let value = SimultaneousValue {
            first: observed(&self.first),
            second: observed(&self.second),
        };
        self.state.advance_to(phase, value)
    }
}

fn derive_phase(a: GesturePhase, b: GesturePhase) -> GesturePhase {
    use GesturePhase::{Began, Cancelled, Changed, Completed, Ended, Failed, None};

    let either = |p: GesturePhase| a == p || b == p;
    if either(Failed) {
        Failed
    } else if either(Cancelled) {
        Cancelled
    } else if a == Completed && b == Completed {
        Completed
    } else if a == None && b == None {
        None
    } else if either(Changed) || either(Ended) || either(Completed) {
        Changed
    } else {
        Began
    }
}

impl<A, B> Gesture for Simultaneous<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    type Value = SimultaneousValue<A::Value, B::Value>;

    fn gesture_value(&self) -> &GestureValue<Self::Value> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        if event.is_down() && self.state.phase.is_idle() {
            self.first.reset();
            self.second.reset();
        }
        // Both children see the event even if one rejects it.
        let first = feed(&mut self.first, event);
        let second = feed(&mut self.second, event);
        let change = self.sync();
        first?;
        second?;
        Ok(change)
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        let first = poll_child(&mut self.first, now);
        let second = poll_child(&mut self.second, now);
        let change = self.sync();
        first?;
        second?;
        Ok(change)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
        self.state.reset(SimultaneousValue::default());
    }

    fn fail(&mut self) -> PhaseChange {
        self.first.fail();
        self.second.fail();
        self.state.force_fail()
    }
}

impl<A, B> fmt::Debug for Simultaneous<A, B>
where
    A: Gesture + fmt::Debug,
    B: Gesture + fmt::Debug,
    A::Value: fmt::Debug,
    B::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simultaneous")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("state", &self.state)
            .finish()
    }
}
