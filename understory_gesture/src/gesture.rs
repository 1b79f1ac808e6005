// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Gesture`] trait and the [`GestureExt`] combinator builders.

use alloc::boxed::Box;
use core::time::Duration;

use crate::{
    AnyGesture, Exclusive, GestureError, GesturePhase, GestureState, GestureValue, OnChanged,
    OnEnded, PhaseChange, PointerEvent, Sequence, Simultaneous, Updating,
};

/// Something that turns pointer events into a phase and a value.
///
/// Gestures are push-driven: the dispatcher calls [`Gesture::handle_event`]
/// for each event, in delivery order, and the gesture reports what changed.
/// The trait is object safe; see [`AnyGesture`].
pub trait Gesture {
    /// The payload the gesture measures.
    type Value;

    /// The current phase and value.
    fn gesture_value(&self) -> &GestureValue<Self::Value>;

    /// Feeds one event.
    ///
    /// Returns [`GestureError::InvalidTransition`] if the event would move the
    /// gesture outside the legal transition graph. A recognizer is unchanged
    /// in that case. A combinator leaves the rejecting child unchanged, but
    /// other children may already have taken the event; see
    /// [`Simultaneous`](crate::Simultaneous).
    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError>;

    /// Advances the clock without a pointer change.
    ///
    /// Time-based recognizers use this to recognize or expire without waiting
    /// for the next pointer event.
    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        let _ = now;
        Ok(PhaseChange::unchanged(self.phase()))
    }

    /// Explicitly resets to `(None, default)`, discarding recognizer state.
    fn reset(&mut self);

    /// Forces a non-terminal gesture to [`GesturePhase::Failed`].
    ///
    /// Combinators call this on a child that lost a competition.
    fn fail(&mut self) -> PhaseChange;

    /// The current phase.
    fn phase(&self) -> GesturePhase {
        self.gesture_value().phase
    }

    /// The current value.
    fn value(&self) -> &Self::Value {
        &self.gesture_value().value
    }
}

impl<G: Gesture + ?Sized> Gesture for Box<G> {
    type Value = G::Value;

    fn gesture_value(&self) -> &GestureValue<Self::Value> {
        (**self).gesture_value()
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        (**self).handle_event(event)
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        (**self).poll(now)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn fail(&mut self) -> PhaseChange {
        (**self).fail()
    }
}

/// Builders for combinators, available on every sized [`Gesture`].
pub trait GestureExt: Gesture + Sized {
    /// Calls `action` with the final value each time the gesture completes.
    fn on_ended<F>(self, action: F) -> OnEnded<Self, F>
    where
        F: FnMut(&Self::Value),
    {
        OnEnded::new(self, action)
    }

    /// Calls `action` each time the gesture lands in `Changed` with a new value.
    fn on_changed<F>(self, action: F) -> OnChanged<Self, F>
    where
        Self::Value: PartialEq + Clone,
        F: FnMut(&Self::Value),
    {
        OnChanged::new(self, action)
    }

    /// Mirrors the in-progress value into `state` through `transform`.
    fn updating<S, F>(self, state: &GestureState<S>, transform: F) -> Updating<Self, S, F>
    where
        S: Clone,
        F: FnMut(&Self::Value) -> S,
    {
        Updating::new(self, state.clone(), transform)
    }

    /// Recognizes `self` and `other` from the same events.
    fn simultaneously<B: Gesture>(self, other: B) -> Simultaneous<Self, B>
    where
        Self::Value: Clone,
        B::Value: Clone,
    {
        Simultaneous::new(self, other)
    }

    /// Recognizes `self`, then `other` with the events after `self` completes.
    fn sequenced<B: Gesture>(self, other: B) -> Sequence<Self, B>
    where
        Self::Value: Clone,
        B::Value: Clone,
    {
        Sequence::new(self, other)
    }

    /// Lets whichever of `self` or `other` begins first own the interaction.
    ///
    /// `self` wins ties.
    fn exclusively<B: Gesture>(self, other: B) -> Exclusive<Self, B>
    where
        Self::Value: Clone,
        B::Value: Clone,
    {
        Exclusive::new(self, other)
    }

    /// Erases the concrete type.
    fn boxed(self) -> AnyGesture<Self::Value>
    where
        Self: 'static,
    {
        AnyGesture::new(self)
    }
}

impl<G: Gesture> GestureExt for G {}

/// Feeds `event` to a combinator child unless it already finished.
pub(crate) fn feed<G: Gesture>(
    child: &mut G,
    event: &PointerEvent,
) -> Result<PhaseChange, GestureError> {
    if child.phase().is_terminal() {
        Ok(PhaseChange::unchanged(child.phase()))
    } else {
        child.handle_event(event)
    }
}

/// Polls a combinator child unless it already finished.
pub(crate) fn poll_child<G: Gesture>(
    child: &mut G,
    now: Duration,
) -> Result<PhaseChange, GestureError> {
    if child.phase().is_terminal() {
        Ok(PhaseChange::unchanged(child.phase()))
    } else {
        child.poll(now)
    }
}

/// The child's value, or `None` while it has not started.
pub(crate) fn observed<G>(child: &G) -> Option<G::Value>
where
    G: Gesture,
    G::Value: Clone,
{
    (child.phase() != GesturePhase::None).then(|| child.value().clone())
}
