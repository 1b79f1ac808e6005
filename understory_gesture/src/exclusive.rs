// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Let one of two competing gestures own an interaction.
//!
//! Until a child claims the interaction, each event goes to the first child
//! and then, if the first child is still in `None`, to the second. The first
//! child to leave `None` claims it and the other is forced to `Failed`; when
//! both would begin on the same event the first child wins and the second
//! never observes that event. After the claim only the winner receives
//! events and the combined phase mirrors it.

use core::fmt;
use core::time::Duration;

use crate::gesture::{feed, poll_child};
use crate::{Gesture, GestureError, GesturePhase, GestureValue, PhaseChange, PointerEvent};

/// The value of an [`Exclusive`] gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExclusiveValue<A, B> {
    /// Neither child has claimed the interaction.
    #[default]
    Unclaimed,
    /// The first child owns the interaction.
    First(A),
    /// The second child owns the interaction.
    Second(B),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Claim {
    First,
    Second,
}

/// Two gestures competing for the same interaction.
pub struct Exclusive<A: Gesture, B: Gesture> {
    first: A,
    second: B,
    claim: Option<Claim>,
    state: GestureValue<ExclusiveValue<A::Value, B::Value>>,
}

impl<A, B> Exclusive<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    /// Pits `first` against `second`.
    ///
    /// See [`GestureExt::exclusively`](crate::GestureExt::exclusively).
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            claim: None,
            state: GestureValue::new(ExclusiveValue::Unclaimed),
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

    fn restart(&mut self) {
        self.first.reset();
        self.second.reset();
        self.claim = None;
    }

    /// Offers an unclaimed step to the first child, then to the second.
    fn contest(&mut self, input: Input<'_>) -> Result<(), GestureError> {
        input.apply(&mut self.first)?;
        if self.first.phase() != GesturePhase::None {
            self.claim = Some(Claim::First);
            self.second.fail();
            tracing::debug!("first gesture claimed the interaction");
            return Ok(());
        }
        input.apply(&mut self.second)?;
        if self.second.phase() != GesturePhase::None {
            self.claim = Some(Claim::Second);
            self.first.fail();
            tracing::debug!("second gesture claimed the interaction");
        }
        Ok(())
    }

    fn step(&mut self, input: Input<'_>) -> Result<PhaseChange, GestureError> {
        match self.claim {
            Some(Claim::First) => {
                input.apply(&mut self.first)?;
            }
            Some(Claim::Second) => {
                input.apply(&mut self.second)?;
            }
            None => self.contest(input)?,
        }
        Ok(self.sync())
    }

    fn sync(&mut self) -> PhaseChange {
        let (phase, value) = match self.claim {
            Some(Claim::First) => (
                self.first.phase(),
                ExclusiveValue::First(self.first.value().clone()),
            ),
            Some(Claim::Second) => (
                self.second.phase(),
                ExclusiveValue::Second(self.second.value().clone()),
            ),
            None => (GesturePhase::None, ExclusiveValue::Unclaimed),
        };
        self.state.advance_to(phase, value)
    }
}

#[derive(Copy, Clone)]
enum Input<'a> {
    Event(&'a PointerEvent),
    Tick(Duration),
}

impl Input<'_> {
    fn apply<G: Gesture>(self, child: &mut G) -> Result<PhaseChange, GestureError> {
        match self {
            Self::Event(event) => feed(child, event),
            Self::Tick(now) => poll_child(child, now),
        }
    }
}

impl<A, B> Gesture for Exclusive<A, B>
where
    A: Gesture,
    B: Gesture,
    A::Value: Clone,
    B::Value: Clone,
{
    type Value = ExclusiveValue<A::Value, B::Value>;

    fn gesture_value(&self) -> &GestureValue<Self::Value> {
        &self.state
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<PhaseChange, GestureError> {
        if event.is_down() && self.state.phase.is_idle() {
            self.restart();
        }
        self.step(Input::Event(event))
    }

    fn poll(&mut self, now: Duration) -> Result<PhaseChange, GestureError> {
        self.step(Input::Tick(now))
    }

    fn reset(&mut self) {
        self.restart();
        self.state.reset(ExclusiveValue::Unclaimed);
    }

    fn fail(&mut self) -> PhaseChange {
        self.first.fail();
        self.second.fail();
        self.state.force_fail()
    }
}

impl<A, B> fmt::Debug for Exclusive<A, B>
where
    A: Gesture + fmt::Debug,
    B: Gesture + fmt::Debug,
    A::Value: fmt::Debug,
    B::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exclusive")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("claim", &self.claim)
            .field("state", &self.state)
            .finish()
    }
}
