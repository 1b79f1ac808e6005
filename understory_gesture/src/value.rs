// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The phase + value container every gesture operates on.
//!
//! A recognizer never writes its [`GestureValue`] directly. It reads the
//! current value, computes a [`Transition`] (the phases to pass through and
//! the new payload), and hands it to [`GestureValue::apply`], which checks
//! every hop against the transition graph before writing anything.
//!
//! ## Minimal example
//!
//! ```
//! use understory_gesture::{GesturePhase, GestureValue, Transition};
//!
//! let mut taps = GestureValue::<u32>::default();
//!
//! let change = taps.apply(Transition::to(GesturePhase::Began, 0)).unwrap();
//! assert!(change.entered(GesturePhase::Began));
//!
//! let change = taps
//!     .apply(Transition::through([GesturePhase::Ended, GesturePhase::Completed], 1))
//!     .unwrap();
//! assert_eq!(change.current, GesturePhase::Completed);
//! assert_eq!(taps.value, 1);
//!
//! // Completed cannot jump straight to Ended; nothing is written.
//! assert!(taps.apply(Transition::to(GesturePhase::Ended, 5)).is_err());
//! assert_eq!(taps.value, 1);
//! ```

use crate::{GestureError, GesturePhase, PhaseChange, PhasePath, PhaseSet};

/// A gesture's current phase coupled with its current payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GestureValue<V> {
    /// The lifecycle phase.
    pub phase: GesturePhase,
    /// What the gesture currently measures.
    pub value: V,
}

impl<V> GestureValue<V> {
    /// Creates a value in [`GesturePhase::None`].
    #[must_use]
    pub const fn new(value: V) -> Self {
        Self {
            phase: GesturePhase::None,
            value,
        }
    }

    /// Validates and commits a transition.
    ///
    /// Every hop in `transition` must be legal from the phase before it. On
    /// error the container is left exactly as it was.
    pub fn apply(&mut self, transition: Transition<V>) -> Result<PhaseChange, GestureError> {
        let previous = self.phase;
        let mut cursor = previous;
        let mut visited = PhaseSet::empty();
        for &hop in &transition.path {
            cursor.check_transition(hop)?;
            visited |= hop.as_set();
            cursor = hop;
        }
        if transition.path.is_empty() {
            tracing::trace!(phase = %previous, "gesture value updated in place");
        } else {
            tracing::trace!(from = %previous, to = %cursor, "gesture phase transition");
        }
        self.phase = cursor;
        self.value = transition.value;
        Ok(PhaseChange {
            previous,
            current: cursor,
            visited,
        })
    }

    /// Moves to `target` along the shortest legal path, writing `value`.
    ///
    /// Combinators use this for derived phases. Targeting [`GesturePhase::None`]
    /// from anywhere else is an explicit reset and reports no visited phases.
    pub fn advance_to(&mut self, target: GesturePhase, value: V) -> PhaseChange {
        let previous = self.phase;
        match previous.path_to(target) {
            Some(path) => {
                let mut visited = PhaseSet::empty();
                for hop in &path {
                    visited |= hop.as_set();
                }
                if !path.is_empty() {
                    tracing::trace!(from = %previous, to = %target, "derived phase transition");
                }
                self.phase = target;
                self.value = value;
                PhaseChange {
                    previous,
                    current: target,
                    visited,
                }
            }
            None => {
                self.phase = GesturePhase::None;
                self.value = value;
                PhaseChange {
                    previous,
                    current: GesturePhase::None,
                    visited: PhaseSet::empty(),
                }
            }
        }
    }

    /// Forces the phase to [`GesturePhase::Failed`] without consulting the graph.
    ///
    /// This is the override combinators use to knock out a competing child;
    /// it is a no-op on terminal phases.
    pub fn force_fail(&mut self) -> PhaseChange {
        let previous = self.phase;
        if previous.is_terminal() {
            return PhaseChange::unchanged(previous);
        }
        tracing::debug!(from = %previous, "gesture forced to fail");
        self.phase = GesturePhase::Failed;
        PhaseChange {
            previous,
            current: GesturePhase::Failed,
            visited: PhaseSet::FAILED,
        }
    }

    /// Explicit reset to `(None, value)`.
    pub fn reset(&mut self, value: V) {
        self.phase = GesturePhase::None;
        self.value = value;
    }
}

/// A requested step: phases to enter, in order, plus the new payload.
///
/// An empty path keeps the phase and only replaces the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<V> {
    path: PhasePath,
    value: V,
}

impl<V> Transition<V> {
    /// Keeps the current phase and writes `value`.
    #[must_use]
    pub fn stay(value: V) -> Self {
        Self {
            path: PhasePath::new(),
            value,
        }
    }

    /// Enters a single phase.
    #[must_use]
    pub fn to(phase: GesturePhase, value: V) -> Self {
        let mut path = PhasePath::new();
        path.push(phase);
        Self { path, value }
    }

    /// Enters each phase in turn.
    #[must_use]
    pub fn through(phases: impl IntoIterator<Item = GesturePhase>, value: V) -> Self {
        Self {
            path: phases.into_iter().collect(),
            value,
        }
    }

    /// The phases this transition enters.
    #[must_use]
    pub fn path(&self) -> &[GesturePhase] {
        &self.path
    }

    /// The payload written by this transition.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}
