// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognition phases and the legal transition graph.
//!
//! Every gesture moves through the same small state machine:
//!
//! ```text
//!            ┌──────────► Cancelled ◄──────────┐
//!            │                                 │
//! None ──► Began ──► Changed ──┐               │
//!            │        ▲   │    │               │
//!            │        └───┘    ▼               │
//!            └──────────────► Ended ──► Completed | Failed
//! ```
//!
//! `Began` and `Changed` may both move to `Cancelled`. The terminal phases
//! (`Completed`, `Cancelled`, `Failed`) may only move back to `Began`, which
//! starts a fresh interaction. `None` is reachable only through an explicit
//! reset and never through [`GesturePhase::can_transition_to`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_gesture::GesturePhase;
//!
//! assert!(GesturePhase::None.can_transition_to(GesturePhase::Began));
//! assert!(!GesturePhase::None.can_transition_to(GesturePhase::Ended));
//!
//! // Combinators use `path_to` to stay inside the graph.
//! let path = GesturePhase::Began.path_to(GesturePhase::Completed).unwrap();
//! assert_eq!(path.as_slice(), &[GesturePhase::Ended, GesturePhase::Completed]);
//! ```

use core::fmt;

use smallvec::SmallVec;

use crate::GestureError;

/// A short sequence of phases entered during a single step.
///
/// The longest legal path between two phases is three hops, so paths never
/// spill to the heap.
pub type PhasePath = SmallVec<[GesturePhase; 3]>;

/// The lifecycle phase of a gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// No interaction is in progress. The only valid initial phase.
    #[default]
    None,
    /// An interaction started.
    Began,
    /// The interaction is in progress and reported a new value.
    Changed,
    /// The interaction concluded; recognition resolves to `Completed` or `Failed` next.
    Ended,
    /// The interaction was cancelled by the dispatcher or by a recognizer rule.
    Cancelled,
    /// The gesture was recognized.
    Completed,
    /// The gesture was rejected by its recognizer or forced to fail by a combinator.
    Failed,
}

impl GesturePhase {
    /// All phases, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Began,
        Self::Changed,
        Self::Ended,
        Self::Cancelled,
        Self::Completed,
        Self::Failed,
    ];

    /// Returns `true` for `Completed`, `Cancelled` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Returns `true` for `Began` and `Changed`.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }

    /// Returns `true` when no interaction is in flight (`None` or terminal).
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::None) || self.is_terminal()
    }

    /// The phases this phase may move to when driven by events.
    #[must_use]
    pub const fn successors(self) -> PhaseSet {
        match self {
            Self::None => PhaseSet::BEGAN,
            Self::Began => PhaseSet::CHANGED
                .union(PhaseSet::ENDED)
                .union(PhaseSet::CANCELLED),
            Self::Changed => PhaseSet::CHANGED
                .union(PhaseSet::ENDED)
                .union(PhaseSet::CANCELLED),
            Self::Ended => PhaseSet::COMPLETED.union(PhaseSet::FAILED),
            Self::Cancelled | Self::Completed | Self::Failed => PhaseSet::BEGAN,
        }
    }

    /// Returns `true` if `next` is a legal event-driven successor of `self`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(next.as_set())
    }

    /// Checks a single hop against the transition graph.
    pub fn check_transition(self, next: Self) -> Result<(), GestureError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(GestureError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Shortest legal sequence of hops from `self` to `target`, excluding `self`.
    ///
    /// Returns an empty path when `self == target` and `None` when `target`
    /// cannot be reached by events (only `None` is unreachable). Ties between
    /// equally short paths resolve in [`GesturePhase::ALL`] order, so the
    /// result is deterministic.
    #[must_use]
    pub fn path_to(self, target: Self) -> Option<PhasePath> {
        if self == target {
            return Some(PhasePath::new());
        }
        let mut parent: [Option<Self>; 7] = [None; 7];
        let mut seen = self.as_set();
        let mut queue: SmallVec<[Self; 7]> = SmallVec::new();
        queue.push(self);
        let mut head = 0;
        while let Some(&phase) = queue.get(head) {
            head += 1;
            for next in phase.successors().phases() {
                if seen.contains(next.as_set()) {
                    continue;
                }
                seen |= next.as_set();
                parent[next.index()] = Some(phase);
                if next == target {
                    let mut path = PhasePath::new();
                    let mut cursor = next;
                    while cursor != self {
                        path.push(cursor);
                        cursor = parent[cursor.index()]?;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push(next);
            }
        }
        None
    }

    /// The singleton [`PhaseSet`] for this phase.
    #[must_use]
    pub const fn as_set(self) -> PhaseSet {
        match self {
            Self::None => PhaseSet::NONE,
            Self::Began => PhaseSet::BEGAN,
            Self::Changed => PhaseSet::CHANGED,
            Self::Ended => PhaseSet::ENDED,
            Self::Cancelled => PhaseSet::CANCELLED,
            Self::Completed => PhaseSet::COMPLETED,
            Self::Failed => PhaseSet::FAILED,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Began => "began",
            Self::Changed => "changed",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

bitflags::bitflags! {
    /// A set of [`GesturePhase`] values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PhaseSet: u8 {
        /// [`GesturePhase::None`].
        const NONE      = 0b0000_0001;
        /// [`GesturePhase::Began`].
        const BEGAN     = 0b0000_0010;
        /// [`GesturePhase::Changed`].
        const CHANGED   = 0b0000_0100;
        /// [`GesturePhase::Ended`].
        const ENDED     = 0b0000_1000;
        /// [`GesturePhase::Cancelled`].
        const CANCELLED = 0b0001_0000;
        /// [`GesturePhase::Completed`].
        const COMPLETED = 0b0010_0000;
        /// [`GesturePhase::Failed`].
        const FAILED    = 0b0100_0000;
        /// Every terminal phase.
        const TERMINAL  = Self::CANCELLED.bits() | Self::COMPLETED.bits() | Self::FAILED.bits();
    }
}

impl PhaseSet {
    /// Returns `true` if `phase` is in the set.
    #[must_use]
    pub const fn has(self, phase: GesturePhase) -> bool {
        self.contains(phase.as_set())
    }

    /// Iterates the phases in the set in [`GesturePhase::ALL`] order.
    pub fn phases(self) -> impl Iterator<Item = GesturePhase> {
        GesturePhase::ALL
            .into_iter()
            .filter(move |phase| self.has(*phase))
    }
}

impl From<GesturePhase> for PhaseSet {
    fn from(phase: GesturePhase) -> Self {
        phase.as_set()
    }
}

/// The outcome of one step of a gesture.
///
/// `visited` holds every phase entered during the step, in any order, which
/// lets wrappers react to edges ("entered `Completed`") even when a single
/// event passes through several phases.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    /// The phase before the step.
    pub previous: GesturePhase,
    /// The phase after the step.
    pub current: GesturePhase,
    /// Phases entered during the step.
    pub visited: PhaseSet,
}

impl PhaseChange {
    /// A step that did not move the phase.
    #[must_use]
    pub const fn unchanged(phase: GesturePhase) -> Self {
        Self {
            previous: phase,
            current: phase,
            visited: PhaseSet::empty(),
        }
    }

    /// Returns `true` if the step entered `phase`.
    #[must_use]
    pub const fn entered(&self, phase: GesturePhase) -> bool {
        self.visited.has(phase)
    }

    /// Returns `true` if the step entered any phase.
    #[must_use]
    pub const fn moved(&self) -> bool {
        !self.visited.is_empty()
    }

    /// Returns `true` if the step landed in a terminal phase it was not already in.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.current.is_terminal() && self.visited.has(self.current)
    }
}
