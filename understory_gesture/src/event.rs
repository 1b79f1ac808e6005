// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The abstract pointer event consumed by recognizers.
//!
//! Platform adapters translate native pointer or touch input into
//! [`PointerEvent`]s that are already routed to the gesture. Timestamps are
//! offsets from an origin the adapter picks; only differences matter.

use core::time::Duration;

use kurbo::{Point, Vec2};

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// The pointer was pressed.
    Down,
    /// The pointer moved while pressed.
    Move,
    /// The pointer was released.
    Up,
    /// The platform cancelled the interaction.
    Cancel,
}

/// One pointer event delivered to a gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Pointer location in the gesture's coordinate space.
    pub position: Point,
    /// Time of the event, relative to the adapter's origin.
    pub timestamp: Duration,
    /// Velocity estimate in units per second, supplied by the adapter.
    pub velocity: Vec2,
}

impl PointerEvent {
    /// Creates an event with zero velocity.
    #[must_use]
    pub fn new(kind: PointerEventKind, position: impl Into<Point>, timestamp: Duration) -> Self {
        Self {
            kind,
            position: position.into(),
            timestamp,
            velocity: Vec2::ZERO,
        }
    }

    /// A [`PointerEventKind::Down`] event.
    #[must_use]
    pub fn down(position: impl Into<Point>, timestamp: Duration) -> Self {
        Self::new(PointerEventKind::Down, position, timestamp)
    }

    /// A [`PointerEventKind::Move`] event.
    #[must_use]
    pub fn moved(position: impl Into<Point>, timestamp: Duration) -> Self {
        Self::new(PointerEventKind::Move, position, timestamp)
    }

    /// A [`PointerEventKind::Up`] event.
    #[must_use]
    pub fn up(position: impl Into<Point>, timestamp: Duration) -> Self {
        Self::new(PointerEventKind::Up, position, timestamp)
    }

    /// A [`PointerEventKind::Cancel`] event.
    #[must_use]
    pub fn cancel(position: impl Into<Point>, timestamp: Duration) -> Self {
        Self::new(PointerEventKind::Cancel, position, timestamp)
    }

    /// Replaces the velocity estimate.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Returns `true` for [`PointerEventKind::Down`].
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.kind == PointerEventKind::Down
    }
}
