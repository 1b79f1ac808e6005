// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Gesture: Composable gesture recognizers for UI.
//!
//! This crate turns an abstract stream of pointer events into recognized
//! interaction patterns and lets those patterns be combined into new ones.
//! It is the engine behind declarative "on tap", "on long press" and "on
//! drag" modifiers; the view tree, platform input translation and rendering
//! all live elsewhere.
//!
//! ## Core Concepts
//!
//! ### Phases
//!
//! Every gesture is in one [`GesturePhase`] at a time. Phases move along a
//! fixed graph:
//!
//! ```text
//! None      -> Began
//! Began     -> Changed | Ended | Cancelled
//! Changed   -> Changed | Ended | Cancelled
//! Ended     -> Completed | Failed
//! Completed -> Began
//! Cancelled -> Began
//! Failed    -> Began
//! ```
//!
//! `Completed`, `Cancelled` and `Failed` are terminal; the next interaction
//! re-enters `Began`. `None` is only reachable through [`Gesture::reset`].
//! An event that would leave the graph is rejected with
//! [`GestureError::InvalidTransition`] and changes nothing. Recognition
//! failure is the `Failed` phase, never an error.
//!
//! ### Gestures
//!
//! A [`Gesture`] owns a [`GestureValue`] (phase plus typed payload) and
//! updates it from [`PointerEvent`]s. Each step reports a [`PhaseChange`]
//! listing every phase entered, so wrappers can react to edges.
//!
//! - [`TapGesture`]: one or more quick taps; the value is the tap count.
//! - [`LongPressGesture`]: a press held in place; the value is "held long enough".
//! - [`DragGesture`]: pointer movement past a threshold; the value is a [`DragValue`].
//!
//! ### Combinators
//!
//! [`GestureExt`] builds new gestures out of existing ones:
//!
//! - [`on_ended`](GestureExt::on_ended) and [`on_changed`](GestureExt::on_changed) run callbacks.
//! - [`updating`](GestureExt::updating) mirrors the in-progress value into a [`GestureState`].
//! - [`simultaneously`](GestureExt::simultaneously), [`sequenced`](GestureExt::sequenced)
//!   and [`exclusively`](GestureExt::exclusively) combine two gestures.
//! - [`boxed`](GestureExt::boxed) erases the type into an [`AnyGesture`].
//!
//! ### Hosting
//!
//! [`GestureHost`] stores erased gestures per node id, routes events to them
//! and reports [`GestureNotification`]s for an adapter to act on.
//!
//! ## Quick Start
//!
//! ```rust
//! use core::cell::Cell;
//! use core::time::Duration;
//! use kurbo::{Point, Vec2};
//! use understory_gesture::{
//!     DragGesture, Gesture, GestureExt, GesturePhase, GestureState, PointerEvent,
//! };
//!
//! let ms = Duration::from_millis;
//! let offset = GestureState::new(Vec2::ZERO);
//! let dropped = Cell::new(None);
//!
//! let mut drag = DragGesture::default()
//!     .updating(&offset, |value| value.translation)
//!     .on_ended(|value| dropped.set(Some(value.location)));
//!
//! drag.handle_event(&PointerEvent::down((10.0, 10.0), ms(0))).unwrap();
//! drag.handle_event(&PointerEvent::moved((40.0, 10.0), ms(16))).unwrap();
//! assert_eq!(offset.get(), Vec2::new(30.0, 0.0));
//!
//! drag.handle_event(&PointerEvent::up((40.0, 10.0), ms(32))).unwrap();
//! assert_eq!(drag.phase(), GesturePhase::Completed);
//! assert_eq!(offset.get(), Vec2::ZERO);
//! assert_eq!(dropped.get(), Some(Point::new(40.0, 10.0)));
//! ```
//!
//! ## Time
//!
//! Events carry timestamps and the crate never reads a clock. Recognizers
//! that care about elapsed time without pointer movement (a long press that
//! should light up while held still, a double tap whose window expires)
//! advance through [`Gesture::poll`], which a host calls from its own timer.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for each committed phase
//! transition, `debug` for recognition outcomes and forced failures, and
//! `warn` when a [`GestureHost`] delivers an event a gesture rejects.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or `libm` feature so Kurbo can compute distances.

#![no_std]

extern crate alloc;

mod actions;
mod any;
mod changed;
mod drag;
mod ended;
mod error;
mod event;
mod exclusive;
mod gesture;
mod host;
mod long_press;
mod phase;
mod sequence;
mod simultaneous;
mod tap;
mod updating;
mod value;

pub use actions::{long_press_action, tap_action};
pub use any::AnyGesture;
pub use changed::OnChanged;
pub use drag::{DragConfig, DragGesture, DragValue};
pub use ended::OnEnded;
pub use error::{ConfigError, GestureError};
pub use event::{PointerEvent, PointerEventKind};
pub use exclusive::{Exclusive, ExclusiveValue};
pub use gesture::{Gesture, GestureExt};
pub use host::{GestureHandle, GestureHost, GestureNotification, Notifications};
pub use long_press::{LongPressConfig, LongPressGesture};
pub use phase::{GesturePhase, PhaseChange, PhasePath, PhaseSet};
pub use sequence::{Sequence, SequenceValue};
pub use simultaneous::{Simultaneous, SimultaneousValue};
pub use tap::{TapConfig, TapGesture};
pub use updating::{GestureState, Updating};
pub use value::{GestureValue, Transition};
