// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made gestures for the two most common view modifiers.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use core::time::Duration;
//! use std::rc::Rc;
//! use understory_gesture::{Gesture, LongPressConfig, PointerEvent, long_press_action};
//!
//! let ms = Duration::from_millis;
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! let (mut press, pressing) =
//!     long_press_action(LongPressConfig::default(), move || flag.set(true)).unwrap();
//!
//! press.handle_event(&PointerEvent::down((0.0, 0.0), ms(0))).unwrap();
//! assert!(pressing.get());
//! press.handle_event(&PointerEvent::up((0.0, 0.0), ms(550))).unwrap();
//! assert!(fired.get());
//! assert!(!pressing.get());
//! ```

use crate::{
    AnyGesture, GestureError, GestureExt, GestureState, LongPressConfig, LongPressGesture,
    OnEnded, TapConfig, TapGesture,
};

/// A tap recognizer for `count` taps that runs `action` on each recognition.
pub fn tap_action<F>(
    count: u32,
    mut action: F,
) -> Result<OnEnded<TapGesture, impl FnMut(&u32)>, GestureError>
where
    F: FnMut(),
{
    let tap = TapGesture::new(TapConfig::default().with_required_tap_count(count))?;
    Ok(tap.on_ended(move |_| action()))
}

/// A long-press recognizer that runs `action` on recognition.
///
/// Also returns a [`GestureState`] that is `true` while a press is in
/// progress, for pressed-state feedback.
pub fn long_press_action<F>(
    config: LongPressConfig,
    mut action: F,
) -> Result<(AnyGesture<bool>, GestureState<bool>), GestureError>
where
    F: FnMut() + 'static,
{
    let pressing = GestureState::new(false);
    let gesture = LongPressGesture::new(config)?
        .updating(&pressing, |_| true)
        .on_ended(move |_| action())
        .boxed();
    Ok((gesture, pressing))
}
