// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch boundary between a view tree and its gestures.
//!
//! A [`GestureHost`] owns type-erased gestures attached to the embedder's
//! node ids. It routes already-targeted pointer events to them, advances
//! their clocks, and reports what happened as [`GestureNotification`]s so an
//! adapter can schedule view updates. Translating platform input and deciding
//! which node an event targets stay with the embedder.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_gesture::{
//!     GestureHost, GestureNotification, GesturePhase, PointerEvent, TapGesture,
//! };
//!
//! let ms = Duration::from_millis;
//! let mut host: GestureHost<u32> = GestureHost::new();
//! let tap = host.attach(7, TapGesture::default());
//!
//! host.dispatch_to_node(&7, &PointerEvent::down((0.0, 0.0), ms(0)));
//! let notes = host.dispatch_to_node(&7, &PointerEvent::up((0.0, 0.0), ms(60)));
//! assert_eq!(
//!     notes.as_slice(),
//!     [GestureNotification::Finished { handle: tap, node: 7, phase: GesturePhase::Completed }]
//! );
//! assert_eq!(host.value::<u32>(tap), Ok(Some(&1)));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::Hash;
use core::time::Duration;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{Gesture, GestureError, GesturePhase, PhaseChange, PhaseSet, PointerEvent};

/// Identifier for a gesture attached to a [`GestureHost`].
///
/// A slot index plus a generation counter. Detaching frees the slot; when the
/// slot is reused its generation increments, so stale handles never alias a
/// newer gesture.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GestureHandle(pub(crate) u32, pub(crate) u32);

impl GestureHandle {
    const fn idx(self) -> usize {
        self.0 as usize
    }

    const fn generation(self) -> u32 {
        self.1
    }
}

/// Something an adapter should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureNotification<K> {
    /// A step landed in `Began` or `Changed` and either entered a phase or
    /// produced a different value.
    Changed {
        /// The gesture.
        handle: GestureHandle,
        /// The node it is attached to.
        node: K,
        /// `Began` or `Changed`.
        phase: GesturePhase,
    },
    /// A step entered a terminal phase, possibly on its way back to `Began`.
    Finished {
        /// The gesture.
        handle: GestureHandle,
        /// The node it is attached to.
        node: K,
        /// `Completed`, `Cancelled` or `Failed`.
        phase: GesturePhase,
    },
    /// A gesture rejected an event; its state is unchanged.
    Rejected {
        /// The gesture.
        handle: GestureHandle,
        /// The node it is attached to.
        node: K,
        /// Why.
        error: GestureError,
    },
}

/// Notifications produced by one host call.
pub type Notifications<K> = SmallVec<[GestureNotification<K>; 2]>;

/// The outcome of one step seen through the erased interface.
struct Step {
    change: PhaseChange,
    value_changed: bool,
}

/// Object-safe view of a gesture whose value can be compared and downcast.
trait Tracked {
    fn phase(&self) -> GesturePhase;
    fn handle_event(&mut self, event: &PointerEvent) -> Result<Step, GestureError>;
    fn poll(&mut self, now: Duration) -> Result<Step, GestureError>;
    fn reset(&mut self);
    fn value_any(&self) -> &dyn Any;
}

struct Watched<G>(G);

impl<G> Watched<G>
where
    G: Gesture,
    G::Value: PartialEq + Clone,
{
    fn step(
        &mut self,
        run: impl FnOnce(&mut G) -> Result<PhaseChange, GestureError>,
    ) -> Result<Step, GestureError> {
        let before = self.0.value().clone();
        let change = run(&mut self.0)?;
        Ok(Step {
            change,
            value_changed: *self.0.value() != before,
        })
    }
}

impl<G> Tracked for Watched<G>
where
    G: Gesture,
    G::Value: PartialEq + Clone + 'static,
{
    fn phase(&self) -> GesturePhase {
        self.0.phase()
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Result<Step, GestureError> {
        self.step(|g| g.handle_event(event))
    }

    fn poll(&mut self, now: Duration) -> Result<Step, GestureError> {
        self.step(|g| g.poll(now))
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    fn value_any(&self) -> &dyn Any {
        self.0.value()
    }
}

struct Entry<K> {
    node: K,
    gesture: Box<dyn Tracked>,
}

struct Slot<K> {
    generation: u32,
    entry: Option<Entry<K>>,
}

/// Gestures attached to nodes, addressed by [`GestureHandle`].
///
/// Several gestures may be attached to one node; node-wide dispatch visits
/// them in attachment order.
pub struct GestureHost<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    by_node: HashMap<K, SmallVec<[GestureHandle; 2]>>,
}

impl<K> Default for GestureHost<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_node: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> GestureHost<K> {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached gestures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no gesture is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches `gesture` to `node` and returns its handle.
    pub fn attach<G>(&mut self, node: K, gesture: G) -> GestureHandle
    where
        G: Gesture + 'static,
        G::Value: PartialEq + Clone + 'static,
    {
        let entry = Entry {
            node: node.clone(),
            gesture: Box::new(Watched(gesture)),
        };
        let handle = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = Some(entry);
            GestureHandle(idx, slot.generation)
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX live gestures is not supported"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            GestureHandle(idx, 1)
        };
        self.by_node.entry(node).or_default().push(handle);
        tracing::debug!(?handle, "gesture attached");
        handle
    }

    /// Returns `true` if `handle` refers to an attached gesture.
    #[must_use]
    pub fn contains(&self, handle: GestureHandle) -> bool {
        self.entry(handle).is_ok()
    }

    /// Detaches and drops the gesture behind `handle`.
    pub fn detach(&mut self, handle: GestureHandle) -> Result<(), GestureError> {
        let node = self.entry(handle)?.node.clone();
        if let Some(handles) = self.by_node.get_mut(&node) {
            handles.retain(|h| *h != handle);
            if handles.is_empty() {
                self.by_node.remove(&node);
            }
        }
        self.release(handle);
        Ok(())
    }

    /// Detaches every gesture attached to `node`. Returns how many there were.
    pub fn detach_node(&mut self, node: &K) -> usize {
        let Some(handles) = self.by_node.remove(node) else {
            return 0;
        };
        for &handle in &handles {
            self.release(handle);
        }
        handles.len()
    }

    /// The gestures attached to `node`, in attachment order.
    #[must_use]
    pub fn handles(&self, node: &K) -> &[GestureHandle] {
        self.by_node
            .get(node)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// The current phase of a gesture.
    pub fn phase(&self, handle: GestureHandle) -> Result<GesturePhase, GestureError> {
        Ok(self.entry(handle)?.gesture.phase())
    }

    /// The current value of a gesture.
    ///
    /// Returns `Ok(None)` if the gesture's value is not a `V`.
    pub fn value<V: 'static>(&self, handle: GestureHandle) -> Result<Option<&V>, GestureError> {
        Ok(self.entry(handle)?.gesture.value_any().downcast_ref::<V>())
    }

    /// Resets a gesture to its initial phase and value.
    pub fn reset(&mut self, handle: GestureHandle) -> Result<(), GestureError> {
        self.entry_mut(handle)?.gesture.reset();
        Ok(())
    }

    /// Delivers `event` to one gesture.
    ///
    /// A gesture that rejects the event reports the error here and keeps its
    /// previous state.
    pub fn dispatch(
        &mut self,
        handle: GestureHandle,
        event: &PointerEvent,
    ) -> Result<Notifications<K>, GestureError> {
        let entry = self.entry_mut(handle)?;
        let step = entry.gesture.handle_event(event).inspect_err(|err| {
            tracing::warn!(?handle, kind = ?event.kind, %err, "gesture rejected event");
        })?;
        let mut out = Notifications::new();
        notify(&mut out, handle, &entry.node, &step);
        Ok(out)
    }

    /// Delivers `event` to every gesture attached to `node`.
    ///
    /// Every gesture sees the event even if another rejects it; rejections
    /// are reported as [`GestureNotification::Rejected`].
    pub fn dispatch_to_node(&mut self, node: &K, event: &PointerEvent) -> Notifications<K> {
        let mut out = Notifications::new();
        let Some(handles) = self.by_node.get(node) else {
            return out;
        };
        for &handle in handles {
            let Some(entry) = self
                .slots
                .get_mut(handle.idx())
                .and_then(|slot| slot.entry.as_mut())
            else {
                continue;
            };
            match entry.gesture.handle_event(event) {
                Ok(step) => notify(&mut out, handle, node, &step),
                Err(error) => {
                    tracing::warn!(?handle, kind = ?event.kind, %error, "gesture rejected event");
                    out.push(GestureNotification::Rejected {
                        handle,
                        node: node.clone(),
                        error,
                    });
                }
            }
        }
        out
    }

    /// Advances every attached gesture's clock to `now`.
    pub fn poll(&mut self, now: Duration) -> Notifications<K> {
        let mut out = Notifications::new();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            #[expect(
                clippy::cast_possible_truncation,
                reason = "slot indices are allocated from u32"
            )]
            let handle = GestureHandle(idx as u32, slot.generation);
            match entry.gesture.poll(now) {
                Ok(step) => notify(&mut out, handle, &entry.node, &step),
                Err(error) => {
                    tracing::warn!(?handle, %error, "gesture rejected clock advance");
                    out.push(GestureNotification::Rejected {
                        handle,
                        node: entry.node.clone(),
                        error,
                    });
                }
            }
        }
        out
    }

    fn entry(&self, handle: GestureHandle) -> Result<&Entry<K>, GestureError> {
        self.slots
            .get(handle.idx())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(GestureError::StaleHandle(handle))
    }

    fn entry_mut(&mut self, handle: GestureHandle) -> Result<&mut Entry<K>, GestureError> {
        self.slots
            .get_mut(handle.idx())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(GestureError::StaleHandle(handle))
    }

    /// Frees a live slot. The node index is the caller's business.
    fn release(&mut self, handle: GestureHandle) {
        if let Some(slot) = self.slots.get_mut(handle.idx())
            && slot.generation == handle.generation()
            && slot.entry.take().is_some()
        {
            self.free.push(handle.0);
            tracing::debug!(?handle, "gesture detached");
        }
    }
}

fn notify<K: Clone>(out: &mut Notifications<K>, handle: GestureHandle, node: &K, step: &Step) {
    let change = step.change;
    // A terminal phase passed through on the way to a new interaction.
    for phase in (change.visited & PhaseSet::TERMINAL).phases() {
        if phase != change.current {
            out.push(GestureNotification::Finished {
                handle,
                node: node.clone(),
                phase,
            });
        }
    }
    if change.current.is_active() && (change.moved() || step.value_changed) {
        out.push(GestureNotification::Changed {
            handle,
            node: node.clone(),
            phase: change.current,
        });
    } else if change.finished() {
        out.push(GestureNotification::Finished {
            handle,
            node: node.clone(),
            phase: change.current,
        });
    }
}

impl<K: fmt::Debug> fmt::Debug for GestureHost<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureHost")
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .field("nodes", &self.by_node.keys().collect::<Vec<_>>())
            .finish()
    }
}
