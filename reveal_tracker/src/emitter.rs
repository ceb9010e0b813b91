// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed milestone emitter.
//!
//! ## Contract
//!
//! - Listeners are registered per [`Milestone`] and invoked in registration order.
//! - No de-duplication: registering the same closure twice invokes it twice.
//! - A failing listener is logged and skipped; the remaining listeners still run and
//!   the failure is never retried or propagated.
//! - The emitter does not latch. At-most-once delivery comes from the caller only emitting
//!   milestones that [`DisclosureState`](crate::state::DisclosureState) reports as newly fired.
//!
//! Listeners may return `()` or `Result<(), E>` for any `E: Display`.
//! With the `std` feature, a panicking listener is caught and treated as a failure too.
//! Without it, a panic unwinds out of [`MilestoneEmitter::emit`] and skips the listeners after it.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::types::Milestone;

/// Error reported by a listener.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Return types accepted from listeners.
pub trait ListenerOutcome {
    /// Convert into a uniform result.
    fn into_outcome(self) -> Result<(), ListenerError>;
}

impl ListenerOutcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), ListenerError> {
        Ok(())
    }
}

impl<E: core::fmt::Display> ListenerOutcome for Result<(), E> {
    fn into_outcome(self) -> Result<(), ListenerError> {
        self.map_err(|e| ListenerError::new(e.to_string()))
    }
}

/// Handle to a registered listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u64);

/// Delivery counts from one [`MilestoneEmitter::emit`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EmitReport {
    /// Listeners that returned successfully.
    pub delivered: usize,
    /// Listeners that returned an error or panicked.
    pub failed: usize,
}

type Listener = Box<dyn FnMut() -> Result<(), ListenerError>>;

struct Entry {
    id: ListenerId,
    listener: Listener,
}

/// Ordered listener lists, one per [`Milestone`].
pub struct MilestoneEmitter {
    slots: [Vec<Entry>; 2],
    next_id: u64,
}

impl core::fmt::Debug for MilestoneEmitter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MilestoneEmitter")
            .field("turn6", &self.len(Milestone::Turn6))
            .field("end", &self.len(Milestone::End))
            .finish_non_exhaustive()
    }
}

impl Default for MilestoneEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl MilestoneEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            slots: [Vec::new(), Vec::new()],
            next_id: 0,
        }
    }

    /// Append a listener for `milestone`.
    pub fn on<F, R>(&mut self, milestone: Milestone, mut listener: F) -> ListenerId
    where
        F: FnMut() -> R + 'static,
        R: ListenerOutcome,
    {
        let id = self.next_id();
        self.slots[milestone.slot()].push(Entry {
            id,
            listener: Box::new(move || listener().into_outcome()),
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for slot in &mut self.slots {
            if let Some(pos) = slot.iter().position(|e| e.id == id) {
                slot.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of listeners for `milestone`.
    pub fn len(&self, milestone: Milestone) -> usize {
        self.slots[milestone.slot()].len()
    }

    /// True if no listeners are registered at all.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Invoke every listener for `milestone` in registration order.
    pub fn emit(&mut self, milestone: Milestone) -> EmitReport {
        let mut report = EmitReport::default();
        for (position, entry) in self.slots[milestone.slot()].iter_mut().enumerate() {
            match invoke(&mut entry.listener) {
                Ok(()) => report.delivered += 1,
                Err(Failure::Error(err)) => {
                    report.failed += 1;
                    tracing::warn!(
                        target: "reveal.tracker",
                        milestone = milestone.as_str(),
                        position,
                        error = %err,
                        "milestone listener failed"
                    );
                }
                #[cfg(feature = "std")]
                Err(Failure::Panic(msg)) => {
                    report.failed += 1;
                    tracing::error!(
                        target: "reveal.tracker",
                        milestone = milestone.as_str(),
                        position,
                        panic_msg = %msg,
                        "milestone listener panicked"
                    );
                }
            }
        }
        report
    }

    /// Allocate an id without registering anything.
    pub(crate) fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }
}

enum Failure {
    Error(ListenerError),
    #[cfg(feature = "std")]
    Panic(String),
}

#[cfg(feature = "std")]
fn invoke(listener: &mut Listener) -> Result<(), Failure> {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    match catch_unwind(AssertUnwindSafe(|| listener())) {
        Ok(result) => result.map_err(Failure::Error),
        Err(payload) => Err(Failure::Panic(panic_message(payload.as_ref()))),
    }
}

#[cfg(not(feature = "std"))]
fn invoke(listener: &mut Listener) -> Result<(), Failure> {
    listener().map_err(Failure::Error)
}

#[cfg(feature = "std")]
fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
