// ============================================================================
// spark-lookup - Observer Lists
// Synchronous, registration-ordered callback registries
// ============================================================================
//
// Every observable thing in this crate (lookups, groups) holds one or more
// `Observers<E>`. Delivery is:
// - synchronous: `notify` returns after every callback ran
// - ordered: callbacks run in the order they subscribed
// - unguarded: a panicking callback unwinds into the mutating caller
//
// There is no batching and no deferred delivery.
// ============================================================================

use std::cell::Cell;
use std::fmt;

use crate::core::types::SubscriptionId;

/// Callback type stored in an observer list.
pub type ObserverFn<E> = Box<dyn FnMut(&E)>;

// =============================================================================
// OBSERVERS
// =============================================================================

/// A list of callbacks interested in events of type `E`.
pub struct Observers<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, ObserverFn<E>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a callback. Returns the id needed to unsubscribe it.
    pub fn subscribe(&mut self, observer: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        // `retain` keeps the rest in registration order
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver `event` to every callback, in registration order.
    pub fn notify(&mut self, event: &E) {
        for (_, observer) in self.entries.iter_mut() {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

// =============================================================================
// REENTRANCY FLAG
// =============================================================================

/// Detects mutation of an observable from inside its own notification.
///
/// Only needed where mutation goes through `&self` (shared groups). The
/// lookup mutates through `&mut self`, so the borrow checker (or a
/// `RefCell` around it) already rules reentrancy out.
#[derive(Debug, Default)]
pub(crate) struct ReentrancyFlag {
    active: Cell<bool>,
}

impl ReentrancyFlag {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Panics if a notification is already being delivered.
    pub(crate) fn check(&self, operation: &str) {
        assert!(
            !self.is_active(),
            "reentrant {operation} while change notifications are being delivered"
        );
    }

    /// Mark delivery as in progress until the guard drops (also on unwind).
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        self.check("notification");
        self.active.set(true);
        ReentrancyGuard { flag: &self.active }
    }
}

pub(crate) struct ReentrancyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

// =============================================================================
// TESTS
// =============================================================================
