//! # Subscriber lists.
//!
//! [`SubscriberList`] holds the callbacks of one notification kind in
//! registration order. [`SignalSubscribers`] keeps one list per signal type.
//!
//! ## What it guarantees
//! - Dispatch visits callbacks in registration order.
//! - Duplicates are kept: the same closure registered twice runs twice.
//! - `remove` drops only the first entry with the given id.
//! - A signal type whose list becomes empty is reclaimed.
//!
//! ## What it does **not** guarantee
//! - No protection against registering or unregistering from inside a callback
//!   of the same list: the owning `RefCell` is borrowed during dispatch and
//!   such a call panics.

use std::collections::HashMap;

use crate::id::Id;
use crate::payload::Payload;

/// Callback for changes in the list of channels.
pub type ChannelListCallback = dyn Fn();

/// Callback for a channel whose value was set: `(typeID, nameID, new value)`.
pub type ChannelChangedCallback = dyn Fn(&Id, &Id, Option<&dyn Payload>);

/// Callback for a signal: `(typeID, payload)`.
pub type SignalCallback = dyn Fn(&Id, Option<&dyn Payload>);

/// Callbacks of one kind, keyed by subscription id.
pub(crate) struct SubscriberList<F: ?Sized> {
    entries: Vec<(u64, Box<F>)>,
}

impl<F: ?Sized> SubscriberList<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, id: u64, callback: Box<F>) {
        self.entries.push((id, callback));
    }

    /// Removes the first entry registered under `id`.
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Callbacks in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &F> {
        self.entries.iter().map(|(_, cb)| &**cb)
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Signal callbacks grouped by signal type, created lazily and reaped when empty.
pub(crate) struct SignalSubscribers {
    by_type: HashMap<Id, SubscriberList<SignalCallback>>,
}

impl SignalSubscribers {
    pub(crate) fn new() -> Self {
        Self {
            by_type: HashMap::new(),
        }
    }

    pub(crate) fn push(&mut self, type_id: Id, id: u64, callback: Box<SignalCallback>) {
        self.by_type
            .entry(type_id)
            .or_insert_with(SubscriberList::new)
            .push(id, callback);
    }

    pub(crate) fn remove(&mut self, type_id: &Id, id: u64) -> bool {
        let Some(list) = self.by_type.get_mut(type_id) else {
            return false;
        };
        let removed = list.remove(id);
        if list.is_empty() {
            self.by_type.remove(type_id);
        }
        removed
    }

    pub(crate) fn get(&self, type_id: &Id) -> Option<&SubscriberList<SignalCallback>> {
        self.by_type.get(type_id)
    }

    pub(crate) fn len(&self, type_id: &Id) -> usize {
        self.get(type_id).map_or(0, SubscriberList::len)
    }

    /// Number of signal types that currently have at least one subscriber.
    #[cfg(test)]
    pub(crate) fn type_count(&self) -> usize {
        self.by_type.len()
    }
}
