//! # The notification bus.
//!
//! [`Bus`] owns the channel table and the three subscriber lists, and performs
//! all dispatch synchronously on the calling thread.
//!
//! ## Architecture
//! ```text
//! handle(type, name) ──► ChannelTable::find ──(miss)──► insert ──► channel-list callbacks
//!          │
//!          ▼
//!    ChannelHandle ──► set_channel_data(handle, data)
//!                         ├─ handle not live here ─► drop(data), no notification
//!                         └─ replace slot data ─► drop(previous) ─► channel-changed callbacks
//!
//! send_signal(type, data) ──► signal callbacks of `type` ──► drop(data)
//! ```
//!
//! ## Rules
//! - Single-threaded: `Bus` is neither `Send` nor `Sync`.
//! - Every call runs to completion, including delivery to every subscriber.
//! - Callbacks may call back into the bus: read any channel, create channels,
//!   set other channels, send signals. Cascades nest synchronously.
//! - Two reentrant calls are rejected with a panic: setting the channel whose
//!   change is being delivered, and (un)registering on the list being dispatched.
//! - A panicking callback unwinds through the dispatching call. Payloads owned
//!   by that call are still dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::config::BusConfig;
use super::registry::{ChannelTable, DataCell};
use crate::channels::ChannelHandle;
use crate::id::Id;
use crate::payload::Payload;
use crate::subscribers::{
    ChannelChangedCallback, ChannelListCallback, SignalSubscribers, SubscriberList,
    Subscription, SubscriptionKind,
};

/// State shared between the bus and the handles it hands out.
///
/// Handles keep a `Weak` to it, so they never keep channel data alive.
pub(crate) struct Shared {
    pub(crate) cfg: BusConfig,
    pub(crate) channels: RefCell<ChannelTable>,
    list_subscribers: RefCell<SubscriberList<ChannelListCallback>>,
    changed_subscribers: RefCell<SubscriberList<ChannelChangedCallback>>,
    signal_subscribers: RefCell<SignalSubscribers>,
}

/// In-process registry of channels plus dispatcher of signals.
///
/// ### Properties
/// - **Channels**: `(typeID, nameID)` slots holding the most recently set payload.
/// - **Signals**: `(typeID, payload)` broadcasts, dropped once delivered.
/// - **Not cloneable**: the bus is the single owner of all channel data; dropping
///   it releases every payload and every callback.
///
/// ## Example
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use switchboard::{Bus, Id};
///
/// let bus = Bus::new();
/// let seen = Rc::new(Cell::new(0u32));
///
/// let s = Rc::clone(&seen);
/// let sub = bus.register_channel_changed_callback(move |_, _, data| {
///     if let Some(v) = data.and_then(|d| d.downcast_ref::<u32>()) {
///         s.set(*v);
///     }
/// });
///
/// let zoom = bus.handle(&Id::new("zoom"), &Id::new("main-view"));
/// bus.set_channel_data(&zoom, Some(Box::new(4u32)));
/// assert_eq!(seen.get(), 4);
/// assert_eq!(zoom.data_as::<u32>(), Some(4));
///
/// assert!(bus.unregister(&sub));
/// ```
pub struct Bus {
    shared: Rc<Shared>,
}

impl Bus {
    /// Creates a bus with [`BusConfig::default`].
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(cfg: BusConfig) -> Self {
        let channels = ChannelTable::new(cfg.reserved_channels());
        Self {
            shared: Rc::new(Shared {
                cfg,
                channels: RefCell::new(channels),
                list_subscribers: RefCell::new(SubscriberList::new()),
                changed_subscribers: RefCell::new(SubscriberList::new()),
                signal_subscribers: RefCell::new(SignalSubscribers::new()),
            }),
        }
    }

    /// Starts a [`BusBuilder`](super::BusBuilder).
    pub fn builder(cfg: BusConfig) -> super::BusBuilder {
        super::BusBuilder::new(cfg)
    }

    /// Label from the configuration.
    #[inline]
    pub fn label(&self) -> &str {
        &self.shared.cfg.label
    }

    // ---------------------------
    // Channels
    // ---------------------------

    /// Returns the handle of channel `(type_id, name_id)`, creating the channel
    /// on first use.
    ///
    /// - Either token invalid → an invalid handle; nothing changes.
    /// - New channel → every channel-list callback runs once, after the slot exists.
    /// - Existing channel → a handle equal to every earlier one; no notification.
    pub fn handle(&self, type_id: &Id, name_id: &Id) -> ChannelHandle {
        if !type_id.is_valid() || !name_id.is_valid() {
            debug!(
                bus = %self.label(),
                type_id = %type_id,
                name_id = %name_id,
                "channel lookup with invalid token"
            );
            return ChannelHandle::default();
        }

        let existing = self.shared.channels.borrow().find(type_id, name_id);
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = self
                    .shared
                    .channels
                    .borrow_mut()
                    .insert(type_id.clone(), name_id.clone());
                trace!(bus = %self.label(), type_id = %type_id, name_id = %name_id, "channel created");
                self.notify_channel_list();
                slot
            }
        };

        ChannelHandle::live(
            type_id.clone(),
            name_id.clone(),
            Rc::downgrade(&self.shared),
            slot,
        )
    }

    /// Snapshot of every known channel, grouped by type then name.
    pub fn channels(&self) -> HashMap<Id, HashMap<Id, ChannelHandle>> {
        let table = self.shared.channels.borrow();
        let mut out: HashMap<Id, HashMap<Id, ChannelHandle>> = HashMap::new();
        for (slot, s) in table.iter() {
            out.entry(s.type_id.clone()).or_default().insert(
                s.name_id.clone(),
                ChannelHandle::live(
                    s.type_id.clone(),
                    s.name_id.clone(),
                    Rc::downgrade(&self.shared),
                    slot,
                ),
            );
        }
        out
    }

    /// Handles of one channel type, ordered by the string of their `nameID`.
    pub fn sorted_handles(&self, type_id: &Id) -> Vec<ChannelHandle> {
        let table = self.shared.channels.borrow();
        let mut handles: Vec<ChannelHandle> = table
            .of_type(type_id)
            .filter_map(|slot| {
                let s = table.slot(slot)?;
                Some(ChannelHandle::live(
                    s.type_id.clone(),
                    s.name_id.clone(),
                    Rc::downgrade(&self.shared),
                    slot,
                ))
            })
            .collect();
        handles.sort_by(ChannelHandle::cmp_by_name);
        handles
    }

    /// Number of known channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.channels.borrow().len()
    }

    /// True if no channel was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the value of a channel; the bus takes ownership of `data`.
    ///
    /// - Handle not live on this bus (invalid, or from another bus) → `data` is
    ///   dropped and nothing is notified.
    /// - Otherwise the previous value is dropped, `data` is stored, and every
    ///   channel-changed callback runs once with the new value. `None` clears
    ///   the channel and still notifies.
    /// - Callbacks may set other channels. Setting this same channel from one
    ///   of its own channel-changed callbacks panics.
    pub fn set_channel_data(&self, handle: &ChannelHandle, data: Option<Box<dyn Payload>>) {
        let Some(slot) = self.owned_slot(handle) else {
            debug!(
                bus = %self.label(),
                type_id = %handle.type_id(),
                name_id = %handle.name_id(),
                "discarding data set through a handle this bus does not own"
            );
            drop(data);
            return;
        };

        // Detach the slot from the table so callbacks may touch other channels.
        let Some((type_id, name_id, cell)) = self.slot_entry(slot) else {
            return;
        };

        let previous = std::mem::replace(&mut *cell.borrow_mut(), data);
        // Dropped outside any borrow: a payload's Drop may read the bus.
        drop(previous);

        let value = cell.borrow();
        let subscribers = self.shared.changed_subscribers.borrow();
        if self.shared.cfg.log_dispatch {
            trace!(
                bus = %self.label(),
                type_id = %type_id,
                name_id = %name_id,
                subscribers = subscribers.len(),
                "channel changed"
            );
        }
        for callback in subscribers.iter() {
            callback(&type_id, &name_id, value.as_deref());
        }
    }

    /// Stores `value` in the channel behind `handle`.
    ///
    /// Shorthand for `set_channel_data(handle, Some(Box::new(value)))`.
    pub fn set<T: Payload>(&self, handle: &ChannelHandle, value: T) {
        self.set_channel_data(handle, Some(Box::new(value)));
    }

    /// Clears the value of a channel (subscribers are notified with `None`).
    pub fn clear(&self, handle: &ChannelHandle) {
        self.set_channel_data(handle, None);
    }

    /// Registers a callback for changes in the list of channels.
    pub fn register_channel_list_callback(&self, callback: impl Fn() + 'static) -> Subscription {
        let sub = Subscription::next(SubscriptionKind::ChannelList);
        self.shared
            .list_subscribers
            .borrow_mut()
            .push(sub.id(), Box::new(callback));
        sub
    }

    /// Registers a callback for channel value changes.
    pub fn register_channel_changed_callback(
        &self,
        callback: impl Fn(&Id, &Id, Option<&dyn Payload>) + 'static,
    ) -> Subscription {
        let sub = Subscription::next(SubscriptionKind::ChannelChanged);
        self.shared
            .changed_subscribers
            .borrow_mut()
            .push(sub.id(), Box::new(callback));
        sub
    }

    // ---------------------------
    // Signals
    // ---------------------------

    /// Registers a callback for signals of exactly `type_id`.
    pub fn register_signal_callback(
        &self,
        type_id: &Id,
        callback: impl Fn(&Id, Option<&dyn Payload>) + 'static,
    ) -> Subscription {
        let sub = Subscription::next(SubscriptionKind::Signal(type_id.clone()));
        self.shared
            .signal_subscribers
            .borrow_mut()
            .push(type_id.clone(), sub.id(), Box::new(callback));
        sub
    }

    /// Sends a signal; the bus takes ownership of `data`.
    ///
    /// Every callback registered for `type_id` runs once, in registration order,
    /// with the same payload. The payload is dropped after the last callback
    /// returns, or right away when nobody listens.
    pub fn send_signal(&self, type_id: &Id, data: Option<Box<dyn Payload>>) {
        let signals = self.shared.signal_subscribers.borrow();
        let Some(subscribers) = signals.get(type_id) else {
            return;
        };
        if self.shared.cfg.log_dispatch {
            trace!(
                bus = %self.label(),
                type_id = %type_id,
                subscribers = subscribers.len(),
                "signal sent"
            );
        }
        for callback in subscribers.iter() {
            callback(type_id, data.as_deref());
        }
    }

    /// Sends `value` as a signal payload.
    ///
    /// Shorthand for `send_signal(type_id, Some(Box::new(value)))`.
    pub fn emit<T: Payload>(&self, type_id: &Id, value: T) {
        self.send_signal(type_id, Some(Box::new(value)));
    }

    // ---------------------------
    // Subscriptions
    // ---------------------------

    /// Removes the registration behind `subscription`.
    ///
    /// Returns `false` (and changes nothing) if it is not registered, e.g. it
    /// was already removed or belongs to another bus.
    pub fn unregister(&self, subscription: &Subscription) -> bool {
        match subscription.kind() {
            SubscriptionKind::ChannelList => self
                .shared
                .list_subscribers
                .borrow_mut()
                .remove(subscription.id()),
            SubscriptionKind::ChannelChanged => self
                .shared
                .changed_subscribers
                .borrow_mut()
                .remove(subscription.id()),
            SubscriptionKind::Signal(type_id) => self
                .shared
                .signal_subscribers
                .borrow_mut()
                .remove(type_id, subscription.id()),
        }
    }

    /// Number of callbacks registered in the list `kind` names.
    #[must_use]
    pub fn subscriber_count(&self, kind: &SubscriptionKind) -> usize {
        match kind {
            SubscriptionKind::ChannelList => self.shared.list_subscribers.borrow().len(),
            SubscriptionKind::ChannelChanged => self.shared.changed_subscribers.borrow().len(),
            SubscriptionKind::Signal(type_id) => {
                self.shared.signal_subscribers.borrow().len(type_id)
            }
        }
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Slot index of `handle` if it points into this bus.
    fn owned_slot(&self, handle: &ChannelHandle) -> Option<usize> {
        let (bus, slot) = handle.slot_ref()?;
        if Weak::as_ptr(bus) != Rc::as_ptr(&self.shared) {
            return None;
        }
        Some(slot)
    }

    /// Identity and value cell of a slot, cloned out of the table borrow.
    fn slot_entry(&self, slot: usize) -> Option<(Id, Id, DataCell)> {
        let table = self.shared.channels.borrow();
        let s = table.slot(slot)?;
        Some((s.type_id.clone(), s.name_id.clone(), Rc::clone(&s.data)))
    }

    fn notify_channel_list(&self) {
        let subscribers = self.shared.list_subscribers.borrow();
        if self.shared.cfg.log_dispatch {
            trace!(bus = %self.label(), subscribers = subscribers.len(), "channel list changed");
        }
        for callback in subscribers.iter() {
            callback();
        }
    }

    #[cfg(test)]
    pub(crate) fn signal_type_count(&self) -> usize {
        self.shared.signal_subscribers.borrow().type_count()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("label", &self.label())
            .field("channels", &self.len())
            .finish_non_exhaustive()
    }
}
