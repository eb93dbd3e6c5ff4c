//! # Subscription tokens.
//!
//! Every `register_*` call on the [`Bus`](crate::Bus) returns a [`Subscription`].
//! The token is the only key accepted by [`Bus::unregister`](crate::Bus::unregister):
//! two registrations of the same closure get two distinct tokens, so removing
//! one never removes the other.
//!
//! ## Rules
//! - Token ids come from a process-wide counter, so a token from one bus never
//!   matches an entry of another bus.
//! - Unregistering a token twice is a no-op the second time.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::id::Id;

/// Global sequence for subscription ids.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Which notification list a subscription belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionKind {
    /// The set of known channels changed (no arguments).
    ChannelList,
    /// A channel's value was set.
    ChannelChanged,
    /// A signal of exactly this type was sent.
    Signal(Id),
}

/// Receipt for a registered callback; pass it back to unregister.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "dropping a Subscription leaves the callback registered with no way to remove it"]
pub struct Subscription {
    id: u64,
    kind: SubscriptionKind,
}

impl Subscription {
    pub(crate) fn next(kind: SubscriptionKind) -> Self {
        Self {
            id: SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
        }
    }

    /// Unique id of this registration.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The list this registration lives in.
    #[inline]
    pub fn kind(&self) -> &SubscriptionKind {
        &self.kind
    }
}
