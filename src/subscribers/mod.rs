//! # Subscriptions and subscriber lists.
//!
//! Three notification kinds can be subscribed to on a [`Bus`](crate::Bus):
//!
//! ```text
//! handle(new pair) ──► channel-list callbacks     Fn()
//! set_channel_data ──► channel-changed callbacks  Fn(&typeID, &nameID, Option<&dyn Payload>)
//! send_signal(t)   ──► signal callbacks of `t`    Fn(&typeID, Option<&dyn Payload>)
//! ```
//!
//! Each `register_*` call returns a [`Subscription`] token; pass it to
//! [`Bus::unregister`](crate::Bus::unregister) to stop receiving.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use switchboard::{Bus, Id, SubscriptionKind};
//!
//! let bus = Bus::new();
//! let refresh = Id::new("refresh");
//! let hits = Rc::new(Cell::new(0));
//!
//! let h = Rc::clone(&hits);
//! let sub = bus.register_signal_callback(&refresh, move |_, _| h.set(h.get() + 1));
//! assert_eq!(sub.kind(), &SubscriptionKind::Signal(refresh.clone()));
//!
//! bus.send_signal(&refresh, None);
//! bus.unregister(&sub);
//! bus.send_signal(&refresh, None);
//! assert_eq!(hits.get(), 1);
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscription;

#[cfg(feature = "logging")]
pub use log::ChannelLogger;
pub use set::{ChannelChangedCallback, ChannelListCallback, SignalCallback};
pub(crate) use set::{SignalSubscribers, SubscriberList};
pub use subscription::{Subscription, SubscriptionKind};
