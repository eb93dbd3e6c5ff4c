//! # switchboard
//!
//! **Switchboard** is an in-process notification bus that lets modules with no
//! dependency on each other exchange messages.
//!
//! There are two modes of communication:
//! - **Signals** broadcast a message: everything listening for that signal type
//!   receives it, then the message is gone. Useful for wiring actions triggered
//!   deep inside shared components up to the application.
//! - **Channels** are identified by a type and a name and usually referenced by
//!   a [`ChannelHandle`]. A channel holds the value most recently set on it
//!   until it is overwritten, which makes it the place for persistent shared
//!   state such as the current selection or the active tool.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   module A                 module B                 module C
//!      │ handle(type, name)     │ set_channel_data        │ send_signal(type, data)
//!      ▼                        ▼                         ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus (single thread, synchronous)                                 │
//! │  - ChannelTable: typeID → nameID → slot { data: Box<dyn Payload> }│
//! │  - channel-list callbacks      (fired when a new slot appears)    │
//! │  - channel-changed callbacks   (fired on every set)               │
//! │  - signal callbacks per typeID (fired on send, payload dropped)   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!    callback 1         callback 2         callback N   (registration order)
//! ```
//!
//! ### Ownership
//! ```text
//! caller ──Box<dyn Payload>──► set_channel_data ──► slot (until next set / bus drop)
//! caller ──Box<dyn Payload>──► send_signal ──► &dyn Payload to each callback ──► drop
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types                              |
//! |-------------------|--------------------------------------------------------------|----------------------------------------|
//! | **Bus**           | Channel registry and synchronous dispatcher.                 | [`Bus`], [`BusBuilder`], [`BusConfig`] |
//! | **Channels**      | Identity-bearing handles and their persisted form.           | [`ChannelHandle`], [`ChannelState`]    |
//! | **Subscriptions** | Register/unregister the three kinds of callbacks.            | [`Subscription`], [`SubscriptionKind`] |
//! | **Payloads**      | Any `'static` value, moved in as `Box<dyn Payload>`.         | [`Payload`]                            |
//! | **Identifiers**   | Interned tokens naming channel types and instances.          | [`Id`]                                 |
//! | **Errors**        | Strict decoding of persisted channel references.             | [`StateError`]                         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`ChannelLogger`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use switchboard::{Bus, ChannelHandle, Id};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Tool(&'static str);
//!
//! let bus = Bus::new();
//! let tool = Id::new("tool");
//! let undo = Id::new("undo");
//!
//! // A toolbar publishes the active tool on a channel...
//! let active = bus.handle(&tool, &Id::new("active"));
//! bus.set(&active, Tool("pen"));
//!
//! // ...and any other module can read it without knowing the toolbar.
//! let same = bus.handle(&tool, &Id::new("active"));
//! assert_eq!(same.data_as::<Tool>(), Some(Tool("pen")));
//!
//! // Signals are fire-and-forget.
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let l = Rc::clone(&log);
//! let sub = bus.register_signal_callback(&undo, move |_, data| {
//!     l.borrow_mut().push(data.and_then(|d| d.downcast_ref::<u32>()).copied());
//! });
//! bus.emit(&undo, 3u32);
//! assert_eq!(*log.borrow(), vec![Some(3)]);
//! bus.unregister(&sub);
//!
//! // Handles persist as a (typeID, nameID) record and resolve back on load.
//! let saved = active.save_state();
//! let mut restored = ChannelHandle::default();
//! restored.load_state(&saved, &bus);
//! assert!(restored == active);
//! ```
mod channels;
mod core;
mod error;
mod id;
mod payload;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Bus, BusBuilder, BusConfig};
pub use channels::{ChannelHandle, ChannelState, NAME_FIELD, TYPE_FIELD};
pub use error::StateError;
pub use id::Id;
pub use payload::Payload;
pub use subscribers::{
    ChannelChangedCallback, ChannelListCallback, SignalCallback, Subscription, SubscriptionKind,
};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::ChannelLogger;
