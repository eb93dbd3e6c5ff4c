//! Bus core: channel table, dispatch and construction.
//!
//! The public API from this module is [`Bus`], [`BusBuilder`] and [`BusConfig`].
//!
//! Internal modules:
//! - [`bus`]: the registry and dispatcher;
//! - [`registry`]: the channel table (slot arena plus `(typeID, nameID)` index);
//! - [`builder`]: pre-wiring callbacks and channels before first use;
//! - [`config`]: settings a bus is created with.

mod builder;
mod bus;
mod config;
mod registry;

pub use builder::BusBuilder;
pub use bus::Bus;
pub(crate) use bus::Shared;
pub use config::BusConfig;
