//! Channel references: live handles and their persisted form.
//!
//! ## Contents
//! - [`ChannelHandle`] identity-bearing reference to one channel of one bus
//! - [`ChannelState`] the `{ "typeID", "nameID" }` record a handle saves to and loads from

mod handle;
mod state;

pub use handle::ChannelHandle;
pub use state::{ChannelState, NAME_FIELD, TYPE_FIELD};
