//! # Channel handles.
//!
//! A [`ChannelHandle`] identifies one channel slot inside one bus.
//!
//! ## Identity
//! ```text
//! ChannelHandle { typeID, nameID, slot: Option<(Weak<bus>, index)> }
//!                                        └─ equality compares this pair only
//! ```
//!
//! ## Rules
//! - Two handles are equal iff both point at the same slot of the same bus.
//! - A handle without a slot (invalid tokens, [`Default`]) equals nothing,
//!   not even itself.
//! - A handle never keeps the bus alive: once the bus is dropped, reads see no data.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Weak;

use serde_json::Value;

use super::state::ChannelState;
use crate::core::{Bus, Shared};
use crate::id::Id;
use crate::payload::Payload;

/// Position of a channel inside a specific bus.
#[derive(Clone)]
struct SlotRef {
    bus: Weak<Shared>,
    index: usize,
}

/// Cheap, cloneable reference to one channel of one bus.
#[derive(Clone, Default)]
pub struct ChannelHandle {
    type_id: Id,
    name_id: Id,
    slot: Option<SlotRef>,
}

impl ChannelHandle {
    pub(crate) fn live(type_id: Id, name_id: Id, bus: Weak<Shared>, index: usize) -> Self {
        Self {
            type_id,
            name_id,
            slot: Some(SlotRef { bus, index }),
        }
    }

    pub(crate) fn slot_ref(&self) -> Option<(&Weak<Shared>, usize)> {
        self.slot.as_ref().map(|s| (&s.bus, s.index))
    }

    /// The type token (may be invalid).
    #[inline]
    pub fn type_id(&self) -> &Id {
        &self.type_id
    }

    /// The name token (may be invalid).
    #[inline]
    pub fn name_id(&self) -> &Id {
        &self.name_id
    }

    /// True iff both tokens are valid.
    ///
    /// Says nothing about whether the bus is still alive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.type_id.is_valid() && self.name_id.is_valid()
    }

    /// True if the tokens equal `(type_id, name_id)`.
    #[inline]
    pub fn is(&self, type_id: &Id, name_id: &Id) -> bool {
        self.type_id == *type_id && self.name_id == *name_id
    }

    /// Runs `f` with the channel's current value.
    ///
    /// `f` receives `None` when the channel is empty or the handle does not
    /// reference a live slot.
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&dyn Payload>) -> R) -> R {
        let Some(slot) = &self.slot else {
            return f(None);
        };
        let Some(shared) = slot.bus.upgrade() else {
            return f(None);
        };
        let Some(cell) = shared.channels.borrow().cell(slot.index) else {
            return f(None);
        };
        let value = cell.borrow();
        f(value.as_deref())
    }

    /// Clones the channel's value out if it is a `T`.
    pub fn data_as<T: Any + Clone>(&self) -> Option<T> {
        self.with_data(|data| data.and_then(|d| d.downcast_ref::<T>()).cloned())
    }

    /// True if the channel currently holds a value.
    pub fn has_data(&self) -> bool {
        self.with_data(|data| data.is_some())
    }

    /// Persistable `(typeID, nameID)` record of this handle.
    pub fn save_state(&self) -> Value {
        ChannelState::from(self).to_value()
    }

    /// Re-resolves this handle on `bus` from a record made by [`save_state`](Self::save_state).
    ///
    /// Creates the channel if `bus` does not know it yet. Missing or malformed
    /// fields produce an invalid handle.
    pub fn load_state(&mut self, state: &Value, bus: &Bus) {
        *self = ChannelState::lenient(state).resolve(bus);
    }

    /// Orders handles by the string of their `nameID`.
    pub fn cmp_by_name(lhs: &ChannelHandle, rhs: &ChannelHandle) -> Ordering {
        lhs.name_id.as_str().cmp(rhs.name_id.as_str())
    }
}

impl PartialEq for ChannelHandle {
    fn eq(&self, other: &Self) -> bool {
        match (&self.slot, &other.slot) {
            (Some(a), Some(b)) => a.index == b.index && Weak::ptr_eq(&a.bus, &b.bus),
            _ => false,
        }
    }
}

impl fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("type_id", &self.type_id)
            .field("name_id", &self.name_id)
            .field("live", &self.slot.as_ref().is_some_and(|s| s.bus.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    struct Rgb(u8, u8, u8);

    #[test]
    fn test_default_handle_is_invalid_and_empty() {
        let h = ChannelHandle::default();
        assert!(!h.is_valid());
        assert!(!h.has_data());
        assert!(h != ChannelHandle::default());
        assert!(h != h.clone());
        assert!(!h.type_id().is_valid());
    }

    #[test]
    fn test_is_compares_tokens() {
        let bus = Bus::new();
        let h = bus.handle(&Id::new("color"), &Id::new("fg"));
        assert!(h.is(&Id::new("color"), &Id::new("fg")));
        assert!(!h.is(&Id::new("color"), &Id::new("bg")));
    }

    #[test]
    fn test_typed_read() {
        let bus = Bus::new();
        let h = bus.handle(&Id::new("color"), &Id::new("fg"));
        assert_eq!(h.data_as::<Rgb>(), None);

        bus.set(&h, Rgb(1, 2, 3));
        assert_eq!(h.data_as::<Rgb>(), Some(Rgb(1, 2, 3)));
        assert_eq!(h.data_as::<u32>(), None);
        assert!(h.with_data(|d| d.is_some_and(|d| d.is::<Rgb>())));
    }

    #[test]
    fn test_handles_from_different_buses_differ() {
        let a = Bus::new();
        let b = Bus::new();
        let (t, n) = (Id::new("color"), Id::new("fg"));
        assert!(a.handle(&t, &n) != b.handle(&t, &n));
    }

    #[test]
    fn test_save_state_shape() {
        let bus = Bus::new();
        let h = bus.handle(&Id::new("camera"), &Id::new("overview"));
        assert_eq!(
            h.save_state(),
            json!({"typeID": "camera", "nameID": "overview"})
        );
        assert_eq!(
            ChannelHandle::default().save_state(),
            json!({"typeID": "", "nameID": ""})
        );
    }

    #[test]
    fn test_round_trip_on_same_bus() {
        let bus = Bus::new();
        let original = bus.handle(&Id::new("camera"), &Id::new("overview"));
        let saved = original.save_state();

        let mut restored = ChannelHandle::default();
        restored.load_state(&saved, &bus);

        assert!(restored == original);
        assert!(restored == bus.handle(&Id::new("camera"), &Id::new("overview")));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_load_state_creates_missing_channel() {
        let source = Bus::new();
        let saved = source.handle(&Id::new("tool"), &Id::new("pen")).save_state();

        let target = Bus::new();
        let created = Rc::new(Cell::new(0));
        let c = Rc::clone(&created);
        let _sub = target.register_channel_list_callback(move || c.set(c.get() + 1));

        let mut h = ChannelHandle::default();
        h.load_state(&saved, &target);

        assert!(h.is_valid());
        assert_eq!(created.get(), 1);
        assert!(h == target.handle(&Id::new("tool"), &Id::new("pen")));
        assert_eq!(created.get(), 1);
    }

    #[test]
    fn test_load_state_with_missing_field_is_invalid() {
        let bus = Bus::new();
        let mut h = bus.handle(&Id::new("tool"), &Id::new("pen"));
        h.load_state(&json!({"typeID": "tool"}), &bus);

        assert!(!h.is_valid());
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_cmp_by_name_sorts_by_name_string() {
        let bus = Bus::new();
        let mut handles = vec![
            bus.handle(&Id::new("b-type"), &Id::new("zeta")),
            bus.handle(&Id::new("a-type"), &Id::new("alpha")),
            bus.handle(&Id::new("a-type"), &Id::new("mid")),
        ];
        handles.sort_by(ChannelHandle::cmp_by_name);
        let names: Vec<&str> = handles.iter().map(|h| h.name_id().as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_debug_reports_liveness() {
        let bus = Bus::new();
        let h = bus.handle(&Id::new("x"), &Id::new("y"));
        assert!(format!("{h:?}").contains("live: true"));
        drop(bus);
        assert!(format!("{h:?}").contains("live: false"));
    }
}
