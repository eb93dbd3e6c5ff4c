//! # Channel table.
//!
//! Owns every channel slot of one bus and the current payload of each.
//!
//! ## Architecture
//! ```text
//! index: HashMap<typeID, HashMap<nameID, slot>>
//!                                          │
//!                                          ▼
//! slots: Vec<Slot>  [0] [1] [2] ...   (append-only arena)
//!                    │
//!                    └─► { typeID, nameID, data: Rc<RefCell<Option<Box<dyn Payload>>>> }
//! ```
//!
//! ## Rules
//! - A slot is created at most once per `(typeID, nameID)`.
//! - Slots are never removed, so a slot index stays valid for the table's lifetime.
//! - Each slot's value sits in its own cell: dispatch borrows that cell only,
//!   never the whole table, so callbacks may create channels or set other ones.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::id::Id;
use crate::payload::Payload;

/// Current value of one channel.
pub(crate) type DataCell = Rc<RefCell<Option<Box<dyn Payload>>>>;

/// One channel: identity plus exclusively owned current value.
pub(crate) struct Slot {
    pub(crate) type_id: Id,
    pub(crate) name_id: Id,
    pub(crate) data: DataCell,
}

/// Arena of channel slots with a two-level lookup index.
pub(crate) struct ChannelTable {
    slots: Vec<Slot>,
    index: HashMap<Id, HashMap<Id, usize>>,
}

impl ChannelTable {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            slots: capacity.map_or_else(Vec::new, Vec::with_capacity),
            index: HashMap::new(),
        }
    }

    pub(crate) fn find(&self, type_id: &Id, name_id: &Id) -> Option<usize> {
        self.index.get(type_id)?.get(name_id).copied()
    }

    /// Creates a slot with no data. The pair must not exist yet.
    pub(crate) fn insert(&mut self, type_id: Id, name_id: Id) -> usize {
        debug_assert!(self.find(&type_id, &name_id).is_none());

        let slot = self.slots.len();
        self.index
            .entry(type_id.clone())
            .or_default()
            .insert(name_id.clone(), slot);
        self.slots.push(Slot {
            type_id,
            name_id,
            data: Rc::new(RefCell::new(None)),
        });
        slot
    }

    pub(crate) fn slot(&self, slot: usize) -> Option<&Slot> {
        self.slots.get(slot)
    }

    /// Value cell of a slot, detached from the table borrow.
    pub(crate) fn cell(&self, slot: usize) -> Option<DataCell> {
        self.slots.get(slot).map(|s| Rc::clone(&s.data))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate()
    }

    /// Slot indices of one type.
    pub(crate) fn of_type<'a>(&'a self, type_id: &Id) -> impl Iterator<Item = usize> + 'a {
        self.index
            .get(type_id)
            .into_iter()
            .flat_map(|names| names.values().copied())
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_find() {
        let mut table = ChannelTable::new(None);
        let (t, n) = (Id::new("mode"), Id::new("main"));
        assert_eq!(table.find(&t, &n), None);

        let slot = table.insert(t.clone(), n.clone());
        assert_eq!(table.find(&t, &n), Some(slot));
        assert_eq!(table.len(), 1);
        let cell = table.cell(slot).unwrap();
        assert!(cell.borrow().is_none());
    }

    #[test]
    fn test_cell_is_shared_with_slot() {
        let mut table = ChannelTable::new(Some(4));
        let slot = table.insert(Id::new("mode"), Id::new("aux"));

        let cell = table.cell(slot).unwrap();
        *cell.borrow_mut() = Some(Box::new(2u32));
        drop(cell);

        let stored = table.cell(slot).unwrap();
        let value = stored.borrow().as_deref().and_then(|p| p.downcast_ref::<u32>()).copied();
        assert_eq!(value, Some(2));
    }

    #[test]
    fn test_cell_out_of_range_is_none() {
        let table = ChannelTable::new(None);
        assert!(table.cell(9).is_none());
        assert!(table.slot(9).is_none());
    }

    #[test]
    fn test_of_type_groups_by_type() {
        let mut table = ChannelTable::new(None);
        let color = Id::new("color");
        table.insert(color.clone(), Id::new("fg"));
        table.insert(color.clone(), Id::new("bg"));
        table.insert(Id::new("size"), Id::new("fg"));

        let mut slots: Vec<usize> = table.of_type(&color).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1]);
        assert_eq!(table.of_type(&Id::new("missing")).count(), 0);
    }
}
