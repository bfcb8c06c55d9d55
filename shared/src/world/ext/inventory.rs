use std::any::Any;

use thiserror::Error;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("inventory is full ({capacity} slots)")]
pub struct InventoryFull {
    pub capacity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySlot {
    pub item_key: String,
    pub count: u16,
}

/// Bounded slot list. Adding an item merges into an existing slot with the
/// same key before consuming a new slot.
pub struct Inventory {
    capacity: u8,
    slots: Vec<InventorySlot>,
    dirty: bool,
}

impl Inventory {
    pub const CAPACITY: FieldId = FieldId(ExtensionKind::Inventory.field_base());
    pub const SLOTS: FieldId = FieldId(ExtensionKind::Inventory.field_base() + 1);

    pub fn new(capacity: u8) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::CAPACITY, "capacity", FieldType::U8),
            FieldDef::new(
                Self::SLOTS,
                "slots",
                FieldType::List(Box::new(FieldType::Record(vec![
                    FieldType::Str,
                    FieldType::U16,
                ]))),
            ),
        ]
    }

    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn count_of(&self, item_key: &str) -> u16 {
        self.slots
            .iter()
            .filter(|slot| slot.item_key == item_key)
            .map(|slot| slot.count)
            .sum()
    }

    /// Adds `count` of `item_key`, merging into an existing stack first.
    pub fn try_add(&mut self, item_key: &str, count: u16) -> Result<(), InventoryFull> {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.item_key == item_key) {
            slot.count = slot.count.saturating_add(count);
            self.dirty = true;
            return Ok(());
        }
        if self.slots.len() >= self.capacity as usize {
            return Err(InventoryFull {
                capacity: self.capacity,
            });
        }
        self.slots.push(InventorySlot {
            item_key: item_key.to_string(),
            count,
        });
        self.dirty = true;
        Ok(())
    }

    /// Removes up to `count` of `item_key`, returning how many were
    /// actually removed. Emptied slots are dropped.
    pub fn remove(&mut self, item_key: &str, count: u16) -> u16 {
        let Some(index) = self.slots.iter().position(|s| s.item_key == item_key) else {
            return 0;
        };
        let slot = &mut self.slots[index];
        let taken = slot.count.min(count);
        slot.count -= taken;
        if slot.count == 0 {
            self.slots.remove(index);
        }
        if taken > 0 {
            self.dirty = true;
        }
        taken
    }
}

impl Extension for Inventory {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Inventory
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::CAPACITY, FieldValue::U8(self.capacity));
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                FieldValue::Record(vec![
                    FieldValue::Str(slot.item_key.clone()),
                    FieldValue::U16(slot.count),
                ])
            })
            .collect();
        out.insert(Self::SLOTS, FieldValue::List(slots));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Inventory {
    const KIND: ExtensionKind = ExtensionKind::Inventory;
}
