use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// A pickup lying in the world. On pickup its quantity merges into the
/// collector's inventory slot for the same item key.
pub struct Carryable {
    item_key: String,
    quantity: u16,
    dirty: bool,
}

impl Carryable {
    pub const ITEM_KEY: FieldId = FieldId(ExtensionKind::Carryable.field_base());
    pub const QUANTITY: FieldId = FieldId(ExtensionKind::Carryable.field_base() + 1);

    pub fn new(item_key: impl Into<String>, quantity: u16) -> Self {
        Self {
            item_key: item_key.into(),
            quantity,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::ITEM_KEY, "item_key", FieldType::Str),
            FieldDef::new(Self::QUANTITY, "quantity", FieldType::U16),
        ]
    }

    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    pub fn quantity(&self) -> u16 {
        self.quantity
    }

    pub fn stacks_with(&self, other: &Carryable) -> bool {
        self.item_key == other.item_key
    }

    /// Absorbs another stack of the same item, e.g. when two drops land on
    /// the same tile.
    pub fn merge(&mut self, other: &Carryable) -> bool {
        if !self.stacks_with(other) {
            return false;
        }
        self.quantity = self.quantity.saturating_add(other.quantity);
        self.dirty = true;
        true
    }
}

impl Extension for Carryable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Carryable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::ITEM_KEY, FieldValue::Str(self.item_key.clone()));
        out.insert(Self::QUANTITY, FieldValue::U16(self.quantity));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Carryable {
    const KIND: ExtensionKind = ExtensionKind::Carryable;
}
