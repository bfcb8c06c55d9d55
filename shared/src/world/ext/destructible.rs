use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Health pool. Damage saturates at zero; the manager reacts to the death
/// by emitting the death event and queueing removal, so the hook lives at
/// the world level rather than inside the extension.
pub struct Destructible {
    health: u16,
    max_health: u16,
    dirty: bool,
}

impl Destructible {
    pub const HEALTH: FieldId = FieldId(ExtensionKind::Destructible.field_base());
    pub const MAX_HEALTH: FieldId = FieldId(ExtensionKind::Destructible.field_base() + 1);

    pub fn new(max_health: u16) -> Self {
        Self {
            health: max_health,
            max_health,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::HEALTH, "health", FieldType::U16),
            FieldDef::new(Self::MAX_HEALTH, "max_health", FieldType::U16),
        ]
    }

    pub fn health(&self) -> u16 {
        self.health
    }

    pub fn max_health(&self) -> u16 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Applies damage and reports whether this blow was lethal. A hit on an
    /// already-dead pool is not a second death.
    pub fn apply_damage(&mut self, amount: u16) -> bool {
        if amount == 0 || self.health == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.dirty = true;
        self.health == 0
    }

    pub fn heal(&mut self, amount: u16) {
        let healed = self.health.saturating_add(amount).min(self.max_health);
        if healed != self.health {
            self.health = healed;
            self.dirty = true;
        }
    }
}

impl Extension for Destructible {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Destructible
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::HEALTH, FieldValue::U16(self.health));
        out.insert(Self::MAX_HEALTH, FieldValue::U16(self.max_health));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Destructible {
    const KIND: ExtensionKind = ExtensionKind::Destructible;
}
