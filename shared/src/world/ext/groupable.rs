use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Faction tag for friend/foe checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionId(pub u8);

pub struct Groupable {
    faction: FactionId,
    dirty: bool,
}

impl Groupable {
    pub const FACTION: FieldId = FieldId(ExtensionKind::Groupable.field_base());

    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![FieldDef::new(Self::FACTION, "faction", FieldType::U8)]
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub fn is_hostile_to(&self, other: &Groupable) -> bool {
        self.faction != other.faction
    }

    pub fn set_faction(&mut self, faction: FactionId) {
        if faction != self.faction {
            self.faction = faction;
            self.dirty = true;
        }
    }
}

impl Extension for Groupable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Groupable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::FACTION, FieldValue::U8(self.faction.0));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Groupable {
    const KIND: ExtensionKind = ExtensionKind::Groupable;
}
