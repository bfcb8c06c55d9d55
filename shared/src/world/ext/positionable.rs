use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::math::Vec2;
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Position and footprint. Foundation for all spatial reasoning; nearly
/// every entity type carries one.
pub struct Positionable {
    position: Vec2,
    size: Vec2,
    dirty: bool,
}

impl Positionable {
    pub const POSITION: FieldId = FieldId(ExtensionKind::Positionable.field_base());
    pub const SIZE: FieldId = FieldId(ExtensionKind::Positionable.field_base() + 1);

    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::POSITION, "position", FieldType::Vec2),
            FieldDef::new(Self::SIZE, "size", FieldType::Vec2),
        ]
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_position(&mut self, position: Vec2) {
        if position != self.position {
            self.position = position;
            self.dirty = true;
        }
    }
}

impl Extension for Positionable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Positionable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::POSITION, FieldValue::Vec2(self.position));
        out.insert(Self::SIZE, FieldValue::Vec2(self.size));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Positionable {
    const KIND: ExtensionKind = ExtensionKind::Positionable;
}
