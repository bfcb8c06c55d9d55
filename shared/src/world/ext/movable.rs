use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::math::Vec2;
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Velocity, integrated into the owner's position once per tick before any
/// extension behavior runs (see `Entity::integrate`).
#[derive(Debug)]
pub struct Movable {
    velocity: Vec2,
    dirty: bool,
}

impl Movable {
    pub const VELOCITY: FieldId = FieldId(ExtensionKind::Movable.field_base());

    pub fn new(velocity: Vec2) -> Self {
        Self {
            velocity,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![FieldDef::new(Self::VELOCITY, "velocity", FieldType::Vec2)]
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        if velocity != self.velocity {
            self.velocity = velocity;
            self.dirty = true;
        }
    }
}

impl Extension for Movable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Movable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::VELOCITY, FieldValue::Vec2(self.velocity));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Movable {
    const KIND: ExtensionKind = ExtensionKind::Movable;
}
