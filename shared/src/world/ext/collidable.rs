use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::math::{Aabb, Vec2};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Axis-aligned hitbox centered on the owner's position. Disabled colliders
/// stay attached (and synced) but are skipped by the resolution pass.
pub struct Collidable {
    hitbox: Vec2,
    enabled: bool,
    dirty: bool,
}

impl Collidable {
    pub const HITBOX: FieldId = FieldId(ExtensionKind::Collidable.field_base());
    pub const ENABLED: FieldId = FieldId(ExtensionKind::Collidable.field_base() + 1);

    pub fn new(hitbox: Vec2) -> Self {
        Self {
            hitbox,
            enabled: true,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::HITBOX, "hitbox", FieldType::Vec2),
            FieldDef::new(Self::ENABLED, "enabled", FieldType::Bool),
        ]
    }

    pub fn hitbox(&self) -> Vec2 {
        self.hitbox
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.enabled = enabled;
            self.dirty = true;
        }
    }

    pub fn aabb_at(&self, position: Vec2) -> Aabb {
        Aabb::new(position, self.hitbox)
    }
}

impl Extension for Collidable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Collidable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::HITBOX, FieldValue::Vec2(self.hitbox));
        out.insert(Self::ENABLED, FieldValue::Bool(self.enabled));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Collidable {
    const KIND: ExtensionKind = ExtensionKind::Collidable;
}
