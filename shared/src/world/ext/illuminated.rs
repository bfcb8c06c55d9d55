use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Light radius. Pure data for the renderer; the simulation never reads it.
pub struct Illuminated {
    radius: f32,
    dirty: bool,
}

impl Illuminated {
    pub const RADIUS: FieldId = FieldId(ExtensionKind::Illuminated.field_base());

    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![FieldDef::new(Self::RADIUS, "radius", FieldType::F32)]
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        if radius != self.radius {
            self.radius = radius;
            self.dirty = true;
        }
    }
}

impl Extension for Illuminated {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Illuminated
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::RADIUS, FieldValue::F32(self.radius));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Illuminated {
    const KIND: ExtensionKind = ExtensionKind::Illuminated;
}
