use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::types::EntityTypeId;
use crate::world::extension::{Extension, ExtensionKind, ExtensionType, UpdateContext};

/// Proximity detector. Each tick it scans nearby entities matching the type
/// filter and queues a trigger command per match; in one-time mode it
/// disarms after the first firing tick.
///
/// Spatial candidates are cell-approximate, so the exact radius check
/// happens here against squared distance.
pub struct Triggerable {
    radius: f32,
    type_filter: Vec<EntityTypeId>,
    one_time: bool,
    armed: bool,
    dirty: bool,
}

impl Triggerable {
    pub const RADIUS: FieldId = FieldId(ExtensionKind::Triggerable.field_base());
    pub const ARMED: FieldId = FieldId(ExtensionKind::Triggerable.field_base() + 1);

    pub fn new(radius: f32, type_filter: Vec<EntityTypeId>) -> Self {
        Self {
            radius,
            type_filter,
            one_time: false,
            armed: true,
            dirty: true,
        }
    }

    /// One-shot variant: disarms permanently after the first fire.
    pub fn one_time(radius: f32, type_filter: Vec<EntityTypeId>) -> Self {
        Self {
            one_time: true,
            ..Self::new(radius, type_filter)
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::RADIUS, "radius", FieldType::F32),
            FieldDef::new(Self::ARMED, "armed", FieldType::Bool),
        ]
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn rearm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.dirty = true;
        }
    }
}

impl Extension for Triggerable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Triggerable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::RADIUS, FieldValue::F32(self.radius));
        out.insert(Self::ARMED, FieldValue::Bool(self.armed));
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if !self.armed {
            return;
        }
        let Some(position) = ctx.position else {
            return;
        };

        let filter = if self.type_filter.is_empty() {
            None
        } else {
            Some(self.type_filter.as_slice())
        };
        let radius_sq = self.radius * self.radius;
        let mut fired = false;
        for neighbor in ctx.nearby(position, self.radius, filter) {
            if neighbor.id == ctx.entity_id {
                continue;
            }
            if neighbor.position.distance_sq(position) > radius_sq {
                continue;
            }
            ctx.trigger(neighbor.id);
            fired = true;
        }

        if fired && self.one_time {
            self.armed = false;
            self.dirty = true;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Triggerable {
    const KIND: ExtensionKind = ExtensionKind::Triggerable;
}
