use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::world::extension::{Extension, ExtensionKind, ExtensionType, UpdateContext};

/// Countdown-based self-removal, used for despawn timers on corpses,
/// dropped items, and effects. The per-tick decrement is simulation-internal
/// and does not dirty the extension; only an explicit reset syncs.
pub struct Expirable {
    remaining_secs: f32,
    dirty: bool,
}

impl Expirable {
    pub const REMAINING: FieldId = FieldId(ExtensionKind::Expirable.field_base());

    pub fn new(lifetime_secs: f32) -> Self {
        Self {
            remaining_secs: lifetime_secs,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![FieldDef::new(Self::REMAINING, "remaining", FieldType::F32)]
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    pub fn set_remaining(&mut self, secs: f32) {
        self.remaining_secs = secs;
        self.dirty = true;
    }
}

impl Extension for Expirable {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Expirable
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(Self::REMAINING, FieldValue::F32(self.remaining_secs));
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.remaining_secs <= 0.0 {
            return;
        }
        self.remaining_secs -= ctx.dt;
        if self.remaining_secs <= 0.0 {
            ctx.despawn(ctx.entity_id);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Expirable {
    const KIND: ExtensionKind = ExtensionKind::Expirable;
}
