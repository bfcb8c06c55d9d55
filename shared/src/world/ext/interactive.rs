use std::any::Any;

use crate::codec::{FieldDef, FieldId, FieldMap, FieldType, FieldValue};
use crate::event::InteractAction;
use crate::world::extension::{Extension, ExtensionKind, ExtensionType};

/// Proximity-gated interaction point with a display name. The action is
/// data, not a closure — gameplay content interprets it when the manager
/// emits the interact event.
pub struct Interactive {
    display_name: String,
    range: f32,
    action: InteractAction,
    dirty: bool,
}

impl Interactive {
    pub const DISPLAY_NAME: FieldId = FieldId(ExtensionKind::Interactive.field_base());
    pub const RANGE: FieldId = FieldId(ExtensionKind::Interactive.field_base() + 1);
    pub const ACTION: FieldId = FieldId(ExtensionKind::Interactive.field_base() + 2);

    const ACTION_BUILTIN: u8 = 0;
    const ACTION_SCRIPTED: u8 = 1;

    pub fn new(display_name: impl Into<String>, range: f32, action: InteractAction) -> Self {
        Self {
            display_name: display_name.into(),
            range,
            action,
            dirty: true,
        }
    }

    pub fn field_defs() -> Vec<FieldDef> {
        vec![
            FieldDef::new(Self::DISPLAY_NAME, "display_name", FieldType::Str),
            FieldDef::new(Self::RANGE, "range", FieldType::F32),
            FieldDef::new(
                Self::ACTION,
                "action",
                FieldType::OneOf(vec![FieldType::U8, FieldType::Str]),
            ),
        ]
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn action(&self) -> &InteractAction {
        &self.action
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.display_name {
            self.display_name = name;
            self.dirty = true;
        }
    }
}

impl Extension for Interactive {
    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Interactive
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn write_fields(&self, _only_dirty: bool, out: &mut FieldMap) {
        out.insert(
            Self::DISPLAY_NAME,
            FieldValue::Str(self.display_name.clone()),
        );
        out.insert(Self::RANGE, FieldValue::F32(self.range));
        let action = match &self.action {
            InteractAction::Builtin(code) => {
                FieldValue::OneOf(Self::ACTION_BUILTIN, Box::new(FieldValue::U8(*code)))
            }
            InteractAction::Scripted(name) => FieldValue::OneOf(
                Self::ACTION_SCRIPTED,
                Box::new(FieldValue::Str(name.clone())),
            ),
        };
        out.insert(Self::ACTION, action);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ExtensionType for Interactive {
    const KIND: ExtensionKind = ExtensionKind::Interactive;
}
