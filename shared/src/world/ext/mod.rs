//! The extension catalog: every capability the core ships. Gameplay content
//! composes these; it never defines new wire schemas of its own.

mod carryable;
mod collidable;
mod destructible;
mod expirable;
mod groupable;
mod illuminated;
mod interactive;
mod inventory;
mod movable;
mod positionable;
mod triggerable;

pub use carryable::Carryable;
pub use collidable::Collidable;
pub use destructible::Destructible;
pub use expirable::Expirable;
pub use groupable::{FactionId, Groupable};
pub use illuminated::Illuminated;
pub use interactive::Interactive;
pub use inventory::{Inventory, InventoryFull, InventorySlot};
pub use movable::Movable;
pub use positionable::Positionable;
pub use triggerable::Triggerable;

use crate::codec::{FieldDef, Schema};
use crate::world::extension::ExtensionKind;

/// Field declarations contributed by one extension kind.
pub fn field_defs(kind: ExtensionKind) -> Vec<FieldDef> {
    match kind {
        ExtensionKind::Positionable => Positionable::field_defs(),
        ExtensionKind::Movable => Movable::field_defs(),
        ExtensionKind::Collidable => Collidable::field_defs(),
        ExtensionKind::Destructible => Destructible::field_defs(),
        ExtensionKind::Interactive => Interactive::field_defs(),
        ExtensionKind::Carryable => Carryable::field_defs(),
        ExtensionKind::Inventory => Inventory::field_defs(),
        ExtensionKind::Triggerable => Triggerable::field_defs(),
        ExtensionKind::Expirable => Expirable::field_defs(),
        ExtensionKind::Groupable => Groupable::field_defs(),
        ExtensionKind::Illuminated => Illuminated::field_defs(),
    }
}

/// Builds an entity type's wire schema from its extension set. The kind
/// order here must match the factory's attachment order — both sides derive
/// their registries from the same kind lists, so field order agrees by
/// construction.
pub fn schema_for_kinds(kinds: &[ExtensionKind]) -> Schema {
    let mut fields = Vec::new();
    for kind in kinds {
        fields.extend(field_defs(*kind));
    }
    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldId;

    #[test]
    fn field_ids_are_unique_across_a_composed_schema() {
        let all = [
            ExtensionKind::Positionable,
            ExtensionKind::Movable,
            ExtensionKind::Collidable,
            ExtensionKind::Destructible,
            ExtensionKind::Interactive,
            ExtensionKind::Carryable,
            ExtensionKind::Inventory,
            ExtensionKind::Triggerable,
            ExtensionKind::Expirable,
            ExtensionKind::Groupable,
            ExtensionKind::Illuminated,
        ];
        let schema = schema_for_kinds(&all);
        let mut seen: Vec<FieldId> = Vec::new();
        for def in schema.fields() {
            assert!(!seen.contains(&def.id), "duplicate field id {}", def.id);
            seen.push(def.id);
        }
    }
}
