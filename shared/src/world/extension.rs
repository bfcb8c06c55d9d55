//! The extension contract: a typed capability attached to an entity, with
//! its own dirty flag and an optional per-tick behavior. Extensions never
//! inherit from each other; entities compose them.

use std::any::Any;

use crate::codec::FieldMap;
use crate::event::GameEvent;
use crate::math::Vec2;
use crate::types::{EntityId, EntityTypeId};

/// Capability tag. At most one extension of a given kind may be attached to
/// an entity. The discriminant seeds each kind's field-id block, so wire
/// field ids stay unique across a composed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ExtensionKind {
    Positionable = 0,
    Movable = 1,
    Collidable = 2,
    Destructible = 3,
    Interactive = 4,
    Carryable = 5,
    Inventory = 6,
    Triggerable = 7,
    Expirable = 8,
    Groupable = 9,
    Illuminated = 10,
}

impl ExtensionKind {
    /// Base of this kind's 16-wide field-id block.
    pub const fn field_base(self) -> u16 {
        (self as u16) << 4
    }
}

/// A neighbor candidate returned by spatial queries. Carries a copy of the
/// position captured at index-rebuild time, not a live reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: EntityId,
    pub type_id: EntityTypeId,
    pub position: Vec2,
}

/// Proximity query surface handed to extensions during update. Implemented
/// by the server's spatial index over the positions captured this tick.
pub trait NeighborQuery {
    /// Candidates near `position`. Bounded-precision: the result may
    /// include entities up to one cell beyond `radius`, and never omits one
    /// truly within `radius` when `radius <= cell_size`. Callers needing
    /// exact proximity must distance-filter the candidates themselves.
    fn nearby(
        &self,
        position: Vec2,
        radius: f32,
        type_filter: Option<&[EntityTypeId]>,
    ) -> Vec<Neighbor>;
}

/// Deferred world mutation emitted during the simulate phase and applied by
/// the manager afterwards. This is the only channel through which an
/// extension affects anything beyond its own state, which keeps ownership
/// acyclic and side effects auditable.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCommand {
    Despawn {
        id: EntityId,
        delay_ticks: u32,
    },
    Damage {
        id: EntityId,
        amount: u16,
    },
    Emit(GameEvent),
    Trigger {
        source: EntityId,
        target: EntityId,
    },
}

/// Per-tick context for an extension's `update`. Queries go through the
/// captured spatial view; mutations are queued as [`WorldCommand`]s.
pub struct UpdateContext<'a> {
    pub dt: f32,
    pub entity_id: EntityId,
    pub entity_type: EntityTypeId,
    /// The updating entity's position this tick, if it has one.
    pub position: Option<Vec2>,
    neighbors: &'a dyn NeighborQuery,
    commands: &'a mut Vec<WorldCommand>,
}

impl<'a> UpdateContext<'a> {
    pub fn new(
        dt: f32,
        entity_id: EntityId,
        entity_type: EntityTypeId,
        position: Option<Vec2>,
        neighbors: &'a dyn NeighborQuery,
        commands: &'a mut Vec<WorldCommand>,
    ) -> Self {
        Self {
            dt,
            entity_id,
            entity_type,
            position,
            neighbors,
            commands,
        }
    }

    pub fn nearby(
        &self,
        position: Vec2,
        radius: f32,
        type_filter: Option<&[EntityTypeId]>,
    ) -> Vec<Neighbor> {
        self.neighbors.nearby(position, radius, type_filter)
    }

    pub fn despawn(&mut self, id: EntityId) {
        self.commands.push(WorldCommand::Despawn { id, delay_ticks: 0 });
    }

    pub fn despawn_after(&mut self, id: EntityId, delay_ticks: u32) {
        self.commands.push(WorldCommand::Despawn { id, delay_ticks });
    }

    pub fn damage(&mut self, id: EntityId, amount: u16) {
        self.commands.push(WorldCommand::Damage { id, amount });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.commands.push(WorldCommand::Emit(event));
    }

    pub fn trigger(&mut self, target: EntityId) {
        self.commands.push(WorldCommand::Trigger {
            source: self.entity_id,
            target,
        });
    }
}

/// A capability-scoped value object owned by exactly one entity.
///
/// Contract: every external mutation routes through a setter that marks the
/// extension dirty; the wire layer then ships only dirty fields. `update`
/// is the optional per-tick behavior hook.
pub trait Extension: Any {
    fn kind(&self) -> ExtensionKind;

    fn is_dirty(&self) -> bool;

    fn clear_dirty(&mut self);

    /// Serializes fields into `out`. With `only_dirty`, untouched fields
    /// are skipped so the payload is a patch.
    fn write_fields(&self, only_dirty: bool, out: &mut FieldMap);

    /// Per-tick behavior. Default: pure data, no behavior.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Statically-known kind for typed lookup (`Entity::get_ext::<T>()`).
pub trait ExtensionType: Extension {
    const KIND: ExtensionKind;
}
