use outbreak_server::Broadcaster;
use outbreak_shared::ext::{
    schema_for_kinds, Carryable, Collidable, Destructible, FactionId, Groupable, Inventory,
    Movable, Positionable,
};
use outbreak_shared::{
    Entity, EntityId, EntityTypeId, ExtensionKind, FieldDef, FieldId, FieldMap, FieldType,
    FieldValue, GameEvent, Schema, SchemaRegistry, Vec2,
};

/// Fixed step both sides simulate with.
pub const STEP: f32 = 1.0 / 20.0;

pub const CELL_SIZE: f32 = 64.0;

/// Wire tags in registration order; must match [`registry`].
pub const SURVIVOR: EntityTypeId = EntityTypeId::new(0);
pub const ZOMBIE: EntityTypeId = EntityTypeId::new(1);
pub const ITEM: EntityTypeId = EntityTypeId::new(2);

pub const ALIVE_COUNT: FieldId = FieldId(0x100);
pub const ELAPSED_TICKS: FieldId = FieldId(0x101);

/// The canonical registry used by both ends in the integration tests. Tags
/// come from registration order, so server and client build it the same
/// way.
pub fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register_type(
        "survivor",
        schema_for_kinds(&[
            ExtensionKind::Positionable,
            ExtensionKind::Movable,
            ExtensionKind::Collidable,
            ExtensionKind::Destructible,
            ExtensionKind::Inventory,
        ]),
    );
    registry.register_type(
        "zombie",
        schema_for_kinds(&[
            ExtensionKind::Positionable,
            ExtensionKind::Movable,
            ExtensionKind::Collidable,
            ExtensionKind::Destructible,
            ExtensionKind::Groupable,
        ]),
    );
    registry.register_type(
        "item",
        schema_for_kinds(&[ExtensionKind::Positionable, ExtensionKind::Carryable]),
    );
    registry.set_game_state_schema(Schema::new(vec![
        FieldDef::new(ALIVE_COUNT, "alive_count", FieldType::U16),
        FieldDef::new(ELAPSED_TICKS, "elapsed_ticks", FieldType::U32),
    ]));
    registry
}

pub fn survivor(id: EntityId, position: Vec2) -> Entity {
    Entity::new(id, SURVIVOR)
        .with_ext(Box::new(Positionable::new(position, Vec2::new(16.0, 16.0))))
        .with_ext(Box::new(Movable::new(Vec2::ZERO)))
        .with_ext(Box::new(Collidable::new(Vec2::new(16.0, 16.0))))
        .with_ext(Box::new(Destructible::new(100)))
        .with_ext(Box::new(Inventory::new(8)))
}

pub fn zombie(id: EntityId, position: Vec2) -> Entity {
    Entity::new(id, ZOMBIE)
        .with_ext(Box::new(Positionable::new(position, Vec2::new(16.0, 16.0))))
        .with_ext(Box::new(Movable::new(Vec2::ZERO)))
        .with_ext(Box::new(Collidable::new(Vec2::new(16.0, 16.0))))
        .with_ext(Box::new(Destructible::new(60)))
        .with_ext(Box::new(Groupable::new(FactionId(1))))
}

pub fn item(id: EntityId, position: Vec2, key: &str, quantity: u16) -> Entity {
    Entity::new(id, ITEM)
        .with_ext(Box::new(Positionable::new(position, Vec2::new(8.0, 8.0))))
        .with_ext(Box::new(Carryable::new(key, quantity)))
}

pub fn game_state(alive: u16, elapsed: u32) -> FieldMap {
    let mut map = FieldMap::new();
    map.insert(ALIVE_COUNT, FieldValue::U16(alive));
    map.insert(ELAPSED_TICKS, FieldValue::U32(elapsed));
    map
}

/// Transport stand-in that records every broadcast payload and event.
#[derive(Default)]
pub struct CapturingTransport {
    pub payloads: Vec<Vec<u8>>,
    pub events: Vec<GameEvent>,
}

impl Broadcaster for CapturingTransport {
    fn broadcast(&mut self, payload: &[u8]) {
        self.payloads.push(payload.to_vec());
    }

    fn broadcast_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

impl CapturingTransport {
    pub fn last(&self) -> &[u8] {
        self.payloads.last().expect("no payload was broadcast")
    }
}
