use std::collections::{HashMap, HashSet};

use log::warn;

use outbreak_shared::{
    ext::{Carryable, Collidable, Destructible, Interactive, Inventory, Positionable},
    Entity, EntityId, EntityRecord, EntityTypeId, ExtensionKind, Frame, GameEvent, Neighbor,
    NeighborQuery, Tick, UpdateContext, Vec2, WorldCommand, WorldError,
};

use super::collision::{contact, Contact};
use super::spatial_index::SpatialIndex;

/// Which entities and fields a snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Every live entity, every field. For newly-connected clients and
    /// periodic keyframes.
    Full,
    /// Dirty entities only, dirty fields only, plus all removals.
    Delta,
}

/// A trigger zone firing on a target this tick. Drained by gameplay code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerFire {
    pub source: EntityId,
    pub target: EntityId,
}

/// Owns the live entity set and runs the authoritative per-tick state
/// machine: ingest queued spawns, simulate extensions in deterministic
/// order, resolve collisions, purge marked entities.
///
/// Everything here is synchronous, in-memory work — nothing may block the
/// tick. Incoming I/O is the embedder's problem to queue and drain at tick
/// boundaries.
pub struct EntityManager {
    entities: HashMap<EntityId, Entity>,
    /// Insertion order; simulate iterates this so update order is stable.
    order: Vec<EntityId>,
    next_id: u32,
    tick: Tick,
    pending_spawns: Vec<Entity>,
    /// id -> ticks until removal. Populated by `mark_for_removal`; keeps
    /// the earliest deadline on repeat marks.
    pending_removals: HashMap<EntityId, u32>,
    removed_this_tick: Vec<EntityId>,
    dirty: HashSet<EntityId>,
    /// Entities not yet broadcast at all. These go out as full records even
    /// in a delta frame so clients can construct them outright.
    fresh: HashSet<EntityId>,
    index: SpatialIndex,
    command_buf: Vec<WorldCommand>,
    events: Vec<GameEvent>,
    triggers: Vec<TriggerFire>,
    contacts: Vec<Contact>,
}

impl EntityManager {
    pub fn new(cell_size: f32) -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            tick: 0,
            pending_spawns: Vec::new(),
            pending_removals: HashMap::new(),
            removed_this_tick: Vec::new(),
            dirty: HashSet::new(),
            fresh: HashSet::new(),
            index: SpatialIndex::new(cell_size),
            command_buf: Vec::new(),
            events: Vec::new(),
            triggers: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn tick_number(&self) -> Tick {
        self.tick
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Queues an entity for ingestion at the start of the next tick. The id
    /// is assigned now (monotonic, never reused) and handed to the factory.
    pub fn queue_spawn(&mut self, factory: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        let entity = factory(id);
        debug_assert_eq!(entity.id(), id);
        self.pending_spawns.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable access for gameplay code. Pair with [`EntityManager::touch`]
    /// when mutating between the tick and the snapshot, otherwise the dirty
    /// set catches up on the next simulate pass.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Records an out-of-band mutation in the dirty set so the next delta
    /// snapshot carries it.
    pub fn touch(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) {
            self.dirty.insert(id);
        }
    }

    /// Schedules removal after `delay_ticks` ticks (0 = end of current/next
    /// tick). Idempotent: re-marking keeps the earliest deadline, marking
    /// an already-removed entity is a no-op.
    pub fn mark_for_removal(&mut self, id: EntityId, delay_ticks: u32) {
        let live = self.entities.contains_key(&id)
            || self.pending_spawns.iter().any(|e| e.id() == id);
        if !live {
            return;
        }
        self.pending_removals
            .entry(id)
            .and_modify(|ticks| *ticks = (*ticks).min(delay_ticks))
            .or_insert(delay_ticks);
    }

    /// Ids currently scheduled for removal.
    pub fn pending_removals(&self) -> Vec<EntityId> {
        self.pending_removals.keys().copied().collect()
    }

    /// Ids purged during the most recent tick, in purge order. Reset every
    /// tick; the wire frame carries these as `removed`.
    pub fn removed_this_tick(&self) -> &[EntityId] {
        &self.removed_this_tick
    }

    /// Spatial candidate query. Bounded precision: candidates come from the
    /// 3x3 cell neighborhood, so results may extend up to one cell past
    /// `radius` — callers needing exact proximity must distance-filter.
    pub fn nearby(
        &self,
        position: Vec2,
        radius: f32,
        type_filter: Option<&[EntityTypeId]>,
    ) -> Vec<Neighbor> {
        self.index.nearby(position, radius, type_filter)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_triggers(&mut self) -> Vec<TriggerFire> {
        std::mem::take(&mut self.triggers)
    }

    pub fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Advances the world one fixed step.
    pub fn tick(&mut self, dt: f32) {
        self.tick = self.tick.wrapping_add(1);
        self.removed_this_tick.clear();

        self.ingest();
        self.rebuild_index();
        self.simulate(dt);
        self.apply_commands();
        self.resolve_collisions();
        self.purge();
    }

    fn ingest(&mut self) {
        for entity in self.pending_spawns.drain(..) {
            let id = entity.id();
            self.order.push(id);
            self.dirty.insert(id);
            self.fresh.insert(id);
            self.entities.insert(id, entity);
        }
    }

    /// Rebuild-per-tick policy: cost is bounded by entity count and buckets
    /// can never drift from true positions (see `SpatialIndex`).
    fn rebuild_index(&mut self) {
        self.index.clear();
        for id in &self.order {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if let Some(position) = entity.position() {
                self.index.insert(Neighbor {
                    id: *id,
                    type_id: entity.type_id(),
                    position,
                });
            }
        }
    }

    /// Runs velocity integration then extension behaviors for every live
    /// entity, in insertion order; within an entity, extensions run in
    /// registration order. Physics-like work therefore always precedes
    /// trigger/interactive work, and the whole pass is reproducible.
    fn simulate(&mut self, dt: f32) {
        let order = self.order.clone();
        for id in order {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            entity.integrate(dt);
            let mut ctx = UpdateContext::new(
                dt,
                id,
                entity.type_id(),
                entity.position(),
                &self.index,
                &mut self.command_buf,
            );
            entity.update(&mut ctx);
            if entity.is_dirty() {
                self.dirty.insert(id);
            }
        }
    }

    fn apply_commands(&mut self) {
        let commands = std::mem::take(&mut self.command_buf);
        for command in commands {
            match command {
                WorldCommand::Despawn { id, delay_ticks } => {
                    self.mark_for_removal(id, delay_ticks);
                }
                WorldCommand::Damage { id, amount } => {
                    self.apply_damage(id, amount);
                }
                WorldCommand::Emit(event) => {
                    self.events.push(event);
                }
                WorldCommand::Trigger { source, target } => {
                    self.triggers.push(TriggerFire { source, target });
                }
            }
        }
    }

    /// Routes damage to an entity's health pool. A lethal blow emits the
    /// death event and queues immediate removal.
    pub fn apply_damage(&mut self, id: EntityId, amount: u16) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let Ok(destructible) = entity.get_ext_mut::<Destructible>() else {
            warn!("damage sent to indestructible entity {id}");
            return;
        };
        let died = destructible.apply_damage(amount);
        self.dirty.insert(id);
        if died {
            let position = self.entities[&id].position().unwrap_or(Vec2::ZERO);
            self.events.push(GameEvent::Death {
                entity: id,
                position,
            });
            self.mark_for_removal(id, 0);
        }
    }

    /// Pairwise resolution of collidable entities, restricted to spatially
    /// nearby candidates. Solid pairs get a penetration-axis positional
    /// correction (split when both sides can move); every overlap records a
    /// contact for gameplay.
    fn resolve_collisions(&mut self) {
        let mut resolved: Vec<Contact> = Vec::new();

        for &a_id in &self.order {
            let Some(a) = self.entities.get(&a_id) else {
                continue;
            };
            let (Some(a_pos), Ok(a_col)) = (a.position(), a.get_ext::<Collidable>()) else {
                continue;
            };
            if !a_col.enabled() {
                continue;
            }
            let a_box = a_col.aabb_at(a_pos);
            let probe_radius = self.index.cell_size();

            for candidate in self.index.nearby(a_pos, probe_radius, None) {
                // Each pair once.
                if candidate.id <= a_id {
                    continue;
                }
                let Some(b) = self.entities.get(&candidate.id) else {
                    continue;
                };
                let (Some(b_pos), Ok(b_col)) = (b.position(), b.get_ext::<Collidable>()) else {
                    continue;
                };
                if !b_col.enabled() {
                    continue;
                }
                let b_box = b_col.aabb_at(b_pos);
                if let Some(contact) = contact(a_id, &a_box, candidate.id, &b_box) {
                    resolved.push(contact);
                }
            }
        }

        for contact in &resolved {
            self.separate(contact);
            self.contacts.push(*contact);
        }
    }

    /// Pushes the pair apart along the contact normal. Trigger zones are
    /// not solid; a pair where only one side can move transfers the whole
    /// correction to that side.
    fn separate(&mut self, contact: &Contact) {
        let solid = |entity: &Entity| !entity.has_ext(ExtensionKind::Triggerable);
        let movable = |entity: &Entity| entity.has_ext(ExtensionKind::Movable);

        let (a_solid, a_movable) = match self.entities.get(&contact.a) {
            Some(e) => (solid(e), movable(e)),
            None => return,
        };
        let (b_solid, b_movable) = match self.entities.get(&contact.b) {
            Some(e) => (solid(e), movable(e)),
            None => return,
        };
        if !a_solid || !b_solid {
            return;
        }

        let (a_share, b_share) = match (a_movable, b_movable) {
            (true, true) => (0.5, 0.5),
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            (false, false) => return,
        };

        if a_share > 0.0 {
            self.shift(contact.a, contact.normal * (contact.depth * a_share));
        }
        if b_share > 0.0 {
            self.shift(contact.b, contact.normal * (-contact.depth * b_share));
        }
    }

    fn shift(&mut self, id: EntityId, delta: Vec2) {
        if let Some(entity) = self.entities.get_mut(&id) {
            if let Ok(pos) = entity.get_ext_mut::<Positionable>() {
                let next = pos.position() + delta;
                pos.set_position(next);
                self.dirty.insert(id);
            }
        }
    }

    fn purge(&mut self) {
        let mut due = Vec::new();
        self.pending_removals.retain(|id, ticks| {
            if *ticks == 0 {
                due.push(*id);
                false
            } else {
                *ticks -= 1;
                true
            }
        });

        // Purge in insertion order so removed-id lists are deterministic.
        for id in &self.order {
            if due.contains(id) && self.entities.remove(id).is_some() {
                self.dirty.remove(id);
                self.fresh.remove(id);
                self.removed_this_tick.push(*id);
            }
        }
        self.order.retain(|id| self.entities.contains_key(id));
    }

    /// Player-driven interaction: actor must be within the target's
    /// interact range. Emits the interact event on success.
    pub fn interact(&mut self, actor: EntityId, target: EntityId) -> Result<bool, WorldError> {
        let actor_pos = self
            .entities
            .get(&actor)
            .ok_or(WorldError::UnknownEntity { id: actor })?
            .position()
            .unwrap_or(Vec2::ZERO);
        let target_entity = self
            .entities
            .get(&target)
            .ok_or(WorldError::UnknownEntity { id: target })?;
        let interactive = target_entity.get_ext::<Interactive>()?;

        let range = interactive.range();
        let target_pos = target_entity.position().unwrap_or(Vec2::ZERO);
        if actor_pos.distance_sq(target_pos) > range * range {
            return Ok(false);
        }
        let action = interactive.action().clone();
        self.events.push(GameEvent::Interact {
            source: actor,
            target,
            action,
        });
        Ok(true)
    }

    /// Moves a carryable world entity into the collector's inventory,
    /// merging by item key. On success the item entity is queued for
    /// removal and a pickup event is emitted; a full inventory leaves the
    /// item in the world.
    pub fn pickup(&mut self, collector: EntityId, item: EntityId) -> Result<bool, WorldError> {
        let (item_key, quantity) = {
            let item_entity = self
                .entities
                .get(&item)
                .ok_or(WorldError::UnknownEntity { id: item })?;
            let carryable = item_entity.get_ext::<Carryable>()?;
            (carryable.item_key().to_string(), carryable.quantity())
        };

        let collector_entity = self
            .entities
            .get_mut(&collector)
            .ok_or(WorldError::UnknownEntity { id: collector })?;
        let inventory = collector_entity.get_ext_mut::<Inventory>()?;
        if inventory.try_add(&item_key, quantity).is_err() {
            return Ok(false);
        }
        self.dirty.insert(collector);
        self.mark_for_removal(item, 0);
        self.events.push(GameEvent::Pickup {
            entity: collector,
            item_key,
            quantity,
        });
        Ok(true)
    }

    /// Builds this tick's wire frame. Game-state globals are filled in by
    /// the caller. Delta mode walks only the dirty set (insertion order),
    /// so its cost scales with changed entities, not all entities.
    pub fn snapshot(&self, mode: SnapshotMode) -> Frame {
        let mut frame = Frame::new(self.tick);
        for id in &self.order {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            match mode {
                SnapshotMode::Full => frame.entities.push(EntityRecord {
                    id: *id,
                    type_id: entity.type_id(),
                    full: true,
                    fields: entity.write_fields(false),
                }),
                SnapshotMode::Delta => {
                    if self.dirty.contains(id) {
                        let full = self.fresh.contains(id);
                        frame.entities.push(EntityRecord {
                            id: *id,
                            type_id: entity.type_id(),
                            full,
                            fields: entity.write_fields(!full),
                        });
                    }
                }
            }
        }
        frame.removed = self.removed_this_tick.clone();
        frame
    }

    /// Clears dirty tracking after a successful broadcast.
    pub fn clear_dirty(&mut self) {
        for id in self.dirty.drain() {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.clear_dirty();
            }
        }
        self.fresh.clear();
    }
}
