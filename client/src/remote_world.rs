//! Client-side mirror of the authoritative entity set, rebuilt from full
//! frames and patched by deltas. Transport-level ordering is not assumed:
//! stale and duplicate frames are discarded by tick sequence, and removal
//! of an unknown id is a no-op.

use std::collections::HashMap;

use log::{debug, warn};

use outbreak_shared::ext::Positionable;
use outbreak_shared::{
    sequence_diff, sequence_greater_than, EntityId, EntityTypeId, FieldId, FieldMap, FieldValue,
    Frame, Tick, Vec2,
};

use crate::interpolation::InterpolationBuffer;

/// A remote entity as the client knows it: its wire schema tag, the merged
/// field state, and the position history used for delayed rendering.
pub struct RemoteEntity {
    type_id: EntityTypeId,
    fields: FieldMap,
    interp: InterpolationBuffer,
}

impl RemoteEntity {
    pub fn type_id(&self) -> EntityTypeId {
        self.type_id
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldValue> {
        self.fields.get(id)
    }

    /// Latest authoritative position, unsmoothed.
    pub fn position(&self) -> Option<Vec2> {
        match self.fields.get(Positionable::POSITION) {
            Some(FieldValue::Vec2(position)) => Some(*position),
            _ => None,
        }
    }
}

pub struct RemoteWorld {
    entities: HashMap<EntityId, RemoteEntity>,
    game_state: FieldMap,
    last_tick: Option<Tick>,
    /// Unwrapped tick clock: advances by the wrapping diff on every applied
    /// frame so interpolation math never sees the u16 wrap.
    clock: u64,
    interp_capacity: usize,
}

impl RemoteWorld {
    pub fn new(interp_capacity: usize) -> Self {
        Self {
            entities: HashMap::new(),
            game_state: FieldMap::new(),
            last_tick: None,
            clock: 0,
            interp_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&RemoteEntity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&EntityId, &RemoteEntity)> {
        self.entities.iter()
    }

    pub fn game_state(&self) -> &FieldMap {
        &self.game_state
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    /// The unwrapped tick of the newest applied frame.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Where to sample remote entities for rendering: the newest known tick
    /// minus the deliberate interpolation delay.
    pub fn render_tick(&self, delay_ticks: u64) -> f64 {
        self.clock.saturating_sub(delay_ticks) as f64
    }

    /// Interpolated render position for a remote entity. Falls back to the
    /// latest authoritative position before any sample exists.
    pub fn render_position(&self, id: EntityId, render_tick: f64) -> Option<Vec2> {
        let entity = self.entities.get(&id)?;
        entity.interp.sample(render_tick).or_else(|| entity.position())
    }

    /// Applies one decoded frame. Returns `false` when the frame is stale
    /// or a duplicate and was discarded; state is untouched in that case.
    pub fn apply(&mut self, frame: &Frame) -> bool {
        match self.last_tick {
            None => {
                // First frame seeds the clock at its own tick value.
                self.clock = u64::from(frame.tick);
            }
            Some(last) => {
                if !sequence_greater_than(frame.tick, last) {
                    debug!("discarding stale frame tick {} (have {})", frame.tick, last);
                    return false;
                }
                let diff = sequence_diff(last, frame.tick);
                if diff <= 0 {
                    return false;
                }
                self.clock += diff as u64;
            }
        }
        self.last_tick = Some(frame.tick);

        self.game_state.merge_from(&frame.game_state);

        for record in &frame.entities {
            if !self.entities.contains_key(&record.id) {
                if !record.full {
                    // A patch for an entity we never saw whole. Known state
                    // cannot be reconstructed from it; the next keyframe
                    // will carry the entity in full.
                    warn!("dropping patch for unknown entity {}", record.id);
                    continue;
                }
                self.entities.insert(
                    record.id,
                    RemoteEntity {
                        type_id: record.type_id,
                        fields: FieldMap::new(),
                        interp: InterpolationBuffer::new(self.interp_capacity),
                    },
                );
            }
            let Some(entity) = self.entities.get_mut(&record.id) else {
                continue;
            };

            if record.full {
                entity.fields = record.fields.clone();
            } else {
                entity.fields.merge_from(&record.fields);
            }
            if let Some(position) = entity.position() {
                entity.interp.push(self.clock, position);
            }
        }

        for id in &frame.removed {
            // Removing an id we never knew (or already removed) is fine.
            self.entities.remove(id);
        }
        true
    }
}
