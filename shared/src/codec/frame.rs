//! Per-tick wire frame: entity records (full or dirty-only payloads),
//! game-state globals, and the ids removed this tick.

use log::warn;

use crate::types::{EntityId, EntityTypeId, Tick};

use super::{
    error::{DecodeError, EncodeError},
    reader::ByteReader,
    schema::{decode_fields, encode_fields, SchemaRegistry},
    value::FieldMap,
    writer::ByteWriter,
};

const FLAG_FULL: u8 = 1 << 0;

/// Minimum wire size of one entity record: id + type tag + flags.
const ENTITY_RECORD_MIN: usize = 6;

/// One entity's payload within a frame. `full == true` means every schema
/// field is present (newly-visible or keyframe); otherwise `fields` is a
/// patch to merge into prior known state.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub type_id: EntityTypeId,
    pub full: bool,
    pub fields: FieldMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub tick: Tick,
    pub game_state: FieldMap,
    pub entities: Vec<EntityRecord>,
    pub removed: Vec<EntityId>,
}

impl Frame {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            game_state: FieldMap::new(),
            entities: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Encodes the frame against `registry`. Layout: tick, game-state
    /// globals (always full), entity count + records, removed-id list.
    pub fn encode(&self, registry: &SchemaRegistry) -> Result<Vec<u8>, EncodeError> {
        let mut writer = ByteWriter::with_capacity(64);
        writer.write_u16(self.tick);
        encode_fields(
            &mut writer,
            registry.game_state_schema(),
            &self.game_state,
            true,
        )?;

        if self.entities.len() > u16::MAX as usize {
            return Err(EncodeError::ListTooLong {
                len: self.entities.len(),
            });
        }
        writer.write_u16(self.entities.len() as u16);
        for record in &self.entities {
            let schema = registry
                .schema_for(record.type_id)
                .map_err(|_| EncodeError::UnknownEntityType {
                    tag: record.type_id.value(),
                })?;
            record.id.write(&mut writer);
            writer.write_u8(record.type_id.value());
            writer.write_u8(if record.full { FLAG_FULL } else { 0 });
            encode_fields(&mut writer, schema, &record.fields, record.full)?;
        }

        if self.removed.len() > u16::MAX as usize {
            return Err(EncodeError::ListTooLong {
                len: self.removed.len(),
            });
        }
        writer.write_u16(self.removed.len() as u16);
        for id in &self.removed {
            id.write(&mut writer);
        }

        Ok(writer.into_bytes())
    }

    /// Exact inverse of [`Frame::encode`] for the same registry. Malformed
    /// buffers are rejected deterministically; the caller drops the frame.
    pub fn decode(bytes: &[u8], registry: &SchemaRegistry) -> Result<Frame, DecodeError> {
        let mut reader = ByteReader::new(bytes);

        let tick = reader.read_u16()?;
        let game_state = decode_fields(&mut reader, registry.game_state_schema(), true)?;

        let entity_count = reader.read_u16()? as usize;
        reader.check_count(entity_count, ENTITY_RECORD_MIN)?;
        let mut entities = Vec::with_capacity(entity_count);
        for _ in 0..entity_count {
            let id = EntityId::read(&mut reader)?;
            let type_id = EntityTypeId::new(reader.read_u8()?);
            let full = reader.read_u8()? & FLAG_FULL != 0;
            let schema = registry.schema_for(type_id)?;
            let fields = decode_fields(&mut reader, schema, full)?;
            entities.push(EntityRecord {
                id,
                type_id,
                full,
                fields,
            });
        }

        let removed_count = reader.read_u16()? as usize;
        reader.check_count(removed_count, 4)?;
        let mut removed = Vec::with_capacity(removed_count);
        for _ in 0..removed_count {
            removed.push(EntityId::read(&mut reader)?);
        }

        Ok(Frame {
            tick,
            game_state,
            entities,
            removed,
        })
    }

    /// Decode wrapper that logs and swallows malformed frames — the
    /// fatal-for-that-frame policy. Returns `None` when the frame was
    /// dropped.
    pub fn decode_lossy(bytes: &[u8], registry: &SchemaRegistry) -> Option<Frame> {
        match Frame::decode(bytes, registry) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!("dropping malformed frame ({} bytes): {}", bytes.len(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::schema::{FieldDef, FieldType, Schema};
    use crate::codec::value::{FieldId, FieldValue};
    use crate::math::Vec2;

    fn registry() -> (SchemaRegistry, EntityTypeId) {
        let mut registry = SchemaRegistry::new();
        let type_id = registry.register_type(
            "survivor",
            Schema::new(vec![
                FieldDef::new(FieldId(0), "position", FieldType::Vec2),
                FieldDef::new(FieldId(1), "health", FieldType::U16),
            ]),
        );
        registry.set_game_state_schema(Schema::new(vec![FieldDef::new(
            FieldId(900),
            "alive_count",
            FieldType::U16,
        )]));
        (registry, type_id)
    }

    fn sample_frame(type_id: EntityTypeId) -> Frame {
        let mut frame = Frame::new(7);
        frame
            .game_state
            .insert(FieldId(900), FieldValue::U16(3));

        let mut fields = FieldMap::new();
        fields.insert(FieldId(0), FieldValue::Vec2(Vec2::new(100.0, 100.0)));
        fields.insert(FieldId(1), FieldValue::U16(90));
        frame.entities.push(EntityRecord {
            id: EntityId::new(1),
            type_id,
            full: true,
            fields,
        });
        frame.removed.push(EntityId::new(44));
        frame
    }

    #[test]
    fn full_frame_round_trip() {
        let (registry, type_id) = registry();
        let frame = sample_frame(type_id);

        let bytes = frame.encode(&registry).unwrap();
        let decoded = Frame::decode(&bytes, &registry).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn encode_decode_encode_is_byte_identical() {
        let (registry, type_id) = registry();
        let frame = sample_frame(type_id);

        let first = frame.encode(&registry).unwrap();
        let decoded = Frame::decode(&first, &registry).unwrap();
        let second = decoded.encode(&registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn delta_record_round_trips_as_patch() {
        let (registry, type_id) = registry();
        let mut frame = Frame::new(8);
        frame.game_state.insert(FieldId(900), FieldValue::U16(3));

        let mut dirty = FieldMap::new();
        dirty.insert(FieldId(1), FieldValue::U16(25));
        frame.entities.push(EntityRecord {
            id: EntityId::new(1),
            type_id,
            full: false,
            fields: dirty.clone(),
        });

        let bytes = frame.encode(&registry).unwrap();
        let decoded = Frame::decode(&bytes, &registry).unwrap();
        assert!(!decoded.entities[0].full);
        assert_eq!(decoded.entities[0].fields, dirty);
    }

    #[test]
    fn hostile_entity_count_is_rejected() {
        let (registry, _) = registry();
        // tick + game state + a count of 65535 with no payload behind it
        let mut writer = ByteWriter::new();
        writer.write_u16(1);
        writer.write_u16(0); // alive_count
        writer.write_u16(u16::MAX);
        let bytes = writer.into_bytes();

        assert!(matches!(
            Frame::decode(&bytes, &registry),
            Err(DecodeError::CountExceedsBuffer { .. })
        ));
    }

    #[test]
    fn unknown_type_tag_drops_frame() {
        let (registry, type_id) = registry();
        let frame = sample_frame(type_id);
        let mut bytes = frame.encode(&registry).unwrap();
        // corrupt the type tag (tick u16 + game state u16 + count u16 + id u32)
        bytes[10] = 99;

        assert_eq!(
            Frame::decode(&bytes, &registry),
            Err(DecodeError::UnknownEntityType { tag: 99 })
        );
        assert!(Frame::decode_lossy(&bytes, &registry).is_none());
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let (registry, type_id) = registry();
        let frame = sample_frame(type_id);
        let bytes = frame.encode(&registry).unwrap();

        // Cut inside the first entity's field payload: the reader runs dry
        // mid-value (tick 2 + game state 2 + count 2 + id 4 + type 1 +
        // flags 1 = 12 bytes of header).
        assert!(matches!(
            Frame::decode(&bytes[..12], &registry),
            Err(DecodeError::UnexpectedEnd { .. })
        ));

        // A cut behind the removed-id count trips the count guard instead;
        // either way the frame is rejected, never partially applied.
        assert!(Frame::decode(&bytes[..bytes.len() - 3], &registry).is_err());
    }
}
