//! Schema model for the wire protocol. A schema declares, per entity type,
//! an ordered list of typed fields; the frame codec walks it to encode and
//! decode payloads without any per-field tags in full mode.

use crate::types::EntityTypeId;

use super::{
    error::{DecodeError, EncodeError},
    reader::ByteReader,
    value::{FieldId, FieldMap, FieldValue},
    writer::ByteWriter,
};

/// Declared wire type of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I32,
    F32,
    /// u16 length prefix + UTF-8 bytes.
    Str,
    /// Two f32s.
    Vec2,
    /// u16 count prefix + homogeneous elements.
    List(Box<FieldType>),
    /// Positional sub-fields, no prefixes.
    Record(Vec<FieldType>),
    /// u8 tag prefix selecting one of the declared variants.
    OneOf(Vec<FieldType>),
}

impl FieldType {
    /// Smallest possible wire size of a value of this type, used to guard
    /// declared counts against truncated buffers.
    pub fn min_wire_size(&self) -> usize {
        match self {
            FieldType::Bool | FieldType::U8 => 1,
            FieldType::U16 | FieldType::Str | FieldType::List(_) => 2,
            FieldType::U32 | FieldType::I32 | FieldType::F32 => 4,
            FieldType::U64 | FieldType::Vec2 => 8,
            FieldType::Record(fields) => fields.iter().map(FieldType::min_wire_size).sum(),
            FieldType::OneOf(_) => 1,
        }
    }
}

/// One declared field of an entity schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub id: FieldId,
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(id: FieldId, name: &'static str, ty: FieldType) -> Self {
        Self { id, name, ty }
    }
}

/// Ordered field list for one entity type (or for the game-state globals).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of bytes in this schema's dirty-payload presence mask.
    pub fn mask_bytes(&self) -> usize {
        (self.fields.len() + 7) / 8
    }
}

struct TypeEntry {
    name: &'static str,
    schema: Schema,
}

/// Registry mapping entity type tags to their wire schemas. Client and
/// server must build identical registries (same types, same registration
/// order) — mismatch shows up as a deterministic decode failure.
#[derive(Default)]
pub struct SchemaRegistry {
    types: Vec<TypeEntry>,
    game_state: Schema,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            game_state: Schema::default(),
        }
    }

    /// Registers a type and returns its wire tag. Tags are assigned in
    /// registration order starting at zero.
    pub fn register_type(&mut self, name: &'static str, schema: Schema) -> EntityTypeId {
        let tag = self.types.len() as u8;
        self.types.push(TypeEntry { name, schema });
        EntityTypeId::new(tag)
    }

    pub fn set_game_state_schema(&mut self, schema: Schema) {
        self.game_state = schema;
    }

    pub fn game_state_schema(&self) -> &Schema {
        &self.game_state
    }

    pub fn schema_for(&self, type_id: EntityTypeId) -> Result<&Schema, DecodeError> {
        self.types
            .get(type_id.value() as usize)
            .map(|entry| &entry.schema)
            .ok_or(DecodeError::UnknownEntityType {
                tag: type_id.value(),
            })
    }

    pub fn type_name(&self, type_id: EntityTypeId) -> Option<&'static str> {
        self.types
            .get(type_id.value() as usize)
            .map(|entry| entry.name)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

/// Writes `value` according to `ty`. The value's shape must match the
/// declared type exactly.
pub fn encode_value(
    writer: &mut ByteWriter,
    ty: &FieldType,
    value: &FieldValue,
) -> Result<(), EncodeError> {
    match (ty, value) {
        (FieldType::Bool, FieldValue::Bool(v)) => writer.write_bool(*v),
        (FieldType::U8, FieldValue::U8(v)) => writer.write_u8(*v),
        (FieldType::U16, FieldValue::U16(v)) => writer.write_u16(*v),
        (FieldType::U32, FieldValue::U32(v)) => writer.write_u32(*v),
        (FieldType::U64, FieldValue::U64(v)) => writer.write_u64(*v),
        (FieldType::I32, FieldValue::I32(v)) => writer.write_i32(*v),
        (FieldType::F32, FieldValue::F32(v)) => writer.write_f32(*v),
        (FieldType::Str, FieldValue::Str(v)) => writer.write_str(v)?,
        (FieldType::Vec2, FieldValue::Vec2(v)) => writer.write_vec2(*v),
        (FieldType::List(inner), FieldValue::List(items)) => {
            if items.len() > u16::MAX as usize {
                return Err(EncodeError::ListTooLong { len: items.len() });
            }
            writer.write_u16(items.len() as u16);
            for item in items {
                encode_value(writer, inner, item)?;
            }
        }
        (FieldType::Record(field_tys), FieldValue::Record(values)) => {
            if field_tys.len() != values.len() {
                return Err(EncodeError::TypeMismatch { expected: "record" });
            }
            for (field_ty, field_value) in field_tys.iter().zip(values) {
                encode_value(writer, field_ty, field_value)?;
            }
        }
        (FieldType::OneOf(variants), FieldValue::OneOf(tag, inner_value)) => {
            let variant_ty =
                variants
                    .get(*tag as usize)
                    .ok_or(EncodeError::UnknownVariant {
                        tag: *tag,
                        variants: variants.len(),
                    })?;
            writer.write_u8(*tag);
            encode_value(writer, variant_ty, inner_value)?;
        }
        (ty, _) => {
            return Err(EncodeError::TypeMismatch {
                expected: type_name(ty),
            })
        }
    }
    Ok(())
}

/// Reads one value of `ty`. Total for any buffer produced by
/// [`encode_value`] with the same type; rejects malformed buffers with a
/// [`DecodeError`].
pub fn decode_value(reader: &mut ByteReader, ty: &FieldType) -> Result<FieldValue, DecodeError> {
    Ok(match ty {
        FieldType::Bool => FieldValue::Bool(reader.read_bool()?),
        FieldType::U8 => FieldValue::U8(reader.read_u8()?),
        FieldType::U16 => FieldValue::U16(reader.read_u16()?),
        FieldType::U32 => FieldValue::U32(reader.read_u32()?),
        FieldType::U64 => FieldValue::U64(reader.read_u64()?),
        FieldType::I32 => FieldValue::I32(reader.read_i32()?),
        FieldType::F32 => FieldValue::F32(reader.read_f32()?),
        FieldType::Str => FieldValue::Str(reader.read_str()?),
        FieldType::Vec2 => FieldValue::Vec2(reader.read_vec2()?),
        FieldType::List(inner) => {
            let count = reader.read_u16()? as usize;
            reader.check_count(count, inner.min_wire_size())?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_value(reader, inner)?);
            }
            FieldValue::List(items)
        }
        FieldType::Record(field_tys) => {
            let mut values = Vec::with_capacity(field_tys.len());
            for field_ty in field_tys {
                values.push(decode_value(reader, field_ty)?);
            }
            FieldValue::Record(values)
        }
        FieldType::OneOf(variants) => {
            let tag = reader.read_u8()?;
            let variant_ty = variants
                .get(tag as usize)
                .ok_or(DecodeError::UnknownVariant {
                    tag,
                    variants: variants.len(),
                })?;
            FieldValue::OneOf(tag, Box::new(decode_value(reader, variant_ty)?))
        }
    })
}

fn type_name(ty: &FieldType) -> &'static str {
    match ty {
        FieldType::Bool => "bool",
        FieldType::U8 => "u8",
        FieldType::U16 => "u16",
        FieldType::U32 => "u32",
        FieldType::U64 => "u64",
        FieldType::I32 => "i32",
        FieldType::F32 => "f32",
        FieldType::Str => "str",
        FieldType::Vec2 => "vec2",
        FieldType::List(_) => "list",
        FieldType::Record(_) => "record",
        FieldType::OneOf(_) => "one-of",
    }
}

/// Writes `fields` against `schema` in declared order, either in full mode
/// (all fields, no mask) or dirty-only mode (presence bitmask followed by
/// the present fields).
pub fn encode_fields(
    writer: &mut ByteWriter,
    schema: &Schema,
    fields: &FieldMap,
    full: bool,
) -> Result<(), EncodeError> {
    if full {
        for def in schema.fields() {
            let value = fields
                .get(def.id)
                .ok_or(EncodeError::MissingField { id: def.id.0 })?;
            encode_value(writer, &def.ty, value)?;
        }
        return Ok(());
    }

    let mut mask = vec![0u8; schema.mask_bytes()];
    for (index, def) in schema.fields().iter().enumerate() {
        if fields.contains(def.id) {
            mask[index / 8] |= 1 << (index % 8);
        }
    }
    writer.write_bytes(&mask);
    for def in schema.fields() {
        if let Some(value) = fields.get(def.id) {
            encode_value(writer, &def.ty, value)?;
        }
    }
    Ok(())
}

/// Inverse of [`encode_fields`]. In dirty-only mode the result holds only
/// the present fields; the caller merges it into prior known state.
pub fn decode_fields(
    reader: &mut ByteReader,
    schema: &Schema,
    full: bool,
) -> Result<FieldMap, DecodeError> {
    let mut fields = FieldMap::new();
    if full {
        for def in schema.fields() {
            fields.insert(def.id, decode_value(reader, &def.ty)?);
        }
        return Ok(fields);
    }

    let mask = reader.read_bytes(schema.mask_bytes())?.to_vec();
    for (index, def) in schema.fields().iter().enumerate() {
        if mask[index / 8] & (1 << (index % 8)) != 0 {
            fields.insert(def.id, decode_value(reader, &def.ty)?);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            FieldDef::new(FieldId(0), "position", FieldType::Vec2),
            FieldDef::new(FieldId(1), "health", FieldType::U16),
            FieldDef::new(FieldId(2), "name", FieldType::Str),
            FieldDef::new(
                FieldId(3),
                "slots",
                FieldType::List(Box::new(FieldType::Record(vec![
                    FieldType::Str,
                    FieldType::U16,
                ]))),
            ),
            FieldDef::new(
                FieldId(4),
                "action",
                FieldType::OneOf(vec![FieldType::U8, FieldType::Str]),
            ),
        ])
    }

    fn sample_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(FieldId(0), FieldValue::Vec2(crate::math::Vec2::new(1.0, 2.0)));
        fields.insert(FieldId(1), FieldValue::U16(80));
        fields.insert(FieldId(2), FieldValue::Str("crate".into()));
        fields.insert(
            FieldId(3),
            FieldValue::List(vec![FieldValue::Record(vec![
                FieldValue::Str("bandage".into()),
                FieldValue::U16(3),
            ])]),
        );
        fields.insert(
            FieldId(4),
            FieldValue::OneOf(1, Box::new(FieldValue::Str("open".into()))),
        );
        fields
    }

    #[test]
    fn full_round_trip() {
        let schema = sample_schema();
        let fields = sample_fields();

        let mut writer = ByteWriter::new();
        encode_fields(&mut writer, &schema, &fields, true).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_fields(&mut reader, &schema, true).unwrap();
        assert_eq!(decoded, fields);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn full_encode_is_idempotent() {
        let schema = sample_schema();
        let fields = sample_fields();

        let mut first = ByteWriter::new();
        encode_fields(&mut first, &schema, &fields, true).unwrap();
        let bytes = first.into_bytes();

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_fields(&mut reader, &schema, true).unwrap();

        let mut second = ByteWriter::new();
        encode_fields(&mut second, &schema, &decoded, true).unwrap();
        assert_eq!(second.into_bytes(), bytes);
    }

    #[test]
    fn dirty_payload_carries_only_present_fields() {
        let schema = sample_schema();
        let mut dirty = FieldMap::new();
        dirty.insert(FieldId(1), FieldValue::U16(55));

        let mut writer = ByteWriter::new();
        encode_fields(&mut writer, &schema, &dirty, false).unwrap();
        let bytes = writer.into_bytes();
        // 1 mask byte + 2 byte u16
        assert_eq!(bytes.len(), 3);

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_fields(&mut reader, &schema, false).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get(FieldId(1)), Some(&FieldValue::U16(55)));
    }

    #[test]
    fn delta_merge_matches_authoritative_full() {
        let schema = sample_schema();
        let prior = sample_fields();

        // Authoritative change: health drops, everything else untouched.
        let mut authoritative = prior.clone();
        authoritative.insert(FieldId(1), FieldValue::U16(40));

        let mut delta = FieldMap::new();
        delta.insert(FieldId(1), FieldValue::U16(40));

        let mut delta_bytes = ByteWriter::new();
        encode_fields(&mut delta_bytes, &schema, &delta, false).unwrap();
        let delta_bytes = delta_bytes.into_bytes();

        let mut merged = prior;
        let mut reader = ByteReader::new(&delta_bytes);
        merged.merge_from(&decode_fields(&mut reader, &schema, false).unwrap());

        let mut merged_full = ByteWriter::new();
        encode_fields(&mut merged_full, &schema, &merged, true).unwrap();
        let mut auth_full = ByteWriter::new();
        encode_fields(&mut auth_full, &schema, &authoritative, true).unwrap();
        assert_eq!(merged_full.into_bytes(), auth_full.into_bytes());
    }

    #[test]
    fn missing_field_in_full_mode_is_an_error() {
        let schema = sample_schema();
        let mut fields = sample_fields();
        fields = {
            // rebuild without the name field
            let mut partial = FieldMap::new();
            for (id, value) in fields.iter() {
                if id != FieldId(2) {
                    partial.insert(id, value.clone());
                }
            }
            partial
        };

        let mut writer = ByteWriter::new();
        assert_eq!(
            encode_fields(&mut writer, &schema, &fields, true),
            Err(EncodeError::MissingField { id: 2 })
        );
    }

    #[test]
    fn unknown_one_of_tag_is_rejected() {
        let ty = FieldType::OneOf(vec![FieldType::U8]);
        let mut reader = ByteReader::new(&[9, 0]);
        assert_eq!(
            decode_value(&mut reader, &ty),
            Err(DecodeError::UnknownVariant {
                tag: 9,
                variants: 1
            })
        );
    }

    #[test]
    fn unknown_type_tag_is_schema_drift() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.schema_for(EntityTypeId::new(3)).unwrap_err(),
            DecodeError::UnknownEntityType { tag: 3 }
        );
    }
}
