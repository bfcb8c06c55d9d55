use std::fmt;

use crate::math::Vec2;

/// Stable identifier of one schema field. The high bits carry the owning
/// extension kind, so ids stay unique when an entity type composes several
/// extensions (see `world::ext`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u16);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// A decoded (or to-be-encoded) field value. Mirrors
/// [`super::schema::FieldType`] variant-for-variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    F32(f32),
    Str(String),
    Vec2(Vec2),
    List(Vec<FieldValue>),
    Record(Vec<FieldValue>),
    OneOf(u8, Box<FieldValue>),
}

impl FieldValue {
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            FieldValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            FieldValue::U16(v) => Some(*v),
            _ => None,
        }
    }
}

/// Ordered map from field id to value. Order is insertion order, which for
/// payloads produced by entity serialization or frame decoding is schema
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(FieldId, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces the value for `id`. Replacement keeps the
    /// original position so merged maps stay in schema order.
    pub fn insert(&mut self, id: FieldId, value: FieldValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            entry.1 = value;
        } else {
            self.entries.push((id, value));
        }
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    /// Patches `self` with every entry of `delta`. Fields absent from the
    /// delta are left untouched — a dirty-only payload is a patch, never a
    /// replacement.
    pub fn merge_from(&mut self, delta: &FieldMap) {
        for (id, value) in delta.iter() {
            self.insert(id, value.clone());
        }
    }
}
