use std::fmt;

use crate::codec::{ByteReader, ByteWriter, DecodeError};

/// Server tick counter. Wraps; compare with the helpers in [`crate::sequence`].
pub type Tick = u16;

/// Sequence number for client input frames. Wraps; never reused while any
/// buffered frame still references it.
pub type SequenceNum = u16;

/// Opaque, stable entity identity. Assigned by the server's entity manager
/// from a monotonically increasing counter and never reused for the
/// lifetime of a simulation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.0);
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, DecodeError> {
        Ok(Self(reader.read_u32()?))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Stable wire tag selecting an entity's schema and default extension set.
/// Both sides must register the same tags in the same order; an unknown tag
/// on decode is a hard schema-drift failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityTypeId(u8);

impl EntityTypeId {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
