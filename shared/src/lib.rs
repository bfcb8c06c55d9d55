//! # Outbreak Shared
//! Common functionality shared between outbreak-server & outbreak-client
//! crates: the binary wire protocol, the entity/extension data model, and
//! the fixed-timestep primitives that keep both simulations in the same
//! quantum.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub mod codec;
mod event;
mod math;
mod movement;
mod sequence;
mod time;
mod types;
pub mod world;

pub use codec::{
    ByteReader, ByteWriter, CompressionError, DecodeError, EncodeError, EntityRecord, FieldDef,
    FieldId, FieldMap, FieldType, FieldValue, Frame, FrameDecoder, FrameEncoder, Schema,
    SchemaRegistry,
};
pub use event::{GameEvent, InteractAction};
pub use math::{Aabb, Vec2};
pub use movement::{step_movement, MoveInput};
pub use sequence::{
    sequence_diff, sequence_greater_than, sequence_less_than, try_sequence_diff, SequenceError,
};
pub use time::{FixedTimestep, MAX_ACCUMULATED_STEPS};
pub use types::{EntityId, EntityTypeId, SequenceNum, Tick};
pub use world::{
    ext, Entity, Extension, ExtensionKind, ExtensionType, Neighbor, NeighborQuery, UpdateContext,
    WorldCommand, WorldError,
};
