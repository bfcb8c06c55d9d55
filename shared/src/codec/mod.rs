//! Binary wire protocol: schema-driven encoding of full and dirty-only
//! entity state, plus the per-tick frame container.

mod compress;
mod error;
mod frame;
mod reader;
mod schema;
mod value;
mod writer;

pub use compress::{CompressionError, FrameDecoder, FrameEncoder};
pub use error::{DecodeError, EncodeError};
pub use frame::{EntityRecord, Frame};
pub use reader::ByteReader;
pub use schema::{
    decode_fields, decode_value, encode_fields, encode_value, FieldDef, FieldType, Schema,
    SchemaRegistry,
};
pub use value::{FieldId, FieldMap, FieldValue};
pub use writer::ByteWriter;
