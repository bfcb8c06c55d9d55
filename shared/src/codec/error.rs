use thiserror::Error;

/// Errors produced while decoding a wire buffer. Every variant is a
/// deterministic rejection — the decoder never reads out of bounds and never
/// panics on attacker-controlled input. A failed frame is dropped whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ended before a declared field could be read.
    #[error("buffer underrun: needed {needed} more bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A declared count implies more payload than the buffer holds.
    #[error("declared count {count} exceeds remaining buffer ({remaining} bytes)")]
    CountExceedsBuffer { count: usize, remaining: usize },

    /// A string field held invalid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// The entity type tag is not present in the schema registry.
    /// Schema drift between versions is a hard failure, never migrated.
    #[error("unknown entity type tag {tag}")]
    UnknownEntityType { tag: u8 },

    /// A one-of selector tag exceeded the declared variant count.
    #[error("one-of tag {tag} out of range (variant count {variants})")]
    UnknownVariant { tag: u8, variants: usize },

    /// An event kind tag is not part of the event registry.
    #[error("unknown event kind tag {tag}")]
    UnknownEventKind { tag: u8 },
}

/// Errors produced while encoding. These indicate a bug or a value outside
/// the schema's envelope, never a transient condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A string field exceeded the u16 length prefix.
    #[error("string of {len} bytes exceeds the u16 length prefix")]
    StringTooLong { len: usize },

    /// A list field exceeded the u16 count prefix.
    #[error("list of {len} elements exceeds the u16 count prefix")]
    ListTooLong { len: usize },

    /// A value's shape did not match the schema's declared field type.
    #[error("value does not match declared field type {expected}")]
    TypeMismatch { expected: &'static str },

    /// A full-mode payload was missing a field the schema declares.
    #[error("full payload missing declared field id {id}")]
    MissingField { id: u16 },

    /// The entity type tag is not present in the schema registry.
    #[error("unknown entity type tag {tag}")]
    UnknownEntityType { tag: u8 },

    /// A one-of value's tag exceeded the declared variant count.
    #[error("one-of tag {tag} out of range (variant count {variants})")]
    UnknownVariant { tag: u8, variants: usize },
}
