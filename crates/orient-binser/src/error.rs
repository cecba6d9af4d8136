//! Error types for record encoding and decoding.

use thiserror::Error;

use crate::model::TypeTag;

/// Coarse classification of decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte source ended before a value was complete.
    TruncatedInput,
    /// A length prefix decoded to a negative number.
    NegativeLength,
    /// A varint ran past its maximum group count or bit width.
    Overflow,
    /// The byte stream violates the record layout.
    ProtocolError,
    /// A type tag this codec does not handle.
    UnsupportedType,
    /// An id-keyed header entry the schema catalog could not resolve.
    UnresolvedPropertyId,
    /// Embedded documents nested deeper than the configured bound.
    RecursionLimitExceeded,
}

impl ErrorKind {
    /// Returns a short stable name for the kind (e.g., "truncated_input").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TruncatedInput => "truncated_input",
            ErrorKind::NegativeLength => "negative_length",
            ErrorKind::Overflow => "overflow",
            ErrorKind::ProtocolError => "protocol_error",
            ErrorKind::UnsupportedType => "unsupported_type",
            ErrorKind::UnresolvedPropertyId => "unresolved_property_id",
            ErrorKind::RecursionLimitExceeded => "recursion_limit_exceeded",
        }
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    // === Truncated input ===
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    // === Negative length ===
    #[error("negative length {len} for {context}")]
    NegativeLength { context: &'static str, len: i64 },

    // === Overflow ===
    #[error("varint for {context} exceeds {max_groups} groups ({bits}-bit)")]
    VarintTooLong {
        context: &'static str,
        bits: u8,
        max_groups: usize,
    },

    #[error("varint for {context} overflows {bits} bits")]
    VarintOverflow { context: &'static str, bits: u8 },

    // === Protocol errors ===
    #[error("header ended without a terminating zero")]
    UnterminatedHeader,

    #[error("header mixes named and id-keyed entries")]
    MixedHeader,

    #[error("invalid bool value: {value} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("unsupported serializer version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("value of field {field:?} starts at offset {actual}, header says {expected}")]
    ValueOffsetMismatch {
        field: String,
        expected: i32,
        actual: usize,
    },

    // === Unsupported type ===
    #[error("unsupported type tag {tag} in {context}")]
    UnsupportedType { context: &'static str, tag: u8 },

    // === Schema ===
    #[error("property id {id} not found in schema")]
    UnresolvedPropertyId { id: i32 },

    // === Recursion ===
    #[error("embedded documents nested deeper than {max}")]
    RecursionLimitExceeded { max: usize },
}

impl DecodeError {
    /// Returns the taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnexpectedEof { .. } => ErrorKind::TruncatedInput,
            DecodeError::NegativeLength { .. } => ErrorKind::NegativeLength,
            DecodeError::VarintTooLong { .. } | DecodeError::VarintOverflow { .. } => {
                ErrorKind::Overflow
            }
            DecodeError::UnterminatedHeader
            | DecodeError::MixedHeader
            | DecodeError::InvalidBool { .. }
            | DecodeError::UnsupportedVersion { .. }
            | DecodeError::ValueOffsetMismatch { .. } => ErrorKind::ProtocolError,
            DecodeError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            DecodeError::UnresolvedPropertyId { .. } => ErrorKind::UnresolvedPropertyId,
            DecodeError::RecursionLimitExceeded { .. } => ErrorKind::RecursionLimitExceeded,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("value of field {field:?} does not match its type tag {expected:?}")]
    TypeMismatch { field: String, expected: TypeTag },

    #[error("field {field:?} has type tag {tag:?}, which cannot carry a value")]
    UnsupportedType { field: String, tag: TypeTag },

    #[error("field names must not be empty")]
    EmptyFieldName,

    #[error("property id {id} is negative")]
    NegativePropertyId { id: i32 },
}
