//! Format constants and decoding limits.

/// Serializer version byte that precedes every record body.
pub const SERIALIZER_VERSION: u8 = 0;

/// Maximum varint groups for a 32-bit value.
pub const MAX_VARINT32_BYTES: usize = 5;

/// Maximum varint groups for a 64-bit value.
pub const MAX_VARINT64_BYTES: usize = 10;

/// Default bound on embedded-document nesting.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Largest length that fits a signed 32-bit varint prefix.
pub const MAX_LENGTH_PREFIX: usize = i32::MAX as usize;

/// Item tag announcing that an embedded document follows.
pub const EMBEDDED_DOCUMENT_TAG: u8 = 9;
