//! Binary record serializer for document/graph database clients.
//!
//! This crate decodes and encodes documents carried in the database's
//! compact, self-describing binary record format (serializer version 0),
//! avoiding a textual interchange format for speed and type fidelity.
//!
//! # Quick Start
//!
//! ```rust
//! use orient_binser::{decode_record, encode_record, DocumentBuilder, Value};
//!
//! let doc = DocumentBuilder::new("Cat")
//!     .string("name", "Linus")
//!     .integer("age", 15)
//!     .build();
//!
//! // Encode to binary (version byte + body)
//! let bytes = encode_record(&doc).unwrap();
//!
//! // Decode back
//! let decoded = decode_record(&bytes).unwrap();
//! assert_eq!(decoded.get("age"), Some(&Value::Integer(15)));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Documents, fields, values and type tags
//! - [`codec`]: Binary encoding/decoding
//! - [`schema`]: Property-id resolution for id-keyed headers
//! - [`observe`]: Optional decode diagnostics
//! - [`error`]: Error types
//! - [`limits`]: Format constants and decoding limits
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Varints are bounded to 5 (32-bit) or 10 (64-bit) groups
//! - Collection counts are checked against the remaining input before allocating
//! - Embedded-document nesting is bounded (1000 levels by default)
//! - A failed decode leaves the target document untouched
//!
//! # Wire Format
//!
//! A record is one serializer-version byte followed by the body:
//! - classname: varint length + UTF-8 bytes (may be empty)
//! - header: entries terminated by varint 0, each either a named property
//!   (name, 4-byte presence marker, type byte) or a property id reference
//!   (`-(id + 1)`, 4-byte presence marker)
//! - values, in header order, for every entry with a nonzero presence marker

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod observe;
pub mod schema;

// Re-export commonly used types at crate root
pub use codec::{
    decode_document, decode_record, decode_record_with, encode_record, DecodeOptions, ItemTagMode,
    RecordSerializer, SerializerV0,
};
pub use error::{DecodeError, EncodeError, ErrorKind};
pub use model::{Document, DocumentBuilder, Field, TypeTag, Value};
pub use observe::{DecodeEvent, DecodeObserver, TracingObserver};
pub use schema::{PropertyInfo, SchemaCatalog, SchemaContext};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
