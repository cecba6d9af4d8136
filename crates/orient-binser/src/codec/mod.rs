//! Binary encoding/decoding for records.
//!
//! Implements the version 0 record format: varint primitives, the
//! classname/header section, typed values and embedded collections.

pub mod document;
pub mod header;
pub mod primitives;
pub mod record;
pub mod value;


pub use document::{DecodeOptions, ItemTagMode, RecordSerializer, SerializerV0};
pub use header::{decode_property_id, encode_property_id, Header, NamedProperty, PropertyIdRef};
pub use primitives::{zigzag_decode, zigzag_decode32, zigzag_encode, zigzag_encode32, Reader, Writer};
pub use record::{decode_document, decode_record, decode_record_with, encode_record};
pub use value::{decode_value, encode_value};
