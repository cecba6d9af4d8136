//! Whole-record helpers.
//!
//! A record as stored by the server is one serializer-version byte followed
//! by the record body. These helpers handle the version byte and delegate the
//! body to a [`SerializerV0`].

use crate::codec::document::{RecordSerializer, SerializerV0};
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::SERIALIZER_VERSION;
use crate::model::Document;

/// Decodes a record (version byte + body) with default options.
pub fn decode_record(input: &[u8]) -> Result<Document, DecodeError> {
    decode_record_with(input, &SerializerV0::new())
}

/// Decodes a record (version byte + body) with the given serializer.
///
/// Presence-marker offsets are taken relative to the body, after the
/// version byte.
pub fn decode_record_with(input: &[u8], serializer: &SerializerV0<'_>) -> Result<Document, DecodeError> {
    let (&version, body) = input
        .split_first()
        .ok_or(DecodeError::UnexpectedEof { context: "version" })?;
    if version != SERIALIZER_VERSION {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let mut reader = Reader::new(body);
    let mut doc = Document::default();
    serializer.deserialize(&mut doc, &mut reader)?;
    Ok(doc)
}

/// Decodes a fresh document from a record body (version byte already read).
pub fn decode_document(reader: &mut Reader<'_>) -> Result<Document, DecodeError> {
    let mut doc = Document::default();
    SerializerV0::new().deserialize(&mut doc, reader)?;
    Ok(doc)
}

/// Encodes a record: version byte, then the body.
pub fn encode_record(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    let mut body = Writer::new();
    SerializerV0::new().serialize(doc, &mut body)?;

    let mut out = Writer::with_capacity(1 + body.len());
    out.write_byte(SERIALIZER_VERSION);
    out.write_bytes(body.as_bytes());
    Ok(out.into_bytes())
}
