//! Value encoding/decoding for the binary record format.
//!
//! Each field's payload is dispatched on its type tag. Embedded lists and
//! sets recurse into the document codec for their items.

use crate::codec::document::{ItemTagMode, SerializerV0};
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::EMBEDDED_DOCUMENT_TAG;
use crate::model::{Document, Field, TypeTag, Value};
use crate::observe::DecodeEvent;

const ANY: u8 = TypeTag::Any as u8;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one field payload according to its type tag.
///
/// `depth` is the nesting level of the document that owns the field.
pub fn decode_value(
    reader: &mut Reader<'_>,
    type_tag: TypeTag,
    codec: &SerializerV0<'_>,
    depth: usize,
) -> Result<Value, DecodeError> {
    match type_tag {
        TypeTag::String => decode_string(reader),
        TypeTag::Integer => Ok(Value::Integer(reader.read_varint32("integer")?)),
        TypeTag::Long => Ok(Value::Long(reader.read_varint64("long")?)),
        TypeTag::Short => Ok(Value::Short(reader.read_i16("short")?)),
        TypeTag::Boolean => decode_bool(reader, codec.options().strict_bool),
        TypeTag::Binary => Ok(Value::Binary(reader.read_bytes_prefixed("binary")?.to_vec())),
        TypeTag::EmbeddedList | TypeTag::EmbeddedSet => Ok(collection_value(
            type_tag,
            decode_embedded_collection(reader, codec, depth)?,
        )),
        TypeTag::Any => Err(DecodeError::UnsupportedType {
            context: "value",
            tag: ANY,
        }),
    }
}

fn decode_string(reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
    let bytes = reader.read_bytes_prefixed("string")?;
    // No validation: malformed UTF-8 is kept byte-for-byte
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(Value::String(s.to_string())),
        Err(_) => Ok(Value::Binary(bytes.to_vec())),
    }
}

fn decode_bool(reader: &mut Reader<'_>, strict: bool) -> Result<Value, DecodeError> {
    let byte = reader.read_byte("bool")?;
    match byte {
        0x00 => Ok(Value::Boolean(false)),
        0x01 => Ok(Value::Boolean(true)),
        _ if !strict => Ok(Value::Boolean(true)),
        _ => Err(DecodeError::InvalidBool { value: byte }),
    }
}

/// Decodes an embedded list or set: count, collection type, then tagged items.
fn decode_embedded_collection(
    reader: &mut Reader<'_>,
    codec: &SerializerV0<'_>,
    depth: usize,
) -> Result<Vec<Document>, DecodeError> {
    let count = read_collection_prefix(reader, codec, depth)?;
    let mut docs = Vec::new();
    for _ in 0..count {
        if read_item_tag(reader, codec.options().item_tags)? {
            docs.push(codec.decode_nested(reader, depth + 1)?);
        }
    }
    Ok(docs)
}

/// Reads the item count and collection type of an embedded list or set.
pub(crate) fn read_collection_prefix(
    reader: &mut Reader<'_>,
    codec: &SerializerV0<'_>,
    depth: usize,
) -> Result<usize, DecodeError> {
    let count = reader.read_length("collection.count")?;

    let collection_type = reader.read_byte("collection.type")?;
    if collection_type != ANY {
        return Err(DecodeError::UnsupportedType {
            context: "collection.type",
            tag: collection_type,
        });
    }

    // Every item takes at least its tag byte
    if count > reader.remaining_len() {
        return Err(DecodeError::UnexpectedEof {
            context: "collection.items",
        });
    }

    codec.notify(DecodeEvent::EmbeddedCollection { depth, count });
    Ok(count)
}

/// Reads an item tag. Returns true when an embedded document follows.
pub(crate) fn read_item_tag(reader: &mut Reader<'_>, mode: ItemTagMode) -> Result<bool, DecodeError> {
    let item_tag = reader.read_byte("collection.item_type")?;
    if item_tag == ANY {
        return Ok(false);
    }
    match mode {
        ItemTagMode::Legacy => Ok(true),
        ItemTagMode::Typed if item_tag == EMBEDDED_DOCUMENT_TAG => Ok(true),
        ItemTagMode::Typed => Err(DecodeError::UnsupportedType {
            context: "collection.item_type",
            tag: item_tag,
        }),
    }
}

/// Wraps decoded items as the list or set value named by `type_tag`.
pub(crate) fn collection_value(type_tag: TypeTag, items: Vec<Document>) -> Value {
    match type_tag {
        TypeTag::EmbeddedSet => Value::EmbeddedSet(items),
        _ => Value::EmbeddedList(items),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a field's value. The value must fit the field's type tag.
pub fn encode_value(
    writer: &mut Writer,
    field: &Field,
    value: &Value,
    codec: &SerializerV0<'_>,
) -> Result<(), EncodeError> {
    if field.type_tag == TypeTag::Any {
        return Err(EncodeError::UnsupportedType {
            field: field.name.clone(),
            tag: field.type_tag,
        });
    }
    if !value.fits(field.type_tag) {
        return Err(EncodeError::TypeMismatch {
            field: field.name.clone(),
            expected: field.type_tag,
        });
    }

    match value {
        Value::String(s) => writer.write_string(s, "string")?,
        Value::Integer(v) => writer.write_varint32(*v),
        Value::Long(v) => writer.write_varint64(*v),
        Value::Short(v) => writer.write_i16(*v),
        Value::Boolean(b) => writer.write_byte(u8::from(*b)),
        Value::Binary(bytes) => writer.write_bytes_prefixed(bytes, "binary")?,
        Value::EmbeddedList(docs) | Value::EmbeddedSet(docs) => {
            encode_embedded_collection(writer, docs, codec)?
        }
    }
    Ok(())
}

fn encode_embedded_collection(
    writer: &mut Writer,
    docs: &[Document],
    codec: &SerializerV0<'_>,
) -> Result<(), EncodeError> {
    writer.write_length(docs.len(), "collection.count")?;
    writer.write_byte(ANY);
    for doc in docs {
        writer.write_byte(EMBEDDED_DOCUMENT_TAG);
        codec.write_document(doc, writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::document::DecodeOptions;
    use crate::error::ErrorKind;
    use crate::model::DocumentBuilder;

    fn decode(bytes: &[u8], tag: TypeTag) -> Result<(Value, usize), DecodeError> {
        let codec = SerializerV0::new();
        let mut reader = Reader::new(bytes);
        let value = decode_value(&mut reader, tag, &codec, 0)?;
        Ok((value, reader.position()))
    }

    fn encode(field: &Field) -> Result<Vec<u8>, EncodeError> {
        let codec = SerializerV0::new();
        let mut writer = Writer::new();
        let value = field.value.as_ref().unwrap();
        encode_value(&mut writer, field, value, &codec)?;
        Ok(writer.into_bytes())
    }

    #[test]
    fn test_scalar_wire_forms() {
        assert_eq!(decode(&[84], TypeTag::Integer).unwrap(), (Value::Integer(42), 1));
        assert_eq!(decode(&[3], TypeTag::Long).unwrap(), (Value::Long(-2), 1));
        assert_eq!(decode(&[0x01, 0x00], TypeTag::Short).unwrap(), (Value::Short(256), 2));
        assert_eq!(decode(&[1], TypeTag::Boolean).unwrap(), (Value::Boolean(true), 1));
        assert_eq!(decode(&[0], TypeTag::Boolean).unwrap(), (Value::Boolean(false), 1));
        assert_eq!(
            decode(&[4, b'h', b'i'], TypeTag::String).unwrap(),
            (Value::from("hi"), 3)
        );
        assert_eq!(
            decode(&[4, 0xde, 0xad], TypeTag::Binary).unwrap(),
            (Value::Binary(vec![0xde, 0xad]), 3)
        );
    }

    #[test]
    fn test_bool_strictness() {
        assert_eq!(
            decode(&[2], TypeTag::Boolean),
            Err(DecodeError::InvalidBool { value: 2 })
        );

        let options = DecodeOptions {
            strict_bool: false,
            ..DecodeOptions::default()
        };
        let codec = SerializerV0::new().with_options(options);
        let mut reader = Reader::new(&[7]);
        assert_eq!(
            decode_value(&mut reader, TypeTag::Boolean, &codec, 0).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_malformed_utf8_passes_through() {
        let (value, _) = decode(&[4, 0xff, 0xfe], TypeTag::String).unwrap();
        assert_eq!(value, Value::Binary(vec![0xff, 0xfe]));

        let field = Field::new("s", TypeTag::String).with_value(value);
        assert_eq!(encode(&field).unwrap(), vec![4, 0xff, 0xfe]);
    }

    #[test]
    fn test_any_is_not_a_value_type() {
        let err = decode(&[0], TypeTag::Any).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_empty_collection() {
        // count 0, collection type ANY, then an unrelated trailing byte
        let (value, consumed) = decode(&[0, 23, 0x55], TypeTag::EmbeddedList).unwrap();
        assert_eq!(value, Value::EmbeddedList(vec![]));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_collection_type_must_be_any() {
        assert!(matches!(
            decode(&[0, 7], TypeTag::EmbeddedSet),
            Err(DecodeError::UnsupportedType {
                context: "collection.type",
                tag: 7
            })
        ));
    }

    #[test]
    fn test_collection_any_items_are_absent() {
        // three items, all ANY
        let (value, consumed) = decode(&[6, 23, 23, 23, 23], TypeTag::EmbeddedSet).unwrap();
        assert_eq!(value, Value::EmbeddedSet(vec![]));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_collection_count_exceeding_input() {
        let mut writer = Writer::new();
        writer.write_varint32(1_000_000);
        writer.write_byte(23);
        let err = decode(writer.as_bytes(), TypeTag::EmbeddedList).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn test_typed_item_tags() {
        let options = DecodeOptions {
            item_tags: ItemTagMode::Typed,
            ..DecodeOptions::default()
        };
        let codec = SerializerV0::new().with_options(options);

        // one item tagged STRING: legacy mode would recurse, typed mode rejects it
        let bytes = [2, 23, 7, 0, 0];
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            decode_value(&mut reader, TypeTag::EmbeddedList, &codec, 0),
            Err(DecodeError::UnsupportedType {
                context: "collection.item_type",
                tag: 7
            })
        ));

        let (legacy, _) = decode(&bytes, TypeTag::EmbeddedList).unwrap();
        assert_eq!(legacy, Value::EmbeddedList(vec![Document::new("")]));
    }

    #[test]
    fn test_encode_type_mismatch() {
        let field = Field::new("age", TypeTag::Integer).with_value("old");
        assert_eq!(
            encode(&field),
            Err(EncodeError::TypeMismatch {
                field: "age".into(),
                expected: TypeTag::Integer
            })
        );

        let field = Field::new("x", TypeTag::Any).with_value(1);
        assert!(matches!(encode(&field), Err(EncodeError::UnsupportedType { .. })));
    }

    #[test]
    fn test_embedded_list_roundtrip() {
        let doc = DocumentBuilder::new("")
            .embedded_list("items", |l| {
                l.document(|d| d.integer("n", 1))
                    .document(|d| d.integer("n", 2))
            })
            .build();
        let field = doc.field_by_name("items").unwrap();
        let bytes = encode(field).unwrap();

        let (value, consumed) = decode(&bytes, TypeTag::EmbeddedList).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(Some(&value), field.value.as_ref());
    }
}
