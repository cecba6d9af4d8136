//! Classname and field-descriptor header.
//!
//! A header is a run of entries terminated by a zero varint. Each entry
//! starts with a zigzag varint32 control value:
//!
//! - `control > 0`: a named property. `control` is the name's byte length;
//!   the name, a 4-byte big-endian presence marker and a type-tag byte follow.
//! - `control < 0`: a property id reference, encoded as `-(id + 1)`; only the
//!   4-byte presence marker follows.
//!
//! A single header is either entirely named or entirely id-keyed.

use std::cmp::Ordering;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::TypeTag;

/// A named header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedProperty {
    pub name: String,
    /// Zero when the record carries no value for the field.
    pub marker: i32,
    /// Raw type-tag byte. Tags this codec does not model are kept as-is.
    pub tag: u8,
}

impl NamedProperty {
    /// Returns the type tag, or None for a tag this codec does not model.
    pub fn type_tag(&self) -> Option<TypeTag> {
        TypeTag::from_u8(self.tag)
    }
}

/// An id-keyed header entry. The type comes from the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyIdRef {
    pub id: i32,
    /// Zero when the record carries no value for the field.
    pub marker: i32,
}

/// A parsed header, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Named(Vec<NamedProperty>),
    Ids(Vec<PropertyIdRef>),
}

impl Header {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        match self {
            Header::Named(entries) => entries.len(),
            Header::Ids(entries) => entries.len(),
        }
    }

    /// Returns true if the header has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encodes a property id for an id-keyed header entry: `-(id + 1)`.
#[inline]
pub fn encode_property_id(id: i32) -> i32 {
    // -(id + 1) == !id, without overflow at i32::MAX
    !id
}

/// Recovers a property id from a negative header control value: `-control - 1`.
#[inline]
pub fn decode_property_id(control: i32) -> i32 {
    !control
}

// =============================================================================
// DECODING
// =============================================================================

/// Reads the length-prefixed classname. An empty classname is valid.
pub fn read_classname(reader: &mut Reader<'_>) -> Result<String, DecodeError> {
    Ok(reader.read_str_lossy("classname")?.into_owned())
}

/// Reads header entries up to and including the zero terminator.
///
/// Running out of input anywhere before the terminator is an
/// [`UnterminatedHeader`](DecodeError::UnterminatedHeader) error.
pub fn read_header(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    read_entries(reader).map_err(|e| match e {
        DecodeError::UnexpectedEof { .. } => DecodeError::UnterminatedHeader,
        e => e,
    })
}

fn read_entries(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    let mut named = Vec::new();
    let mut ids = Vec::new();

    loop {
        let control = reader.read_varint32("header.control")?;

        match control.cmp(&0) {
            Ordering::Equal => break,
            Ordering::Greater => {
                if !ids.is_empty() {
                    return Err(DecodeError::MixedHeader);
                }
                let name = reader.read_bytes(control as usize, "header.name")?;
                let name = String::from_utf8_lossy(name).into_owned();
                let marker = reader.read_i32("header.marker")?;
                let tag = reader.read_byte("header.type")?;
                named.push(NamedProperty { name, marker, tag });
            }
            Ordering::Less => {
                if !named.is_empty() {
                    return Err(DecodeError::MixedHeader);
                }
                let id = decode_property_id(control);
                let marker = reader.read_i32("header.marker")?;
                ids.push(PropertyIdRef { id, marker });
            }
        }
    }

    if ids.is_empty() {
        Ok(Header::Named(named))
    } else {
        Ok(Header::Ids(ids))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes the length-prefixed classname.
pub fn write_classname(writer: &mut Writer, classname: &str) -> Result<(), EncodeError> {
    writer.write_string(classname, "classname")
}

/// Writes a named header entry with a placeholder marker.
///
/// Returns the marker's position so it can be patched once the value
/// offset is known.
pub fn write_named_entry(
    writer: &mut Writer,
    name: &str,
    type_tag: TypeTag,
) -> Result<usize, EncodeError> {
    if name.is_empty() {
        return Err(EncodeError::EmptyFieldName);
    }
    writer.write_string(name, "header.name")?;
    let marker_pos = writer.len();
    writer.write_i32(0);
    writer.write_byte(type_tag.as_u8());
    Ok(marker_pos)
}

/// Writes an id-keyed header entry with a placeholder marker.
///
/// Returns the marker's position.
pub fn write_id_entry(writer: &mut Writer, id: i32) -> Result<usize, EncodeError> {
    if id < 0 {
        return Err(EncodeError::NegativePropertyId { id });
    }
    writer.write_varint32(encode_property_id(id));
    let marker_pos = writer.len();
    writer.write_i32(0);
    Ok(marker_pos)
}

/// Writes the zero header terminator.
pub fn write_header_end(writer: &mut Writer) {
    writer.write_varint32(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_property_id_codec() {
        for id in [0i32, 1, 1_000_000, i32::MAX] {
            let encoded = encode_property_id(id);
            assert_eq!(encoded as i64, -(id as i64 + 1));
            assert!(encoded < 0);
            assert_eq!(decode_property_id(encoded), id);
        }
    }

    #[test]
    fn test_empty_classname() {
        let mut reader = Reader::new(&[0]);
        assert_eq!(read_classname(&mut reader).unwrap(), "");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_named_header() {
        let mut writer = Writer::new();
        let p1 = write_named_entry(&mut writer, "x", TypeTag::String).unwrap();
        let p2 = write_named_entry(&mut writer, "y", TypeTag::Boolean).unwrap();
        writer.patch_i32(p1, 20);
        writer.patch_i32(p2, 0);
        write_header_end(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let header = read_header(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(
            header,
            Header::Named(vec![
                NamedProperty {
                    name: "x".into(),
                    marker: 20,
                    tag: TypeTag::String.as_u8()
                },
                NamedProperty {
                    name: "y".into(),
                    marker: 0,
                    tag: TypeTag::Boolean.as_u8()
                },
            ])
        );
    }

    #[test]
    fn test_id_header() {
        let mut writer = Writer::new();
        let pos = write_id_entry(&mut writer, 0).unwrap();
        writer.patch_i32(pos, 12);
        write_id_entry(&mut writer, 1_000_000).unwrap();
        write_header_end(&mut writer);

        // id 0 encodes as control -1, zigzag 1
        assert_eq!(writer.as_bytes()[0], 0x01);

        let mut reader = Reader::new(writer.as_bytes());
        let header = read_header(&mut reader).unwrap();
        assert_eq!(
            header,
            Header::Ids(vec![
                PropertyIdRef { id: 0, marker: 12 },
                PropertyIdRef {
                    id: 1_000_000,
                    marker: 0
                },
            ])
        );
    }

    #[test]
    fn test_empty_header() {
        let mut reader = Reader::new(&[0]);
        let header = read_header(&mut reader).unwrap();
        assert!(header.is_empty());
        assert!(matches!(header, Header::Named(_)));
    }

    #[test]
    fn test_missing_terminator() {
        let mut writer = Writer::new();
        write_named_entry(&mut writer, "age", TypeTag::Integer).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        let err = read_header(&mut reader).unwrap_err();
        assert_eq!(err, DecodeError::UnterminatedHeader);
        assert_eq!(err.kind(), ErrorKind::ProtocolError);
    }

    #[test]
    fn test_mixed_header_rejected() {
        let mut writer = Writer::new();
        write_named_entry(&mut writer, "a", TypeTag::Integer).unwrap();
        write_id_entry(&mut writer, 3).unwrap();
        write_header_end(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(read_header(&mut reader), Err(DecodeError::MixedHeader));
    }

    #[test]
    fn test_unknown_type_tag_kept_raw() {
        let mut writer = Writer::new();
        writer.write_string("f", "test").unwrap();
        writer.write_i32(0);
        writer.write_byte(4); // FLOAT
        write_header_end(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let Header::Named(entries) = read_header(&mut reader).unwrap() else {
            panic!("expected a named header");
        };
        assert!(reader.is_empty());
        assert_eq!(entries[0].tag, 4);
        assert_eq!(entries[0].type_tag(), None);
    }

    #[test]
    fn test_truncated_entry() {
        // control says 5 name bytes, only 2 present
        let mut reader = Reader::new(&[10, b'a', b'b']);
        let err = read_header(&mut reader).unwrap_err();
        assert_eq!(err, DecodeError::UnterminatedHeader);
        assert_eq!(err.kind(), ErrorKind::ProtocolError);

        // cut inside the marker of an id entry
        let mut reader = Reader::new(&[0x01, 0, 0]);
        assert_eq!(read_header(&mut reader), Err(DecodeError::UnterminatedHeader));
    }

    #[test]
    fn test_encode_rejects_empty_name_and_negative_id() {
        let mut writer = Writer::new();
        assert_eq!(
            write_named_entry(&mut writer, "", TypeTag::Integer),
            Err(EncodeError::EmptyFieldName)
        );
        assert_eq!(
            write_id_entry(&mut writer, -1),
            Err(EncodeError::NegativePropertyId { id: -1 })
        );
    }
}
