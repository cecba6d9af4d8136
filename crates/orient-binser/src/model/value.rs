//! Field values.

use crate::model::{Document, TypeTag};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 text.
    String(String),

    /// 32-bit signed integer.
    Integer(i32),

    /// 64-bit signed integer.
    Long(i64),

    /// 16-bit signed integer.
    Short(i16),

    /// Boolean value.
    Boolean(bool),

    /// Opaque byte array.
    ///
    /// Also holds the payload of a STRING field that is not valid UTF-8,
    /// so the bytes survive a round trip unchanged.
    Binary(Vec<u8>),

    /// Ordered sequence of embedded documents.
    EmbeddedList(Vec<Document>),

    /// Embedded documents with set semantics. Uniqueness is not enforced.
    EmbeddedSet(Vec<Document>),
}

impl Value {
    /// Returns the natural type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::String(_) => TypeTag::String,
            Value::Integer(_) => TypeTag::Integer,
            Value::Long(_) => TypeTag::Long,
            Value::Short(_) => TypeTag::Short,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Binary(_) => TypeTag::Binary,
            Value::EmbeddedList(_) => TypeTag::EmbeddedList,
            Value::EmbeddedSet(_) => TypeTag::EmbeddedSet,
        }
    }

    /// Returns true if this value can be written under the given tag.
    pub fn fits(&self, tag: TypeTag) -> bool {
        match (self, tag) {
            // STRING and BINARY share a wire encoding.
            (Value::Binary(_), TypeTag::String) => true,
            _ => self.type_tag() == tag,
        }
    }

    /// Returns the text if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an INTEGER, SHORT or LONG value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the embedded documents of a list or set value.
    pub fn as_documents(&self) -> Option<&[Document]> {
        match self {
            Value::EmbeddedList(docs) | Value::EmbeddedSet(docs) => Some(docs.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_fits_string_tag() {
        let v = Value::Binary(vec![0xff, 0xfe]);
        assert!(v.fits(TypeTag::String));
        assert!(v.fits(TypeTag::Binary));
        assert!(!v.fits(TypeTag::Integer));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::Short(-3).as_i64(), Some(-3));
        assert_eq!(Value::Boolean(true).as_i64(), None);
        assert!(Value::EmbeddedSet(vec![]).as_documents().unwrap().is_empty());
    }
}
