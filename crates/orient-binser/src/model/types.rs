//! Type tags carried in record headers.

/// Field type tags understood by this codec.
///
/// The wire byte values are the database's type ids. Only scalar and
/// embedded-collection tags are modeled; every other byte is rejected
/// with an unsupported-type error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Boolean = 0,
    Integer = 1,
    Short = 2,
    Long = 3,
    String = 7,
    Binary = 8,
    EmbeddedList = 10,
    EmbeddedSet = 11,
    /// Unknown type; only valid as an embedded collection's item type.
    Any = 23,
}

impl TypeTag {
    /// Creates a TypeTag from its wire representation.
    pub fn from_u8(v: u8) -> Option<TypeTag> {
        match v {
            0 => Some(TypeTag::Boolean),
            1 => Some(TypeTag::Integer),
            2 => Some(TypeTag::Short),
            3 => Some(TypeTag::Long),
            7 => Some(TypeTag::String),
            8 => Some(TypeTag::Binary),
            10 => Some(TypeTag::EmbeddedList),
            11 => Some(TypeTag::EmbeddedSet),
            23 => Some(TypeTag::Any),
            _ => None,
        }
    }

    /// Returns the wire byte for this tag.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the database's name for this type.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Integer => "INTEGER",
            TypeTag::Short => "SHORT",
            TypeTag::Long => "LONG",
            TypeTag::String => "STRING",
            TypeTag::Binary => "BINARY",
            TypeTag::EmbeddedList => "EMBEDDEDLIST",
            TypeTag::EmbeddedSet => "EMBEDDEDSET",
            TypeTag::Any => "ANY",
        }
    }

    /// Returns true for tags whose value is a sequence of documents.
    pub fn is_embedded_collection(self) -> bool {
        matches!(self, TypeTag::EmbeddedList | TypeTag::EmbeddedSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_bytes() {
        for tag in [
            TypeTag::Boolean,
            TypeTag::Integer,
            TypeTag::Short,
            TypeTag::Long,
            TypeTag::String,
            TypeTag::Binary,
            TypeTag::EmbeddedList,
            TypeTag::EmbeddedSet,
            TypeTag::Any,
        ] {
            assert_eq!(TypeTag::from_u8(tag.as_u8()), Some(tag));
        }
    }

    #[test]
    fn test_unmodeled_tags_rejected() {
        // FLOAT, DOUBLE, DATETIME, EMBEDDED, EMBEDDEDMAP, LINK, DECIMAL
        for byte in [4u8, 5, 6, 9, 12, 13, 21, 24, 255] {
            assert_eq!(TypeTag::from_u8(byte), None, "byte {byte}");
        }
    }
}
