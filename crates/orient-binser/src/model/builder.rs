//! Builder API for ergonomic Document construction.
//!
//! # Example
//!
//! ```rust
//! use orient_binser::model::builder::DocumentBuilder;
//!
//! let doc = DocumentBuilder::new("Cat")
//!     .string("name", "Linus")
//!     .integer("age", 15)
//!     .embedded_list("toys", |l| l
//!         .document(|d| d.string("kind", "ball"))
//!     )
//!     .build();
//!
//! assert_eq!(doc.classname, "Cat");
//! assert_eq!(doc.len(), 3);
//! ```

use crate::model::{Document, Field, TypeTag, Value};

/// Builder for constructing a Document field by field.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Creates a new DocumentBuilder with the given classname.
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            doc: Document::new(classname),
        }
    }

    /// Adds a field with an explicit value. The type tag follows the value.
    pub fn value(self, name: impl Into<String>, value: Value) -> Self {
        let tag = value.type_tag();
        self.typed(name, tag, Some(value))
    }

    /// Adds a field whose value is absent.
    pub fn absent(self, name: impl Into<String>, type_tag: TypeTag) -> Self {
        self.typed(name, type_tag, None)
    }

    /// Adds a STRING value.
    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.value(name, Value::String(value.into()))
    }

    /// Adds an INTEGER value.
    pub fn integer(self, name: impl Into<String>, value: i32) -> Self {
        self.value(name, Value::Integer(value))
    }

    /// Adds a LONG value.
    pub fn long(self, name: impl Into<String>, value: i64) -> Self {
        self.value(name, Value::Long(value))
    }

    /// Adds a SHORT value.
    pub fn short(self, name: impl Into<String>, value: i16) -> Self {
        self.value(name, Value::Short(value))
    }

    /// Adds a BOOLEAN value.
    pub fn boolean(self, name: impl Into<String>, value: bool) -> Self {
        self.value(name, Value::Boolean(value))
    }

    /// Adds a BINARY value.
    pub fn binary(self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.value(name, Value::Binary(value.into()))
    }

    /// Adds an EMBEDDEDLIST value built from nested documents.
    pub fn embedded_list<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(CollectionBuilder) -> CollectionBuilder,
    {
        let docs = f(CollectionBuilder::default()).docs;
        self.value(name, Value::EmbeddedList(docs))
    }

    /// Adds an EMBEDDEDSET value built from nested documents.
    pub fn embedded_set<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(CollectionBuilder) -> CollectionBuilder,
    {
        let docs = f(CollectionBuilder::default()).docs;
        self.value(name, Value::EmbeddedSet(docs))
    }

    fn typed(mut self, name: impl Into<String>, type_tag: TypeTag, value: Option<Value>) -> Self {
        let mut field = Field::new(name, type_tag);
        field.qualify(&self.doc.classname);
        field.value = value;
        self.doc.set_field(field);
        self
    }

    /// Builds the final Document.
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Builder for the documents of an embedded collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionBuilder {
    docs: Vec<Document>,
}

impl CollectionBuilder {
    /// Adds a nested document with an empty classname.
    pub fn document<F>(self, f: F) -> Self
    where
        F: FnOnce(DocumentBuilder) -> DocumentBuilder,
    {
        self.class_document("", f)
    }

    /// Adds a nested document with a classname.
    pub fn class_document<F>(mut self, classname: &str, f: F) -> Self
    where
        F: FnOnce(DocumentBuilder) -> DocumentBuilder,
    {
        self.docs.push(f(DocumentBuilder::new(classname)).build());
        self
    }

    /// Adds an already-built document.
    pub fn push(mut self, doc: Document) -> Self {
        self.docs.push(doc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder_basic() {
        let doc = DocumentBuilder::new("Animal")
            .string("name", "Keiko")
            .integer("age", 10)
            .absent("caretaker", TypeTag::String)
            .build();

        assert_eq!(doc.classname, "Animal");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get("age"), Some(&Value::Integer(10)));
        assert_eq!(doc.get("caretaker"), None);

        let field = doc.field_by_name("caretaker").unwrap();
        assert_eq!(field.type_tag, TypeTag::String);
        assert_eq!(field.fullname, "Animal.caretaker");
    }

    #[test]
    fn test_document_builder_embedded() {
        let doc = DocumentBuilder::new("")
            .embedded_set("tags", |s| {
                s.document(|d| d.string("t", "a"))
                    .document(|d| d.string("t", "a"))
            })
            .build();

        match doc.get("tags") {
            Some(Value::EmbeddedSet(docs)) => {
                // duplicates are kept
                assert_eq!(docs.len(), 2);
                assert_eq!(docs[0], docs[1]);
            }
            other => panic!("Expected EmbeddedSet, got {other:?}"),
        }
    }
}
