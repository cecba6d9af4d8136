//! Documents and their fields.

use rustc_hash::FxHashMap;

use crate::model::{TypeTag, Value};

/// A named, typed slot on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Schema property id, when the field was resolved from an id-keyed header.
    pub id: Option<i32>,
    /// Property name.
    pub name: String,
    /// `classname.name`, or the bare name for documents without a class.
    pub fullname: String,
    /// Wire type of the value.
    pub type_tag: TypeTag,
    /// The value, or None when the record carries no value for this field.
    pub value: Option<Value>,
}

impl Field {
    /// Creates a field with no value and no property id.
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        let name = name.into();
        Self {
            id: None,
            fullname: name.clone(),
            name,
            type_tag,
            value: None,
        }
    }

    /// Sets the schema property id.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Recomputes the fully-qualified name against a classname.
    pub fn qualify(&mut self, classname: &str) {
        self.fullname = qualified_name(classname, &self.name);
    }
}

/// Builds `classname.name`, or returns the bare name when the classname is empty.
pub fn qualified_name(classname: &str, name: &str) -> String {
    if classname.is_empty() {
        name.to_string()
    } else {
        format!("{classname}.{name}")
    }
}

/// A database document: a classname plus fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Class of the document. Empty for property-only documents.
    pub classname: String,
    fields: Vec<Field>,
    by_name: FxHashMap<String, usize>,
}

impl Document {
    /// Creates an empty document with the given classname.
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            fields: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Looks up a field by schema property id.
    pub fn field_by_id(&self, id: i32) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == Some(id))
    }

    /// Returns the value of a field, if the field exists and has one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field_by_name(name).and_then(|f| f.value.as_ref())
    }

    /// Inserts a field, replacing any field with the same name in place.
    ///
    /// Returns the replaced field.
    pub fn set_field(&mut self, field: Field) -> Option<Field> {
        match self.by_name.get(&field.name) {
            Some(&i) => Some(std::mem::replace(&mut self.fields[i], field)),
            None => {
                self.by_name.insert(field.name.clone(), self.fields.len());
                self.fields.push(field);
                None
            }
        }
    }

    /// Removes a field by name.
    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        let i = self.by_name.remove(name)?;
        let field = self.fields.remove(i);
        for idx in self.by_name.values_mut() {
            if *idx > i {
                *idx -= 1;
            }
        }
        Some(field)
    }
}

impl Drop for Document {
    // Nested documents are released from a heap stack, not through
    // recursive drop glue.
    fn drop(&mut self) {
        let mut pending = take_embedded(&mut self.fields);
        while let Some(mut doc) = pending.pop() {
            pending.append(&mut take_embedded(&mut doc.fields));
        }
    }
}

fn take_embedded(fields: &mut [Field]) -> Vec<Document> {
    let mut docs = Vec::new();
    for field in fields {
        if let Some(Value::EmbeddedList(items) | Value::EmbeddedSet(items)) = &mut field.value {
            docs.append(items);
        }
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_preserves_order() {
        let mut doc = Document::new("Cat");
        doc.set_field(Field::new("name", TypeTag::String).with_value("Linus"));
        doc.set_field(Field::new("age", TypeTag::Integer).with_value(15));
        let old = doc.set_field(Field::new("name", TypeTag::String).with_value("Keiko"));

        assert_eq!(old.and_then(|f| f.value), Some(Value::from("Linus")));
        let names: Vec<_> = doc.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(doc.get("name"), Some(&Value::from("Keiko")));
    }

    #[test]
    fn test_field_by_id() {
        let mut doc = Document::new("");
        doc.set_field(Field::new("x", TypeTag::Long).with_id(4));
        assert_eq!(doc.field_by_id(4).map(|f| f.name.as_str()), Some("x"));
        assert!(doc.field_by_id(5).is_none());
    }

    #[test]
    fn test_remove_field_reindexes() {
        let mut doc = Document::new("");
        doc.set_field(Field::new("a", TypeTag::Integer));
        doc.set_field(Field::new("b", TypeTag::Integer));
        doc.set_field(Field::new("c", TypeTag::Integer));
        assert!(doc.remove_field("a").is_some());
        assert_eq!(doc.field_by_name("c").map(|f| f.name.as_str()), Some("c"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_drop_deeply_nested() {
        let mut doc = Document::new("");
        for _ in 0..100_000 {
            let mut parent = Document::new("");
            parent.set_field(
                Field::new("child", TypeTag::EmbeddedList).with_value(Value::EmbeddedList(vec![doc])),
            );
            doc = parent;
        }
        drop(doc);
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("", "age"), "age");
        assert_eq!(qualified_name("Cat", "age"), "Cat.age");
    }
}
