//! Schema lookup for id-keyed record headers.
//!
//! Records returned by document queries identify their fields by numeric
//! property ids instead of names. The decoder resolves those ids through a
//! [`SchemaCatalog`] supplied by the caller; it never invents a name or type
//! for an id the catalog does not know.

use rustc_hash::FxHashMap;

use crate::model::TypeTag;

/// Name and type registered for a schema property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub type_tag: TypeTag,
}

/// Resolves schema property ids to names and types.
pub trait SchemaCatalog {
    /// Returns the property registered under `property_id`, if any.
    fn resolve(&self, property_id: i32) -> Option<PropertyInfo>;
}

/// In-memory schema catalog.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    properties: FxHashMap<i32, PropertyInfo>,
}

impl SchemaContext {
    /// Creates a new empty schema context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property under its id, replacing any earlier entry.
    pub fn add_property(&mut self, id: i32, name: impl Into<String>, type_tag: TypeTag) {
        self.properties.insert(
            id,
            PropertyInfo {
                name: name.into(),
                type_tag,
            },
        );
    }

    /// Returns the number of registered properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if no properties are registered.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl SchemaCatalog for SchemaContext {
    fn resolve(&self, property_id: i32) -> Option<PropertyInfo> {
        self.properties.get(&property_id).cloned()
    }
}
