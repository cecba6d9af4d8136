//! Data model types for binary records.
//!
//! - Type tags (the closed set of wire types this codec handles)
//! - Values (typed field payloads)
//! - Fields and documents
//! - Builders (ergonomic construction)

pub mod builder;
pub mod document;
pub mod types;
pub mod value;

pub use builder::{CollectionBuilder, DocumentBuilder};
pub use document::{qualified_name, Document, Field};
pub use types::TypeTag;
pub use value::Value;
