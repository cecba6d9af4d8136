//! Document encoding/decoding (serializer version 0).
//!
//! A record body is laid out as:
//!
//! ```text
//! [classname][header entries ... 0][values in header order]
//! ```
//!
//! Decoding is a single sequential pass: classname, header, then one value
//! per header entry whose presence marker is nonzero. Embedded documents are
//! tracked on a heap-allocated stack of open documents, so nesting depth is
//! bounded by [`DecodeOptions::max_depth`] rather than by the call stack.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::codec::header::{
    read_classname, read_header, write_classname, write_header_end, write_named_entry, Header,
};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::value::{
    collection_value, decode_value, encode_value, read_collection_prefix, read_item_tag,
};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{DEFAULT_MAX_DEPTH, MAX_LENGTH_PREFIX};
use crate::model::{Document, Field, Value};
use crate::observe::{DecodeEvent, DecodeObserver};
use crate::schema::SchemaCatalog;

/// How per-item type tags of embedded collections are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemTagMode {
    /// ANY marks an absent item; any other tag means an embedded document
    /// follows. Matches what deployed servers and drivers produce.
    #[default]
    Legacy,
    /// The tag is the item's real type: ANY marks an absent item, the
    /// embedded-document tag means a document follows, and anything else
    /// is rejected as an unsupported type.
    Typed,
}

/// Options for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum embedded-document nesting below the top-level document.
    pub max_depth: usize,
    /// Interpretation of embedded-collection item tags.
    pub item_tags: ItemTagMode,
    /// Require each present value to start at the offset its presence
    /// marker names (relative to the start of the record body).
    pub verify_value_offsets: bool,
    /// Reject BOOLEAN bytes other than 0 and 1. When false, any nonzero
    /// byte decodes as true.
    pub strict_bool: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            item_tags: ItemTagMode::default(),
            verify_value_offsets: false,
            strict_bool: true,
        }
    }
}

impl DecodeOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reads and writes documents in a binary record format.
pub trait RecordSerializer {
    /// Decodes a record body into `doc`.
    ///
    /// The serializer-version byte must already be consumed. Fields already
    /// present on `doc` are merged: their id is kept, and their value is kept
    /// when the record carries none. On error `doc` is left unmodified.
    fn deserialize(&self, doc: &mut Document, reader: &mut Reader<'_>) -> Result<(), DecodeError>;

    /// Like [`deserialize`](Self::deserialize), but only assigns the named
    /// fields. Every other value is still read, then dropped.
    fn deserialize_partial(
        &self,
        doc: &mut Document,
        reader: &mut Reader<'_>,
        fields: &[&str],
    ) -> Result<(), DecodeError>;

    /// Encodes `doc` as a record body with a name-keyed header.
    fn serialize(&self, doc: &Document, writer: &mut Writer) -> Result<(), EncodeError>;

    /// Encodes only the classname of `doc`.
    fn serialize_class(&self, doc: &Document, writer: &mut Writer) -> Result<(), EncodeError>;
}

/// A document whose header has been read and whose values are being read.
struct OpenDocument {
    classname: String,
    slots: std::vec::IntoIter<(Field, i32)>,
    fields: Vec<Field>,
    /// Embedded list or set whose items are being read.
    collection: Option<OpenCollection>,
    depth: usize,
}

impl OpenDocument {
    fn into_document(self) -> Document {
        let mut doc = Document::new(self.classname);
        for field in self.fields {
            doc.set_field(field);
        }
        doc
    }
}

struct OpenCollection {
    field: Field,
    keep: bool,
    offset: usize,
    remaining: usize,
    items: Vec<Document>,
}

enum Advance {
    /// An embedded document started; its header has been read.
    Enter(OpenDocument),
    /// Every value of the document has been read.
    Complete,
}

/// Record serializer for format version 0.
///
/// Holds decode options and the optional collaborators: a schema catalog for
/// id-keyed headers and an observer for diagnostics. Neither is installed by
/// default.
#[derive(Clone, Default)]
pub struct SerializerV0<'s> {
    options: DecodeOptions,
    schema: Option<&'s dyn SchemaCatalog>,
    observer: Option<&'s dyn DecodeObserver>,
}

impl fmt::Debug for SerializerV0<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerV0")
            .field("options", &self.options)
            .field("schema", &self.schema.is_some())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<'s> SerializerV0<'s> {
    /// Creates a serializer with default options and no collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the decode options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs the schema catalog used to resolve id-keyed headers.
    pub fn with_schema(mut self, schema: &'s dyn SchemaCatalog) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Installs a decode observer.
    pub fn with_observer(mut self, observer: &'s dyn DecodeObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the decode options.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[inline]
    pub(crate) fn notify(&self, event: DecodeEvent<'_>) {
        if let Some(observer) = self.observer {
            observer.on_event(&event);
        }
    }

    /// Decodes an embedded document at the given nesting depth.
    pub(crate) fn decode_nested(
        &self,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Document, DecodeError> {
        let root = self.open_document(reader, &Document::default(), depth)?;
        Ok(self.read_values(reader, root, None)?.into_document())
    }

    /// Reads classname, header and values, then commits them onto `target`.
    ///
    /// Nothing is written to `target` until every byte has been decoded.
    fn decode_into(
        &self,
        target: &mut Document,
        reader: &mut Reader<'_>,
        wanted: Option<&FxHashSet<&str>>,
    ) -> Result<(), DecodeError> {
        let root = self.open_document(reader, target, 0)?;
        let done = self.read_values(reader, root, wanted)?;

        target.classname = done.classname;
        for field in done.fields {
            target.set_field(field);
        }
        Ok(())
    }

    /// Reads a document's classname and header.
    ///
    /// Fields already on `existing` are reused for matching header entries.
    fn open_document(
        &self,
        reader: &mut Reader<'_>,
        existing: &Document,
        depth: usize,
    ) -> Result<OpenDocument, DecodeError> {
        if depth > self.options.max_depth {
            return Err(DecodeError::RecursionLimitExceeded {
                max: self.options.max_depth,
            });
        }

        let classname = read_classname(reader)?;
        self.notify(DecodeEvent::Classname {
            depth,
            classname: &classname,
        });

        let header = read_header(reader)?;
        self.notify(DecodeEvent::Header {
            depth,
            entries: header.len(),
            id_keyed: matches!(header, Header::Ids(_)),
        });

        let slots = self.resolve_fields(existing, &classname, header, depth)?;
        Ok(OpenDocument {
            fields: Vec::with_capacity(slots.len()),
            slots: slots.into_iter(),
            classname,
            collection: None,
            depth,
        })
    }

    /// Reads the values of `root` and of every document nested below it.
    fn read_values(
        &self,
        reader: &mut Reader<'_>,
        root: OpenDocument,
        wanted: Option<&FxHashSet<&str>>,
    ) -> Result<OpenDocument, DecodeError> {
        let mut current = root;
        let mut parents = Vec::new();
        loop {
            match self.advance(&mut current, reader, wanted)? {
                Advance::Enter(child) => parents.push(std::mem::replace(&mut current, child)),
                Advance::Complete => {
                    let Some(parent) = parents.pop() else {
                        return Ok(current);
                    };
                    let child = std::mem::replace(&mut current, parent);
                    if let Some(collection) = &mut current.collection {
                        collection.items.push(child.into_document());
                    }
                }
            }
        }
    }

    /// Reads values of `doc` until an embedded document starts or the
    /// document is complete.
    fn advance(
        &self,
        doc: &mut OpenDocument,
        reader: &mut Reader<'_>,
        wanted: Option<&FxHashSet<&str>>,
    ) -> Result<Advance, DecodeError> {
        loop {
            if let Some(collection) = &mut doc.collection {
                if collection.remaining > 0 {
                    collection.remaining -= 1;
                    if read_item_tag(reader, self.options.item_tags)? {
                        let child = self.open_document(reader, &Document::default(), doc.depth + 1)?;
                        return Ok(Advance::Enter(child));
                    }
                    continue;
                }
            }
            if let Some(collection) = doc.collection.take() {
                let value = collection_value(collection.field.type_tag, collection.items);
                self.store(doc, collection.field, collection.keep, collection.offset, value);
                continue;
            }

            let Some((field, marker)) = doc.slots.next() else {
                return Ok(Advance::Complete);
            };
            // Only the top-level document is filtered
            let keep = doc.depth > 0 || wanted.is_none_or(|w| w.contains(field.name.as_str()));

            if marker == 0 {
                self.notify(DecodeEvent::FieldAbsent {
                    depth: doc.depth,
                    name: &field.name,
                });
                if keep {
                    doc.fields.push(field);
                }
                continue;
            }

            let offset = reader.position();
            if self.options.verify_value_offsets && usize::try_from(marker) != Ok(offset) {
                return Err(DecodeError::ValueOffsetMismatch {
                    field: field.name,
                    expected: marker,
                    actual: offset,
                });
            }

            if field.type_tag.is_embedded_collection() {
                let remaining = read_collection_prefix(reader, self, doc.depth)?;
                doc.collection = Some(OpenCollection {
                    field,
                    keep,
                    offset,
                    remaining,
                    items: Vec::new(),
                });
                continue;
            }

            let value = decode_value(reader, field.type_tag, self, doc.depth)?;
            self.store(doc, field, keep, offset, value);
        }
    }

    /// Records a decoded value on `doc`, or drops it when filtered out.
    fn store(&self, doc: &mut OpenDocument, mut field: Field, keep: bool, offset: usize, value: Value) {
        if keep {
            self.notify(DecodeEvent::FieldDecoded {
                depth: doc.depth,
                name: &field.name,
                type_tag: field.type_tag,
                offset,
            });
            field.value = Some(value);
            doc.fields.push(field);
        } else {
            self.notify(DecodeEvent::FieldSkipped {
                depth: doc.depth,
                name: &field.name,
            });
        }
    }

    /// Turns header entries into fields, reusing fields already on `target`.
    ///
    /// Entries whose type this codec does not model are dropped when they
    /// carry no value, and rejected otherwise.
    fn resolve_fields(
        &self,
        target: &Document,
        classname: &str,
        header: Header,
        depth: usize,
    ) -> Result<Vec<(Field, i32)>, DecodeError> {
        match header {
            Header::Named(entries) => {
                let mut slots = Vec::with_capacity(entries.len());
                for entry in entries {
                    let Some(type_tag) = entry.type_tag() else {
                        if entry.marker != 0 {
                            return Err(DecodeError::UnsupportedType {
                                context: "header.type",
                                tag: entry.tag,
                            });
                        }
                        self.notify(DecodeEvent::FieldUnsupported {
                            depth,
                            name: &entry.name,
                            tag: entry.tag,
                        });
                        continue;
                    };
                    let mut field = match target.field_by_name(&entry.name) {
                        Some(existing) => {
                            let mut field = existing.clone();
                            // The wire tag decides how the value is read
                            if field.type_tag != type_tag {
                                field.type_tag = type_tag;
                                field.value = None;
                            }
                            field
                        }
                        None => Field::new(entry.name, type_tag),
                    };
                    field.qualify(classname);
                    slots.push((field, entry.marker));
                }
                Ok(slots)
            }
            Header::Ids(entries) => entries
                .into_iter()
                .map(|entry| {
                    let field = match target.field_by_id(entry.id) {
                        Some(existing) => existing.clone(),
                        None => {
                            let info = self
                                .schema
                                .and_then(|schema| schema.resolve(entry.id))
                                .ok_or(DecodeError::UnresolvedPropertyId { id: entry.id })?;
                            let mut field = Field::new(info.name, info.type_tag).with_id(entry.id);
                            field.qualify(classname);
                            field
                        }
                    };
                    Ok((field, entry.marker))
                })
                .collect(),
        }
    }

    /// Writes classname, a name-keyed header and the values of `doc`.
    ///
    /// Presence markers hold each value's offset from the start of `writer`.
    pub(crate) fn write_document(&self, doc: &Document, writer: &mut Writer) -> Result<(), EncodeError> {
        write_classname(writer, &doc.classname)?;

        let mut marker_positions = Vec::with_capacity(doc.len());
        for field in doc.fields() {
            marker_positions.push(write_named_entry(writer, &field.name, field.type_tag)?);
        }
        write_header_end(writer);

        for (field, marker_pos) in doc.fields().iter().zip(marker_positions) {
            let Some(value) = &field.value else {
                continue;
            };
            let offset = writer.len();
            if offset > MAX_LENGTH_PREFIX {
                return Err(EncodeError::LengthExceedsLimit {
                    field: "record",
                    len: offset,
                    max: MAX_LENGTH_PREFIX,
                });
            }
            writer.patch_i32(marker_pos, offset as i32);
            encode_value(writer, field, value, self)?;
        }
        Ok(())
    }
}

impl RecordSerializer for SerializerV0<'_> {
    fn deserialize(&self, doc: &mut Document, reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        let mut scratch = reader.clone();
        self.decode_into(doc, &mut scratch, None)?;
        *reader = scratch;
        Ok(())
    }

    fn deserialize_partial(
        &self,
        doc: &mut Document,
        reader: &mut Reader<'_>,
        fields: &[&str],
    ) -> Result<(), DecodeError> {
        let wanted: FxHashSet<&str> = fields.iter().copied().collect();
        let mut scratch = reader.clone();
        self.decode_into(doc, &mut scratch, Some(&wanted))?;
        *reader = scratch;
        Ok(())
    }

    fn serialize(&self, doc: &Document, writer: &mut Writer) -> Result<(), EncodeError> {
        self.write_document(doc, writer)
    }

    fn serialize_class(&self, doc: &Document, writer: &mut Writer) -> Result<(), EncodeError> {
        write_classname(writer, &doc.classname)
    }
}
