//! Optional decode diagnostics.
//!
//! The decoder never prints. Callers that want per-field tracing install a
//! [`DecodeObserver`]; [`TracingObserver`] forwards events to `tracing`.

use tracing::{debug, trace};

use crate::model::TypeTag;

/// A step of the decode state machine worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeEvent<'a> {
    /// Classname read (may be empty).
    Classname { depth: usize, classname: &'a str },
    /// Header parsed.
    Header {
        depth: usize,
        entries: usize,
        id_keyed: bool,
    },
    /// A field value was decoded and kept.
    FieldDecoded {
        depth: usize,
        name: &'a str,
        type_tag: TypeTag,
        offset: usize,
    },
    /// A field has a zero presence marker; no value bytes were read.
    FieldAbsent { depth: usize, name: &'a str },
    /// A field of a type this codec does not model carried no value and
    /// was dropped.
    FieldUnsupported { depth: usize, name: &'a str, tag: u8 },
    /// A field value was read and discarded by a partial decode.
    FieldSkipped { depth: usize, name: &'a str },
    /// An embedded collection is about to be read.
    EmbeddedCollection { depth: usize, count: usize },
}

/// Receives decode events.
pub trait DecodeObserver {
    fn on_event(&self, event: &DecodeEvent<'_>);
}

/// Forwards decode events to the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecodeObserver for TracingObserver {
    fn on_event(&self, event: &DecodeEvent<'_>) {
        match *event {
            DecodeEvent::Classname { depth, classname } => {
                debug!(depth, classname, "record classname");
            }
            DecodeEvent::Header {
                depth,
                entries,
                id_keyed,
            } => {
                debug!(depth, entries, id_keyed, "record header");
            }
            DecodeEvent::FieldDecoded {
                depth,
                name,
                type_tag,
                offset,
            } => {
                trace!(depth, name, type_tag = type_tag.name(), offset, "field decoded");
            }
            DecodeEvent::FieldAbsent { depth, name } => {
                trace!(depth, name, "field absent");
            }
            DecodeEvent::FieldUnsupported { depth, name, tag } => {
                debug!(depth, name, tag, "absent field of unsupported type dropped");
            }
            DecodeEvent::FieldSkipped { depth, name } => {
                trace!(depth, name, "field skipped");
            }
            DecodeEvent::EmbeddedCollection { depth, count } => {
                debug!(depth, count, "embedded collection");
            }
        }
    }
}
