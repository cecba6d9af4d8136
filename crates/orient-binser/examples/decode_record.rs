//! Simple decoder to inspect serialized record files.

use std::fs;

use orient_binser::{decode_record, encode_record, Document, DocumentBuilder, Value};

fn format_value(v: &Value, indent: usize) -> String {
    match v {
        Value::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Value::Integer(n) => format!("{}", n),
        Value::Long(n) => format!("{}L", n),
        Value::Short(n) => format!("{}S", n),
        Value::Boolean(b) => format!("{}", b),
        Value::Binary(b) => format!("BINARY[{}]", b.len()),
        Value::EmbeddedList(docs) => format_docs("LIST", docs, indent),
        Value::EmbeddedSet(docs) => format_docs("SET", docs, indent),
    }
}

fn format_docs(kind: &str, docs: &[Document], indent: usize) -> String {
    let mut out = format!("{}[{}]", kind, docs.len());
    for doc in docs {
        out.push('\n');
        out.push_str(&format_doc(doc, indent + 2));
    }
    out
}

fn format_doc(doc: &Document, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = format!("{}class: {:?}", pad, doc.classname);
    for field in doc.fields() {
        let value = match &field.value {
            Some(v) => format_value(v, indent + 2),
            None => "<absent>".to_string(),
        };
        out.push_str(&format!("\n{}  {} ({}): {}", pad, field.name, field.type_tag.name(), value));
    }
    out
}

fn main() {
    let data = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading: {}", path);
            fs::read(&path).expect("Failed to read file")
        }
        None => {
            println!("No file given, using a sample record");
            let sample = DocumentBuilder::new("Cat")
                .string("name", "Linus")
                .integer("age", 15)
                .embedded_list("toys", |l| l.document(|d| d.string("kind", "ball")))
                .build();
            encode_record(&sample).expect("Failed to encode sample")
        }
    };
    println!("Record size: {} bytes", data.len());

    let doc = decode_record(&data).expect("Failed to decode");

    println!("\n=== Document ===");
    println!("{}", format_doc(&doc, 0));
}
