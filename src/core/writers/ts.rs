//! Writer for Qt Linguist TS catalogs.
//!
//! Output follows the layout `lupdate` produces: one element per line with
//! four-space nesting, and text written inside its element without added
//! whitespace so that decoding gives back the exact text.

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::core::data::{Catalog, Message};

const TS_VERSION: &str = "2.1";

/// Encode a catalog as a TS document.
pub fn encode(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    out.push_str("<TS version=\"");
    out.push_str(TS_VERSION);
    out.push('"');
    if let Some(language) = &catalog.language {
        push_attribute(&mut out, "language", language);
    }
    if let Some(source_language) = &catalog.source_language {
        push_attribute(&mut out, "sourcelanguage", source_language);
    }
    out.push_str(">\n");

    for context in catalog.contexts() {
        out.push_str("<context>\n");
        push_text_element(&mut out, 1, "name", context.name());
        for message in context.messages() {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, message: &Message) {
    indent(out, 1);
    if message.is_plural {
        out.push_str("<message numerus=\"yes\">\n");
    } else {
        out.push_str("<message>\n");
    }

    for location in &message.locations {
        indent(out, 2);
        out.push_str("<location");
        push_attribute(out, "filename", &location.file_path);
        let _ = write!(out, " line=\"{}\"", location.line);
        out.push_str("/>\n");
    }

    push_text_element(out, 2, "source", &message.source_text);
    if let Some(disambiguation) = &message.disambiguation {
        push_text_element(out, 2, "comment", disambiguation);
    }
    if let Some(comment) = &message.translator_comment {
        push_text_element(out, 2, "translatorcomment", comment);
    }

    indent(out, 2);
    out.push_str("<translation");
    if let Some(kind) = message.status.type_attribute() {
        push_attribute(out, "type", kind);
    }
    out.push('>');
    if message.is_plural && !message.plural_forms.is_empty() {
        out.push('\n');
        for form in &message.plural_forms {
            push_text_element(out, 3, "numerusform", form);
        }
        indent(out, 2);
    } else if !message.is_plural {
        push_text(out, &message.translation);
    }
    out.push_str("</translation>\n");

    indent(out, 1);
    out.push_str("</message>\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape(value));
}

fn push_text_element(out: &mut String, depth: usize, name: &str, text: &str) {
    indent(out, depth);
    let _ = write!(out, "<{}>", name);
    push_text(out, text);
    let _ = writeln!(out, "</{}>", name);
}

/// Escaped text; control characters other than tab and newline become
/// `<byte value="xHH"/>`.
fn push_text(out: &mut String, text: &str) {
    let mut plain_start = 0;
    for (i, c) in text.char_indices() {
        if (c as u32) < 0x20 && c != '\n' && c != '\t' {
            out.push_str(&partial_escape(&text[plain_start..i]));
            let _ = write!(out, "<byte value=\"x{:x}\"/>", c as u32);
            plain_start = i + c.len_utf8();
        }
    }
    out.push_str(&partial_escape(&text[plain_start..]));
}
