//! # Canonical Index Document Shape
//!
//! Every `index.html` this tool reads or writes has the same fixed shape:
//! opening boilerplate, exactly one `<section class="one-column">` content
//! region holding the per-post entries, closing boilerplate. This module owns
//! the boilerplate constants, the structural extraction of the content
//! region, and reassembly of a full document from a region.
//!
//! Extraction parses the document with `scraper` and selects the section
//! element, rather than pattern-matching the raw text. A document with zero
//! or more than one content region is rejected with
//! [`Error::MalformedDocument`]; splicing an ambiguous document could merge
//! the wrong fragment.

use std::path::Path;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{Error, Result};

/// CSS selector for the single content region of an index document.
static SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section.one-column").expect("valid static selector"));

/// Fixed boilerplate preceding the content region in every index document.
pub const OPENING_TAGS: &str = r#"<html>
    <head>
        <style>body {background-color: rgb(35, 35, 35);}</style>
        <link rel='stylesheet' type='text/css' href='style.css'>
        <title>BDFR Archive</title>
        <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>&#128193;</text></svg>">

        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <meta charset="utf-8"/>
    </head>
    <body>

        <section class="one-column">
"#;

/// Fixed boilerplate following the content region in every index document.
pub const CLOSING_TAGS: &str = r#"
</section>
</body>
</html>
"#;

/// Select the content-region element of a parsed index document.
///
/// `path` is only used for error reporting. Fails unless the document holds
/// exactly one `section.one-column` element.
pub fn content_section<'a>(doc: &'a Html, path: &Path) -> Result<ElementRef<'a>> {
    let mut sections = doc.select(&SECTION);
    let first = sections.next();
    let extra = sections.count();
    match (first, extra) {
        (Some(section), 0) => Ok(section),
        (Some(_), n) => Err(Error::MalformedDocument {
            path: path.to_path_buf(),
            regions: n + 1,
        }),
        (None, _) => Err(Error::MalformedDocument {
            path: path.to_path_buf(),
            regions: 0,
        }),
    }
}

/// Extract the inner markup of a document's content region.
pub fn extract_region(html: &str, path: &Path) -> Result<String> {
    let doc = Html::parse_document(html);
    let section = content_section(&doc, path)?;
    Ok(section.inner_html())
}

/// Elements serialized without children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize an element into a canonical, byte-stable form.
///
/// `ElementRef::html()` emits attributes in hash-map order, which varies
/// between parses of the same markup. Anything that compares records by
/// string equality (deduplication, cross-run idempotence) needs a stable
/// serialization instead: attributes sorted by name, double-quoted, with
/// minimal escaping. Re-parsing and re-serializing canonical markup yields
/// the same bytes.
pub fn canonical_markup(element: ElementRef) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: ElementRef, out: &mut String) {
    let value = element.value();
    out.push('<');
    out.push_str(value.name());

    let mut attrs: Vec<(&str, &str)> = value.attrs().collect();
    attrs.sort_unstable();
    for (name, attr_value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(attr_value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&value.name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_into(text, false, out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, out);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(value.name());
    out.push('>');
}

fn escape_into(raw: &str, in_attribute: bool, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Rebuild a full index document around a content region.
///
/// Anything the source documents carried outside their regions (extra
/// styles, scripts) is deliberately not carried over.
pub fn assemble(region: &str) -> String {
    let mut out = String::with_capacity(OPENING_TAGS.len() + region.len() + CLOSING_TAGS.len());
    out.push_str(OPENING_TAGS);
    out.push_str(region);
    out.push_str(CLOSING_TAGS);
    out
}
