//! # Grouping Reorderer
//!
//! Normalizes a merged index document: collects the post records from the
//! content region, buckets them by subreddit, deduplicates, sorts the groups
//! case-insensitively, and re-serializes the document with a header marker
//! announcing each group.
//!
//! Post records are the `<div>` children of the content region. The header
//! markers this module emits are `<p>`/`<h3>` elements, so they are skipped
//! when an already-normalized document is processed again — combined with
//! deduplication, that makes the whole operation idempotent. It also works
//! on an index that was never produced by this tool, as long as the records
//! carry their subreddit links.
//!
//! Records are compared and emitted in the canonical serialization from
//! [`document::canonical_markup`]; the parser's own `html()` output orders
//! attributes arbitrarily, which would defeat exact-markup deduplication.
//!
//! A record without a subreddit link is fatal ([`Error::UnrecognizedRecord`]):
//! skipping it would silently drop an archived post from the index.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::document;
use crate::error::{Error, Result};

/// Shape of the subreddit link every post record must carry.
static SUBREDDIT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://reddit\.com/r/([^/]+)/?$").expect("valid static regex"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid static selector"));

/// Record counts before and after normalization, for the sanity-check
/// diagnostic the orchestrator logs in verbose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderStats {
    /// Records collected from the content region.
    pub records_in: usize,
    /// Records emitted after deduplication.
    pub records_out: usize,
}

/// Group header marker, emitted immediately before the first record of each
/// subreddit.
fn group_header(subreddit: &str) -> String {
    format!(
        "<p></p><p></p><p><h3>Subreddit Below = r/{subreddit}</h3></p><p></p><p></p><p></p>"
    )
}

/// Extract the grouping key from one post record.
fn group_key(record: ElementRef) -> Option<String> {
    for anchor in record.select(&ANCHOR) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(captures) = SUBREDDIT_LINK.captures(href) {
                return Some(captures[1].to_string());
            }
        }
    }
    None
}

fn snippet(markup: &str) -> String {
    const LIMIT: usize = 120;
    if markup.len() <= LIMIT {
        markup.to_string()
    } else {
        let mut end = LIMIT;
        while !markup.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &markup[..end])
    }
}

/// Reorder a full index document, returning the normalized document and the
/// record counts. `path` is used for error reporting only.
pub fn reorder_document(html: &str, path: &Path) -> Result<(String, ReorderStats)> {
    let doc = Html::parse_document(html);
    let section = document::content_section(&doc, path)?;

    // Groups keyed by (case-folded, exact) name: iteration order is the
    // final case-insensitive output order, with a deterministic tiebreak
    // for names differing only in case.
    let mut groups: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
    let mut records_in = 0;

    for child in section.children().filter_map(ElementRef::wrap) {
        if child.value().name() != "div" {
            // Header markers from a previous normalization pass.
            continue;
        }
        records_in += 1;
        // Canonical serialization, not `html()`: dedup and cross-run
        // idempotence compare records by string equality, so attribute
        // order must be stable.
        let markup = document::canonical_markup(child);
        let key = group_key(child).ok_or_else(|| Error::UnrecognizedRecord {
            snippet: snippet(&markup),
        })?;
        groups
            .entry((key.to_lowercase(), key))
            .or_default()
            .push(markup);
    }

    let mut region = String::new();
    let mut records_out = 0;

    for ((_, subreddit), records) in &groups {
        region.push_str(&group_header(subreddit));
        region.push('\n');
        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            if !seen.insert(record) {
                continue;
            }
            region.push_str(record);
            region.push('\n');
            records_out += 1;
        }
    }

    let stats = ReorderStats {
        records_in,
        records_out,
    };
    Ok((document::assemble(&region), stats))
}

/// Reorder an index file in place.
pub fn reorder_index(path: &Path) -> Result<ReorderStats> {
    let html = fs::read_to_string(path)?;
    let (normalized, stats) = reorder_document(&html, path)?;
    fs::write(path, normalized)?;
    Ok(stats)
}
