//! # Section Merger
//!
//! Splices the content region of a newly generated index document into an
//! existing one. The combined region keeps the existing entries first and
//! appends the new run's entries after them; the grouping reorderer fixes up
//! ordering afterwards, so append order is not meaningful here.
//!
//! Both documents are read and validated before anything is written. A
//! malformed source or destination therefore leaves the destination file on
//! disk byte-for-byte unchanged.

use std::fs;
use std::path::Path;

use crate::document;
use crate::error::Result;

/// Separator placed between the destination and source regions.
const REGION_SEPARATOR: &str = "\n";

/// Merge two full index documents into one.
///
/// Extracts the content region from each (failing with `MalformedDocument`
/// if either side does not hold exactly one region), concatenates them as
/// `destination + source`, and rebuilds the canonical document shape around
/// the combined region. `source_path` / `dest_path` are used for error
/// reporting only.
pub fn merge_documents(
    source_html: &str,
    dest_html: &str,
    source_path: &Path,
    dest_path: &Path,
) -> Result<String> {
    let source_region = document::extract_region(source_html, source_path)?;
    let dest_region = document::extract_region(dest_html, dest_path)?;

    let mut combined =
        String::with_capacity(dest_region.len() + REGION_SEPARATOR.len() + source_region.len());
    combined.push_str(&dest_region);
    combined.push_str(REGION_SEPARATOR);
    combined.push_str(&source_region);

    Ok(document::assemble(&combined))
}

/// Merge the newly generated index file into the existing one, in place.
///
/// Reads and validates both files before rewriting the destination.
pub fn merge_index(source_path: &Path, dest_path: &Path) -> Result<()> {
    let source_html = fs::read_to_string(source_path)?;
    let dest_html = fs::read_to_string(dest_path)?;

    let merged = merge_documents(&source_html, &dest_html, source_path, dest_path)?;

    fs::write(dest_path, merged)?;
    Ok(())
}
