//! # Tree Comparator
//!
//! Read-only recursive comparison of two directory trees, producing the
//! plain-text report that closes every merge run. Common files get a unified
//! line diff (via `similar`); a diff larger than the configured line limit
//! collapses into a single "check manually" summary so one regenerated page
//! cannot drown the report. Entries present on only one side are listed by
//! name.
//!
//! In verbose mode every report line is also echoed to the log sink as it is
//! produced, so the operator can watch the comparison live.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use similar::TextDiff;

use crate::error::Result;

/// Default cap on emitted diff lines per file pair.
pub const DEFAULT_LINE_LIMIT: usize = 40;

/// Options for a tree comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Diffs longer than this many lines are replaced by a summary line.
    pub line_limit: usize,
    /// Echo every report line to the log as it is produced.
    pub verbose: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            line_limit: DEFAULT_LINE_LIMIT,
            verbose: false,
        }
    }
}

/// Compare two directory trees and return the textual report.
///
/// Never modifies either tree. Entries absent from both sides are, by
/// construction, never mentioned.
pub fn compare_dirs(dir_a: &Path, dir_b: &Path, options: &CompareOptions) -> Result<String> {
    let mut report = String::new();
    compare_into(dir_a, dir_b, options, &mut report)?;
    Ok(report)
}

fn emit(report: &mut String, options: &CompareOptions, line: &str) {
    if options.verbose {
        info!("{line}");
    }
    report.push_str(line);
    report.push('\n');
}

/// Immediate entries of a directory, name -> is_dir, sorted by name so the
/// report is deterministic.
fn list_entries(dir: &Path) -> Result<BTreeMap<String, bool>> {
    let mut entries = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        entries.insert(
            entry.file_name().to_string_lossy().into_owned(),
            entry.file_type()?.is_dir(),
        );
    }
    Ok(entries)
}

fn compare_into(
    dir_a: &Path,
    dir_b: &Path,
    options: &CompareOptions,
    report: &mut String,
) -> Result<()> {
    let a_entries = list_entries(dir_a)?;
    let b_entries = list_entries(dir_b)?;

    // Common files first, then recursion into common subdirectories, then
    // the one-sided listings.
    for (name, &a_is_dir) in &a_entries {
        if a_is_dir {
            continue;
        }
        if b_entries.get(name) == Some(&false) {
            compare_files(&dir_a.join(name), &dir_b.join(name), options, report)?;
        }
    }

    for (name, &a_is_dir) in &a_entries {
        if a_is_dir && b_entries.get(name) == Some(&true) {
            compare_into(&dir_a.join(name), &dir_b.join(name), options, report)?;
        }
    }

    for name in a_entries.keys() {
        if !b_entries.contains_key(name) {
            emit(
                report,
                options,
                &format!("File {} only in {}", name, dir_a.display()),
            );
        }
    }

    for name in b_entries.keys() {
        if !a_entries.contains_key(name) {
            emit(
                report,
                options,
                &format!("File {} only in {}", name, dir_b.display()),
            );
        }
    }

    Ok(())
}

fn compare_files(
    file_a: &Path,
    file_b: &Path,
    options: &CompareOptions,
    report: &mut String,
) -> Result<()> {
    let bytes_a = fs::read(file_a)?;
    let bytes_b = fs::read(file_b)?;
    if bytes_a == bytes_b {
        return Ok(());
    }

    // Media files are compared too; lossy decoding keeps the diff meaningful
    // for text and harmless for binary content.
    let text_a = String::from_utf8_lossy(&bytes_a);
    let text_b = String::from_utf8_lossy(&bytes_b);

    let diff = TextDiff::from_lines(text_a.as_ref(), text_b.as_ref());
    let unified = diff
        .unified_diff()
        .header(&file_a.display().to_string(), &file_b.display().to_string())
        .to_string();

    if unified.lines().count() > options.line_limit {
        emit(
            report,
            options,
            &format!(
                "Too many differences in {} vs {}. Please check manually.",
                file_a.display(),
                file_b.display()
            ),
        );
    } else {
        for line in unified.lines() {
            emit(report, options, line);
        }
    }

    Ok(())
}
