//! # bdfr-merge Library
//!
//! Core functionality for merging incrementally generated BDFR HTML archive
//! pages into a single cumulative, subreddit-grouped index. The library is
//! used by the `bdfr-merge` command-line tool but the merge and reorder
//! primitives work on plain strings and can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use bdfr_merge::{document, merge, reorder};
//!
//! let existing = document::assemble(
//!     "<div><a href=\"https://reddit.com/r/rust\">r/rust</a> old post</div>",
//! );
//! let generated = document::assemble(
//!     "<div><a href=\"https://reddit.com/r/linux\">r/linux</a> new post</div>",
//! );
//!
//! let merged = merge::merge_documents(
//!     &generated,
//!     &existing,
//!     Path::new("new/index.html"),
//!     Path::new("old/index.html"),
//! )
//! .unwrap();
//!
//! let (normalized, stats) = reorder::reorder_document(&merged, Path::new("index.html")).unwrap();
//! assert_eq!(stats.records_out, 2);
//! assert!(normalized.contains("Subreddit Below = r/linux"));
//! assert!(normalized.contains("Subreddit Below = r/rust"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Document (`document`)**: the canonical index shape — fixed boilerplate
//!   around exactly one `<section class="one-column">` content region.
//! - **Section Merger (`merge`)**: splices the content region of a newly
//!   generated index into the existing one.
//! - **Grouping Reorderer (`reorder`)**: buckets post records by subreddit,
//!   deduplicates, sorts groups case-insensitively, and re-serializes.
//!   Idempotent.
//! - **Backup Manager (`backup`)**: timestamped pre-merge snapshots of the
//!   output tree, bounded retention.
//! - **Tree Comparator (`compare`)**: recursive old-vs-new diff report for
//!   manual verification after each run.
//! - **Pipeline (`pipeline`)**: the orchestrator wiring fetch, render,
//!   snapshot, merge, reorder, and compare into one linear run.
//!
//! ## Execution Flow
//!
//! 1.  Validate settings (the fetch tool's config file must exist).
//! 2.  Invoke the external fetch tool, then the render tool.
//! 3.  Bootstrap runs (no prior output directory) stop here.
//! 4.  Snapshot the existing output directory.
//! 5.  Merge the generated index into the existing one, fold the remaining
//!     generated files in, delete the generated directory.
//! 6.  Reorder the combined index by subreddit.
//! 7.  Compare snapshot vs. final output and persist the report.

pub mod backup;
pub mod compare;
pub mod document;
pub mod error;
pub mod fsops;
pub mod merge;
pub mod pipeline;
pub mod reorder;
pub mod settings;
pub mod tools;
