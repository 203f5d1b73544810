//! # Backup Manager
//!
//! Snapshots the existing output directory before a merge touches it, and
//! bounds the number of retained snapshots. Snapshots are plain directory
//! copies under `<backup_root>/<timestamp>/<basename>`; the timestamp format
//! sorts lexicographically in chronological order, which is what the
//! retention pruning relies on.
//!
//! Restoring from a snapshot is a manual operation; nothing here rolls back
//! automatically.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::debug;

use crate::error::{Error, Result};
use crate::fsops;

/// Number of snapshots retained by default.
pub const DEFAULT_KEEP: usize = 5;

/// Timestamp used to name snapshots and comparison reports.
///
/// `YYYY-MM-DD-HH-MM-SS`: lexicographic order equals chronological order.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d-%H-%M-%S").to_string()
}

/// Copy `source_dir` into a fresh timestamped snapshot under `backup_root`,
/// then prune all but the `keep` most recent snapshots.
///
/// Returns the path of the new snapshot (including the source directory's
/// basename) for the post-merge comparison. A failed copy is fatal and the
/// partial snapshot is left in place for manual inspection.
pub fn snapshot(source_dir: &Path, backup_root: &Path, keep: usize) -> Result<PathBuf> {
    fs::create_dir_all(backup_root)?;

    let basename = source_dir
        .file_name()
        .ok_or_else(|| Error::Configuration {
            message: format!(
                "cannot derive a snapshot name from '{}'",
                source_dir.display()
            ),
            hint: Some("pass the output directory without a trailing '..' component".to_string()),
        })?;

    let snapshot_path = backup_root.join(timestamp()).join(basename);
    fsops::copy_dir(source_dir, &snapshot_path)?;

    prune(backup_root, keep)?;

    Ok(snapshot_path)
}

/// Delete every snapshot directory beyond the `keep` newest ones.
fn prune(backup_root: &Path, keep: usize) -> Result<()> {
    let mut snapshots: Vec<PathBuf> = fs::read_dir(backup_root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    // Newest first: timestamp names sort chronologically.
    snapshots.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

    for stale in snapshots.iter().skip(keep) {
        debug!("Pruning stale snapshot {}", stale.display());
        fs::remove_dir_all(stale)?;
    }

    Ok(())
}
