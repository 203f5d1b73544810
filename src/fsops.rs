//! Recursive filesystem helpers used by the backup manager and the
//! orchestrator: full-tree copy, and move-with-overwrite for folding the
//! generated auxiliary files into the destination directory.
//!
//! None of these operations are transactional. A failure mid-copy leaves a
//! partial tree behind; callers treat that as fatal and rely on the most
//! recent backup snapshot for recovery.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Recursively copy `src` into `dst`, creating `dst` and any intermediate
/// directories. Existing files in `dst` are overwritten.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry.path().strip_prefix(src).unwrap();
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Move everything inside `src` into `dst`, overwriting on name collision,
/// then delete `src` itself.
pub fn move_dir_contents(src: &Path, dst: &Path) -> Result<()> {
    copy_dir(src, dst)?;
    fs::remove_dir_all(src)?;
    Ok(())
}
