//! # Pipeline Orchestrator
//!
//! Sequences one end-to-end run: invoke the fetch and render tools, snapshot
//! the existing output, splice the new index into it, fold the auxiliary
//! files in, normalize the combined index, and write a comparison report
//! between the pre-merge snapshot and the final output.
//!
//! The flow is strictly linear and any failure aborts the run. When no prior
//! output directory is supplied the run is a bootstrap: it stops after the
//! render step and the generated directory itself becomes the operator's
//! first output.
//!
//! Directory layout under the working root:
//!
//! ```text
//! <root>/bdfr/          intermediate archive (fetch tool output, transient)
//! <root>/html_pages/    generated pages (render tool output, transient)
//! <root>/backups/       timestamped snapshots, 5 most recent retained
//! <root>/reports/       timestamped comparison reports
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::backup;
use crate::compare::{self, CompareOptions};
use crate::error::{Error, Result};
use crate::fsops;
use crate::merge;
use crate::reorder::{self, ReorderStats};
use crate::settings::Settings;
use crate::tools;

/// What a pipeline run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// First run: fetch + render only, nothing merged.
    Bootstrap { generated_dir: PathBuf },
    /// Full run: merged, normalized, compared.
    Merged {
        snapshot: PathBuf,
        report: PathBuf,
        stats: ReorderStats,
    },
}

/// One configured pipeline instance.
///
/// Verbosity is an explicit value threaded into the components that emit
/// diagnostics, not process-wide state.
pub struct Pipeline {
    settings: Settings,
    root: PathBuf,
    verbose: bool,
}

impl Pipeline {
    pub fn new(settings: Settings, root: PathBuf, verbose: bool) -> Self {
        Self {
            settings,
            root,
            verbose,
        }
    }

    /// Intermediate archive directory written by the fetch tool.
    pub fn archive_dir(&self) -> PathBuf {
        self.root.join("bdfr")
    }

    /// Generated pages directory written by the render tool.
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("html_pages")
    }

    pub fn backup_root(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    /// Execute one run. `existing_dir` is the prior run's output directory;
    /// `None` is the bootstrap case.
    pub fn run(&self, existing_dir: Option<&Path>) -> Result<RunOutcome> {
        // Checked before anything else so a typo cannot cost a full fetch.
        if let Some(dir) = existing_dir {
            if !dir.exists() {
                return Err(Error::PathNotFound {
                    path: dir.to_path_buf(),
                });
            }
        }
        self.settings.validate(&self.root)?;

        self.fetch()?;
        self.render()?;

        let Some(existing_dir) = existing_dir else {
            info!(
                "Bootstrap run: generated pages left in {}",
                self.generated_dir().display()
            );
            return Ok(RunOutcome::Bootstrap {
                generated_dir: self.generated_dir(),
            });
        };

        let snapshot = backup::snapshot(existing_dir, &self.backup_root(), self.settings.backup_keep)?;

        let generated_index = self.generated_dir().join("index.html");
        let existing_index = existing_dir.join("index.html");
        merge::merge_index(&generated_index, &existing_index)?;
        self.fold_generated_files(existing_dir)?;

        let stats = reorder::reorder_index(&existing_index)?;
        if self.verbose {
            info!(
                "Sanity check: {} records before reorder, {} after",
                stats.records_in, stats.records_out
            );
        }

        info!("BDFR HTML merge complete. Running directory comparisons (old vs new)...");
        let report_text = compare::compare_dirs(
            &snapshot,
            existing_dir,
            &CompareOptions {
                line_limit: self.settings.diff_line_limit,
                verbose: self.verbose,
            },
        )?;
        let report = self.persist_report(&report_text)?;

        Ok(RunOutcome::Merged {
            snapshot,
            report,
            stats,
        })
    }

    /// Prepare the intermediate archive directory and run the fetch tool.
    ///
    /// A leftover directory from an earlier run is either deleted and
    /// refetched or reused as-is (skipping the fetch entirely), depending on
    /// the `overwrite_intermediate` setting.
    fn fetch(&self) -> Result<()> {
        let archive_dir = self.archive_dir();
        if archive_dir.exists() {
            if self.settings.overwrite_intermediate {
                info!(
                    "Deleting stale archive directory {}",
                    archive_dir.display()
                );
                fs::remove_dir_all(&archive_dir)?;
            } else {
                info!("Using previous program run's archive directory. Skipping fetch...");
                return Ok(());
            }
        }
        fs::create_dir_all(&archive_dir)?;

        let fetch_config = self.settings.resolve(&self.root, &self.settings.fetch_config);
        let invocation = tools::fetch_invocation(&self.settings, &archive_dir, &fetch_config);
        tools::run(&invocation)
    }

    fn render(&self) -> Result<()> {
        let render_tool_path = self
            .settings
            .resolve(&self.root, &self.settings.render_tool_path);
        let invocation = tools::render_invocation(
            &self.settings,
            &self.archive_dir(),
            &self.generated_dir(),
            &render_tool_path,
        );
        tools::run(&invocation)
    }

    /// Fold the generated auxiliary files into the existing output directory.
    ///
    /// The generated index has already been merged, and the generated
    /// stylesheet is dropped so the existing (possibly hand-tuned) one
    /// survives. Everything else — per-post pages, media — moves across,
    /// overwriting on name collision, and the generated directory is
    /// deleted.
    fn fold_generated_files(&self, existing_dir: &Path) -> Result<()> {
        let generated_dir = self.generated_dir();
        fs::remove_file(generated_dir.join("index.html"))?;
        fs::remove_file(generated_dir.join("style.css"))?;
        fsops::move_dir_contents(&generated_dir, existing_dir)?;
        Ok(())
    }

    fn persist_report(&self, report_text: &str) -> Result<PathBuf> {
        let reports_dir = self.reports_dir();
        fs::create_dir_all(&reports_dir)?;
        let report_path = reports_dir.join(format!("{}.txt", backup::timestamp()));
        fs::write(&report_path, report_text)?;
        Ok(report_path)
    }
}
