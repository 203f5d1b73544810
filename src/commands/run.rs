//! Run command implementation
//!
//! Executes the full pipeline:
//! 1. Validate settings (the fetch tool's config file must exist)
//! 2. Invoke the external fetch and render tools
//! 3. Snapshot the existing output directory
//! 4. Merge the generated index into the existing one and fold the
//!    remaining generated files in
//! 5. Reorder the combined index by subreddit
//! 6. Compare the snapshot against the final output and persist the report
//!
//! Without `--existing-dir` this is a bootstrap run that stops after the
//! render step.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use bdfr_merge::pipeline::{Pipeline, RunOutcome};
use bdfr_merge::settings::{Settings, DEFAULT_SETTINGS_FILE};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Prior run's output directory; omit for a first-run bootstrap
    #[arg(short = 'd', long, value_name = "PATH")]
    pub existing_dir: Option<PathBuf>,

    /// Working root holding the settings file and intermediate directories
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub root: PathBuf,

    /// Path to the settings file (defaults to <root>/bdfr-merge.yaml)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Delete and refetch a stale intermediate archive directory instead of
    /// reusing it
    #[arg(long)]
    pub overwrite_intermediate: bool,

    /// Show merge diagnostics and echo the comparison report
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `run` command.
pub fn execute(args: RunArgs) -> Result<()> {
    let settings_path = args
        .settings
        .unwrap_or_else(|| args.root.join(DEFAULT_SETTINGS_FILE));

    let mut settings = Settings::load_or_default(&settings_path)?;
    if args.overwrite_intermediate {
        settings.overwrite_intermediate = true;
    }

    let pipeline = Pipeline::new(settings, args.root, args.verbose);
    match pipeline.run(args.existing_dir.as_deref())? {
        RunOutcome::Bootstrap { generated_dir } => {
            println!(
                "Bootstrap run complete. Generated pages are in {}; pass it via \
                 --existing-dir on the next run.",
                generated_dir.display()
            );
        }
        RunOutcome::Merged { report, stats, .. } => {
            println!(
                "Merged {} records ({} after dedup). Comparison report: {}",
                stats.records_in,
                stats.records_out,
                report.display()
            );
            println!(
                "Program execution complete. You may un-save from reddit after \
                 verifying the new index.html file."
            );
        }
    }
    Ok(())
}
