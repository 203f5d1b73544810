//! Compare command implementation
//!
//! Standalone front end for the tree comparator: diff two directory trees
//! (for example a backup snapshot against the current output) and print the
//! report to stdout. Read-only.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use bdfr_merge::compare::{compare_dirs, CompareOptions, DEFAULT_LINE_LIMIT};
use bdfr_merge::error::Error;

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First directory (e.g. a backup snapshot)
    pub dir_a: PathBuf,

    /// Second directory (e.g. the current output)
    pub dir_b: PathBuf,

    /// Per-file diff size gate; larger diffs collapse into a summary line
    #[arg(long, value_name = "LINES", default_value_t = DEFAULT_LINE_LIMIT)]
    pub limit: usize,

    /// Echo report lines to the log as they are produced
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `compare` command.
pub fn execute(args: CompareArgs) -> Result<()> {
    for dir in [&args.dir_a, &args.dir_b] {
        if !dir.is_dir() {
            return Err(Error::PathNotFound { path: dir.clone() }.into());
        }
    }

    let report = compare_dirs(
        &args.dir_a,
        &args.dir_b,
        &CompareOptions {
            line_limit: args.limit,
            verbose: args.verbose,
        },
    )?;

    if report.is_empty() {
        println!("No differences found.");
    } else {
        print!("{report}");
    }
    Ok(())
}
