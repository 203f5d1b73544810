//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::commands;

/// bdfr-merge - Merge incremental BDFR HTML archives into one grouped index
#[derive(Parser, Debug)]
#[command(name = "bdfr-merge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full fetch, render, merge, reorder, and compare pipeline
    Run(commands::run::RunArgs),

    /// Compare two directory trees and print the report
    Compare(commands::compare::CompareArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => {
                init_logging(args.verbose);
                commands::run::execute(args)
            }
            Commands::Compare(args) => {
                init_logging(args.verbose);
                commands::compare::execute(args)
            }
        }
    }
}

/// Default to warnings only; `--verbose` surfaces the pipeline's progress
/// and diagnostic lines. `RUST_LOG` still overrides either way.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}
