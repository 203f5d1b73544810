//! # Settings
//!
//! Run settings for the merge pipeline, loaded from an optional YAML file
//! (`bdfr-merge.yaml` in the working root by default). Every field has a
//! default, so a missing settings file is not an error; the defaults
//! reproduce the original tool invocations exactly.
//!
//! What *is* required is the fetch tool's own configuration file
//! (`my_config.cfg` by default): the fetch tool cannot authenticate without
//! it, so validation fails early with a hint before any subprocess runs.
//!
//! The `overwrite_intermediate` flag replaces the original's interactive
//! "delete the stale archive directory?" prompt, keeping the pipeline
//! non-interactive and testable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backup::DEFAULT_KEEP;
use crate::compare::DEFAULT_LINE_LIMIT;
use crate::error::{Error, Result};

/// Default settings file name, looked up under the working root.
pub const DEFAULT_SETTINGS_FILE: &str = "bdfr-merge.yaml";

fn default_fetch_command() -> Vec<String> {
    vec!["python3".to_string(), "-m".to_string(), "bdfr".to_string()]
}

fn default_render_command() -> Vec<String> {
    vec![
        "python3".to_string(),
        "-m".to_string(),
        "bdfrtohtml".to_string(),
    ]
}

fn default_render_tool_path() -> PathBuf {
    PathBuf::from("bdfr-html")
}

fn default_fetch_config() -> PathBuf {
    PathBuf::from("my_config.cfg")
}

fn default_user() -> String {
    "me".to_string()
}

fn default_file_scheme() -> String {
    "{POSTID}_{TITLE}".to_string()
}

fn default_backup_keep() -> usize {
    DEFAULT_KEEP
}

fn default_diff_line_limit() -> usize {
    DEFAULT_LINE_LIMIT
}

/// Pipeline settings.
///
/// Relative paths (`render_tool_path`, `fetch_config`) are resolved against
/// the working root at use time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Command vector that launches the archive fetch tool.
    #[serde(default = "default_fetch_command")]
    pub fetch_command: Vec<String>,

    /// Command vector that launches the HTML render tool.
    #[serde(default = "default_render_command")]
    pub render_command: Vec<String>,

    /// Location of the render tool's own code; exported as `PYTHONPATH` for
    /// the render subprocess.
    #[serde(default = "default_render_tool_path")]
    pub render_tool_path: PathBuf,

    /// The fetch tool's configuration file. Must exist.
    #[serde(default = "default_fetch_config")]
    pub fetch_config: PathBuf,

    /// Account whose saved posts are archived.
    #[serde(default = "default_user")]
    pub user: String,

    /// Per-item file naming template passed to the fetch tool.
    #[serde(default = "default_file_scheme")]
    pub file_scheme: String,

    /// How many backup snapshots to retain.
    #[serde(default = "default_backup_keep")]
    pub backup_keep: usize,

    /// Per-file diff size gate for the comparison report.
    #[serde(default = "default_diff_line_limit")]
    pub diff_line_limit: usize,

    /// Delete and refetch a stale intermediate archive directory instead of
    /// reusing it.
    #[serde(default)]
    pub overwrite_intermediate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_command: default_fetch_command(),
            render_command: default_render_command(),
            render_tool_path: default_render_tool_path(),
            fetch_config: default_fetch_config(),
            user: default_user(),
            file_scheme: default_file_scheme(),
            backup_keep: default_backup_keep(),
            diff_line_limit: default_diff_line_limit(),
            overwrite_intermediate: false,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a file, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let yaml = fs::read_to_string(path)?;
        Self::parse(&yaml)
    }

    /// Resolve a configured path against the working root.
    pub fn resolve(&self, root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Validate the settings against the working root.
    ///
    /// Checked before any external tool runs: the fetch config file must
    /// exist and both command vectors must name a program.
    pub fn validate(&self, root: &Path) -> Result<()> {
        if self.fetch_command.is_empty() {
            return Err(Error::Configuration {
                message: "fetch_command is empty".to_string(),
                hint: Some("set fetch_command to the program and arguments that launch the fetch tool".to_string()),
            });
        }
        if self.render_command.is_empty() {
            return Err(Error::Configuration {
                message: "render_command is empty".to_string(),
                hint: Some("set render_command to the program and arguments that launch the render tool".to_string()),
            });
        }

        let fetch_config = self.resolve(root, &self.fetch_config);
        if !fetch_config.exists() {
            return Err(Error::Configuration {
                message: format!("{} doesn't exist", fetch_config.display()),
                hint: Some(
                    "create one in the working root, using the instructions in the README"
                        .to_string(),
                ),
            });
        }

        Ok(())
    }
}
