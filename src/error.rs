//! # Error Handling
//!
//! Centralized error type for the `bdfr-merge` application, built with
//! `thiserror`. Every failure mode the pipeline can hit is represented by a
//! variant of [`Error`], and the [`Result`] alias is used throughout the
//! library to keep signatures short.
//!
//! Nothing here is recoverable: the pipeline runs strictly in sequence and
//! any error aborts the run. The operator's safety net is the pre-merge
//! backup snapshot plus the post-run comparison report, not automated
//! rollback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bdfr-merge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value or file is missing or invalid.
    ///
    /// Includes an optional hint describing how to fix the problem.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A user-supplied path (the prior run's output directory) does not exist.
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// An external tool (fetch or render) could not be spawned or exited
    /// with a non-zero status.
    #[error("External tool failed: {command}: {status}")]
    ExternalTool { command: String, status: String },

    /// An index document does not contain exactly one content region.
    ///
    /// The original tooling silently took the first matching region; this
    /// implementation treats anything other than exactly one as fatal so a
    /// merge can never splice the wrong fragment.
    #[error("Malformed document {}: expected exactly one content region, found {regions}", path.display())]
    MalformedDocument { path: PathBuf, regions: usize },

    /// A post record carries no recognizable subreddit link.
    ///
    /// Fatal by design: skipping the record would silently drop or mis-group
    /// an archived post.
    #[error("Unrecognized post record (no subreddit link): {snippet}")]
    UnrecognizedRecord { snippet: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_configuration() {
        let error = Error::Configuration {
            message: "my_config.cfg doesn't exist".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("my_config.cfg"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_configuration_with_hint() {
        let error = Error::Configuration {
            message: "my_config.cfg doesn't exist".to_string(),
            hint: Some("create one next to the settings file".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("create one next to the settings file"));
    }

    #[test]
    fn test_error_display_path_not_found() {
        let error = Error::PathNotFound {
            path: PathBuf::from("/archive/html"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Path not found"));
        assert!(display.contains("/archive/html"));
    }

    #[test]
    fn test_error_display_external_tool() {
        let error = Error::ExternalTool {
            command: "python3 -m bdfr archive".to_string(),
            status: "exit status: 2".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("External tool failed"));
        assert!(display.contains("python3 -m bdfr archive"));
        assert!(display.contains("exit status: 2"));
    }

    #[test]
    fn test_error_display_malformed_document() {
        let error = Error::MalformedDocument {
            path: PathBuf::from("html_pages/index.html"),
            regions: 0,
        };
        let display = format!("{}", error);
        assert!(display.contains("Malformed document"));
        assert!(display.contains("index.html"));
        assert!(display.contains("found 0"));
    }

    #[test]
    fn test_error_display_unrecognized_record() {
        let error = Error::UnrecognizedRecord {
            snippet: "<div><a href=\"https://example.com\">x</a></div>".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unrecognized post record"));
        assert!(display.contains("example.com"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }
}
