//! # External Tool Invocation
//!
//! The archive fetch tool and the HTML render tool are opaque subprocess
//! collaborators. This module builds their argument vectors as plain data
//! (never a shell string, so there is nothing to quote or inject), runs
//! them, and turns a failed spawn or non-zero exit into a fatal
//! [`Error::ExternalTool`]. Tool stdout/stderr are inherited so the operator
//! sees the tools' own progress output.

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// A fully constructed subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Build the fetch tool invocation:
/// `<fetch_command...> archive <archive_dir> --user <user> --saved
/// --authenticate -f json --file-scheme <scheme> --config <cfg>`.
pub fn fetch_invocation(
    settings: &Settings,
    archive_dir: &Path,
    fetch_config: &Path,
) -> ToolInvocation {
    let (program, prefix) = split_command(&settings.fetch_command);
    let mut args = prefix;
    args.extend([
        "archive".to_string(),
        archive_dir.display().to_string(),
        "--user".to_string(),
        settings.user.clone(),
        "--saved".to_string(),
        "--authenticate".to_string(),
        "-f".to_string(),
        "json".to_string(),
        "--file-scheme".to_string(),
        settings.file_scheme.clone(),
        "--config".to_string(),
        fetch_config.display().to_string(),
    ]);
    ToolInvocation {
        program,
        args,
        envs: Vec::new(),
    }
}

/// Build the render tool invocation:
/// `<render_command...> --input_folder <archive_dir> --output_folder
/// <html_dir>`, with `PYTHONPATH` pointing at the render tool's code.
pub fn render_invocation(
    settings: &Settings,
    archive_dir: &Path,
    html_dir: &Path,
    render_tool_path: &Path,
) -> ToolInvocation {
    let (program, prefix) = split_command(&settings.render_command);
    let mut args = prefix;
    args.extend([
        "--input_folder".to_string(),
        archive_dir.display().to_string(),
        "--output_folder".to_string(),
        html_dir.display().to_string(),
    ]);
    ToolInvocation {
        program,
        args,
        envs: vec![(
            "PYTHONPATH".to_string(),
            render_tool_path.display().to_string(),
        )],
    }
}

/// Command vectors are validated non-empty by `Settings::validate`.
fn split_command(command: &[String]) -> (String, Vec<String>) {
    let program = command.first().cloned().unwrap_or_default();
    (program, command[1.min(command.len())..].to_vec())
}

/// Run an invocation to completion, blocking. Non-zero exit is fatal.
pub fn run(invocation: &ToolInvocation) -> Result<()> {
    info!("Running: {}", invocation);

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    for (key, value) in &invocation.envs {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| Error::ExternalTool {
        command: invocation.to_string(),
        status: e.to_string(),
    })?;

    if !status.success() {
        return Err(Error::ExternalTool {
            command: invocation.to_string(),
            status: status.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fetch_invocation_argument_order() {
        let settings = Settings::default();
        let invocation = fetch_invocation(
            &settings,
            &PathBuf::from("/work/bdfr"),
            &PathBuf::from("/work/my_config.cfg"),
        );

        assert_eq!(invocation.program, "python3");
        assert_eq!(
            invocation.args,
            vec![
                "-m",
                "bdfr",
                "archive",
                "/work/bdfr",
                "--user",
                "me",
                "--saved",
                "--authenticate",
                "-f",
                "json",
                "--file-scheme",
                "{POSTID}_{TITLE}",
                "--config",
                "/work/my_config.cfg",
            ]
        );
        assert!(invocation.envs.is_empty());
    }

    #[test]
    fn test_render_invocation_sets_pythonpath() {
        let settings = Settings::default();
        let invocation = render_invocation(
            &settings,
            &PathBuf::from("/work/bdfr"),
            &PathBuf::from("/work/html_pages"),
            &PathBuf::from("/work/bdfr-html"),
        );

        assert_eq!(invocation.program, "python3");
        assert_eq!(
            invocation.args,
            vec![
                "-m",
                "bdfrtohtml",
                "--input_folder",
                "/work/bdfr",
                "--output_folder",
                "/work/html_pages",
            ]
        );
        assert_eq!(
            invocation.envs,
            vec![("PYTHONPATH".to_string(), "/work/bdfr-html".to_string())]
        );
    }

    #[test]
    fn test_display_joins_program_and_args() {
        let invocation = ToolInvocation {
            program: "tool".to_string(),
            args: vec!["--flag".to_string(), "value".to_string()],
            envs: Vec::new(),
        };
        assert_eq!(invocation.to_string(), "tool --flag value");
    }

    #[test]
    fn test_run_success() {
        let invocation = ToolInvocation {
            program: "true".to_string(),
            args: Vec::new(),
            envs: Vec::new(),
        };
        assert!(run(&invocation).is_ok());
    }

    #[test]
    fn test_run_nonzero_exit_is_fatal() {
        let invocation = ToolInvocation {
            program: "false".to_string(),
            args: Vec::new(),
            envs: Vec::new(),
        };
        let err = run(&invocation).unwrap_err();
        assert!(matches!(err, Error::ExternalTool { .. }));
    }

    #[test]
    fn test_run_missing_program_is_fatal() {
        let invocation = ToolInvocation {
            program: "definitely-not-a-real-program".to_string(),
            args: Vec::new(),
            envs: Vec::new(),
        };
        assert!(run(&invocation).is_err());
    }
}
