//! Fatal error taxonomy.
//!
//! Warnings never become a `BuildError`; they are recorded as
//! [`StageOutcome`](crate::core::outcome::StageOutcome)s instead. Anything
//! that reaches this type stops the pipeline.

use std::fmt;
use std::io;

use miette::Diagnostic;
use thiserror::Error;

/// A required host tool that could not be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTool {
    pub name: String,
    pub description: String,
}

impl fmt::Display for MissingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

fn list_missing(missing: &[MissingTool]) -> String {
    missing
        .iter()
        .map(|t| format!("  - {}", t))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error that aborts a build.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("missing required dependencies:\n{}", list_missing(.missing))]
    #[diagnostic(
        code(vosk_build::tool_missing),
        help("install the missing dependencies and try again")
    )]
    ToolMissing { missing: Vec<MissingTool> },

    #[error("failed to install Python package `{package}`: {detail}")]
    #[diagnostic(
        code(vosk_build::remediation_failed),
        help("install it manually with `pip install {package}`")
    )]
    RemediationFailed { package: String, detail: String },

    #[error("Kaldi is required for building vosk-api")]
    #[diagnostic(code(vosk_build::toolchain_not_found))]
    ToolchainNotFound {
        #[help]
        guidance: String,
    },

    #[error("command not found: `{program}`")]
    #[diagnostic(
        code(vosk_build::command_not_found),
        help("make sure `{program}` is installed and on PATH")
    )]
    CommandNotFound { program: String },

    #[error("command failed: `{command}` (exit code {})\n{stderr}", display_code(.code))]
    #[diagnostic(
        code(vosk_build::subprocess_failed),
        help("re-run with --verbose for the full command output")
    )]
    SubprocessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("build interrupted by user during `{command}`")]
    #[diagnostic(code(vosk_build::interrupted))]
    Interrupted { command: String },

    #[error("{context}")]
    #[diagnostic(code(vosk_build::io))]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

impl BuildError {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is the user interrupting the run.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, BuildError::Interrupted { .. })
    }
}

/// Result alias for pipeline operations.
pub type BuildResult<T> = Result<T, BuildError>;
