//! Build event types for JSON output.
//!
//! These events are emitted when using `--message-format=json`, one JSON
//! object per line.
//!
//! # Event Types
//!
//! - `build-started`: the resolved configuration, before any stage runs
//! - `stage-finished`: one per stage outcome, in pipeline order
//! - `build-finished`: the run ended (success, failure or interrupt)
//! - `error`: the fatal error, with its diagnostic code and help text
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use miette::Diagnostic;
use serde::Serialize;

use crate::core::{BuildError, Stage, StageStatus};

/// A build event emitted during the run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// Run started with this configuration.
    #[serde(rename = "build-started")]
    BuildStarted {
        /// Build profile (e.g., "Release")
        profile: String,
        /// Native build system ("CMake" or "Make")
        build_system: String,
        /// Requested bindings
        bindings: Vec<String>,
    },

    /// A stage produced its outcome.
    #[serde(rename = "stage-finished")]
    StageFinished {
        stage: Stage,
        status: StageStatus,
        message: String,
    },

    /// Run completed.
    #[serde(rename = "build-finished")]
    BuildFinished {
        /// Whether the build succeeded
        success: bool,
        /// Whether the user interrupted the build
        interrupted: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Number of stages that finished with a warning
        warnings: usize,
    },

    /// The error that stopped the run.
    #[serde(rename = "error")]
    Error {
        message: String,
        /// Diagnostic code (e.g., "vosk_build::toolchain_not_found")
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        /// Remediation text, such as the Kaldi setup steps
        #[serde(skip_serializing_if = "Option::is_none")]
        help: Option<String>,
    },
}

impl BuildEvent {
    /// Create a build finished event.
    pub fn finished(success: bool, interrupted: bool, duration_ms: u64, warnings: usize) -> Self {
        BuildEvent::BuildFinished {
            success,
            interrupted,
            duration_ms,
            warnings,
        }
    }

    /// Create an error event from a fatal error.
    pub fn error(error: &BuildError) -> Self {
        BuildEvent::Error {
            message: error.to_string(),
            code: error.code().map(|c| c.to_string()),
            help: error.help().map(|h| h.to_string()),
        }
    }

    /// Serialize this event to a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&crate::core::StageOutcome> for BuildEvent {
    fn from(outcome: &crate::core::StageOutcome) -> Self {
        BuildEvent::StageFinished {
            stage: outcome.stage,
            status: outcome.status,
            message: outcome.message.clone(),
        }
    }
}
