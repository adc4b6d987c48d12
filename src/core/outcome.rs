//! Per-stage results accumulated by the pipeline.

use std::fmt;

use serde::Serialize;

use crate::core::config::Binding;

/// The stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Dependencies,
    Toolchain,
    Environment,
    Native,
    Binding(Binding),
    Tests,
    Install,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Dependencies => write!(f, "dependencies"),
            Stage::Toolchain => write!(f, "toolchain"),
            Stage::Environment => write!(f, "environment"),
            Stage::Native => write!(f, "native library"),
            Stage::Binding(b) => write!(f, "{} bindings", b),
            Stage::Tests => write!(f, "tests"),
            Stage::Install => write!(f, "install"),
        }
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Ok,
    Skipped,
    Warned,
    Fatal,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Ok => write!(f, "ok"),
            StageStatus::Skipped => write!(f, "skipped"),
            StageStatus::Warned => write!(f, "warned"),
            StageStatus::Fatal => write!(f, "fatal"),
        }
    }
}

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    pub message: String,
}

impl StageOutcome {
    pub fn ok(stage: Stage, message: impl Into<String>) -> Self {
        StageOutcome {
            stage,
            status: StageStatus::Ok,
            message: message.into(),
        }
    }

    pub fn skipped(stage: Stage, message: impl Into<String>) -> Self {
        StageOutcome {
            stage,
            status: StageStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn warned(stage: Stage, message: impl Into<String>) -> Self {
        StageOutcome {
            stage,
            status: StageStatus::Warned,
            message: message.into(),
        }
    }

    pub fn fatal(stage: Stage, message: impl Into<String>) -> Self {
        StageOutcome {
            stage,
            status: StageStatus::Fatal,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.status == StageStatus::Fatal
    }
}
