//! Test utilities and mocks for vosk-build unit tests.
//!
//! [`MockRunner`] stands in for the host: it records every command the
//! pipeline dispatches and answers from scripted expectations.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = MockRunner::new();
//! runner.expect_prefix("javac", MockResponse::NotFound);
//! runner.set_default(MockResponse::success(""));
//! ```

pub mod fixtures;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::core::{BuildError, BuildResult};
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

pub use fixtures::*;

/// Scripted reply to a command.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The process ran and exited with this output.
    Output(ProcessOutput),
    /// The program is not installed.
    NotFound,
    /// The user pressed Ctrl-C while it ran.
    Interrupted,
}

impl MockResponse {
    /// A zero exit with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockResponse::Output(ProcessOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    /// A nonzero exit with the given stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        MockResponse::Output(ProcessOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        })
    }
}

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
        }
    }
}

/// A command the runner was asked to execute.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: Option<PathBuf>,
    /// Variables the pipeline decided for the child.
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    expectations: Vec<(CommandPattern, MockResponse)>,
    calls: Vec<RecordedCall>,
    default_response: Option<MockResponse>,
}

/// Mock command runner.
///
/// Expectations are checked in insertion order; the first match wins.
/// Unmatched commands use the default response, or fail the call when none
/// is set.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<State>,
}

/// Variables recorded for each call.
const TRACKED_VARS: &[&str] = &[
    "CMAKE_BUILD_TYPE",
    "EXTRA_CFLAGS",
    "HAVE_OPENBLAS_CLAPACK",
    "HAVE_MKL",
    "HAVE_CUDA",
    "KALDI_ROOT",
    "VOSK_SOURCE",
];

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// A runner where every command succeeds.
    pub fn all_succeed() -> Self {
        let runner = MockRunner::new();
        runner.set_default(MockResponse::success(""));
        runner
    }

    pub fn expect(&self, cmd: &str, response: MockResponse) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), response)
    }

    pub fn expect_prefix(&self, prefix: &str, response: MockResponse) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), response)
    }

    pub fn set_default(&self, response: MockResponse) -> &Self {
        self.state.lock().unwrap().default_response = Some(response);
        self
    }

    fn push(&self, pattern: CommandPattern, response: MockResponse) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push((pattern, response));
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Command lines of all recorded calls.
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    /// Whether any recorded command starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }

    /// The first recorded call starting with `prefix`.
    pub fn find(&self, prefix: &str) -> Option<RecordedCall> {
        self.calls().into_iter().find(|c| c.command.starts_with(prefix))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> BuildResult<ProcessOutput> {
        let command = cmd.display_command();
        let mut state = self.state.lock().unwrap();

        let env = TRACKED_VARS
            .iter()
            .filter_map(|k| cmd.get_env(k).map(|v| (k.to_string(), v.to_string())))
            .collect();
        state.calls.push(RecordedCall {
            command: command.clone(),
            cwd: cmd.get_cwd().map(PathBuf::from),
            env,
        });

        let response = state
            .expectations
            .iter()
            .find(|(pattern, _)| pattern.matches(&command))
            .map(|(_, response)| response.clone())
            .or_else(|| state.default_response.clone());

        match response {
            Some(MockResponse::Output(output)) => Ok(output),
            Some(MockResponse::NotFound) => Err(BuildError::CommandNotFound {
                program: cmd.get_program().display().to_string(),
            }),
            Some(MockResponse::Interrupted) => Err(BuildError::Interrupted { command }),
            None => Err(BuildError::SubprocessFailed {
                command,
                code: None,
                stderr: "unexpected command".to_string(),
            }),
        }
    }
}
