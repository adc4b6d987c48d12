//! Subprocess execution utilities.
//!
//! Commands are structured values (program plus argument vector) dispatched
//! without a shell. Execution goes through [`CommandRunner`] so the pipeline
//! can be driven by a scripted runner in tests.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::{BuildError, BuildResult, Environment};
use crate::util::interrupt;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    environment: Option<Environment>,
    env: BTreeMap<OsString, OsString>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            environment: None,
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Run with exactly this environment instead of inheriting ours.
    pub fn environment(mut self, env: &Environment) -> Self {
        self.environment = Some(env.clone());
        self
    }

    /// Set an environment variable on top of the base environment.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .insert(key.as_ref().to_os_string(), value.as_ref().to_os_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The value a variable will have in the child, if this builder decides it.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env
            .get(OsStr::new(key))
            .and_then(|v| v.to_str())
            .or_else(|| self.environment.as_ref().and_then(|e| e.get(key)))
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref environment) = self.environment {
            cmd.env_clear();
            for (key, value) in environment.iter() {
                cmd.env(key, value);
            }
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run through `runner` and return the output whatever the exit status.
    pub fn exec_with(&self, runner: &dyn CommandRunner) -> BuildResult<ProcessOutput> {
        runner.run(self)
    }

    /// Run through `runner` and require a zero exit status.
    pub fn exec_and_check(&self, runner: &dyn CommandRunner) -> BuildResult<ProcessOutput> {
        self.check_output(runner.run(self)?)
    }

    /// Turn a nonzero exit in `output` into `SubprocessFailed`.
    pub fn check_output(&self, output: ProcessOutput) -> BuildResult<ProcessOutput> {
        if !output.success() {
            return Err(BuildError::SubprocessFailed {
                command: self.display_command(),
                code: output.code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }

    /// Check whether the command can be invoked and exits zero.
    ///
    /// A missing program or a nonzero exit is `Ok(false)`; only an interrupt
    /// is an error.
    pub fn probe(&self, runner: &dyn CommandRunner) -> BuildResult<bool> {
        match runner.run(self) {
            Ok(output) => Ok(output.success()),
            Err(e) if e.is_interrupted() => Err(e),
            Err(e) => {
                tracing::debug!("probe `{}` failed: {}", self.display_command(), e);
                Ok(false)
            }
        }
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes subprocesses on behalf of the pipeline.
pub trait CommandRunner {
    /// Run `cmd` to completion and capture its output.
    ///
    /// A program that cannot be found is `CommandNotFound`; a child ended by
    /// Ctrl-C is `Interrupted`. Nonzero exits are returned as output.
    fn run(&self, cmd: &ProcessBuilder) -> BuildResult<ProcessOutput>;
}

/// Runs commands on the host, blocking until each finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ProcessBuilder) -> BuildResult<ProcessOutput> {
        let shown = cmd.display_command();
        tracing::debug!(cwd = ?cmd.get_cwd(), "exec `{}`", shown);

        let mut command = cmd.build_command();
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let child = command.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BuildError::CommandNotFound {
                program: cmd.get_program().display().to_string(),
            },
            _ => BuildError::io(format!("failed to spawn `{}`", shown), e),
        })?;

        let output = child
            .wait_with_output()
            .map_err(|e| BuildError::io(format!("failed to wait for `{}`", shown), e))?;

        if interrupt::killed_by_interrupt(&output.status) || interrupt::requested() {
            return Err(BuildError::Interrupted { command: shown });
        }

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Parallelism to request from `make`, falling back to 4.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builder() {
        let output = ProcessBuilder::new("echo")
            .arg("hello")
            .exec_and_check(&SystemRunner)
            .unwrap();

        assert!(output.success());
        assert!(output.stdout.trim() == "hello" || output.stdout.contains("hello"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("cmake").args(["--build", "build", "--parallel"]);

        assert_eq!(pb.display_command(), "cmake --build build --parallel");
    }

    #[test]
    fn test_missing_program_is_command_not_found() {
        let err = ProcessBuilder::new("vosk-build-definitely-not-a-program")
            .exec_with(&SystemRunner)
            .unwrap_err();
        assert!(matches!(err, BuildError::CommandNotFound { .. }));
    }

    #[test]
    fn test_probe_missing_program_is_false() {
        let found = ProcessBuilder::new("vosk-build-definitely-not-a-program")
            .arg("--version")
            .probe(&SystemRunner)
            .unwrap();
        assert!(!found);
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_subprocess_failed() {
        let err = ProcessBuilder::new("false")
            .exec_and_check(&SystemRunner)
            .unwrap_err();
        match err {
            BuildError::SubprocessFailed { command, code, .. } => {
                assert_eq!(command, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_environment_replaces_host() {
        let env: Environment = [("VOSK_BUILD_MARKER", "1")].into_iter().collect();
        let output = ProcessBuilder::new("/usr/bin/env")
            .environment(&env)
            .env("EXTRA", "2")
            .exec_and_check(&SystemRunner)
            .unwrap();
        assert!(output.stdout.contains("VOSK_BUILD_MARKER=1"));
        assert!(output.stdout.contains("EXTRA=2"));
        assert!(!output.stdout.contains("HOME="));
    }

    #[test]
    fn test_get_env_prefers_explicit_override() {
        let env: Environment = [("A", "base")].into_iter().collect();
        let pb = ProcessBuilder::new("x").environment(&env).env("A", "override");
        assert_eq!(pb.get_env("A"), Some("override"));
        assert_eq!(pb.get_env("B"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_environment_reaches_child() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9");
        let env = Environment::new()
            .with("PATH", "/usr/bin:/bin")
            .with("RAW", raw);
        let output = ProcessBuilder::new("/bin/sh")
            .args(["-c", "test -n \"$RAW\""])
            .environment(&env)
            .exec_with(&SystemRunner)
            .unwrap();
        assert!(output.success());
        assert_eq!(env.get("RAW"), None);
        assert_eq!(env.get_os("RAW"), Some(raw));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_argument_is_passed_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"lib\xffvosk.so");
        std::fs::write(tmp.path().join(name), "").unwrap();

        let output = ProcessBuilder::new("/bin/sh")
            .args([OsStr::new("-c"), OsStr::new("test -f \"$1\""), OsStr::new("sh")])
            .arg(tmp.path().join(name))
            .exec_with(&SystemRunner)
            .unwrap();
        assert!(output.success());
    }

    #[test]
    fn test_default_jobs_is_positive() {
        assert!(default_jobs() >= 1);
    }
}
