//! Per-run build context shared by every stage.

use std::fmt;

use crate::core::{BuildConfiguration, BuildResult, Workspace};
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};
use crate::util::shell::{Shell, Status};

/// Configuration, repository layout, output and the subprocess runner.
///
/// The environment is deliberately not part of the context: stages receive
/// it as an explicit argument.
pub struct BuildContext<'a> {
    pub config: &'a BuildConfiguration,
    pub workspace: &'a Workspace,
    pub shell: &'a Shell,
    runner: &'a dyn CommandRunner,
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("config", &self.config)
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}

impl<'a> BuildContext<'a> {
    pub fn new(
        config: &'a BuildConfiguration,
        workspace: &'a Workspace,
        shell: &'a Shell,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        BuildContext {
            config,
            workspace,
            shell,
            runner,
        }
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    /// Run a command that must succeed, echoing its output.
    pub fn exec(&self, cmd: &ProcessBuilder) -> BuildResult<ProcessOutput> {
        let shown = cmd.display_command();
        self.shell.status(Status::Running, &shown);

        let output = {
            let _spinner = self.shell.spinner(&shown);
            cmd.exec_with(self.runner)?
        };
        self.shell
            .passthrough(&output.stdout, &output.stderr, !output.success());

        if !output.success() {
            tracing::debug!("`{}` exited with {:?}", shown, output.code);
        }
        cmd.check_output(output)
    }

    /// Check whether `program args...` runs and exits zero.
    pub fn probe(&self, program: &str, args: &[&str]) -> BuildResult<bool> {
        ProcessBuilder::new(program).args(args).probe(self.runner)
    }

    /// The interpreter used for everything Python.
    pub fn python(&self) -> &str {
        &self.config.python_interpreter
    }
}
