//! Recursive-make backend.
//!
//! Builds in `src/` with the vosk-api Makefiles and installs by copying the
//! shared libraries and the public header, since those Makefiles have no
//! install target.

use crate::builder::backend::NativeBackend;
use crate::builder::context::BuildContext;
use crate::core::{BuildResult, Environment};
use crate::util::fs::{copy_into, ensure_dir, files_with_extension};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

#[derive(Debug, Clone, Copy)]
pub struct MakeBackend {
    jobs: usize,
}

impl MakeBackend {
    pub fn new(jobs: usize) -> Self {
        MakeBackend { jobs: jobs.max(1) }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// `make -j <N> [V=1]` in `src/`.
    pub fn build_command(&self, ctx: &BuildContext<'_>, env: &Environment) -> ProcessBuilder {
        let jobs = self.jobs.to_string();
        let mut cmd = ProcessBuilder::new("make").args(["-j", jobs.as_str()]);
        if ctx.config.verbose {
            cmd = cmd.arg("V=1");
        }
        cmd.cwd(ctx.workspace.native_src_dir()).environment(env)
    }
}

impl NativeBackend for MakeBackend {
    fn name(&self) -> &'static str {
        "Make"
    }

    fn build(&self, ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<()> {
        tracing::info!("building with make -j {}", self.jobs);
        ctx.exec(&self.build_command(ctx, env))?;
        Ok(())
    }

    fn install(&self, ctx: &BuildContext<'_>, _env: &Environment) -> BuildResult<()> {
        let prefix = &ctx.config.install_prefix;
        let lib_dir = prefix.join("lib");
        let include_dir = prefix.join("include");
        ensure_dir(&lib_dir)?;
        ensure_dir(&include_dir)?;

        for lib in files_with_extension(&ctx.workspace.native_src_dir(), "so") {
            let dest = copy_into(&lib, &lib_dir)?;
            ctx.shell.status(Status::Installed, dest.display());
        }

        let header = copy_into(&ctx.workspace.public_header(), &include_dir)?;
        ctx.shell.status(Status::Installed, header.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildConfiguration, BuildError};
    use crate::test_support::{FakeRepo, MockRunner};
    use crate::util::Shell;

    #[test]
    fn test_build_command() {
        let repo = FakeRepo::new();
        let config = BuildConfiguration {
            verbose: true,
            ..Default::default()
        };
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        MakeBackend::new(8).build(&ctx, &Environment::new()).unwrap();

        let call = runner.find("make").unwrap();
        assert_eq!(call.command, "make -j 8 V=1");
        assert_eq!(call.cwd, Some(repo.workspace.native_src_dir()));
    }

    #[test]
    fn test_zero_jobs_clamped() {
        assert_eq!(MakeBackend::new(0).jobs(), 1);
    }

    #[test]
    fn test_install_copies_libraries_and_header() {
        let repo = FakeRepo::new();
        repo.write("src/libvosk.so", "elf");
        let prefix = repo.scratch("prefix");
        let config = BuildConfiguration {
            install_prefix: prefix.clone(),
            ..Default::default()
        };
        let shell = Shell::quiet();
        let runner = MockRunner::new();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        MakeBackend::new(1).install(&ctx, &Environment::new()).unwrap();

        assert!(prefix.join("lib/libvosk.so").is_file());
        assert!(prefix.join("include/vosk_api.h").is_file());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_install_from_checkout_with_glob_characters() {
        let repo = FakeRepo::named("vosk-api[v0.3]");
        repo.write("src/libvosk.so", "elf");
        let prefix = repo.scratch("prefix");
        let config = BuildConfiguration {
            install_prefix: prefix.clone(),
            ..Default::default()
        };
        let shell = Shell::quiet();
        let runner = MockRunner::new();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        MakeBackend::new(1).install(&ctx, &Environment::new()).unwrap();

        assert!(prefix.join("lib/libvosk.so").is_file());
    }

    #[test]
    fn test_install_without_header_fails() {
        let repo = FakeRepo::new();
        std::fs::remove_file(repo.workspace.public_header()).unwrap();
        let config = BuildConfiguration {
            install_prefix: repo.scratch("prefix"),
            ..Default::default()
        };
        let shell = Shell::quiet();
        let runner = MockRunner::new();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        let err = MakeBackend::new(1)
            .install(&ctx, &Environment::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
