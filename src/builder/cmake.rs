//! CMake backend.

use crate::builder::backend::NativeBackend;
use crate::builder::context::BuildContext;
use crate::core::{BuildResult, Environment};
use crate::util::fs::ensure_dir;
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

/// Configures `build/` from the repository root, then builds it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CMakeBackend;

impl CMakeBackend {
    /// `cmake -S <root> -B <build> -DCMAKE_BUILD_TYPE=.. -DCMAKE_INSTALL_PREFIX=..`
    pub fn configure_command(&self, ctx: &BuildContext<'_>, env: &Environment) -> ProcessBuilder {
        let config = ctx.config;
        ProcessBuilder::new("cmake")
            .arg("-S")
            .arg(ctx.workspace.root())
            .arg("-B")
            .arg(ctx.workspace.build_dir())
            .arg(format!("-DCMAKE_BUILD_TYPE={}", config.profile))
            .arg(format!(
                "-DCMAKE_INSTALL_PREFIX={}",
                config.install_prefix.display()
            ))
            .cwd(ctx.workspace.root())
            .environment(env)
    }

    /// `cmake --build <build> --parallel --config <profile>`
    pub fn build_command(&self, ctx: &BuildContext<'_>, env: &Environment) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new("cmake")
            .arg("--build")
            .arg(ctx.workspace.build_dir())
            .arg("--parallel")
            // Multi-config generators (Visual Studio, Xcode) read this
            .args(["--config", ctx.config.profile.as_str()]);
        if ctx.config.verbose {
            cmd = cmd.arg("--verbose");
        }
        cmd.cwd(ctx.workspace.root()).environment(env)
    }

    /// `cmake --install <build>`
    pub fn install_command(&self, ctx: &BuildContext<'_>, env: &Environment) -> ProcessBuilder {
        ProcessBuilder::new("cmake")
            .arg("--install")
            .arg(ctx.workspace.build_dir())
            .cwd(ctx.workspace.root())
            .environment(env)
    }
}

impl NativeBackend for CMakeBackend {
    fn name(&self) -> &'static str {
        "CMake"
    }

    fn build(&self, ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<()> {
        ensure_dir(&ctx.workspace.build_dir())?;

        tracing::info!("configuring CMake project");
        ctx.shell.status(Status::Configuring, "CMake project");
        ctx.exec(&self.configure_command(ctx, env))?;

        tracing::info!("building CMake project");
        ctx.exec(&self.build_command(ctx, env))?;
        Ok(())
    }

    fn install(&self, ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<()> {
        ctx.exec(&self.install_command(ctx, env))?;
        Ok(())
    }
}
