//! Language binding builds.
//!
//! Each binding is handled independently and yields its own outcome:
//!
//! | binding | not requested | toolchain missing | build fails                  |
//! |---------|---------------|-------------------|------------------------------|
//! | Python  | skipped       | (always attempted)| fatal, warned with `--force` |
//! | Java    | skipped       | warned            | warned                       |
//! | C#      | skipped       | warned            | warned                       |
//!
//! An interrupt is fatal for all three.

use crate::builder::context::BuildContext;
use crate::core::{
    Binding, BuildError, BuildResult, Environment, Stage, StageOutcome, SOURCE_ROOT_VAR,
};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

/// Build one binding according to its policy.
pub fn build_binding(
    ctx: &BuildContext<'_>,
    binding: Binding,
    env: &Environment,
) -> BuildResult<StageOutcome> {
    let stage = Stage::Binding(binding);
    if !ctx.config.wants(binding) {
        return Ok(StageOutcome::skipped(stage, "not requested"));
    }

    ctx.shell.status(Status::Building, format!("{} bindings", binding));
    match binding {
        Binding::Python => build_python(ctx, env),
        Binding::Java => build_java(ctx, env),
        Binding::Csharp => build_csharp(ctx, env),
    }
}

fn build_python(ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<StageOutcome> {
    let stage = Stage::Binding(Binding::Python);
    let python_dir = ctx.workspace.python_dir();
    let env = env
        .clone()
        .with(SOURCE_ROOT_VAR, ctx.workspace.root().as_os_str());

    let python = |args: &[&str]| {
        ProcessBuilder::new(ctx.python())
            .args(args)
            .cwd(&python_dir)
            .environment(&env)
    };

    let (package_step, done) = if ctx.config.wheel {
        (python(&["setup.py", "bdist_wheel"]), "built wheel")
    } else {
        (
            python(&["-m", "pip", "install", "-e", "."]),
            "installed in development mode",
        )
    };

    let result = ctx
        .exec(&python(&["vosk_builder.py"]))
        .and_then(|_| ctx.exec(&package_step));

    match result {
        Ok(_) => Ok(StageOutcome::ok(stage, done)),
        Err(e) if e.is_interrupted() || !ctx.config.force => Err(e),
        Err(e) => {
            ctx.shell
                .warn(format!("Python bindings failed (continuing with --force): {}", e));
            Ok(StageOutcome::warned(stage, format!("build failed: {}", e)))
        }
    }
}

fn build_java(ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<StageOutcome> {
    let stage = Stage::Binding(Binding::Java);
    if !(ctx.probe("javac", &["--version"])? && ctx.probe("jar", &["--version"])?) {
        ctx.shell
            .warn("Java compiler not found. Skipping Java bindings.");
        return Ok(StageOutcome::warned(stage, "javac/jar not found, skipped"));
    }

    let make = ProcessBuilder::new("make")
        .cwd(ctx.workspace.java_dir())
        .environment(env);
    optional_step(ctx, stage, &make, "built")
}

fn build_csharp(ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<StageOutcome> {
    let stage = Stage::Binding(Binding::Csharp);
    if !ctx.probe("dotnet", &["--version"])? {
        ctx.shell.warn(".NET SDK not found. Skipping C# bindings.");
        return Ok(StageOutcome::warned(stage, "dotnet not found, skipped"));
    }

    let dotnet = ProcessBuilder::new("dotnet")
        .arg("build")
        .cwd(ctx.workspace.csharp_dir())
        .environment(env);
    optional_step(ctx, stage, &dotnet, "built")
}

/// Run a step whose failure only warns.
fn optional_step(
    ctx: &BuildContext<'_>,
    stage: Stage,
    cmd: &ProcessBuilder,
    done: &str,
) -> BuildResult<StageOutcome> {
    match ctx.exec(cmd) {
        Ok(_) => Ok(StageOutcome::ok(stage, done)),
        Err(e @ BuildError::Interrupted { .. }) => Err(e),
        Err(e) => {
            ctx.shell.warn(format!("{} failed: {}", stage, e));
            Ok(StageOutcome::warned(stage, format!("build failed: {}", e)))
        }
    }
}
