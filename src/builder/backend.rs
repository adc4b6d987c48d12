//! Native library backends.
//!
//! The strategy is chosen once from the configuration; the pipeline never
//! switches backends mid-run. Both the build and the install step go
//! through the same backend so the installer follows the build.

use crate::builder::cmake::CMakeBackend;
use crate::builder::context::BuildContext;
use crate::builder::make::MakeBackend;
use crate::core::{BackendStrategy, BuildResult, Environment, Stage, StageOutcome};
use crate::util::process::default_jobs;
use crate::util::shell::Status;

/// A way of building and installing the native library.
pub trait NativeBackend {
    /// Human-readable backend name.
    fn name(&self) -> &'static str;

    /// Build the library. Any failed subprocess is fatal.
    fn build(&self, ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<()>;

    /// Install the built artifacts under the configured prefix.
    fn install(&self, ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<()>;
}

/// Pick the backend for a strategy.
pub fn backend_for(strategy: BackendStrategy) -> Box<dyn NativeBackend> {
    match strategy {
        BackendStrategy::Generator => Box::new(CMakeBackend),
        BackendStrategy::DirectMake => Box::new(MakeBackend::new(default_jobs())),
    }
}

/// The native-core stage.
pub fn build_native(
    ctx: &BuildContext<'_>,
    backend: &dyn NativeBackend,
    env: &Environment,
) -> BuildResult<StageOutcome> {
    if !ctx.config.builds_native() {
        return Ok(StageOutcome::skipped(Stage::Native, "--bindings-only"));
    }

    ctx.shell.status(
        Status::Building,
        format!("C++ library with {}", backend.name()),
    );
    backend.build(ctx, env)?;

    Ok(StageOutcome::ok(
        Stage::Native,
        format!("built with {}", backend.name()),
    ))
}
