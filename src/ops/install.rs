//! Artifact installation.

use crate::builder::backend::NativeBackend;
use crate::builder::context::BuildContext;
use crate::core::{BuildResult, Environment, Stage, StageOutcome};
use crate::util::shell::Status;

/// Install through the backend that built the library.
///
/// A no-op unless `--install` was given.
pub fn install(
    ctx: &BuildContext<'_>,
    backend: &dyn NativeBackend,
    env: &Environment,
) -> BuildResult<StageOutcome> {
    if !ctx.config.install {
        return Ok(StageOutcome::skipped(Stage::Install, "not requested"));
    }

    let prefix = ctx.config.install_prefix.display().to_string();
    ctx.shell.status(Status::Installing, format!("to {}", prefix));
    backend.install(ctx, env)?;

    Ok(StageOutcome::ok(
        Stage::Install,
        format!("installed to {} via {}", prefix, backend.name()),
    ))
}
