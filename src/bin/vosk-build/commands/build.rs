//! The default command: run the whole pipeline.

use anyhow::{Context, Result};

use crate::cli::BuildArgs;
use vosk_build::builder::{BuildContext, BuildEvent};
use vosk_build::core::{BuildError, Environment, Workspace};
use vosk_build::ops::{self, Termination, ToolchainLocator};
use vosk_build::util::{interrupt, Shell, SystemRunner};

pub fn execute(args: BuildArgs, shell: &Shell, verbose: bool) -> Result<i32> {
    interrupt::install_handler();

    let config = args.to_config(verbose);
    let root = match args.repo_root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("repository root `{}` not found", root.display()))?;
    let workspace = Workspace::new(&root);
    tracing::debug!("building vosk-api at {}", workspace.root().display());

    if config.clean {
        if let Err(e) = ops::clean(&workspace, shell) {
            return Ok(report_error(shell, e));
        }
    }

    let runner = SystemRunner;
    let ctx = BuildContext::new(&config, &workspace, shell, &runner);
    let host = Environment::from_host();
    let locator = ToolchainLocator::for_repo(workspace.root());

    let report = ops::run(&ctx, &host, &locator);
    let code = report.exit_code();
    match report.termination {
        Termination::Completed => {}
        Termination::Failed(e) | Termination::Interrupted(e) => {
            report_error(shell, e);
        }
    }
    Ok(code)
}

/// Print a fatal error once, with its diagnostic code and help.
fn report_error(shell: &Shell, error: BuildError) -> i32 {
    let code = if error.is_interrupted() { 130 } else { 1 };
    if shell.is_json() {
        shell.json_event(&BuildEvent::error(&error).to_value());
    } else {
        eprintln!("{:?}", miette::Report::new(error));
    }
    code
}
