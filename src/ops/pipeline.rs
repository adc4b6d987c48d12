//! The pipeline coordinator.
//!
//! Runs the stages in a fixed order, stops at the first fatal outcome and
//! otherwise always reaches the summary, warnings included.

use std::fmt::Write;
use std::time::{Duration, Instant};

use crate::builder::backend::{backend_for, build_native};
use crate::builder::bindings::build_binding;
use crate::builder::context::BuildContext;
use crate::builder::events::BuildEvent;
use crate::core::environment::synthesize;
use crate::core::{
    Binding, BuildConfiguration, BuildError, BuildResult, Environment, Stage, StageOutcome,
    StageStatus,
};
use crate::ops::install::install;
use crate::ops::test::run_tests;
use crate::ops::toolchain::{locate_toolchain, ToolchainLocator};
use crate::ops::verify::verify_dependencies;
use crate::util::fs::ensure_dir;
use crate::util::interrupt;
use crate::util::shell::{format_duration, Status};

/// How a run ended.
#[derive(Debug)]
pub enum Termination {
    /// Every stage ran; some may have warned.
    Completed,
    /// A stage failed fatally.
    Failed(BuildError),
    /// The user pressed Ctrl-C.
    Interrupted(BuildError),
}

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// Stage outcomes in execution order. A failed run ends with the fatal one.
    pub outcomes: Vec<StageOutcome>,
    pub termination: Termination,
    pub duration: Duration,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }

    pub fn exit_code(&self) -> i32 {
        match self.termination {
            Termination::Completed => 0,
            Termination::Failed(_) => 1,
            Termination::Interrupted(_) => 130,
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == StageStatus::Warned)
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|o| o.stage == stage)
    }
}

/// Run the full pipeline.
///
/// `host` is the snapshot of the parent environment; the synthesized build
/// variables are layered over it.
pub fn run(
    ctx: &BuildContext<'_>,
    host: &Environment,
    locator: &ToolchainLocator,
) -> PipelineReport {
    run_with_interrupt_check(ctx, host, locator, &interrupt::requested)
}

fn run_with_interrupt_check(
    ctx: &BuildContext<'_>,
    host: &Environment,
    locator: &ToolchainLocator,
    interrupted: &dyn Fn() -> bool,
) -> PipelineReport {
    let start = Instant::now();
    ctx.shell.json_event(
        &BuildEvent::BuildStarted {
            profile: ctx.config.profile.to_string(),
            build_system: ctx.config.backend.to_string(),
            bindings: ctx.config.bindings.iter().map(|b| b.to_string()).collect(),
        }
        .to_value(),
    );

    let mut stages = Stages {
        ctx,
        interrupted,
        outcomes: Vec::new(),
    };
    let termination = match stages.run(host, locator) {
        Ok(()) => Termination::Completed,
        Err(e) if e.is_interrupted() => Termination::Interrupted(e),
        Err(e) => Termination::Failed(e),
    };

    let report = PipelineReport {
        outcomes: stages.outcomes,
        termination,
        duration: start.elapsed(),
    };

    ctx.shell.json_event(
        &BuildEvent::finished(
            report.succeeded(),
            matches!(report.termination, Termination::Interrupted(_)),
            report.duration.as_millis() as u64,
            report.warnings().count(),
        )
        .to_value(),
    );

    match &report.termination {
        Termination::Completed => {
            ctx.shell.print_block(format_summary(&report, ctx.config));
            ctx.shell.status(
                Status::Finished,
                format!("vosk-api in {}", format_duration(report.duration)),
            );
        }
        Termination::Failed(e) => tracing::debug!("pipeline stopped: {}", e),
        Termination::Interrupted(_) => tracing::debug!("pipeline interrupted"),
    }

    report
}

struct Stages<'c, 'a> {
    ctx: &'c BuildContext<'a>,
    interrupted: &'c dyn Fn() -> bool,
    outcomes: Vec<StageOutcome>,
}

impl Stages<'_, '_> {
    fn run(&mut self, host: &Environment, locator: &ToolchainLocator) -> BuildResult<()> {
        let ctx = self.ctx;

        self.step(Stage::Dependencies, || verify_dependencies(ctx))?;

        let mut exported = Environment::new();
        self.step(Stage::Toolchain, || {
            if ctx.config.bindings_only {
                return Ok(StageOutcome::skipped(Stage::Toolchain, "--bindings-only"));
            }
            let (outcome, vars) = locate_toolchain(ctx, host, locator)?;
            exported = vars;
            Ok(outcome)
        })?;

        let mut env = Environment::new();
        self.step(Stage::Environment, || {
            let synthesized = synthesize(ctx.config);
            for (key, value) in synthesized.iter().chain(exported.iter()) {
                tracing::debug!("{}={}", key.to_string_lossy(), value.to_string_lossy());
            }
            ensure_dir(&ctx.workspace.build_dir())?;
            env = host.clone().overlay(&synthesized).overlay(&exported);
            Ok(StageOutcome::ok(
                Stage::Environment,
                format!("{} build variables", synthesized.len() + exported.len()),
            ))
        })?;

        let backend = backend_for(ctx.config.backend);
        self.step(Stage::Native, || build_native(ctx, backend.as_ref(), &env))?;

        for binding in Binding::ALL {
            self.step(Stage::Binding(binding), || build_binding(ctx, binding, &env))?;
        }

        self.step(Stage::Tests, || run_tests(ctx, &env))?;
        self.step(Stage::Install, || install(ctx, backend.as_ref(), &env))?;
        Ok(())
    }

    /// Run one stage and record its outcome. Fatal results are recorded too.
    fn step(
        &mut self,
        stage: Stage,
        f: impl FnOnce() -> BuildResult<StageOutcome>,
    ) -> BuildResult<()> {
        if (self.interrupted)() {
            let err = BuildError::Interrupted {
                command: stage.to_string(),
            };
            self.record(StageOutcome::fatal(stage, "interrupted"));
            return Err(err);
        }

        tracing::info!("stage: {}", stage);
        match f() {
            Ok(outcome) => {
                if outcome.status == StageStatus::Skipped {
                    self.ctx
                        .shell
                        .status(Status::Skipped, format!("{} ({})", stage, outcome.message));
                }
                self.record(outcome);
                Ok(())
            }
            Err(e) => {
                self.record(StageOutcome::fatal(stage, e.to_string()));
                Err(e)
            }
        }
    }

    fn record(&mut self, outcome: StageOutcome) {
        self.ctx.shell.json_event(&BuildEvent::from(&outcome).to_value());
        self.outcomes.push(outcome);
    }
}

/// The closing summary, derived only from the outcomes and the configuration.
pub fn format_summary(report: &PipelineReport, config: &BuildConfiguration) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let warnings: Vec<_> = report.warnings().collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    if warnings.is_empty() {
        let _ = writeln!(out, "VOSK-API BUILD COMPLETED SUCCESSFULLY");
    } else {
        let _ = writeln!(out, "VOSK-API BUILD COMPLETED WITH WARNINGS");
    }
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "\nBuild Configuration:");
    let _ = writeln!(out, "  Configuration: {}", config.profile);
    let _ = writeln!(out, "  Math Library:  {}", config.math_library);
    let _ = writeln!(
        out,
        "  CUDA Support:  {}",
        if config.cuda { "Yes" } else { "No" }
    );
    let _ = writeln!(out, "  Build System:  {}", config.backend);

    let _ = writeln!(out, "\nLanguage Bindings:");
    for binding in Binding::ALL {
        let result = match report.outcome(Stage::Binding(binding)) {
            Some(o) if o.status == StageStatus::Skipped => "No".to_string(),
            Some(o) => format!("{} ({})", o.status, o.message),
            None => "No".to_string(),
        };
        let _ = writeln!(out, "  {:<7} {}", format!("{}:", binding), result);
    }

    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for w in &warnings {
            let _ = writeln!(out, "  - {}: {}", w.stage, w.message);
        }
    }

    let python_built = report
        .outcome(Stage::Binding(Binding::Python))
        .is_some_and(|o| o.status == StageStatus::Ok);
    if python_built {
        let _ = writeln!(out, "\nPython Usage:");
        let _ = writeln!(out, "  import vosk");
        let _ = writeln!(out, "  model = vosk.Model('path/to/model')");
        let _ = writeln!(out, "  rec = vosk.KaldiRecognizer(model, 16000)");
    }

    let _ = writeln!(out, "\nNext Steps:");
    let _ = writeln!(
        out,
        "  1. Download a language model from https://alphacephei.com/vosk/models"
    );
    let _ = writeln!(
        out,
        "  2. Try the examples in the respective language directories"
    );
    let _ = write!(
        out,
        "  3. Read the documentation at https://alphacephei.com/vosk"
    );

    out
}
