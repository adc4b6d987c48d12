//! Post-build smoke tests.
//!
//! Best effort: a failing check becomes a warning, a missing test directory
//! is skipped without comment. Only an interrupt stops the run.

use crate::builder::context::BuildContext;
use crate::core::{Binding, BuildResult, Environment, Stage, StageOutcome};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

const PYTHON_SMOKE_TEST: &str = "import vosk; print('Python bindings work!')";

/// Run whichever smoke checks apply.
pub fn run_tests(ctx: &BuildContext<'_>, env: &Environment) -> BuildResult<StageOutcome> {
    if !ctx.config.test {
        return Ok(StageOutcome::skipped(Stage::Tests, "not requested"));
    }

    let mut checks: Vec<(&str, ProcessBuilder)> = Vec::new();

    let c_dir = ctx.workspace.c_dir();
    if c_dir.is_dir() {
        checks.push((
            "C",
            ProcessBuilder::new("make").cwd(&c_dir).environment(env),
        ));
    }

    if ctx.config.wants(Binding::Python) && ctx.workspace.python_test_dir().is_dir() {
        checks.push((
            "Python",
            ProcessBuilder::new(ctx.python())
                .args(["-c", PYTHON_SMOKE_TEST])
                .cwd(ctx.workspace.root())
                .environment(env),
        ));
    }

    if checks.is_empty() {
        return Ok(StageOutcome::ok(Stage::Tests, "no test suites found"));
    }

    let mut passed = Vec::new();
    let mut failed = Vec::new();
    for (name, cmd) in checks {
        ctx.shell.status(Status::Testing, format!("{} smoke test", name));
        match ctx.exec(&cmd) {
            Ok(_) => {
                ctx.shell
                    .status(Status::Finished, format!("{} tests completed", name));
                passed.push(name);
            }
            Err(e) if e.is_interrupted() => return Err(e),
            Err(e) => {
                tracing::debug!("{} smoke test failed: {}", name, e);
                ctx.shell.warn(format!("{} tests failed", name));
                failed.push(name);
            }
        }
    }

    if failed.is_empty() {
        Ok(StageOutcome::ok(
            Stage::Tests,
            format!("{} passed", passed.join(", ")),
        ))
    } else {
        Ok(StageOutcome::warned(
            Stage::Tests,
            format!("{} failed", failed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuildConfiguration, StageStatus};
    use crate::test_support::{FakeRepo, MockResponse, MockRunner};
    use crate::util::Shell;

    fn testing() -> BuildConfiguration {
        BuildConfiguration {
            test: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_not_requested() {
        let repo = FakeRepo::new();
        repo.mkdir("c");
        let config = BuildConfiguration::default();
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        let outcome = run_tests(&ctx, &Environment::new()).unwrap();
        assert_eq!(outcome.status, StageStatus::Skipped);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_missing_directories_are_silently_skipped() {
        let repo = FakeRepo::new();
        let config = testing();
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        let outcome = run_tests(&ctx, &Environment::new()).unwrap();
        assert_eq!(outcome.status, StageStatus::Ok);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_both_suites_run() {
        let repo = FakeRepo::new();
        repo.mkdir("c");
        repo.mkdir("python/test");
        let config = testing();
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        let outcome = run_tests(&ctx, &Environment::new()).unwrap();
        assert_eq!(outcome.status, StageStatus::Ok);
        assert_eq!(outcome.message, "C, Python passed");
        assert!(runner.ran("python3 -c import vosk"));
    }

    #[test]
    fn test_failure_is_downgraded_to_warning() {
        let repo = FakeRepo::new();
        repo.mkdir("c");
        repo.mkdir("python/test");
        let config = testing();
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        runner.expect("make", MockResponse::failure(2, "no rule"));
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        let outcome = run_tests(&ctx, &Environment::new()).unwrap();
        assert_eq!(outcome.status, StageStatus::Warned);
        assert_eq!(outcome.message, "C failed");
        // The Python check still ran after the C failure.
        assert!(runner.ran("python3 -c"));
    }

    #[test]
    fn test_python_smoke_test_needs_python_binding() {
        let repo = FakeRepo::new();
        repo.mkdir("python/test");
        let config = BuildConfiguration {
            bindings: Default::default(),
            ..testing()
        };
        let shell = Shell::quiet();
        let runner = MockRunner::all_succeed();
        let ctx = BuildContext::new(&config, &repo.workspace, &shell, &runner);

        run_tests(&ctx, &Environment::new()).unwrap();
        assert!(runner.calls().is_empty());
    }
}
