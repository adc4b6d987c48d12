//! Host dependency checks.
//!
//! Every required tool is probed with `--version` and all failures are
//! collected before reporting, so one run names everything that is missing.
//! Python packages needed by the binding are different: a missing package
//! is installed with pip rather than reported.
//!
//! The same probes back the `doctor` subcommand, which only reports.

use std::fmt::Write;
use std::path::PathBuf;

use crate::builder::context::BuildContext;
use crate::core::{Binding, BuildError, BuildResult, MissingTool, Stage, StageOutcome};
use crate::util::process::{find_executable, CommandRunner, ProcessBuilder};
use crate::util::shell::Status;

/// A host tool the build relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolProbe {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Tools probed before anything is built.
pub const TOOL_PROBES: &[ToolProbe] = &[
    ToolProbe {
        name: "cmake",
        description: "CMake (required for building)",
        required: true,
    },
    ToolProbe {
        name: "make",
        description: "Make (required for building)",
        required: true,
    },
    ToolProbe {
        name: "g++",
        description: "G++ compiler (required for C++ compilation)",
        required: true,
    },
    ToolProbe {
        name: "python3",
        description: "Python 3 (required for Python bindings)",
        required: true,
    },
    ToolProbe {
        name: "git",
        description: "Git (required for downloading dependencies)",
        required: true,
    },
];

/// Packages the Python binding build imports.
pub const PYTHON_PACKAGES: &[&str] = &["cffi", "setuptools", "wheel"];

/// Result of a single tool probe.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub path: Option<PathBuf>,
    /// First line of `--version` output.
    pub version: Option<String>,
    pub required: bool,
}

/// All tool probes of one run.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Required tools that failed, in probe order.
    pub fn missing_tools(&self) -> Vec<MissingTool> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .map(|c| MissingTool {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect()
    }
}

/// Name of the Python probe; it runs the configured interpreter instead.
const PYTHON_PROBE: &str = "python3";

/// Probe every tool in `probes`. Only an interrupt stops early.
///
/// `python` is the interpreter the build will use; it stands in for the
/// `python3` probe and is what the report names.
pub fn check_tools(
    runner: &dyn CommandRunner,
    probes: &[ToolProbe],
    python: &str,
) -> BuildResult<DoctorReport> {
    let mut report = DoctorReport::default();

    for probe in probes {
        let program = if probe.name == PYTHON_PROBE {
            python
        } else {
            probe.name
        };
        let cmd = ProcessBuilder::new(program).arg("--version");
        let (passed, version) = match cmd.exec_with(runner) {
            Ok(output) if output.success() => {
                let version = output
                    .stdout
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(str::to_string);
                (true, version)
            }
            Ok(_) => (false, None),
            Err(e) if e.is_interrupted() => return Err(e),
            Err(e) => {
                tracing::debug!("{} probe failed: {}", program, e);
                (false, None)
            }
        };

        report.checks.push(CheckResult {
            name: program.to_string(),
            description: probe.description.to_string(),
            passed,
            path: if passed { find_executable(program) } else { None },
            version,
            required: probe.required,
        });
    }

    Ok(report)
}

/// The dependency stage: fail on any missing tool, install missing packages.
pub fn verify_dependencies(ctx: &BuildContext<'_>) -> BuildResult<StageOutcome> {
    ctx.shell.status(Status::Checking, "dependencies");

    let report = check_tools(ctx.runner(), TOOL_PROBES, ctx.python())?;
    for check in report.checks.iter().filter(|c| c.passed) {
        ctx.shell.status(Status::Found, &check.name);
    }

    let missing = report.missing_tools();
    if !missing.is_empty() {
        return Err(BuildError::ToolMissing { missing });
    }

    let mut installed = Vec::new();
    if ctx.config.wants(Binding::Python) {
        installed = ensure_python_packages(ctx)?;
    }

    let message = if installed.is_empty() {
        "all dependencies are available".to_string()
    } else {
        format!(
            "all dependencies are available (installed {})",
            installed.join(", ")
        )
    };
    Ok(StageOutcome::ok(Stage::Dependencies, message))
}

/// Import each package; pip-install the ones that fail. Returns what was installed.
fn ensure_python_packages(ctx: &BuildContext<'_>) -> BuildResult<Vec<String>> {
    let mut installed = Vec::new();

    for package in PYTHON_PACKAGES {
        let import = format!("import {}", package);
        if ctx.probe(ctx.python(), &["-c", &import])? {
            ctx.shell
                .status(Status::Found, format!("Python package {}", package));
            continue;
        }

        ctx.shell
            .status(Status::Installing, format!("Python package {}", package));
        let pip = ProcessBuilder::new(ctx.python()).args(["-m", "pip", "install", package]);
        match ctx.exec(&pip) {
            Ok(_) => installed.push(package.to_string()),
            Err(e) if e.is_interrupted() => return Err(e),
            Err(e) => {
                return Err(BuildError::RemediationFailed {
                    package: package.to_string(),
                    detail: e.to_string(),
                })
            }
        }
    }

    Ok(installed)
}

/// Format a report for the `doctor` subcommand.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "vosk-build doctor");
    let _ = writeln!(output, "=================\n");

    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };
        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose {
            let _ = writeln!(output, "      {}", check.description);
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
        }
    }

    let _ = writeln!(output);
    let missing = report.missing_tools();
    if missing.is_empty() {
        let _ = writeln!(output, "All {} checks passed.", report.passed_count());
    } else {
        let _ = writeln!(output, "Missing required dependencies:");
        for tool in &missing {
            let _ = writeln!(output, "  - {}", tool);
        }
    }

    output
}
