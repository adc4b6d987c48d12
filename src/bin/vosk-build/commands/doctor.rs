//! `vosk-build doctor` command

use anyhow::Result;

use vosk_build::ops::{check_tools, format_report, TOOL_PROBES};
use vosk_build::util::SystemRunner;

pub fn execute(verbose: bool, python: &str) -> Result<i32> {
    let report = check_tools(&SystemRunner, TOOL_PROBES, python)?;

    print!("{}", format_report(&report, verbose));

    // Exit with error code if required checks failed
    Ok(if report.all_required_passed() { 0 } else { 1 })
}
