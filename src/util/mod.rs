//! Shared utilities

pub mod fs;
pub mod interrupt;
pub mod process;
pub mod shell;

pub use process::{CommandRunner, ProcessBuilder, ProcessOutput, SystemRunner};
pub use shell::Shell;
