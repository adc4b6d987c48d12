//! vosk-build CLI - Automated build for vosk-api

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use vosk_build::util::Shell;

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    // Set up logging; RUST_LOG takes precedence
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vosk_build=debug")
        } else {
            EnvFilter::new("vosk_build=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    match cli.command {
        Some(Commands::Doctor) => {
            commands::doctor::execute(cli.verbose, &cli.build.python_interpreter)
        }
        Some(Commands::Completions(args)) => commands::completions::execute(args),
        None => commands::build::execute(cli.build, &shell, cli.verbose),
    }
}
