//! # validate_data entry point
//!
//! Parses command-line arguments, initialises tracing on stderr, and runs
//! the validation. Stdout carries only the report.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vdata_cli::annotate::Annotation;
use vdata_cli::config::RunConfig;
use vdata_cli::validate::{run_validate, ValidateArgs};

/// Validates that JSON data files conform to a JSON Schema.
#[derive(Parser, Debug)]
#[command(name = "validate_data", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the -v count when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let config = RunConfig::from_env(cli.validate.annotations);
    tracing::debug!(annotations = config.annotations, "resolved run configuration");

    match run_validate(&cli.validate, &config, io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            if config.annotations {
                println!("{}", Annotation::for_fatal(format!("{e:#}")));
            }
            ExitCode::from(1)
        }
    }
}
