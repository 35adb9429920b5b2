//! # regbook CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use regbook_cli::generate::{run_generate, GenerateArgs};

/// Compliance register generator.
///
/// Converts the `Requirements` and `Evidences` sheets of a register
/// workbook into per-record JSON files, custom indexes, and a discovery
/// manifest, validating every record against its JSON Schema.
#[derive(Parser, Debug)]
#[command(name = "regbook", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    generate: GenerateArgs,
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
fn log_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("regbook v{} starting", env!("CARGO_PKG_VERSION"));

    match run_generate(&cli.generate) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
