use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use pdfpipe::cli::CliArgs;
use pdfpipe::{Config, Converter};

/// Set up logging and tracing on stderr; RUST_LOG wins over the CLI level
fn setup_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn run(args: &CliArgs) -> Result<()> {
    let config = Config::from_args(args)?;
    let mut converter = Converter::for_config(&config);

    let stdin = io::stdin();
    let report = converter.run(
        &config,
        stdin.lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )?;

    debug!(
        "Rendered {} units into {} bytes ({} inputs skipped)",
        report.units_rendered, report.bytes_written, report.files_skipped
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = setup_logging(args.log_filter()) {
        eprintln!("{}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Run failed: {:?}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
