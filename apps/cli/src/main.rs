mod args;
mod config;

use std::process::ExitCode;

use clap::Parser;
use metrics_app::{AppError, Converter, RunSummary};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "conversion failed");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &CliArgs) -> Result<RunSummary, AppError> {
    let config = config::resolve(args)?;
    Converter::new(config)?.run()
}

/// Logs go to stderr so stdout only carries the list of written files.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn print_summary(summary: &RunSummary) {
    for file in &summary.files {
        match file.rows {
            Some(rows) => println!("{} ({} rows)", file.path.display(), rows),
            None => println!("{}", file.path.display()),
        }
    }
}
