//! `lookupsync` binary.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use lookupsync_cli::{logging, run, Cli};

fn main() -> ExitCode {
    // A missing .env file is fine; the environment may be set by the caller.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.log_json);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    let outcome = runtime.block_on(run(&cli));
    logging::log_outcome(&outcome, started.elapsed());

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
