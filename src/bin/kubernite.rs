//! kubernite - patch a Deployment manifest with the current release tag.

use std::process::ExitCode;

use clap::Parser;
use kubernite::telemetry::init_tracing;
use kubernite::{run, Config};
use tracing::{error, Level};

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.log_json, Level::INFO);

    match run(&config) {
        Ok(outcome) => {
            if let Some(rendered) = outcome.rendered {
                print!("{}", rendered);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "deployment failed");
            ExitCode::FAILURE
        }
    }
}
