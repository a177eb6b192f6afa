//! Checkout conformance harness CLI
//!
//! Runs scripted checkout walkthroughs against a target store API and
//! reports per-assertion verdicts.

use std::process::ExitCode;

use clap::Parser;
use harness::{cli, commands::Commands};

#[derive(Parser)]
#[command(name = "checkout-harness", about = "Conformance harness for a checkout API")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::dispatch(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
