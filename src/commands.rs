//! CLI command definitions
//!
//! Defines the clap commands for the checkout harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run conformance scenarios against a target store
    Run {
        /// Scenario name(s) to run; defaults to every built-in scenario.
        /// Can be specified multiple times: --scenario full-checkout --scenario tax-calculation
        #[arg(long = "scenario", short = 's')]
        scenarios: Vec<String>,

        /// Base URL of the target API (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,

        /// Maximum number of scenarios running concurrently (overrides the config file)
        #[arg(long)]
        workers: Option<usize>,

        /// Path to the harness configuration file (default: harness.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding fixture files (overrides the config file)
        #[arg(long)]
        fixtures_dir: Option<PathBuf>,

        /// Output the report as JSON instead of colored text
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the built-in scenarios
    List,
}
