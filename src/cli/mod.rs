//! CLI command handling
//!
//! Dispatches CLI commands: resolves configuration, constructs the transport,
//! runs the selected scenarios and renders the report. The process exit code
//! reflects whether any failed verdict was recorded.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::commands::Commands;
use crate::common::{logging, Config, Error, Result};
use crate::runner::{self, CancelToken, RunOptions};
use crate::scenario::catalog;
use crate::scenario::model::Scenario;
use crate::transport::HttpTransport;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Run {
            scenarios,
            base_url,
            workers,
            config,
            fixtures_dir,
            json,
            verbose,
        } => {
            logging::init_cli(verbose);

            let config = Config::load(config.as_deref())?;
            let selected = select_scenarios(catalog::builtin(), &scenarios)?;

            let base_url = base_url.unwrap_or(config.base_url);
            let transport = HttpTransport::new(
                &base_url,
                config.token.as_deref(),
                Duration::from_secs(config.timeouts.request_secs),
            )?;

            let options = RunOptions {
                workers: workers.unwrap_or(config.run.workers),
                fixtures_dir: fixtures_dir.unwrap_or(config.fixtures_dir),
            };

            let cancel = CancelToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, draining in-flight requests");
                    ctrl_c.cancel();
                }
            });

            tracing::info!(%base_url, scenarios = selected.len(), "starting run");
            let report =
                runner::run_scenarios(&selected, Arc::new(transport), &options, cancel).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }

            if report.has_failures() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Commands::List => {
            for scenario in catalog::builtin() {
                let fixture = match &scenario.fixture {
                    Some(fixture) => format!(" (requires {fixture})"),
                    None => String::new(),
                };
                println!(
                    "{:<24} {} steps{}",
                    scenario.name,
                    scenario.steps.len(),
                    fixture
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Filter the catalog by requested names; no names means everything
fn select_scenarios(catalog: Vec<Scenario>, names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(catalog);
    }
    let mut selected = Vec::new();
    for name in names {
        let scenario = catalog
            .iter()
            .find(|s| &s.name == name)
            .ok_or_else(|| Error::UnknownScenario(name.clone()))?;
        selected.push(scenario.clone());
    }
    Ok(selected)
}
