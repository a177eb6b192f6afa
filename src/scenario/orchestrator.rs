//! Checkout scenario orchestrator
//!
//! Runs one scenario end to end, owning its run context for the duration.
//! Abort policy: a missing fixture or unresolved prior-step value records a
//! pending verdict and stops the scenario; transport, decode, extraction and
//! invariant errors record a failed verdict and stop the scenario; assertion
//! mismatches are already recorded by the executor and never stop anything.
//! Other scenarios in the run are unaffected either way.

use std::path::Path;

use serde::Deserialize;

use crate::common::Error;
use crate::report::ScenarioReporter;
use crate::runner::CancelToken;
use crate::transport::Transport;

use super::context::RunContext;
use super::executor::execute_step;
use super::model::Scenario;

/// Payment-gateway sandbox settings, loaded from a YAML fixture file.
///
/// Presence and well-formedness gate the scenario; the harness itself only
/// needs the server side to be configured, so the values are not forwarded.
#[derive(Debug, Deserialize)]
pub struct GatewayFixture {
    pub environment: Option<String>,
    pub merchant_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
}

/// Run a scenario to completion or abort
pub async fn run_scenario(
    scenario: &Scenario,
    transport: &dyn Transport,
    reporter: &ScenarioReporter,
    fixtures_dir: &Path,
    cancel: &CancelToken,
) {
    tracing::info!(scenario = %scenario.name, "starting scenario");

    // Fixture gate, before any HTTP call.
    if let Some(fixture) = &scenario.fixture {
        let path = fixtures_dir.join(fixture);
        if !path.exists() {
            reporter.pending(format!("{fixture} does not exist. Cannot proceed."));
            return;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                if let Err(e) = serde_yaml::from_str::<GatewayFixture>(&content) {
                    reporter.pending(format!("{fixture} could not be parsed ({e}). Cannot proceed."));
                    return;
                }
            }
            Err(e) => {
                reporter.pending(format!("{fixture} could not be read ({e}). Cannot proceed."));
                return;
            }
        }
    }

    let mut ctx = RunContext::new();

    for step in &scenario.steps {
        if cancel.is_cancelled() {
            tracing::warn!(scenario = %scenario.name, step = %step.label, "run cancelled, skipping remaining steps");
            return;
        }

        match execute_step(transport, step, &mut ctx, reporter).await {
            Ok(_) => {}
            Err(Error::Precondition(message)) => {
                reporter.pending(format!("{}: {message}", step.label));
                return;
            }
            Err(err) => {
                reporter.failed(format!("{}: {err}", step.label));
                return;
            }
        }
    }

    tracing::info!(scenario = %scenario.name, "scenario complete");
}
