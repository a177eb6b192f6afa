//! Concurrent scenario runner
//!
//! Scenarios operate on independent remote orders and share no run context,
//! so they may run concurrently up to a worker limit. Steps inside one
//! scenario stay strictly sequential. Cancelling a run stops new HTTP calls
//! from being issued; in-flight calls drain and the aggregated report still
//! covers everything recorded up to that point.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;

use crate::report::{Reporter, RunReport, ScenarioReporter};
use crate::scenario::orchestrator::run_scenario;
use crate::scenario::model::Scenario;
use crate::transport::Transport;

/// Shared cancellation flag checked before each step issues a request
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for one run
pub struct RunOptions {
    /// Maximum number of scenarios executing concurrently
    pub workers: usize,
    /// Directory holding fixture files scenarios may require
    pub fixtures_dir: PathBuf,
}

/// Run every scenario and aggregate the verdicts
pub async fn run_scenarios(
    scenarios: &[Scenario],
    transport: Arc<dyn Transport>,
    options: &RunOptions,
    cancel: CancelToken,
) -> RunReport {
    let reporter = Arc::new(Reporter::new());
    let workers = options.workers.max(1);

    futures_util::stream::iter(scenarios)
        .for_each_concurrent(workers, |scenario| {
            let transport = Arc::clone(&transport);
            let reporter = Arc::clone(&reporter);
            let cancel = cancel.clone();
            let fixtures_dir = options.fixtures_dir.clone();
            async move {
                if cancel.is_cancelled() {
                    tracing::warn!(scenario = %scenario.name, "run cancelled, scenario skipped");
                    return;
                }
                let handle = ScenarioReporter::new(reporter, &scenario.name);
                run_scenario(scenario, transport.as_ref(), &handle, &fixtures_dir, &cancel).await;
            }
        })
        .await;

    reporter.report()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_flips_once() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
        let clone = token.clone();
        assert!(clone.is_cancelled());
    }
}
