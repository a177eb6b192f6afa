//! Verdict reporting
//!
//! A run shares one append-only [`Reporter`]; each scenario gets a handle
//! that stamps its name on every verdict, so concurrent scenarios never lose
//! attribution. No verdict is ever discarded. A failed assertion does not
//! stop later steps of the same scenario (server state may have advanced
//! regardless); a pending verdict is terminal for its scenario only.

use std::sync::{Arc, Mutex};

use colored::Colorize;
use serde::Serialize;

/// Outcome of one expectation or precondition check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
    Pending,
}

/// One recorded outcome with its message
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub scenario: String,
    pub outcome: Outcome,
    pub message: String,
}

/// Append-only verdict log for one run
#[derive(Default)]
pub struct Reporter {
    verdicts: Mutex<Vec<Verdict>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, verdict: Verdict) {
        self.verdicts
            .lock()
            .expect("reporter lock poisoned")
            .push(verdict);
    }

    /// Snapshot the run so far into an aggregated report
    pub fn report(&self) -> RunReport {
        let verdicts = self
            .verdicts
            .lock()
            .expect("reporter lock poisoned")
            .clone();
        RunReport::new(verdicts)
    }
}

/// Per-scenario reporting handle
pub struct ScenarioReporter {
    reporter: Arc<Reporter>,
    scenario: String,
}

impl ScenarioReporter {
    /// Handle for one scenario run, stamping its name on every verdict
    pub fn new(reporter: Arc<Reporter>, scenario: &str) -> Self {
        Self {
            reporter,
            scenario: scenario.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.scenario
    }

    pub fn succeeded(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(scenario = %self.scenario, %message, "succeeded");
        self.reporter.record(Verdict {
            scenario: self.scenario.clone(),
            outcome: Outcome::Succeeded,
            message,
        });
    }

    pub fn failed(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(scenario = %self.scenario, %message, "failed");
        self.reporter.record(Verdict {
            scenario: self.scenario.clone(),
            outcome: Outcome::Failed,
            message,
        });
    }

    pub fn pending(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(scenario = %self.scenario, %message, "pending");
        self.reporter.record(Verdict {
            scenario: self.scenario.clone(),
            outcome: Outcome::Pending,
            message,
        });
    }
}

/// Aggregated result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub verdicts: Vec<Verdict>,
    pub succeeded: usize,
    pub failed: usize,
    pub pending: usize,
}

impl RunReport {
    fn new(verdicts: Vec<Verdict>) -> Self {
        let mut succeeded = 0;
        let mut failed = 0;
        let mut pending = 0;
        for verdict in &verdicts {
            match verdict.outcome {
                Outcome::Succeeded => succeeded += 1,
                Outcome::Failed => failed += 1,
                Outcome::Pending => pending += 1,
            }
        }
        Self {
            verdicts,
            succeeded,
            failed,
            pending,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Verdicts recorded for one scenario, in append order
    pub fn for_scenario(&self, name: &str) -> Vec<&Verdict> {
        self.verdicts
            .iter()
            .filter(|v| v.scenario == name)
            .collect()
    }

    /// Print the report, grouped by scenario, with a summary line
    pub fn print(&self) {
        let mut current: Option<&str> = None;
        for verdict in &self.verdicts {
            if current != Some(verdict.scenario.as_str()) {
                println!("\n{}", verdict.scenario.white().bold());
                current = Some(verdict.scenario.as_str());
            }
            match verdict.outcome {
                Outcome::Succeeded => {
                    println!("  {} {}", "✓".green(), verdict.message);
                }
                Outcome::Failed => {
                    println!("  {} {}", "✗".red(), verdict.message);
                }
                Outcome::Pending => {
                    println!("  {} {}", "○".yellow(), verdict.message.dimmed());
                }
            }
        }

        let summary = format!(
            "{} succeeded, {} failed, {} pending",
            self.succeeded, self.failed, self.pending
        );
        if self.has_failures() {
            println!("\n{} {}\n", "✗".red().bold(), summary.red().bold());
        } else {
            println!("\n{} {}\n", "✓".green().bold(), summary.green().bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_outcome() {
        let reporter = Arc::new(Reporter::new());
        let scenario = ScenarioReporter::new(Arc::clone(&reporter), "walkthrough");
        scenario.succeeded("Created new checkout.");
        scenario.succeeded("Added a line item.");
        scenario.failed("Could not transition order to address state.");

        let report = reporter.report();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.pending, 0);
        assert!(report.has_failures());
    }

    #[test]
    fn verdicts_keep_scenario_attribution() {
        let reporter = Arc::new(Reporter::new());
        let a = ScenarioReporter::new(Arc::clone(&reporter), "a");
        let b = ScenarioReporter::new(Arc::clone(&reporter), "b");
        a.succeeded("one");
        b.failed("two");
        a.pending("three");

        let report = reporter.report();
        assert_eq!(report.for_scenario("a").len(), 2);
        assert_eq!(report.for_scenario("b").len(), 1);
        assert_eq!(report.for_scenario("b")[0].outcome, Outcome::Failed);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let reporter = Arc::new(Reporter::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let scenario = ScenarioReporter::new(Arc::clone(&reporter), &format!("scenario-{i}"));
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    scenario.succeeded("ok");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(reporter.report().succeeded, 800);
    }
}
