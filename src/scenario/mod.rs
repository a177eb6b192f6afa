//! Scenario definition and execution
//!
//! A scenario is an ordered list of steps with inter-step data dependencies
//! carried through a run context. The executor performs single steps; the
//! orchestrator sequences them and applies the abort policy; the catalog
//! holds the built-in declarative scenario tables.

pub mod catalog;
pub mod context;
pub mod executor;
pub mod model;
pub mod orchestrator;

pub use context::RunContext;
pub use model::{Check, Expectation, Extraction, Scenario, Select, Step};
pub use orchestrator::run_scenario;
