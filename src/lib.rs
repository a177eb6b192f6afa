//! Checkout conformance harness
//!
//! Drives a multi-step checkout workflow exposed by a remote e-commerce API
//! and verifies, step by step, that the server's observable state
//! transitions and error responses match expected reference behavior. The
//! harness never owns the checkout state machine; it observes it through
//! decoded responses.

pub mod cli;
pub mod commands;
pub mod common;
pub mod document;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod transport;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use document::Document;
pub use report::{Outcome, Reporter, RunReport, Verdict};
