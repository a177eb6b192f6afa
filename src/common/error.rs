//! Error types for the checkout harness
//!
//! Each variant maps onto one verdict policy: transport, decode and
//! empty-collection errors fail and abort the current scenario, a missing
//! precondition goes pending and aborts the current scenario, and
//! configuration errors are fatal for the whole run before any scenario
//! starts. Assertion mismatches are not errors at all; they are reported as
//! failed verdicts and execution continues.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the checkout harness
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to construct transport client: {0}")]
    TransportSetup(String),

    // === Decode Errors ===
    #[error("Malformed response body ({detail}). Raw body: {raw}")]
    Decode { detail: String, raw: String },

    // === Scenario Errors ===
    #[error("Missing precondition: {0}")]
    Precondition(String),

    #[error("{0}")]
    EmptyCollection(String),

    #[error("Unknown scenario '{0}'. Use 'checkout-harness list' to see available scenarios")]
    UnknownScenario(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a decode error, embedding a readable form of the raw body.
    ///
    /// Malformed bodies are a signal the scenario must surface, so the
    /// offending payload travels with the error (truncated to keep verdict
    /// messages printable).
    pub fn decode(detail: impl Into<String>, raw_body: &[u8]) -> Self {
        const MAX_RAW: usize = 512;
        let mut raw = String::from_utf8_lossy(raw_body).into_owned();
        if raw.len() > MAX_RAW {
            let mut end = MAX_RAW;
            while !raw.is_char_boundary(end) {
                end -= 1;
            }
            raw.truncate(end);
            raw.push_str("...");
        }
        Self::Decode {
            detail: detail.into(),
            raw,
        }
    }
}
