//! Response decoder
//!
//! Wraps a decoded JSON body and exposes the lookups scenarios assert
//! against: dotted-path field access (numeric segments index into arrays),
//! literal equality, numeric coercion, and a canonical text rendering used by
//! exact-match expectations. Key order is preserved from the wire, so
//! decoding the same raw body twice always yields the same canonical text.

use serde_json::Value;

use crate::common::{Error, Result};

/// A decoded response body
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Decode a raw body.
    ///
    /// A body that is not well-formed JSON is surfaced as a decode error
    /// carrying the raw payload; the executor turns it into a failed verdict.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let root: Value =
            serde_json::from_slice(raw).map_err(|e| Error::decode(e.to_string(), raw))?;
        Ok(Self { root })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a value by dotted path, e.g. `shipments.0.id`.
    ///
    /// Numeric segments index arrays; anything else keys objects. Returns
    /// `None` when any segment is absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.root, path)
    }

    /// String form of the value at `path`, if present and a string
    pub fn string_at(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Numeric form of the value at `path`.
    ///
    /// The target API serializes money totals as strings (`"1.23"`), so
    /// numeric strings coerce too.
    pub fn number_at(&self, path: &str) -> Option<f64> {
        match self.get(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the value at `path` equals the given literal exactly
    pub fn equals_literal(&self, path: &str, literal: &Value) -> bool {
        self.get(path) == Some(literal)
    }

    /// Compact rendering of the whole document with wire key order preserved.
    ///
    /// Exact-match expectations compare this against reference literals, so
    /// the rendering must be deterministic for a given raw body.
    pub fn canonical_text(&self) -> String {
        self.root.to_string()
    }
}

/// Walk a dotted path through a JSON value
pub fn lookup<'a>(mut value: &'a Value, path: &str) -> Option<&'a Value> {
    for segment in path.split('.') {
        value = match segment.parse::<usize>() {
            Ok(index) => value.as_array()?.get(index)?,
            Err(_) => value.as_object()?.get(segment)?,
        };
    }
    Some(value)
}
