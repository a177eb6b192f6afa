//! Scenario data model
//!
//! Scenarios are declarative: an ordered list of steps, each a request
//! template plus expectations and extractions. Templates reference values
//! extracted by earlier steps with `{name}` placeholders; expected literals
//! (state names, exact gateway error bodies) live here as data so updating a
//! reference text is a data change, not a logic change.

use serde_json::Value;

use super::context::RunContext;
use crate::common::{Error, Result};
use crate::document::{lookup, Document};

/// One scripted end-to-end walkthrough of the checkout API
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    /// Fixture file (relative to the fixtures directory) that must exist
    /// before any HTTP call is made; its absence makes the scenario pending.
    pub fixture: Option<String>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            fixture: None,
            steps,
        }
    }

    pub fn requires_fixture(mut self, fixture: impl Into<String>) -> Self {
        self.fixture = Some(fixture.into());
        self
    }
}

/// HTTP method of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// One HTTP interaction within a scenario
#[derive(Debug, Clone)]
pub struct Step {
    pub label: String,
    pub method: Method,
    /// Path template; `{name}` placeholders resolve against the run context
    pub path: String,
    /// Optional JSON body template; placeholders resolve in string values
    /// and in object keys
    pub body: Option<Value>,
    pub expect: Vec<Expectation>,
    pub extract: Vec<Extraction>,
}

impl Step {
    pub fn get(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(label, Method::Get, path)
    }

    pub fn post(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(label, Method::Post, path)
    }

    pub fn put(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(label, Method::Put, path)
    }

    fn new(label: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method,
            path: path.into(),
            body: None,
            expect: Vec::new(),
            extract: Vec::new(),
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expect.push(expectation);
        self
    }

    pub fn extract(mut self, extraction: Extraction) -> Self {
        self.extract.push(extraction);
        self
    }
}

/// A single pass/fail check against a step's response
#[derive(Debug, Clone)]
pub struct Expectation {
    pub check: Check,
    /// Verdict message on success
    pub pass: String,
    /// Verdict message prefix on failure; the mismatch detail is appended
    pub fail: String,
}

impl Expectation {
    pub fn new(check: Check, pass: impl Into<String>, fail: impl Into<String>) -> Self {
        Self {
            check,
            pass: pass.into(),
            fail: fail.into(),
        }
    }
}

/// Predicate over a decoded response and its status code
#[derive(Debug, Clone)]
pub enum Check {
    /// Exact status code equality
    Status(u16),
    /// Field at a dotted path equals a literal
    FieldEquals { path: String, expected: Value },
    /// Field at a dotted path satisfies a numeric predicate
    FieldSatisfies { path: String, predicate: Predicate },
    /// Canonical rendering of the whole body equals a reference string.
    /// Case- and whitespace-sensitive: these references encode exact
    /// upstream gateway error text and are regression-sensitive.
    BodyText { reference: String },
    /// Field at a dotted path must be absent
    FieldAbsent { path: String },
}

#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    GreaterThan(f64),
}

impl Check {
    /// Evaluate against a response. `Err` carries the mismatch detail with
    /// both expected and actual values embedded.
    pub fn evaluate(&self, status: u16, doc: &Document) -> std::result::Result<(), String> {
        match self {
            Check::Status(expected) => {
                if status == *expected {
                    Ok(())
                } else {
                    Err(format!("expected status {expected}, got {status}"))
                }
            }
            Check::FieldEquals { path, expected } => match doc.get(path) {
                Some(actual) if actual == expected => Ok(()),
                Some(actual) => Err(format!("expected '{path}' to be {expected}, got {actual}")),
                None => Err(format!("expected '{path}' to be {expected}, but it is absent")),
            },
            Check::FieldSatisfies { path, predicate } => {
                let actual = doc
                    .number_at(path)
                    .ok_or_else(|| format!("'{path}' is absent or not numeric"))?;
                match predicate {
                    Predicate::GreaterThan(bound) => {
                        if actual > *bound {
                            Ok(())
                        } else {
                            Err(format!("expected '{path}' > {bound}, got {actual}"))
                        }
                    }
                }
            }
            Check::BodyText { reference } => {
                let actual = doc.canonical_text();
                if actual == *reference {
                    Ok(())
                } else {
                    Err(format!("expected body {reference}, got {actual}"))
                }
            }
            Check::FieldAbsent { path } => match doc.get(path) {
                None => Ok(()),
                Some(actual) => {
                    Err(format!("expected '{path}' to be absent, got {actual}"))
                }
            },
        }
    }
}

/// Pulls a value out of a step's decoded response into the run context
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Context key the value is stored under
    pub key: String,
    pub select: Select,
    /// Failure message when the selection comes up empty
    pub missing: String,
}

impl Extraction {
    pub fn new(key: impl Into<String>, select: Select, missing: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            select,
            missing: missing.into(),
        }
    }
}

/// How to locate a value inside a decoded response
#[derive(Debug, Clone)]
pub enum Select {
    /// Dotted-path lookup; numeric segments index arrays, so `shipments.0.id`
    /// selects the first shipment's id
    Path(String),
    /// First element of the array at `path` whose `field` equals the given
    /// literal, then the `then` sub-path inside it (empty = whole element)
    Find {
        path: String,
        field: String,
        equals: Value,
        then: String,
    },
}

impl Select {
    pub fn apply(&self, doc: &Document) -> Option<Value> {
        match self {
            Select::Path(path) => doc.get(path).cloned(),
            Select::Find {
                path,
                field,
                equals,
                then,
            } => {
                let found = doc
                    .get(path)?
                    .as_array()?
                    .iter()
                    .find(|element| lookup(element, field) == Some(equals))?;
                if then.is_empty() {
                    Some(found.clone())
                } else {
                    lookup(found, then).cloned()
                }
            }
        }
    }
}

/// Resolve `{name}` placeholders in a path or string template.
///
/// A placeholder naming a value no earlier step has set is a missing
/// precondition; the scenario goes pending rather than issuing a request it
/// cannot meaningfully address.
pub fn resolve_text(template: &str, ctx: &RunContext) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            Error::Internal(format!("unterminated placeholder in template '{template}'"))
        })?;
        let name = &after[..close];
        let value = ctx.render(name).ok_or_else(|| {
            Error::Precondition(format!("'{name}' was never set by an earlier step"))
        })?;
        out.push_str(&value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Resolve a JSON body template against the run context.
///
/// String values that consist of exactly one placeholder substitute the raw
/// context value, so numeric ids stay numbers; other strings interpolate.
/// Object keys interpolate too (the gateway payload keys card data by
/// payment method id).
pub fn resolve_body(template: &Value, ctx: &RunContext) -> Result<Value> {
    match template {
        Value::String(s) => {
            if let Some(name) = single_placeholder(s) {
                return ctx
                    .get(name)
                    .cloned()
                    .ok_or_else(|| {
                        Error::Precondition(format!(
                            "'{name}' was never set by an earlier step"
                        ))
                    });
            }
            Ok(Value::String(resolve_text(s, ctx)?))
        }
        Value::Array(items) => {
            let resolved: Result<Vec<Value>> =
                items.iter().map(|item| resolve_body(item, ctx)).collect();
            Ok(Value::Array(resolved?))
        }
        Value::Object(map) => {
            let mut resolved = serde_json::Map::new();
            for (key, value) in map {
                resolved.insert(resolve_text(key, ctx)?, resolve_body(value, ctx)?);
            }
            Ok(Value::Object(resolved))
        }
        other => Ok(other.clone()),
    }
}

/// The placeholder name when the whole string is one `{name}`
fn single_placeholder(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('{') || inner.contains('}') {
        None
    } else {
        Some(inner)
    }
}
