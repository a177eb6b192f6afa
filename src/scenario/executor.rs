//! Scenario step executor
//!
//! Performs one HTTP interaction: resolves the step's templates against the
//! run context, issues the request, decodes the response, evaluates every
//! expectation, and extracts values for later steps. Assertion mismatches
//! are reported and execution continues; template, transport, decode and
//! extraction failures propagate so the orchestrator can abort the scenario.

use crate::common::{Error, Result};
use crate::document::Document;
use crate::report::ScenarioReporter;
use crate::transport::Transport;

use super::context::RunContext;
use super::model::{resolve_body, resolve_text, Method, Step};

/// Execute one step, returning the decoded response document
pub async fn execute_step(
    transport: &dyn Transport,
    step: &Step,
    ctx: &mut RunContext,
    reporter: &ScenarioReporter,
) -> Result<Document> {
    let path = resolve_text(&step.path, ctx)?;
    let body = match &step.body {
        Some(template) => Some(resolve_body(template, ctx)?),
        None => None,
    };

    tracing::debug!(step = %step.label, %path, "executing step");

    let response = match step.method {
        Method::Get => transport.get(&path).await?,
        Method::Post => transport.post(&path, body.as_ref()).await?,
        Method::Put => transport.put(&path, body.as_ref()).await?,
    };

    let doc = Document::parse(&response.body)?;

    // One verdict per expectation, in declaration order; a mismatch never
    // stops the remaining expectations or the remaining steps.
    for expectation in &step.expect {
        match expectation.check.evaluate(response.status, &doc) {
            Ok(()) => reporter.succeeded(expectation.pass.as_str()),
            Err(detail) => reporter.failed(format!("{} ({detail})", expectation.fail)),
        }
    }

    for extraction in &step.extract {
        let value = extraction
            .select
            .apply(&doc)
            .ok_or_else(|| Error::EmptyCollection(extraction.missing.clone()))?;
        ctx.insert(&extraction.key, value)?;
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::report::{Outcome, Reporter};
    use crate::scenario::model::{Check, Expectation, Extraction, Select};
    use crate::transport::WireResponse;

    /// Transport that replays a scripted list of responses
    struct Scripted {
        responses: Mutex<Vec<(u16, Vec<u8>)>>,
        requests: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl Scripted {
        fn new(responses: Vec<(u16, &str)>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .rev()
                        .map(|(status, body)| (status, body.as_bytes().to_vec()))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn respond(
            &self,
            method: Method,
            path: &str,
            body: Option<&Value>,
        ) -> crate::common::Result<WireResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((method, path.to_string(), body.cloned()));
            let (status, body) = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::Transport("no scripted response left".into()))?;
            Ok(WireResponse { status, body })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn get(&self, path: &str) -> crate::common::Result<WireResponse> {
            self.respond(Method::Get, path, None)
        }
        async fn post(
            &self,
            path: &str,
            body: Option<&Value>,
        ) -> crate::common::Result<WireResponse> {
            self.respond(Method::Post, path, body)
        }
        async fn put(
            &self,
            path: &str,
            body: Option<&Value>,
        ) -> crate::common::Result<WireResponse> {
            self.respond(Method::Put, path, body)
        }
    }

    fn reporter() -> (Arc<Reporter>, ScenarioReporter) {
        let run = Arc::new(Reporter::new());
        let scenario = ScenarioReporter::new(Arc::clone(&run), "test");
        (run, scenario)
    }

    #[tokio::test]
    async fn step_yields_one_verdict_per_expectation() {
        let transport = Scripted::new(vec![(
            201,
            r#"{"number":"R1","email":"spree@example.com"}"#,
        )]);
        let (run, scenario) = reporter();
        let mut ctx = RunContext::new();

        let step = Step::post("create order", "/api/orders")
            .expect(Expectation::new(
                Check::Status(201),
                "Created new checkout.",
                "Failed to create a new blank checkout.",
            ))
            .expect(Expectation::new(
                Check::FieldEquals {
                    path: "email".into(),
                    expected: json!("nobody@example.com"),
                },
                "Email set automatically on order successfully.",
                "Email address was not automatically set on order.",
            ));

        execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap();

        let report = run.report();
        assert_eq!(report.verdicts.len(), 2);
        assert_eq!(report.verdicts[0].outcome, Outcome::Succeeded);
        assert_eq!(report.verdicts[1].outcome, Outcome::Failed);
        // The mismatch embeds both values.
        assert!(report.verdicts[1].message.contains("nobody@example.com"));
        assert!(report.verdicts[1].message.contains("spree@example.com"));
    }

    #[tokio::test]
    async fn failed_expectation_does_not_stop_extraction() {
        let transport = Scripted::new(vec![(500, r#"{"number":"R9"}"#)]);
        let (_, scenario) = reporter();
        let mut ctx = RunContext::new();

        let step = Step::post("create order", "/api/orders")
            .expect(Expectation::new(
                Check::Status(201),
                "Created new checkout.",
                "Failed to create a new blank checkout.",
            ))
            .extract(Extraction::new(
                "order_number",
                Select::Path("number".into()),
                "Order number missing from create response.",
            ));

        execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap();
        assert_eq!(ctx.get("order_number"), Some(&json!("R9")));
    }

    #[tokio::test]
    async fn step_without_expectations_produces_no_verdicts() {
        let transport = Scripted::new(vec![(200, r#"{"state":"address"}"#)]);
        let (run, scenario) = reporter();
        let mut ctx = RunContext::new();

        // Pure state-advancing call.
        let step = Step::put("advance checkout", "/api/checkouts/R1/next");
        execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap();
        assert!(run.report().verdicts.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_propagates_with_raw_payload() {
        let transport = Scripted::new(vec![(200, "<html>boom</html>")]);
        let (run, scenario) = reporter();
        let mut ctx = RunContext::new();

        let step = Step::get("fetch order", "/api/orders/R1");
        let err = execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("<html>boom</html>"));
        // The decode error produced no verdict here; the orchestrator owns
        // turning it into exactly one failed verdict.
        assert!(run.report().verdicts.is_empty());
    }

    #[tokio::test]
    async fn unresolved_path_placeholder_is_pending_before_any_call() {
        let transport = Scripted::new(vec![]);
        let (_, scenario) = reporter();
        let mut ctx = RunContext::new();

        let step = Step::put("advance checkout", "/api/checkouts/{order_number}/next");
        let err = execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_collection_extraction_fails_explicitly() {
        let transport = Scripted::new(vec![(200, r#"{"shipments":[]}"#)]);
        let (_, scenario) = reporter();
        let mut ctx = RunContext::new();

        let step = Step::get("fetch order", "/api/orders/R1").extract(Extraction::new(
            "shipment_id",
            Select::Path("shipments.0.id".into()),
            "No shipments present on order.",
        ));
        let err = execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCollection(_)));
        assert_eq!(err.to_string(), "No shipments present on order.");
    }

    #[tokio::test]
    async fn resolved_body_reaches_the_transport() {
        let transport = Scripted::new(vec![(200, "{}")]);
        let (_, scenario) = reporter();
        let mut ctx = RunContext::new();
        ctx.insert("order_number", json!("R77")).unwrap();
        ctx.insert("shipment_id", json!(5)).unwrap();

        let step = Step::put("select delivery", "/api/checkouts/{order_number}").body(json!({
            "order": {"shipments_attributes": [{"id": "{shipment_id}"}]}
        }));
        execute_step(&transport, &step, &mut ctx, &scenario)
            .await
            .unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].1, "/api/checkouts/R77");
        let body = requests[0].2.as_ref().unwrap();
        assert_eq!(body["order"]["shipments_attributes"][0]["id"], json!(5));
    }
}
