//! Built-in scenario definitions
//!
//! Declarative tables for the checkout walkthroughs. The shared portion of
//! the flow (create order, add a line item, advance to address, look up the
//! destination, submit it) is one parameterized template instantiated per
//! scenario, so two walkthroughs differing only in destination stay one
//! definition. Expected state literals and exact gateway error bodies are
//! plain data here.

use serde_json::{json, Value};

use super::model::{Check, Expectation, Extraction, Predicate, Scenario, Select, Step};

/// Fixture file gating the gateway error scenario
const GATEWAY_FIXTURE: &str = "braintree.yml";

/// Destination parameters for one walkthrough instantiation
pub struct Destination {
    pub country: &'static str,
    pub state: &'static str,
    pub address1: &'static str,
    pub address2: &'static str,
    pub city: &'static str,
    pub zipcode: &'static str,
}

const MARYLAND: Destination = Destination {
    country: "United States",
    state: "Maryland",
    address1: "Unit 1",
    address2: "1 Test Lane",
    city: "Bethesda",
    zipcode: "20814",
};

const MINNESOTA: Destination = Destination {
    country: "United States",
    state: "Minnesota",
    address1: "5 County Rd B E",
    address2: "",
    city: "Little Canada",
    zipcode: "55117",
};

/// All scenarios the harness knows how to run
pub fn builtin() -> Vec<Scenario> {
    vec![
        walkthrough_to_delivery(),
        tax_calculation(),
        full_checkout(),
        gateway_payment_errors(),
    ]
}

/// Create order → line item → address → delivery, re-fetching the order to
/// confirm a shipment with rates was proposed
fn walkthrough_to_delivery() -> Scenario {
    let mut steps = new_order_steps();
    steps.extend(destination_lookup_steps(&MARYLAND));
    steps.push(
        submit_address_step(&MARYLAND, json!("{country_id}"), json!("{state_id}"), false)
            .expect(delivery_transition()),
    );
    steps.push(
        Step::get("fetch order", "/api/orders/{order_number}")
            .expect(Expectation::new(
                Check::Status(200),
                "Retrieved the order.",
                "Failed to retrieve the order.",
            ))
            .extract(first_shipment())
            .extract(first_shipping_rate()),
    );
    Scenario::new("walkthrough-to-delivery", steps)
}

/// Same walkthrough pointed at a taxable destination; the address step
/// asserts the computed tax instead of the state transition
fn tax_calculation() -> Scenario {
    let mut steps = new_order_steps();
    steps.extend(destination_lookup_steps(&MINNESOTA));
    steps.push(
        submit_address_step(&MINNESOTA, json!("{country_id}"), json!("{state_id}"), false)
            .expect(Expectation::new(
                Check::FieldSatisfies {
                    path: "tax_total".into(),
                    predicate: Predicate::GreaterThan(0.0),
                },
                "Taxes has been calculated.",
                "Taxes could not be calculated.",
            )),
    );
    Scenario::new("tax-calculation", steps)
}

/// Whole happy path through a successful payment with the store's offline
/// payment method
fn full_checkout() -> Scenario {
    let mut steps = new_order_steps();
    steps.extend(destination_lookup_steps(&MARYLAND));
    steps.push(
        submit_address_step(&MARYLAND, json!("{country_id}"), json!("{state_id}"), false)
            .expect(delivery_transition())
            .extract(first_shipment())
            .extract(first_shipping_rate()),
    );
    steps.push(select_delivery_step().extract(payment_method_named("Check")));
    steps.push(
        Step::put("submit payment", "/api/checkouts/{order_number}")
            .body(json!({
                "order": {
                    "payments_attributes": [{"payment_method_id": "{payment_method_id}"}]
                }
            }))
            .expect(Expectation::new(
                Check::Status(200),
                "Payment accepted.",
                "Payment was not accepted.",
            ))
            .expect(Expectation::new(
                Check::FieldEquals {
                    path: "state".into(),
                    expected: json!("confirm"),
                },
                "Order automatically transitioned to 'confirm'.",
                "Order failed to automatically transition to 'confirm'.",
            ))
            .expect(Expectation::new(
                Check::FieldAbsent {
                    path: "error".into(),
                },
                "No validation errors on order.",
                "Order carries validation errors.",
            )),
    );
    Scenario::new("full-checkout", steps)
}

/// Negative-path payment submissions against the sandbox gateway.
///
/// Each injection asserts both the 422 status and the exact error body; the
/// reference strings encode the upstream gateway's error text verbatim and
/// are compared without normalization. Between injections the scenario
/// re-submits a corrected address with an explicit `state` override to
/// re-enter the normal flow.
fn gateway_payment_errors() -> Scenario {
    let mut steps = new_order_steps();
    // The gateway walkthrough pins the destination ids instead of looking
    // them up; they must match the sandbox seed data.
    steps.push(
        submit_address_step(&MARYLAND, json!(49), json!(26), false)
            .expect(delivery_transition())
            .extract(first_shipment())
            .extract(first_shipping_rate()),
    );
    steps.push(select_delivery_step().extract(payment_method_named("Braintree")));

    steps.push(
        card_payment_step("submit invalid card number", "1", "1", "2017", false)
            .expect(rejected_with_422())
            .expect(exact_error_body(
                r#"{"exception":"Credit card type is not accepted by this merchant account. (81703) Credit card number must be 12-19 digits. (81716)"}"#,
            )),
    );
    steps.push(
        card_payment_step("submit expired card", "4111111111111111", "1", "2000", true)
            .expect(rejected_with_422())
            .expect(exact_error_body(
                r#"{"error":"Invalid resource. Please fix errors and try again.","errors":{"payments.Credit Card":[" Card has expired"]}}"#,
            )),
    );

    // AVS mismatch: resubmit the address with a zip the card's billing
    // record does not match, then walk back to payment.
    let avs = Destination {
        zipcode: "20000",
        ..MARYLAND
    };
    steps.push(
        submit_address_step(&avs, json!(49), json!(26), true)
            .expect(delivery_transition())
            .extract(first_shipment())
            .extract(first_shipping_rate()),
    );
    steps.push(select_delivery_step());
    steps.push(
        card_payment_step("submit AVS-mismatched card", "4111111111111111", "1", "2017", true)
            .expect(rejected_with_422())
            .expect(exact_error_body(
                r#"{"exception":"Processor declined: Approved (1000)"}"#,
            )),
    );

    Scenario::new("gateway-payment-errors", steps).requires_fixture(GATEWAY_FIXTURE)
}

/// Steps shared by every walkthrough: create the order, add a line item,
/// advance into the address state
fn new_order_steps() -> Vec<Step> {
    vec![
        Step::post("create order", "/api/orders")
            .expect(Expectation::new(
                Check::Status(201),
                "Created new checkout.",
                "Failed to create a new blank checkout.",
            ))
            // Email addresses are necessary for orders to transition to
            // address; reference fixtures set one automatically. Its absence
            // is an environment defect, so this fails rather than pends.
            .expect(Expectation::new(
                Check::FieldEquals {
                    path: "email".into(),
                    expected: json!("spree@example.com"),
                },
                "Email set automatically on order successfully.",
                "Email address was not automatically set on order.",
            ))
            .extract(Extraction::new(
                super::context::ORDER_NUMBER,
                Select::Path("number".into()),
                "Order number missing from create response.",
            )),
        Step::post("add line item", "/api/orders/{order_number}/line_items")
            .body(json!({"line_item": {"variant_id": 1, "quantity": 1}}))
            .expect(Expectation::new(
                Check::Status(201),
                "Added a line item.",
                "Failed to add a line item.",
            )),
        Step::put("advance checkout", "/api/checkouts/{order_number}/next")
            .expect(Expectation::new(
                Check::Status(200),
                "Transitioned order into address state.",
                "Could not transition order to address state.",
            ))
            .expect(Expectation::new(
                Check::FieldEquals {
                    path: "state".into(),
                    expected: json!("address"),
                },
                "Order is in the 'address' state.",
                "Order did not reach the 'address' state.",
            )),
    ]
}

/// Country and state lookups feeding the address submission
fn destination_lookup_steps(destination: &Destination) -> Vec<Step> {
    vec![
        Step::get(
            "look up country",
            format!("/api/countries?q[name_cont]={}", destination.country),
        )
        .expect(Expectation::new(
            Check::Status(200),
            "Retrieved a list of countries.",
            "Failed to retrieve a list of countries.",
        ))
        .expect(Expectation::new(
            Check::FieldEquals {
                path: "countries.0.name".into(),
                expected: json!(destination.country),
            },
            format!("First country is '{}'.", destination.country),
            format!(
                "Expected first country to be '{}', but it wasn't.",
                destination.country
            ),
        ))
        .extract(Extraction::new(
            "country_id",
            Select::Path("countries.0.id".into()),
            "No countries returned.",
        )),
        Step::get(
            "look up state",
            format!(
                "/api/countries/{{country_id}}/states?q[name_cont]={}",
                destination.state
            ),
        )
        .expect(Expectation::new(
            Check::Status(200),
            "Retrieved a list of states.",
            "Failed to retrieve a list of states.",
        ))
        .expect(Expectation::new(
            Check::FieldEquals {
                path: "states.0.name".into(),
                expected: json!(destination.state),
            },
            format!("First state is '{}'.", destination.state),
            format!(
                "Expected first state to be '{}', but it wasn't.",
                destination.state
            ),
        ))
        .extract(Extraction::new(
            "state_id",
            Select::Path("states.0.id".into()),
            "No states returned.",
        )),
    ]
}

/// Submit billing and shipping address details.
///
/// `state_override` adds an explicit top-level `state: address` to the body,
/// used to re-enter the flow after a rejected payment instead of relying on
/// the server's automatic transition.
fn submit_address_step(
    destination: &Destination,
    country_id: Value,
    state_id: Value,
    state_override: bool,
) -> Step {
    let address = json!({
        "first_name": "Test",
        "last_name": "User",
        "address1": destination.address1,
        "address2": destination.address2,
        "country_id": country_id,
        "state_id": state_id,
        "city": destination.city,
        "zipcode": destination.zipcode,
        "phone": "(555) 555-5555"
    });
    let mut body = json!({
        "order": {
            "bill_address_attributes": address.clone(),
            "ship_address_attributes": address
        }
    });
    if state_override {
        body["state"] = json!("address");
    }
    Step::put("submit address", "/api/checkouts/{order_number}")
        .body(body)
        .expect(Expectation::new(
            Check::Status(200),
            "Address details added.",
            "Could not add address details to order.",
        ))
}

/// Select the first proposed shipping rate for the first shipment
fn select_delivery_step() -> Step {
    Step::put("select delivery", "/api/checkouts/{order_number}")
        .body(json!({
            "order": {
                "shipments_attributes": [{
                    "id": "{shipment_id}",
                    "selected_shipping_rate_id": "{shipping_rate_id}"
                }]
            }
        }))
        .expect(Expectation::new(
            Check::Status(200),
            "Delivery options selected.",
            "The store was not happy with the selected delivery options.",
        ))
        .expect(Expectation::new(
            Check::FieldEquals {
                path: "state".into(),
                expected: json!("payment"),
            },
            "Order automatically transitioned to 'payment'.",
            "Order failed to automatically transition to 'payment'.",
        ))
}

/// Submit a card to the configured gateway payment method
fn card_payment_step(
    label: &str,
    number: &str,
    month: &str,
    year: &str,
    state_override: bool,
) -> Step {
    let mut body = json!({
        "order": {
            "payments_attributes": [{"payment_method_id": "{payment_method_id}"}]
        },
        "payment_source": {
            "{payment_method_id}": {
                "number": number,
                "month": month,
                "year": year,
                "verification_value": "123",
                "name": "John Smith"
            }
        }
    });
    if state_override {
        body["state"] = json!("payment");
    }
    Step::put(label, "/api/checkouts/{order_number}").body(body)
}

fn delivery_transition() -> Expectation {
    Expectation::new(
        Check::FieldEquals {
            path: "state".into(),
            expected: json!("delivery"),
        },
        "Order automatically transitioned to 'delivery'.",
        "Order failed to automatically transition to 'delivery'.",
    )
}

fn rejected_with_422() -> Expectation {
    Expectation::new(
        Check::Status(422),
        "Submission rejected with 422.",
        "Error expected",
    )
}

fn exact_error_body(reference: &str) -> Expectation {
    Expectation::new(
        Check::BodyText {
            reference: reference.into(),
        },
        "Received the expected error body.",
        "Incorrect error received",
    )
}

fn first_shipment() -> Extraction {
    Extraction::new(
        "shipment_id",
        Select::Path("shipments.0.id".into()),
        "No shipments present on order.",
    )
}

fn first_shipping_rate() -> Extraction {
    Extraction::new(
        "shipping_rate_id",
        Select::Path("shipments.0.shipping_rates.0.id".into()),
        "No shipping rates present on first shipment.",
    )
}

fn payment_method_named(name: &str) -> Extraction {
    Extraction::new(
        "payment_method_id",
        Select::Find {
            path: "payment_methods".into(),
            field: "name".into(),
            equals: json!(name),
            then: "id".into(),
        },
        format!("{name} payment method not found."),
    )
}
