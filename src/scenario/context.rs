//! Run context carried across the steps of one scenario
//!
//! Values extracted from earlier responses (the order number, the chosen
//! shipment, the payment method id) feed the request templates of later
//! steps. The context belongs to one scenario run and is discarded with it.

use std::collections::HashMap;

use serde_json::Value;

use crate::common::{Error, Result};

/// Context key holding the order number. Write-once: every later step of the
/// scenario must address the same remote order.
pub const ORDER_NUMBER: &str = "order_number";

#[derive(Debug, Default)]
pub struct RunContext {
    values: HashMap<String, Value>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store an extracted value.
    ///
    /// Rebinding the order number to a different value means the scenario
    /// definition (or the server) switched orders mid-run; that is an
    /// invariant violation, not a recoverable state.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        if key == ORDER_NUMBER {
            if let Some(existing) = self.values.get(ORDER_NUMBER) {
                if existing != &value {
                    return Err(Error::Internal(format!(
                        "order number already set to {existing}, refusing to rebind to {value}"
                    )));
                }
                return Ok(());
            }
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Render a context value for interpolation into a path or string
    pub fn render(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_number_is_write_once() {
        let mut ctx = RunContext::new();
        ctx.insert(ORDER_NUMBER, json!("R111")).unwrap();
        ctx.insert(ORDER_NUMBER, json!("R111")).unwrap();
        let err = ctx.insert(ORDER_NUMBER, json!("R222")).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(ctx.get(ORDER_NUMBER), Some(&json!("R111")));
    }

    #[test]
    fn other_keys_may_be_rebound() {
        let mut ctx = RunContext::new();
        ctx.insert("shipment_id", json!(1)).unwrap();
        ctx.insert("shipment_id", json!(2)).unwrap();
        assert_eq!(ctx.get("shipment_id"), Some(&json!(2)));
    }

    #[test]
    fn render_strips_quotes_from_strings_only() {
        let mut ctx = RunContext::new();
        ctx.insert(ORDER_NUMBER, json!("R42")).unwrap();
        ctx.insert("payment_method_id", json!(7)).unwrap();
        assert_eq!(ctx.render(ORDER_NUMBER).as_deref(), Some("R42"));
        assert_eq!(ctx.render("payment_method_id").as_deref(), Some("7"));
        assert_eq!(ctx.render("missing"), None);
    }
}
