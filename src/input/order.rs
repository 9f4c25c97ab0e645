//! Checkout payload validation
//!
//! Validates a whole order in one pass and aggregates every field failure,
//! so forms can highlight all problems at once instead of one per submit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sanitize::sanitize;
use super::validators::InputValidator;

/// Largest accepted per-item price
const MAX_ITEM_PRICE: f64 = 1_000_000.0;
/// Longest accepted order note
const MAX_NOTE_LEN: usize = 500;

/// Customer contact block of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Customer display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Optional contact phone
    #[serde(default)]
    pub phone: String,
    /// Optional free-text note
    #[serde(default)]
    pub note: String,
}

/// One order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog identifier of the ordered book
    pub id: String,
    /// Display title
    pub title: String,
    /// Ordered quantity
    pub quantity: u32,
    /// Price per unit
    pub unit_price: f64,
}

/// Full payload submitted at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Customer contact block
    pub customer: CustomerDetails,
    /// Ordered lines
    pub items: Vec<OrderItem>,
}

/// Outcome of validating one order payload
#[derive(Debug, Clone, PartialEq)]
pub struct OrderValidation {
    /// Whether every field passed
    pub is_valid: bool,
    /// Failed checks keyed by field path, for example `items[0].quantity`
    pub errors: HashMap<String, String>,
    /// Normalized payload, present only when valid
    pub sanitized: Option<OrderPayload>,
}

impl InputValidator {
    /// Validate a checkout payload and aggregate all field errors
    pub fn validate_order_payload(&self, order: &OrderPayload) -> OrderValidation {
        let mut errors = HashMap::new();

        let name = self.validate_name(&order.customer.name, "Name");
        if let Some(error) = &name.error {
            errors.insert("customer.name".to_string(), error.clone());
        }

        let email = self.validate_email(&order.customer.email);
        if let Some(error) = &email.error {
            errors.insert("customer.email".to_string(), error.clone());
        }

        let phone = self.validate_phone(&order.customer.phone);
        if let Some(error) = &phone.error {
            errors.insert("customer.phone".to_string(), error.clone());
        }

        let note = order.customer.note.trim();
        let note_value = if note.is_empty() {
            Some(String::new())
        } else {
            let checked = self.validate_text_with(note, "Note", 0, MAX_NOTE_LEN);
            if let Some(error) = &checked.error {
                errors.insert("customer.note".to_string(), error.clone());
            }
            checked.value
        };

        if order.items.is_empty() {
            errors.insert(
                "items".to_string(),
                "Order must contain at least one item".to_string(),
            );
        }
        for (index, item) in order.items.iter().enumerate() {
            if item.id.trim().is_empty() {
                errors.insert(
                    format!("items[{index}].id"),
                    "Item id is required".to_string(),
                );
            }
            if item.quantity == 0 {
                errors.insert(
                    format!("items[{index}].quantity"),
                    "Item quantity must be at least 1".to_string(),
                );
            }
            if !(0.0..=MAX_ITEM_PRICE).contains(&item.unit_price) {
                errors.insert(
                    format!("items[{index}].unit_price"),
                    "Item price is out of range".to_string(),
                );
            }
        }

        if !errors.is_empty() {
            debug!(failed_fields = errors.len(), "order payload rejected");
            return OrderValidation {
                is_valid: false,
                errors,
                sanitized: None,
            };
        }

        let sanitized = OrderPayload {
            customer: CustomerDetails {
                name: name.value.unwrap_or_default(),
                email: email.value.unwrap_or_default(),
                phone: phone.value.flatten().unwrap_or_default(),
                note: note_value.unwrap_or_default(),
            },
            items: order
                .items
                .iter()
                .map(|item| OrderItem {
                    id: item.id.trim().to_string(),
                    title: sanitize(item.title.trim()),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        };

        OrderValidation {
            is_valid: true,
            errors,
            sanitized: Some(sanitized),
        }
    }
}
