//! # Sale Metadata
//!
//! What the cashier fills in next to the cart: customer, payment method and
//! notes. Starts empty, is cleared after a successful submission and kept as
//! is after a failed one so the sale can be retried.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CustomerId, PaymentMethod};

/// Sale metadata for the in-progress sale.
///
/// `payment_method` has no default: a sale cannot be submitted until one is
/// chosen. `notes` stay on the client; `create_sale` has no field for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleMetadata {
    pub customer_id: Option<CustomerId>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl SaleMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        self.customer_id = customer_id;
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    /// Blank notes are stored as `None`.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
