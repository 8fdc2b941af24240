//! # Sale Commands
//!
//! The sale form (customer, payment method, notes) and sale submission.
//!
//! ## Submission
//! ```text
//! submit_sale
//!   │
//!   ├─ session may use "New Sale"?            no ──► FORBIDDEN
//!   ├─ another submission running?            yes ─► BUSY
//!   ├─ raise in-flight flag (cart and form edits now BUSY)
//!   ├─ snapshot cart + copy metadata
//!   ├─ coordinator.submit(snapshot, meta)     err ─► error, cart and form kept
//!   ├─ clear cart, reset form ──► { saleId, invoiceId, ... }
//!   └─ lower flag
//! ```

use salesys_client::SubmittedSale;
use salesys_core::{CustomerId, MenuSection, PaymentMethod, SaleMetadata};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BackendState, CartState, ConfigState, SaleFormState, SessionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSaleResponse {
    #[serde(flatten)]
    pub sale: SubmittedSale,
    /// Total formatted for display.
    pub total_display: String,
    /// Notification text, e.g. "Sale #12 processed".
    pub message: String,
}

pub fn get_sale_form(form: &SaleFormState) -> SaleMetadata {
    debug!("get_sale_form command");
    form.with_meta(|meta| meta.clone())
}

pub fn set_sale_customer(
    form: &SaleFormState,
    customer_id: Option<CustomerId>,
) -> Result<SaleMetadata, ApiError> {
    debug!(?customer_id, "set_sale_customer command");
    form.edit(|meta| {
        meta.set_customer(customer_id);
        meta.clone()
    })
}

/// Accepts `cash`, `credit`, `debit` or `transfer`; `None` clears it.
pub fn set_payment_method(
    form: &SaleFormState,
    method: Option<String>,
) -> Result<SaleMetadata, ApiError> {
    debug!(?method, "set_payment_method command");
    let method = method
        .map(|m| m.parse::<PaymentMethod>())
        .transpose()?;

    form.edit(|meta| {
        meta.set_payment_method(method);
        meta.clone()
    })
}

pub fn set_sale_notes(
    form: &SaleFormState,
    notes: Option<String>,
) -> Result<SaleMetadata, ApiError> {
    debug!("set_sale_notes command");
    form.edit(|meta| {
        meta.set_notes(notes);
        meta.clone()
    })
}

/// Submits the current cart as a sale.
///
/// On success the cart is cleared and the form reset. On failure both are
/// left untouched so the cashier can retry; the error carries the id of a
/// partially recorded sale if there is one. Cart and form edits are refused
/// until this returns, so the cart cleared is exactly the cart submitted.
pub async fn submit_sale(
    session: &SessionState,
    backend: &BackendState,
    cart: &CartState,
    form: &SaleFormState,
    config: &ConfigState,
) -> Result<SubmitSaleResponse, ApiError> {
    debug!("submit_sale command");
    let session = session.require(MenuSection::NewSale)?;

    let _guard = form
        .try_begin_submission()
        .ok_or_else(|| ApiError::busy("A sale is already being submitted"))?;

    let snapshot = cart.snapshot();
    let meta = form.with_meta(|meta| meta.clone());

    let sale = backend.coordinator().submit(&snapshot, &meta).await?;

    cart.with_cart_mut(|c| c.clear());
    form.with_meta_mut(|meta| meta.reset());

    info!(
        sale_id = sale.sale_id,
        seller = %session.user.username,
        "Sale completed"
    );

    Ok(SubmitSaleResponse {
        total_display: config.inner().format_money(sale.total),
        message: format!("Sale #{} processed", sale.sale_id),
        sale,
    })
}
