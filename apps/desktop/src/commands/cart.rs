//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Submitted│       │
//! │  │  Cart    │     │          │     │ selected │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_cart                        submit_sale        │
//! │                   update_cart_item                   (sale.rs)          │
//! │                   remove_from_cart                        │             │
//! │                        │                                  │             │
//! │                        ▼                                  ▼             │
//! │                   clear_cart ─────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the whole cart so the UI can redraw from it.
//! Edits made while a sale is being submitted are refused with `BUSY`.

use salesys_client::Operation;
use salesys_core::{CartEngine, CartTotals, LineItem, ProductId};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{BackendState, CartState, SaleFormState};

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&CartEngine> for CartResponse {
    fn from(cart: &CartEngine) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            totals: cart.totals(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub cart: CartResponse,
    /// Notification text, e.g. "Product Coffee added".
    pub message: String,
}

pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of a product, at the price the backend reports now.
pub async fn add_to_cart(
    backend: &BackendState,
    cart: &CartState,
    form: &SaleFormState,
    product_id: ProductId,
) -> Result<AddToCartResponse, ApiError> {
    debug!(product_id, "add_to_cart command");

    let product = backend
        .call(Operation::GetProduct, backend.inner().get_product(product_id))
        .await?;

    let (cart, name) = cart.edit(form, |c| {
        let name = c.add_item(&product).display_name().to_string();
        (CartResponse::from(&*c), name)
    })?;

    Ok(AddToCartResponse {
        cart,
        message: format!("Product {} added", name),
    })
}

/// Sets a line's quantity. Quantities below 1, quantities whose subtotal
/// would overflow, and unknown products leave the cart as it was.
pub fn update_cart_item(
    cart: &CartState,
    form: &SaleFormState,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, quantity, "update_cart_item command");

    cart.edit(form, |c| {
        if !c.update_quantity(product_id, quantity) {
            debug!(product_id, quantity, "Quantity update ignored");
        }
        CartResponse::from(&*c)
    })
}

pub fn remove_from_cart(
    cart: &CartState,
    form: &SaleFormState,
    product_id: ProductId,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, "remove_from_cart command");

    cart.edit(form, |c| {
        c.remove_item(product_id);
        CartResponse::from(&*c)
    })
}

pub fn clear_cart(cart: &CartState, form: &SaleFormState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");

    cart.edit(form, |c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{backend_state, seeded_backend};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_to_cart_twice() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let cart = CartState::new();
        let form = SaleFormState::new();

        add_to_cart(&backend, &cart, &form, 1).await.unwrap();
        let response = add_to_cart(&backend, &cart, &form, 1).await.unwrap();

        assert_eq!(response.message, "Product Coffee added");
        assert_eq!(response.cart.items.len(), 1);
        assert_eq!(response.cart.items[0].quantity(), 2);
        assert_eq!(response.cart.totals.subtotal.cents(), 2000);
        assert_eq!(response.cart.totals.taxes.cents(), 320);
        assert_eq!(response.cart.totals.total.cents(), 2320);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let cart = CartState::new();

        let err = add_to_cart(&backend, &cart, &SaleFormState::new(), 99)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&cart).items.is_empty());
    }

    #[tokio::test]
    async fn test_update_remove_clear() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let cart = CartState::new();
        let form = SaleFormState::new();
        add_to_cart(&backend, &cart, &form, 1).await.unwrap();
        add_to_cart(&backend, &cart, &form, 2).await.unwrap();

        let response = update_cart_item(&cart, &form, 1, 0).unwrap();
        assert_eq!(response.items[0].quantity(), 1);

        let response = update_cart_item(&cart, &form, 1, 3).unwrap();
        assert_eq!(response.totals.subtotal.cents(), 3550);

        let response = remove_from_cart(&cart, &form, 2).unwrap();
        assert_eq!(response.items.len(), 1);

        assert!(clear_cart(&cart, &form).unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_edits_refused_while_submitting() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let cart = CartState::new();
        let form = SaleFormState::new();
        add_to_cart(&backend, &cart, &form, 1).await.unwrap();

        let running = form.try_begin_submission().unwrap();
        let busy = [
            add_to_cart(&backend, &cart, &form, 2).await.map(|_| ()),
            update_cart_item(&cart, &form, 1, 5).map(|_| ()),
            remove_from_cart(&cart, &form, 1).map(|_| ()),
            clear_cart(&cart, &form).map(|_| ()),
        ];
        for result in busy {
            assert_eq!(result.unwrap_err().code, ErrorCode::Busy);
        }
        let untouched = get_cart(&cart);
        assert_eq!(untouched.items.len(), 1);
        assert_eq!(untouched.items[0].quantity(), 1);

        drop(running);
        assert_eq!(update_cart_item(&cart, &form, 1, 5).unwrap().items[0].quantity(), 5);
    }
}
