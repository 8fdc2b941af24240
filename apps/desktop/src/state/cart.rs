//! # Cart State
//!
//! Holds the in-progress sale's [`CartEngine`].
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart Change           │
//! │  ─────────                ───────                 ───────────           │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► add_item (qty + 1)   │
//! │  Change Quantity ────────► update_cart_item() ──► update_quantity      │
//! │  Click Remove ───────────► remove_from_cart() ──► remove_item          │
//! │  Click Clear ────────────► clear_cart() ────────► clear                │
//! │  Sale submitted ─────────► submit_sale() ───────► clear                │
//! │  View Cart ──────────────► get_cart() ──────────► (read only)          │
//! │                                                                         │
//! │  Submissions work on a snapshot; the lock is never held across a       │
//! │  backend call. Edits are refused while a submission is in flight.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use salesys_core::{CartEngine, CartSnapshot};

use super::sale_form::{SaleFormState, SUBMISSION_IN_PROGRESS};
use crate::error::ApiError;

/// Managed cart state.
///
/// `Arc<Mutex<_>>`: cart operations are short and nearly all of them write,
/// so a `RwLock` would not buy anything.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartEngine>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartEngine) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartEngine) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Executes a function with write access to the cart, unless `form` has
    /// a submission in flight. The flag is read under the cart lock.
    pub fn edit<F, R>(&self, form: &SaleFormState, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut CartEngine) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        if form.is_submitting() {
            return Err(ApiError::busy(SUBMISSION_IN_PROGRESS));
        }
        Ok(f(&mut cart))
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(|cart| cart.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesys_core::{Money, Product};

    #[test]
    fn test_snapshot_is_detached() {
        let state = CartState::new();
        let coffee = Product::new(1, "Coffee", "CAF-01", Money::from_cents(1000), 5);
        state.with_cart_mut(|cart| {
            cart.add_item(&coffee);
        });

        let snapshot = state.snapshot();
        state.with_cart_mut(|cart| cart.clear());

        assert_eq!(snapshot.len(), 1);
        assert!(state.with_cart(|cart| cart.is_empty()));
    }

    #[test]
    fn test_edit_refused_during_submission() {
        let state = CartState::new();
        let form = SaleFormState::new();
        let tea = Product::new(2, "Tea", "TEA-01", Money::from_cents(800), 5);

        let guard = form.try_begin_submission().unwrap();
        assert!(state.edit(&form, |cart| cart.add_item(&tea).quantity()).is_err());
        assert!(state.with_cart(|cart| cart.is_empty()));

        drop(guard);
        assert_eq!(state.edit(&form, |cart| cart.add_item(&tea).quantity()), Ok(1));
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new();
        let other = state.clone();
        let tea = Product::new(2, "Tea", "TEA-01", Money::from_cents(800), 5);

        other.with_cart_mut(|cart| {
            cart.add_item(&tea);
        });

        assert_eq!(state.with_cart(|cart| cart.subtotal().cents()), 800);
    }
}
