//! # Commands Module
//!
//! Every operation the UI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── auth.rs       ◄─── Login, logout, session and menu
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── sale.rs       ◄─── Sale form and submission
//! ├── product.rs    ◄─── Product catalog maintenance
//! ├── customer.rs   ◄─── Customer directory maintenance
//! ├── user.rs       ◄─── User administration
//! └── dashboard.rs  ◄─── Sales listing, statistics, cancellation
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  const cart = await invoke('add_to_cart', { productId: 7 });            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  pub async fn add_to_cart(                                              │
//! │      backend: &BackendState,   ◄── managed state                       │
//! │      cart: &CartState,         ◄── managed state                       │
//! │      form: &SaleFormState,     ◄── managed state (in-flight flag)      │
//! │      product_id: ProductId,    ◄── from invoke params                  │
//! │  ) -> Result<AddToCartResponse, ApiError>                               │
//! │         │                                                               │
//! │         ▼  (JSON serialization)                                         │
//! │  UI receives: { cart: { items, totals }, message }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs. Commands that touch the
//! backend check the session's role first.

pub mod auth;
pub mod cart;
pub mod customer;
pub mod dashboard;
pub mod product;
pub mod sale;
pub mod user;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for command tests.

    use std::sync::Arc;

    use chrono::Utc;
    use salesys_client::{ClientConfig, MemoryBackend};
    use salesys_core::{Money, NewProduct, Session, User, UserRole};

    use crate::state::{BackendState, SessionState};

    pub async fn seeded_backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed_default_admin().await.unwrap();
        backend
            .insert_product(NewProduct {
                name: "Coffee".to_string(),
                code: "CAF-01".to_string(),
                price: Money::from_cents(1000),
                stock: 20,
            })
            .await;
        backend
            .insert_product(NewProduct {
                name: "Bagel".to_string(),
                code: "BAG-01".to_string(),
                price: Money::from_cents(550),
                stock: 20,
            })
            .await;
        backend
    }

    pub fn backend_state(backend: &Arc<MemoryBackend>) -> BackendState {
        BackendState::new(backend.clone(), &ClientConfig::default())
    }

    pub fn logged_in(role: UserRole) -> SessionState {
        let state = SessionState::new();
        state.begin(Session::new(
            User {
                id: 1,
                username: "tester".to_string(),
                email: "tester@example.com".to_string(),
                role,
                full_name: "Test User".to_string(),
                is_active: true,
            },
            Utc::now(),
        ));
        state
    }
}
