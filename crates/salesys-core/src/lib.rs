//! # salesys-core: Pure Business Logic for SaleSys
//!
//! This crate holds everything the point-of-sale client can decide on its own,
//! without talking to the backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SaleSys Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop UI                                   │   │
//! │  │    Product list ──► Cart ──► Payment / customer ──► Submit      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salesys-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │  session  │  │ dashboard │  │   │
//! │  │   │   Money   │  │CartEngine │  │  Session  │  │SalesSumm. │  │   │
//! │  │   │  TaxRate  │  │ LineItem  │  │   menu    │  │ DateRange │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND CALLS • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            salesys-client (remote backend boundary)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Records and payloads exchanged with the backend
//! - [`cart`] - The in-progress sale: line items and derived totals
//! - [`sale`] - Sale metadata collected alongside the cart
//! - [`session`] - Logged-in user context and the role-based menu
//! - [`dashboard`] - Sales statistics and date ranges
//! - [`validation`] - Input validation for maintenance screens
//! - [`wire`] - serde adapters for the backend's number and date formats
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use salesys_core::{CartEngine, Money, Product};
//!
//! let mut cart = CartEngine::new();
//! cart.add_item(&Product::new(1, "Coffee", "CAF-01", Money::from_cents(1000), 10));
//! cart.add_item(&Product::new(1, "Coffee", "CAF-01", Money::from_cents(1000), 10));
//!
//! assert_eq!(cart.subtotal().cents(), 2000);
//! assert_eq!(cart.taxes().cents(), 320); // 16%
//! assert_eq!(cart.total().cents(), 2320);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod sale;
pub mod session;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartEngine, CartSnapshot, CartTotals, LineItem};
pub use dashboard::{DateRange, SalesSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::SaleMetadata;
pub use session::{MenuEntry, MenuSection, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every subtotal (16%).
pub const SALES_TAX_RATE: TaxRate = TaxRate::from_bps(1600);

/// Status sent with every sale created from the cart.
pub const NEW_SALE_STATUS: SaleStatus = SaleStatus::Completed;

/// Status sent with every invoice created for a new sale.
pub const NEW_INVOICE_STATUS: InvoiceStatus = InvoiceStatus::Active;
