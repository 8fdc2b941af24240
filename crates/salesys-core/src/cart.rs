//! # Cart Engine
//!
//! The line-item ledger of the sale being rung up.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  Operation                 Effect                          Fails?       │
//! │  ─────────                 ──────                          ──────       │
//! │                                                                         │
//! │  add_item(product) ──────► qty + 1, or new line (qty 1)   never        │
//! │                                                                         │
//! │  update_quantity(id, q) ─► qty = q  (q < 1: ignored)      never        │
//! │                                                                         │
//! │  remove_item(id) ────────► line removed (absent: no-op)   never        │
//! │                                                                         │
//! │  clear() ────────────────► no lines                       never        │
//! │                                                                         │
//! │  snapshot() ─────────────► owned copy for submission                   │
//! │                                                                         │
//! │  subtotal / taxes / total are recomputed from the lines on every read. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has quantity ≥ 1
//! - `line_subtotal == unit_price × quantity` after every operation
//! - The unit price is frozen when the product is first added

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::SALES_TAX_RATE;

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart.
///
/// Fields are private so `line_subtotal` can only change together with
/// `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    product_id: ProductId,
    display_name: String,
    display_code: String,
    #[ts(type = "number")]
    unit_price: Money,
    quantity: u32,
    #[ts(type = "number")]
    line_subtotal: Money,
}

impl LineItem {
    fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id,
            display_name: product.name.clone(),
            display_code: product.code.clone(),
            unit_price: product.price,
            quantity: 1,
            line_subtotal: product.price,
        }
    }

    /// Leaves the line untouched if the new subtotal would not fit.
    fn set_quantity(&mut self, quantity: u32) -> bool {
        match self.unit_price.checked_mul(i64::from(quantity)) {
            Some(line_subtotal) => {
                self.quantity = quantity;
                self.line_subtotal = line_subtotal;
                true
            }
            None => false,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn display_code(&self) -> &str {
        &self.display_code
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_subtotal(&self) -> Money {
        self.line_subtotal
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived totals of a list of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub taxes: Money,
    #[ts(type = "number")]
    pub total: Money,
}

impl CartTotals {
    fn from_items(items: &[LineItem]) -> Self {
        let subtotal: Money = items.iter().map(LineItem::line_subtotal).sum();
        let taxes = subtotal.calculate_tax(SALES_TAX_RATE);
        CartTotals {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
            subtotal,
            taxes,
            total: subtotal + taxes,
        }
    }
}

// =============================================================================
// Cart Engine
// =============================================================================

/// In-memory ledger for one in-progress sale.
#[derive(Debug, Clone, Default)]
pub struct CartEngine {
    items: Vec<LineItem>,
}

impl CartEngine {
    pub fn new() -> Self {
        CartEngine { items: Vec::new() }
    }

    /// Adds one unit of `product`.
    ///
    /// An existing line keeps the unit price it was added with. Returns the
    /// affected line so the caller can show a confirmation.
    pub fn add_item(&mut self, product: &Product) -> &LineItem {
        let index = match self.position(product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                if let Some(quantity) = item.quantity.checked_add(1) {
                    item.set_quantity(quantity);
                }
                index
            }
            None => {
                self.items.push(LineItem::from_product(product));
                self.items.len() - 1
            }
        };
        &self.items[index]
    }

    /// Removes the line for `product_id`, returning it if it was present.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<LineItem> {
        self.position(product_id).map(|index| self.items.remove(index))
    }

    /// Sets the quantity of a line.
    ///
    /// Quantities below 1 are ignored rather than clamped, and so are unknown
    /// product ids and quantities whose line subtotal would overflow.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            return false;
        };
        match self.position(product_id) {
            Some(index) => self.items[index].set_quantity(quantity),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of the line subtotals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_subtotal).sum()
    }

    /// 16% of the subtotal, rounded to the cent.
    pub fn taxes(&self) -> Money {
        self.subtotal().calculate_tax(SALES_TAX_RATE)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.taxes()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_items(&self.items)
    }

    /// Takes an owned copy of the lines for submission.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
        }
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only copy of the cart taken at submission time.
///
/// Owns its lines, so later changes to the live cart cannot reach a
/// submission already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    items: Vec<LineItem>,
}

impl CartSnapshot {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_items(&self.items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
