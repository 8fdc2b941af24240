//! # Domain Types
//!
//! Records and payloads exchanged with the SaleSys backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code           │   │  customer_id?   │   │  sale_id (FK)   │       │
//! │  │  name           │   │  subtotal/taxes │   │  uuid           │       │
//! │  │  price          │   │  total          │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   SaleStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Completed      │   │  Cash / Credit  │       │
//! │  │  1600 = 16%     │   │  Canceled       │   │  Debit          │       │
//! │  └─────────────────┘   │  Refunded       │   │  Transfer       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Records vs. Payloads
//! Every entity has a record type (what the backend returns, carrying the
//! backend-assigned `id`) and a `New*` payload (what the client sends).
//! Ids are assigned by the backend only.
//!
//! Money fields are [`Money`] in memory and two-decimal numbers on the wire;
//! see [`crate::wire`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

pub type ProductId = i64;
pub type CustomerId = i64;
pub type SaleId = i64;
pub type SaleDetailId = i64;
pub type InvoiceId = i64;
pub type UserId = i64;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1600 bps = 16% (the sales tax applied to every sale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage, the unit `add_sale_detail` expects.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name shown to the cashier.
    pub name: String,

    /// Business code (barcode or internal code).
    pub code: String,

    /// Unit price.
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub price: Money,

    /// Units on hand, as reported by the backend.
    pub stock: i64,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        code: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            price,
            stock,
        }
    }
}

/// Payload for `add_product` and `update_product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub price: Money,
    pub stock: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer in the backend directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Mexican tax id (RFC), needed for invoicing.
    pub rfc: Option<String>,
}

/// Payload for `add_customer` and `update_customer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub rfc: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Closed set; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Credit,
        PaymentMethod::Debit,
        PaymentMethod::Transfer,
    ];

    /// Wire name of the method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// Status of a persisted sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Paid and finalized. Every sale created from the cart starts here.
    Completed,
    /// Voided from the dashboard.
    Canceled,
    /// Money returned to the customer.
    Refunded,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Completed
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A persisted sale as returned by `get_sale` and `get_sales_by_date_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: SaleId,
    #[serde(with = "crate::wire::timestamp")]
    #[ts(as = "String")]
    pub date: NaiveDateTime,
    pub customer_id: Option<CustomerId>,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub taxes: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

/// Payload for `create_sale`.
///
/// `status` is optional on the wire; the backend defaults it to `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_id: Option<CustomerId>,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub taxes: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub status: Option<SaleStatus>,
}

// =============================================================================
// Sale Detail
// =============================================================================

/// One persisted line of a sale.
///
/// `subtotal = unit_price × quantity − discount` and
/// `tax_amount = subtotal × tax_percentage / 100`, both computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub id: SaleDetailId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub unit_price: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub tax_amount: Money,
}

/// Payload for `add_sale_detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleDetail {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub unit_price: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub discount: Money,
    /// Percentage, not basis points (`16.0` for 16%).
    pub tax_percentage: f64,
}

/// A sale detail joined with the product's name and code, as returned by
/// `get_sale_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetailWithProduct {
    pub id: SaleDetailId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub unit_price: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(with = "crate::wire::money")]
    #[ts(type = "number")]
    pub tax_amount: Money,
}

// =============================================================================
// Invoice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Active,
    Canceled,
}

/// The billing document attached to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: InvoiceId,
    pub sale_id: SaleId,
    pub uuid: String,
    #[serde(with = "crate::wire::timestamp")]
    #[ts(as = "String")]
    pub date: NaiveDateTime,
    /// Location of the generated document. Empty until one is generated.
    pub file_path: String,
    pub status: InvoiceStatus,
}

/// Payload for `create_invoice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInvoice {
    pub sale_id: SaleId,
    pub uuid: String,
    pub file_path: String,
    pub status: Option<InvoiceStatus>,
}

// =============================================================================
// Users
// =============================================================================

/// Role of a logged-in user. Serialized as `"Admin"`, `"Seller"`, `"Manager"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UserRole {
    Admin,
    Seller,
    Manager,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::Admin => "Admin",
            UserRole::Seller => "Seller",
            UserRole::Manager => "Manager",
        };
        f.write_str(name)
    }
}

/// A user account. The password hash never leaves the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub full_name: String,
    pub is_active: bool,
}

/// Payload for `create_user`. The password is sent in clear and hashed by
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub full_name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
