//! # Backend Boundary
//!
//! The backend is reached by operation name with a parameter payload. This
//! module turns that into a typed async trait.
//!
//! ## Operations
//! ```text
//! ┌──────────────────────────┬──────────────────────────────┬───────────────────────┐
//! │ Operation                │ Arguments                    │ Reply                 │
//! ├──────────────────────────┼──────────────────────────────┼───────────────────────┤
//! │ create_sale              │ { sale }                     │ sale id               │
//! │ add_sale_detail          │ { detail }                   │ detail id             │
//! │ create_invoice           │ { invoice }                  │ invoice id            │
//! │ get_sale / cancel_sale   │ { id }                       │ Sale / ()             │
//! │ get_sale_details         │ { saleId }                   │ [SaleDetailWithProd.] │
//! │ get_sales_by_date_range  │ { start, end }               │ [Sale]                │
//! │ get_invoices_by_sale     │ { saleId }                   │ [Invoice]             │
//! │ cancel_invoice           │ { uuid }                     │ ()                    │
//! │ get_all_products         │ {}                           │ [Product]             │
//! │ add_product              │ { product }                  │ product id            │
//! │ update_product           │ { id, product }              │ ()                    │
//! │ delete_product           │ { id }                       │ ()                    │
//! │ get_all_customers        │ {}                           │ [Customer]            │
//! │ add/update/delete_cust.  │ { customer } / { id, .. }    │ id / ()               │
//! │ authenticate_user        │ { username, password }       │ User | null           │
//! │ get_all_users            │ {}                           │ [User]                │
//! │ create_user              │ { user }                     │ user id               │
//! │ update_user              │ { user }                     │ ()                    │
//! │ delete_user              │ { userId }                   │ bool                  │
//! └──────────────────────────┴──────────────────────────────┴───────────────────────┘
//! ```

pub mod http;
pub mod memory;
pub mod rpc;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use salesys_core::{
    Customer, CustomerId, DateRange, Invoice, InvoiceId, NewCustomer, NewInvoice, NewProduct,
    NewSale, NewSaleDetail, NewUser, Product, ProductId, Sale, SaleDetailId,
    SaleDetailWithProduct, SaleId, User, UserId,
};

use tracing::info;

use crate::config::ClientConfig;
use crate::error::{BackendError, BackendResult, ClientError, ClientResult};
use self::http::HttpTransport;
use self::rpc::RpcBackend;

// =============================================================================
// Operation Names
// =============================================================================

/// Every remote operation the client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetAllProducts,
    GetProduct,
    AddProduct,
    UpdateProduct,
    DeleteProduct,
    GetAllCustomers,
    GetCustomer,
    AddCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateSale,
    GetSale,
    GetSalesByDateRange,
    CancelSale,
    AddSaleDetail,
    GetSaleDetails,
    CreateInvoice,
    GetInvoicesBySale,
    CancelInvoice,
    AuthenticateUser,
    GetAllUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    /// Name the backend registers the operation under.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAllProducts => "get_all_products",
            Operation::GetProduct => "get_product",
            Operation::AddProduct => "add_product",
            Operation::UpdateProduct => "update_product",
            Operation::DeleteProduct => "delete_product",
            Operation::GetAllCustomers => "get_all_customers",
            Operation::GetCustomer => "get_customer",
            Operation::AddCustomer => "add_customer",
            Operation::UpdateCustomer => "update_customer",
            Operation::DeleteCustomer => "delete_customer",
            Operation::CreateSale => "create_sale",
            Operation::GetSale => "get_sale",
            Operation::GetSalesByDateRange => "get_sales_by_date_range",
            Operation::CancelSale => "cancel_sale",
            Operation::AddSaleDetail => "add_sale_detail",
            Operation::GetSaleDetails => "get_sale_details",
            Operation::CreateInvoice => "create_invoice",
            Operation::GetInvoicesBySale => "get_invoices_by_sale",
            Operation::CancelInvoice => "cancel_invoice",
            Operation::AuthenticateUser => "authenticate_user",
            Operation::GetAllUsers => "get_all_users",
            Operation::CreateUser => "create_user",
            Operation::UpdateUser => "update_user",
            Operation::DeleteUser => "delete_user",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Backend Trait
// =============================================================================

/// The remote backend: catalog, customer and user directories, sale and
/// invoice ledgers.
///
/// Implementations only move data; they do not retry, time out or validate.
/// Wrap calls in [`with_timeout`] to bound them.
#[async_trait]
pub trait Backend: Send + Sync {
    // ---- products ----------------------------------------------------------
    async fn get_all_products(&self) -> BackendResult<Vec<Product>>;
    async fn get_product(&self, id: ProductId) -> BackendResult<Product>;
    async fn add_product(&self, product: &NewProduct) -> BackendResult<ProductId>;
    async fn update_product(&self, id: ProductId, product: &NewProduct) -> BackendResult<()>;
    async fn delete_product(&self, id: ProductId) -> BackendResult<()>;

    // ---- customers ---------------------------------------------------------
    async fn get_all_customers(&self) -> BackendResult<Vec<Customer>>;
    async fn get_customer(&self, id: CustomerId) -> BackendResult<Customer>;
    async fn add_customer(&self, customer: &NewCustomer) -> BackendResult<CustomerId>;
    async fn update_customer(&self, id: CustomerId, customer: &NewCustomer)
        -> BackendResult<()>;
    async fn delete_customer(&self, id: CustomerId) -> BackendResult<()>;

    // ---- sales -------------------------------------------------------------
    /// Persists a sale. `Ok(None)` means the backend answered without an id.
    async fn create_sale(&self, sale: &NewSale) -> BackendResult<Option<SaleId>>;
    async fn get_sale(&self, id: SaleId) -> BackendResult<Sale>;
    async fn get_sales_by_date_range(&self, range: &DateRange) -> BackendResult<Vec<Sale>>;
    async fn cancel_sale(&self, id: SaleId) -> BackendResult<()>;
    async fn add_sale_detail(&self, detail: &NewSaleDetail) -> BackendResult<SaleDetailId>;
    async fn get_sale_details(&self, sale_id: SaleId)
        -> BackendResult<Vec<SaleDetailWithProduct>>;

    // ---- invoices ----------------------------------------------------------
    async fn create_invoice(&self, invoice: &NewInvoice) -> BackendResult<InvoiceId>;
    async fn get_invoices_by_sale(&self, sale_id: SaleId) -> BackendResult<Vec<Invoice>>;
    async fn cancel_invoice(&self, uuid: &str) -> BackendResult<()>;

    // ---- users -------------------------------------------------------------
    /// `Ok(None)` for unknown users and wrong passwords alike.
    async fn authenticate_user(&self, username: &str, password: &str)
        -> BackendResult<Option<User>>;
    async fn get_all_users(&self) -> BackendResult<Vec<User>>;
    async fn create_user(&self, user: &NewUser) -> BackendResult<UserId>;
    async fn update_user(&self, user: &User) -> BackendResult<()>;
    /// Returns whether a user was deleted.
    async fn delete_user(&self, id: UserId) -> BackendResult<bool>;
}

// =============================================================================
// Timeouts
// =============================================================================

/// Runs one backend call, failing with [`BackendError::Timeout`] if it does
/// not settle within `limit`.
pub async fn with_timeout<T, F>(operation: Operation, limit: Duration, call: F) -> BackendResult<T>
where
    F: Future<Output = BackendResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout {
            operation,
            after: limit,
        }),
    }
}

// =============================================================================
// Connecting
// =============================================================================

/// The production backend: the HTTP gateway named by `config.endpoint`.
pub fn connect(config: &ClientConfig) -> ClientResult<Arc<dyn Backend>> {
    config.validate()?;
    let endpoint = config
        .endpoint_url()?
        .ok_or_else(|| ClientError::InvalidConfig("no backend endpoint configured".into()))?;

    let mut transport = HttpTransport::new(endpoint);
    if let Some(token) = &config.api_token {
        transport = transport.with_token(token.clone());
    }
    info!(endpoint = %transport.endpoint(), "Using backend gateway");
    Ok(Arc::new(RpcBackend::new(transport)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_requires_endpoint() {
        let err = connect(&ClientConfig::default()).err().unwrap();
        assert!(err.to_string().contains("no backend endpoint"));

        let config = ClientConfig {
            endpoint: Some("http://127.0.0.1:9/rpc".to_string()),
            ..ClientConfig::default()
        };
        assert!(connect(&config).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, BackendError>(1)
        };

        let result = with_timeout(Operation::GetSale, Duration::from_secs(5), slow).await;
        assert_eq!(
            result,
            Err(BackendError::Timeout {
                operation: Operation::GetSale,
                after: Duration::from_secs(5),
            })
        );
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result =
            with_timeout(Operation::GetSale, Duration::from_secs(5), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::CreateSale.to_string(), "create_sale");
        assert_eq!(
            Operation::GetSalesByDateRange.as_str(),
            "get_sales_by_date_range"
        );
    }
}
