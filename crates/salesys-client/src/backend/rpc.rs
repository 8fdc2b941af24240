//! # RPC Backend
//!
//! Adapts a name-plus-JSON transport (the desktop shell's command bridge, an
//! HTTP gateway, ...) to the typed [`Backend`] trait.
//!
//! ```text
//!   backend.create_sale(&sale)
//!        │
//!        ▼
//!   transport.invoke("create_sale", {"sale": {...}})
//!        │
//!        ▼
//!   reply JSON ──► decode ──► Option<SaleId>
//! ```

use async_trait::async_trait;
use salesys_core::{
    Customer, CustomerId, DateRange, Invoice, InvoiceId, NewCustomer, NewInvoice, NewProduct,
    NewSale, NewSaleDetail, NewUser, Product, ProductId, Sale, SaleDetailId,
    SaleDetailWithProduct, SaleId, User, UserId,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::{Backend, Operation};
use crate::error::{BackendError, BackendResult};

// =============================================================================
// Transport
// =============================================================================

/// How a call failed at the transport level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// The backend handled the call and returned an error message.
    #[error("{0}")]
    Rejected(String),

    /// The call could not be delivered or answered.
    #[error("{0}")]
    Unreachable(String),
}

/// Sends one named command with a JSON argument object.
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, InvokeError>;
}

// =============================================================================
// RpcBackend
// =============================================================================

pub struct RpcBackend<I> {
    transport: I,
}

impl<I: Invoke> RpcBackend<I> {
    pub fn new(transport: I) -> Self {
        Self { transport }
    }

    async fn send(&self, operation: Operation, args: Value) -> BackendResult<Value> {
        debug!(%operation, "Invoking backend");
        self.transport
            .invoke(operation.as_str(), args)
            .await
            .map_err(|e| {
                warn!(%operation, error = %e, "Backend call failed");
                match e {
                    InvokeError::Rejected(message) => BackendError::Remote { operation, message },
                    InvokeError::Unreachable(message) => {
                        BackendError::Transport { operation, message }
                    }
                }
            })
    }

    async fn call<T: DeserializeOwned>(&self, operation: Operation, args: Value) -> BackendResult<T> {
        let reply = self.send(operation, args).await?;
        serde_json::from_value(reply).map_err(|e| BackendError::Decode {
            operation,
            reason: e.to_string(),
        })
    }

    /// For operations whose reply carries nothing the client uses.
    async fn ack(&self, operation: Operation, args: Value) -> BackendResult<()> {
        self.send(operation, args).await.map(|_| ())
    }
}

fn encode<T: serde::Serialize>(operation: Operation, value: &T) -> BackendResult<Value> {
    serde_json::to_value(value).map_err(|e| BackendError::Decode {
        operation,
        reason: format!("could not encode arguments: {e}"),
    })
}

/// The id `create_sale` answered with: a bare number, or a record with an
/// `id` field. Missing and non-positive ids come back as `None`.
fn decode_sale_id(reply: &Value) -> BackendResult<Option<SaleId>> {
    let id = match reply {
        Value::Null => None,
        Value::Number(n) => n.as_i64(),
        Value::Object(record) => record.get("id").and_then(Value::as_i64),
        other => {
            return Err(BackendError::Decode {
                operation: Operation::CreateSale,
                reason: format!("expected a sale id, got {other}"),
            })
        }
    };
    Ok(id.filter(|id| *id > 0))
}

#[async_trait]
impl<I: Invoke> Backend for RpcBackend<I> {
    async fn get_all_products(&self) -> BackendResult<Vec<Product>> {
        self.call(Operation::GetAllProducts, json!({})).await
    }

    async fn get_product(&self, id: ProductId) -> BackendResult<Product> {
        self.call(Operation::GetProduct, json!({ "id": id })).await
    }

    async fn add_product(&self, product: &NewProduct) -> BackendResult<ProductId> {
        let product = encode(Operation::AddProduct, product)?;
        self.call(Operation::AddProduct, json!({ "product": product }))
            .await
    }

    async fn update_product(&self, id: ProductId, product: &NewProduct) -> BackendResult<()> {
        let product = encode(Operation::UpdateProduct, product)?;
        self.ack(Operation::UpdateProduct, json!({ "id": id, "product": product }))
            .await
    }

    async fn delete_product(&self, id: ProductId) -> BackendResult<()> {
        self.ack(Operation::DeleteProduct, json!({ "id": id })).await
    }

    async fn get_all_customers(&self) -> BackendResult<Vec<Customer>> {
        self.call(Operation::GetAllCustomers, json!({})).await
    }

    async fn get_customer(&self, id: CustomerId) -> BackendResult<Customer> {
        self.call(Operation::GetCustomer, json!({ "id": id })).await
    }

    async fn add_customer(&self, customer: &NewCustomer) -> BackendResult<CustomerId> {
        let customer = encode(Operation::AddCustomer, customer)?;
        self.call(Operation::AddCustomer, json!({ "customer": customer }))
            .await
    }

    async fn update_customer(&self, id: CustomerId, customer: &NewCustomer) -> BackendResult<()> {
        let customer = encode(Operation::UpdateCustomer, customer)?;
        self.ack(
            Operation::UpdateCustomer,
            json!({ "id": id, "customer": customer }),
        )
        .await
    }

    async fn delete_customer(&self, id: CustomerId) -> BackendResult<()> {
        self.ack(Operation::DeleteCustomer, json!({ "id": id })).await
    }

    async fn create_sale(&self, sale: &NewSale) -> BackendResult<Option<SaleId>> {
        let sale = encode(Operation::CreateSale, sale)?;
        let reply = self
            .send(Operation::CreateSale, json!({ "sale": sale }))
            .await?;
        decode_sale_id(&reply)
    }

    async fn get_sale(&self, id: SaleId) -> BackendResult<Sale> {
        self.call(Operation::GetSale, json!({ "id": id })).await
    }

    async fn get_sales_by_date_range(&self, range: &DateRange) -> BackendResult<Vec<Sale>> {
        let (start, end) = range.to_wire();
        self.call(
            Operation::GetSalesByDateRange,
            json!({ "start": start, "end": end }),
        )
        .await
    }

    async fn cancel_sale(&self, id: SaleId) -> BackendResult<()> {
        self.ack(Operation::CancelSale, json!({ "id": id })).await
    }

    async fn add_sale_detail(&self, detail: &NewSaleDetail) -> BackendResult<SaleDetailId> {
        let detail = encode(Operation::AddSaleDetail, detail)?;
        self.call(Operation::AddSaleDetail, json!({ "detail": detail }))
            .await
    }

    async fn get_sale_details(&self, sale_id: SaleId) -> BackendResult<Vec<SaleDetailWithProduct>> {
        self.call(Operation::GetSaleDetails, json!({ "saleId": sale_id }))
            .await
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> BackendResult<InvoiceId> {
        let invoice = encode(Operation::CreateInvoice, invoice)?;
        self.call(Operation::CreateInvoice, json!({ "invoice": invoice }))
            .await
    }

    async fn get_invoices_by_sale(&self, sale_id: SaleId) -> BackendResult<Vec<Invoice>> {
        self.call(Operation::GetInvoicesBySale, json!({ "saleId": sale_id }))
            .await
    }

    async fn cancel_invoice(&self, uuid: &str) -> BackendResult<()> {
        self.ack(Operation::CancelInvoice, json!({ "uuid": uuid }))
            .await
    }

    async fn authenticate_user(&self, username: &str, password: &str) -> BackendResult<Option<User>> {
        self.call(
            Operation::AuthenticateUser,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    async fn get_all_users(&self) -> BackendResult<Vec<User>> {
        self.call(Operation::GetAllUsers, json!({})).await
    }

    async fn create_user(&self, user: &NewUser) -> BackendResult<UserId> {
        let user = encode(Operation::CreateUser, user)?;
        self.call(Operation::CreateUser, json!({ "user": user })).await
    }

    async fn update_user(&self, user: &User) -> BackendResult<()> {
        let user = encode(Operation::UpdateUser, user)?;
        self.ack(Operation::UpdateUser, json!({ "user": user })).await
    }

    async fn delete_user(&self, id: UserId) -> BackendResult<bool> {
        self.call(Operation::DeleteUser, json!({ "userId": id })).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use salesys_core::{Money, PaymentMethod, SaleStatus};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every call and answers from a fixed table.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: HashMap<&'static str, Result<Value, InvokeError>>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn reply(mut self, command: &'static str, reply: Result<Value, InvokeError>) -> Self {
            self.replies.insert(command, reply);
            self
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Invoke for ScriptedTransport {
        async fn invoke(&self, command: &str, args: Value) -> Result<Value, InvokeError> {
            self.calls.lock().unwrap().push((command.to_string(), args));
            self.replies
                .get(command)
                .cloned()
                .unwrap_or(Ok(Value::Null))
        }
    }

    fn new_sale() -> NewSale {
        NewSale {
            customer_id: None,
            subtotal: Money::from_cents(2550),
            taxes: Money::from_cents(408),
            total: Money::from_cents(2958),
            payment_method: PaymentMethod::Cash,
            status: Some(SaleStatus::Completed),
        }
    }

    #[tokio::test]
    async fn test_create_sale_envelope() {
        let backend = RpcBackend::new(ScriptedTransport::default().reply("create_sale", Ok(json!(41))));

        let id = backend.create_sale(&new_sale()).await.unwrap();
        assert_eq!(id, Some(41));

        let calls = backend.transport.calls();
        assert_eq!(calls[0].0, "create_sale");
        assert_eq!(
            calls[0].1,
            json!({
                "sale": {
                    "customer_id": null,
                    "subtotal": 25.5,
                    "taxes": 4.08,
                    "total": 29.58,
                    "payment_method": "cash",
                    "status": "completed"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_create_sale_id_shapes() {
        for (reply, expected) in [
            (json!({"id": 5, "status": "completed"}), Some(5)),
            (Value::Null, None),
            (json!(0), None),
            (json!({"status": "completed"}), None),
        ] {
            let backend =
                RpcBackend::new(ScriptedTransport::default().reply("create_sale", Ok(reply)));
            assert_eq!(backend.create_sale(&new_sale()).await.unwrap(), expected);
        }

        let backend = RpcBackend::new(
            ScriptedTransport::default().reply("create_sale", Ok(json!("seven"))),
        );
        assert!(matches!(
            backend.create_sale(&new_sale()).await,
            Err(BackendError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_errors_map_to_backend_errors() {
        let backend = RpcBackend::new(
            ScriptedTransport::default()
                .reply("get_sale", Err(InvokeError::Rejected("no rows".into())))
                .reply("cancel_sale", Err(InvokeError::Unreachable("bridge closed".into()))),
        );

        assert_eq!(
            backend.get_sale(3).await,
            Err(BackendError::Remote {
                operation: Operation::GetSale,
                message: "no rows".to_string()
            })
        );
        assert!(matches!(
            backend.cancel_sale(3).await,
            Err(BackendError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_argument_names() {
        let backend = RpcBackend::new(
            ScriptedTransport::default()
                .reply("get_sale_details", Ok(json!([])))
                .reply("delete_user", Ok(json!(true)))
                .reply("get_sales_by_date_range", Ok(json!([]))),
        );

        backend.get_sale_details(8).await.unwrap();
        assert!(backend.delete_user(2).await.unwrap());
        let range = DateRange::day(chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        backend.get_sales_by_date_range(&range).await.unwrap();

        let calls = backend.transport.calls();
        assert_eq!(calls[0].1, json!({"saleId": 8}));
        assert_eq!(calls[1].1, json!({"userId": 2}));
        assert_eq!(
            calls[2].1,
            json!({"start": "2024-03-09 00:00:00", "end": "2024-03-09 23:59:59"})
        );
    }

    #[tokio::test]
    async fn test_authenticate_null_is_none() {
        let backend = RpcBackend::new(ScriptedTransport::default());
        assert_eq!(backend.authenticate_user("ana", "bad").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_reply_is_decode_error() {
        let backend = RpcBackend::new(
            ScriptedTransport::default().reply("get_all_products", Ok(json!({"oops": 1}))),
        );
        assert!(matches!(
            backend.get_all_products().await,
            Err(BackendError::Decode { operation: Operation::GetAllProducts, .. })
        ));
    }
}
