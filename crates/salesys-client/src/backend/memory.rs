//! # In-Memory Backend
//!
//! A [`Backend`] that keeps every ledger in process. Used by the demo binary
//! and by tests.
//!
//! It follows the real backend's rules:
//! - ids are assigned sequentially per table, starting at 1
//! - product codes, customer e-mails, usernames, user e-mails and invoice
//!   uuids are unique
//! - `create_sale` defaults the status to `completed`
//! - `add_sale_detail` computes `subtotal = unit_price × quantity − discount`
//!   and `tax_amount = subtotal × tax_percentage / 100`, and takes the
//!   quantity out of the product's stock
//! - products referenced by a sale detail cannot be deleted
//! - passwords are stored as argon2 hashes; inactive users cannot
//!   authenticate
//!
//! ## Fault Injection
//! ```text
//!   backend.inject(Operation::AddSaleDetail, Trigger::Nth(2), Fault::Fail("disk full".into()))
//!
//!   call #1 ──► ok
//!   call #2 ──► Err(Remote { "disk full" })
//!   call #3 ──► ok
//! ```
//! Faults are checked in the order they were injected; a `Delay` is applied
//! before the call proceeds, so it combines with `Fail` and `OmitId`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use salesys_core::{
    Customer, CustomerId, DateRange, Invoice, InvoiceId, InvoiceStatus, NewCustomer,
    NewInvoice, NewProduct, NewSale, NewSaleDetail, NewUser, Product, ProductId, Sale,
    SaleDetail, SaleDetailId, SaleDetailWithProduct, SaleId, SaleStatus, TaxRate, User, UserId,
    UserRole,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::{Backend, Operation};
use crate::error::{BackendError, BackendResult};

// =============================================================================
// Fault Injection
// =============================================================================

/// Which calls of an operation a fault applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Always,
    /// Only the n-th call (1-based).
    Nth(usize),
}

impl Trigger {
    fn matches(&self, call_number: usize) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::Nth(n) => *n == call_number,
        }
    }
}

/// What happens to a matching call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The backend rejects the call with this message.
    Fail(String),
    /// The call is held for this long before it runs.
    Delay(Duration),
    /// `create_sale` persists the sale but answers without its id.
    OmitId,
}

#[derive(Default)]
struct Control {
    faults: Vec<(Operation, Trigger, Fault)>,
    calls: HashMap<Operation, usize>,
}

// =============================================================================
// Ledgers
// =============================================================================

struct StoredUser {
    user: User,
    /// PHC string produced by argon2.
    password_hash: String,
}

fn hash_password(operation: Operation, password: &str) -> BackendResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| rejected(operation, format!("failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Default)]
struct Ledgers {
    products: BTreeMap<ProductId, Product>,
    customers: BTreeMap<CustomerId, Customer>,
    sales: BTreeMap<SaleId, Sale>,
    details: BTreeMap<SaleDetailId, SaleDetail>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    users: BTreeMap<UserId, StoredUser>,
    last_ids: HashMap<&'static str, i64>,
    clock: Option<NaiveDateTime>,
}

impl Ledgers {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let id = self.last_ids.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }
}

fn rejected(operation: Operation, message: impl Into<String>) -> BackendError {
    BackendError::Remote {
        operation,
        message: message.into(),
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> BackendError {
    BackendError::NotFound {
        entity,
        id: id.to_string(),
    }
}

// =============================================================================
// MemoryBackend
// =============================================================================

#[derive(Default)]
pub struct MemoryBackend {
    ledgers: RwLock<Ledgers>,
    control: Mutex<Control>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the default administrator the real backend seeds on an empty
    /// user table (`AdminSalesys` / `admin`). Does nothing if users exist.
    pub async fn seed_default_admin(&self) -> BackendResult<()> {
        if !self.ledgers.read().await.users.is_empty() {
            return Ok(());
        }
        let password_hash = hash_password(Operation::CreateUser, "admin")?;

        let mut ledgers = self.ledgers.write().await;
        if !ledgers.users.is_empty() {
            return Ok(());
        }
        let id = ledgers.next_id("users");
        ledgers.users.insert(
            id,
            StoredUser {
                user: User {
                    id,
                    username: "AdminSalesys".to_string(),
                    email: "admin@salesys.com".to_string(),
                    role: UserRole::Admin,
                    full_name: "Administrador Principal".to_string(),
                    is_active: true,
                },
                password_hash,
            },
        );
        info!("Default administrator created");
        Ok(())
    }

    /// Fixes the timestamp given to new sales and invoices.
    pub async fn set_now(&self, now: NaiveDateTime) {
        self.ledgers.write().await.clock = Some(now);
    }

    pub async fn inject(&self, operation: Operation, trigger: Trigger, fault: Fault) {
        self.control
            .lock()
            .await
            .faults
            .push((operation, trigger, fault));
    }

    pub async fn clear_faults(&self) {
        self.control.lock().await.faults.clear();
    }

    /// Number of times `operation` has been called, failed calls included.
    pub async fn calls(&self, operation: Operation) -> usize {
        self.control
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// Total calls across all operations.
    pub async fn total_calls(&self) -> usize {
        self.control.lock().await.calls.values().sum()
    }

    /// Counts the call and applies matching faults. Returns whether the
    /// reply should omit the created id.
    async fn enter(&self, operation: Operation) -> BackendResult<bool> {
        let faults: Vec<Fault> = {
            let mut control = self.control.lock().await;
            let call_number = {
                let count = control.calls.entry(operation).or_insert(0);
                *count += 1;
                *count
            };
            control
                .faults
                .iter()
                .filter(|(op, trigger, _)| *op == operation && trigger.matches(call_number))
                .map(|(_, _, fault)| fault.clone())
                .collect()
        };

        let mut omit_id = false;
        for fault in faults {
            match fault {
                Fault::Delay(duration) => tokio::time::sleep(duration).await,
                Fault::Fail(message) => {
                    debug!(%operation, %message, "Injected failure");
                    return Err(rejected(operation, message));
                }
                Fault::OmitId => omit_id = true,
            }
        }
        Ok(omit_id)
    }

    /// Adds a product directly, bypassing fault injection. For seeding.
    pub async fn insert_product(&self, product: NewProduct) -> ProductId {
        let mut ledgers = self.ledgers.write().await;
        let id = ledgers.next_id("products");
        ledgers.products.insert(
            id,
            Product::new(id, product.name, product.code, product.price, product.stock),
        );
        id
    }

    pub async fn sales(&self) -> Vec<Sale> {
        self.ledgers.read().await.sales.values().cloned().collect()
    }

    pub async fn details(&self) -> Vec<SaleDetail> {
        self.ledgers.read().await.details.values().cloned().collect()
    }

    pub async fn invoices(&self) -> Vec<Invoice> {
        self.ledgers.read().await.invoices.values().cloned().collect()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    // ---- products ----------------------------------------------------------

    async fn get_all_products(&self) -> BackendResult<Vec<Product>> {
        self.enter(Operation::GetAllProducts).await?;
        Ok(self.ledgers.read().await.products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> BackendResult<Product> {
        self.enter(Operation::GetProduct).await?;
        self.ledgers
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Product", id))
    }

    async fn add_product(&self, product: &NewProduct) -> BackendResult<ProductId> {
        self.enter(Operation::AddProduct).await?;
        let mut ledgers = self.ledgers.write().await;
        if ledgers.products.values().any(|p| p.code == product.code) {
            return Err(rejected(
                Operation::AddProduct,
                format!("product code {} already exists", product.code),
            ));
        }
        let id = ledgers.next_id("products");
        ledgers.products.insert(
            id,
            Product::new(
                id,
                product.name.clone(),
                product.code.clone(),
                product.price,
                product.stock,
            ),
        );
        Ok(id)
    }

    async fn update_product(&self, id: ProductId, product: &NewProduct) -> BackendResult<()> {
        self.enter(Operation::UpdateProduct).await?;
        let mut ledgers = self.ledgers.write().await;
        if ledgers
            .products
            .values()
            .any(|p| p.id != id && p.code == product.code)
        {
            return Err(rejected(
                Operation::UpdateProduct,
                format!("product code {} already exists", product.code),
            ));
        }
        // UPDATE ... WHERE id = ? on a missing row is not an error
        if let Some(existing) = ledgers.products.get_mut(&id) {
            existing.name = product.name.clone();
            existing.code = product.code.clone();
            existing.price = product.price;
            existing.stock = product.stock;
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> BackendResult<()> {
        self.enter(Operation::DeleteProduct).await?;
        let mut ledgers = self.ledgers.write().await;
        if ledgers.details.values().any(|d| d.product_id == id) {
            return Err(rejected(
                Operation::DeleteProduct,
                format!("product {id} is referenced by recorded sales"),
            ));
        }
        ledgers.products.remove(&id);
        Ok(())
    }

    // ---- customers ---------------------------------------------------------

    async fn get_all_customers(&self) -> BackendResult<Vec<Customer>> {
        self.enter(Operation::GetAllCustomers).await?;
        Ok(self.ledgers.read().await.customers.values().cloned().collect())
    }

    async fn get_customer(&self, id: CustomerId) -> BackendResult<Customer> {
        self.enter(Operation::GetCustomer).await?;
        self.ledgers
            .read()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Customer", id))
    }

    async fn add_customer(&self, customer: &NewCustomer) -> BackendResult<CustomerId> {
        self.enter(Operation::AddCustomer).await?;
        let mut ledgers = self.ledgers.write().await;
        if let Some(email) = &customer.email {
            if ledgers
                .customers
                .values()
                .any(|c| c.email.as_ref() == Some(email))
            {
                return Err(rejected(
                    Operation::AddCustomer,
                    format!("customer e-mail {email} already exists"),
                ));
            }
        }
        let id = ledgers.next_id("customers");
        ledgers.customers.insert(
            id,
            Customer {
                id,
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
                address: customer.address.clone(),
                rfc: customer.rfc.clone(),
            },
        );
        Ok(id)
    }

    async fn update_customer(&self, id: CustomerId, customer: &NewCustomer) -> BackendResult<()> {
        self.enter(Operation::UpdateCustomer).await?;
        let mut ledgers = self.ledgers.write().await;
        if let Some(existing) = ledgers.customers.get_mut(&id) {
            existing.name = customer.name.clone();
            existing.email = customer.email.clone();
            existing.phone = customer.phone.clone();
            existing.address = customer.address.clone();
            existing.rfc = customer.rfc.clone();
        }
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> BackendResult<()> {
        self.enter(Operation::DeleteCustomer).await?;
        let mut ledgers = self.ledgers.write().await;
        ledgers.customers.remove(&id);
        // ON DELETE SET NULL
        for sale in ledgers.sales.values_mut() {
            if sale.customer_id == Some(id) {
                sale.customer_id = None;
            }
        }
        Ok(())
    }

    // ---- sales -------------------------------------------------------------

    async fn create_sale(&self, sale: &NewSale) -> BackendResult<Option<SaleId>> {
        let omit_id = self.enter(Operation::CreateSale).await?;
        let mut ledgers = self.ledgers.write().await;
        let id = ledgers.next_id("sales");
        let date = ledgers.now();
        ledgers.sales.insert(
            id,
            Sale {
                id,
                date,
                customer_id: sale.customer_id,
                subtotal: sale.subtotal,
                taxes: sale.taxes,
                total: sale.total,
                payment_method: sale.payment_method,
                status: sale.status.unwrap_or_default(),
            },
        );
        debug!(sale_id = id, total = %sale.total, "Sale stored");
        Ok(if omit_id { None } else { Some(id) })
    }

    async fn get_sale(&self, id: SaleId) -> BackendResult<Sale> {
        self.enter(Operation::GetSale).await?;
        self.ledgers
            .read()
            .await
            .sales
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Sale", id))
    }

    async fn get_sales_by_date_range(&self, range: &DateRange) -> BackendResult<Vec<Sale>> {
        self.enter(Operation::GetSalesByDateRange).await?;
        Ok(self
            .ledgers
            .read()
            .await
            .sales
            .values()
            .filter(|s| range.contains(s.date))
            .cloned()
            .collect())
    }

    async fn cancel_sale(&self, id: SaleId) -> BackendResult<()> {
        self.enter(Operation::CancelSale).await?;
        if let Some(sale) = self.ledgers.write().await.sales.get_mut(&id) {
            sale.status = SaleStatus::Canceled;
        }
        Ok(())
    }

    async fn add_sale_detail(&self, detail: &NewSaleDetail) -> BackendResult<SaleDetailId> {
        const OP: Operation = Operation::AddSaleDetail;
        self.enter(OP).await?;

        if detail.quantity <= 0 {
            return Err(rejected(OP, "quantity must be greater than zero"));
        }
        if detail.unit_price.is_negative() || detail.discount.is_negative() {
            return Err(rejected(OP, "amounts must not be negative"));
        }
        let Some(gross) = detail.unit_price.checked_mul(detail.quantity) else {
            return Err(rejected(OP, "line amount is out of range"));
        };
        let subtotal = gross - detail.discount;
        if subtotal.is_negative() {
            return Err(rejected(OP, "discount exceeds the line amount"));
        }
        let tax_amount = subtotal.calculate_tax(TaxRate::from_percentage(detail.tax_percentage));

        let mut ledgers = self.ledgers.write().await;
        if !ledgers.sales.contains_key(&detail.sale_id) {
            return Err(rejected(OP, format!("sale {} does not exist", detail.sale_id)));
        }
        let Some(product) = ledgers.products.get_mut(&detail.product_id) else {
            return Err(rejected(
                OP,
                format!("product {} does not exist", detail.product_id),
            ));
        };
        product.stock -= detail.quantity;

        let id = ledgers.next_id("sale_details");
        ledgers.details.insert(
            id,
            SaleDetail {
                id,
                sale_id: detail.sale_id,
                product_id: detail.product_id,
                quantity: detail.quantity,
                unit_price: detail.unit_price,
                subtotal,
                discount: detail.discount,
                tax_amount,
            },
        );
        Ok(id)
    }

    async fn get_sale_details(&self, sale_id: SaleId) -> BackendResult<Vec<SaleDetailWithProduct>> {
        self.enter(Operation::GetSaleDetails).await?;
        let ledgers = self.ledgers.read().await;
        Ok(ledgers
            .details
            .values()
            .filter(|d| d.sale_id == sale_id)
            .filter_map(|d| {
                let product = ledgers.products.get(&d.product_id)?;
                Some(SaleDetailWithProduct {
                    id: d.id,
                    sale_id: d.sale_id,
                    product_id: d.product_id,
                    product_name: product.name.clone(),
                    product_code: product.code.clone(),
                    quantity: d.quantity,
                    unit_price: d.unit_price,
                    subtotal: d.subtotal,
                    discount: d.discount,
                    tax_amount: d.tax_amount,
                })
            })
            .collect())
    }

    // ---- invoices ----------------------------------------------------------

    async fn create_invoice(&self, invoice: &NewInvoice) -> BackendResult<InvoiceId> {
        self.enter(Operation::CreateInvoice).await?;
        let mut ledgers = self.ledgers.write().await;
        if !ledgers.sales.contains_key(&invoice.sale_id) {
            return Err(rejected(
                Operation::CreateInvoice,
                format!("sale {} does not exist", invoice.sale_id),
            ));
        }
        if ledgers.invoices.values().any(|i| i.uuid == invoice.uuid) {
            return Err(rejected(
                Operation::CreateInvoice,
                format!("invoice {} already exists", invoice.uuid),
            ));
        }
        let id = ledgers.next_id("invoices");
        let date = ledgers.now();
        ledgers.invoices.insert(
            id,
            Invoice {
                id,
                sale_id: invoice.sale_id,
                uuid: invoice.uuid.clone(),
                date,
                file_path: invoice.file_path.clone(),
                status: invoice.status.unwrap_or(InvoiceStatus::Active),
            },
        );
        Ok(id)
    }

    async fn get_invoices_by_sale(&self, sale_id: SaleId) -> BackendResult<Vec<Invoice>> {
        self.enter(Operation::GetInvoicesBySale).await?;
        Ok(self
            .ledgers
            .read()
            .await
            .invoices
            .values()
            .filter(|i| i.sale_id == sale_id)
            .cloned()
            .collect())
    }

    async fn cancel_invoice(&self, uuid: &str) -> BackendResult<()> {
        self.enter(Operation::CancelInvoice).await?;
        let mut ledgers = self.ledgers.write().await;
        if let Some(invoice) = ledgers.invoices.values_mut().find(|i| i.uuid == uuid) {
            invoice.status = InvoiceStatus::Canceled;
        }
        Ok(())
    }

    // ---- users -------------------------------------------------------------

    async fn authenticate_user(&self, username: &str, password: &str) -> BackendResult<Option<User>> {
        self.enter(Operation::AuthenticateUser).await?;
        let ledgers = self.ledgers.read().await;
        Ok(ledgers
            .users
            .values()
            .find(|u| u.user.is_active && u.user.username == username)
            .filter(|u| verify_password(password, &u.password_hash))
            .map(|u| u.user.clone()))
    }

    async fn get_all_users(&self) -> BackendResult<Vec<User>> {
        self.enter(Operation::GetAllUsers).await?;
        Ok(self
            .ledgers
            .read()
            .await
            .users
            .values()
            .map(|u| u.user.clone())
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> BackendResult<UserId> {
        self.enter(Operation::CreateUser).await?;
        let password_hash = hash_password(Operation::CreateUser, &user.password)?;
        let mut ledgers = self.ledgers.write().await;
        if ledgers
            .users
            .values()
            .any(|u| u.user.username == user.username || u.user.email == user.email)
        {
            return Err(rejected(
                Operation::CreateUser,
                "username or e-mail already registered",
            ));
        }
        let id = ledgers.next_id("users");
        ledgers.users.insert(
            id,
            StoredUser {
                user: User {
                    id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                    role: user.role,
                    full_name: user.full_name.clone(),
                    is_active: true,
                },
                password_hash,
            },
        );
        Ok(id)
    }

    async fn update_user(&self, user: &User) -> BackendResult<()> {
        self.enter(Operation::UpdateUser).await?;
        if let Some(stored) = self.ledgers.write().await.users.get_mut(&user.id) {
            stored.user = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> BackendResult<bool> {
        self.enter(Operation::DeleteUser).await?;
        match self.ledgers.write().await.users.remove(&id) {
            Some(_) => Ok(true),
            None => Err(not_found("User", id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
