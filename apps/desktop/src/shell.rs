//! # Tauri Command Bindings
//!
//! Registers every function in [`crate::commands`] with the webview's
//! `invoke` bridge. Each binding pulls its managed state out of Tauri and
//! delegates; no logic lives here.
//!
//! ```text
//!   invoke('add_to_cart', { productId: 7 })
//!        │
//!        ▼
//!   shell::add_to_cart(State<BackendState>, State<CartState>, ...)
//!        │
//!        ▼
//!   commands::cart::add_to_cart(&BackendState, &CartState, ...)
//! ```

use salesys_core::{
    Customer, CustomerId, Invoice, NewCustomer, NewProduct, NewUser, Product, ProductId, Sale,
    SaleDetailWithProduct, SaleId, SaleMetadata, User, UserId,
};
use tauri::State;

use crate::commands::auth::{self, SessionInfo};
use crate::commands::cart::{self, AddToCartResponse, CartResponse};
use crate::commands::dashboard::{self, DashboardStats, SalesQuery};
use crate::commands::sale::{self, SubmitSaleResponse};
use crate::commands::{customer, product, user};
use crate::error::ApiError;
use crate::state::{BackendState, CartState, ConfigState, SaleFormState, SessionState};

// =============================================================================
// Session
// =============================================================================

#[tauri::command]
pub async fn login(
    backend: State<'_, BackendState>,
    session: State<'_, SessionState>,
    username: String,
    password: String,
) -> Result<SessionInfo, ApiError> {
    auth::login(backend.inner(), session.inner(), username, password).await
}

#[tauri::command]
pub fn logout(
    session: State<'_, SessionState>,
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
) {
    auth::logout(session.inner(), cart.inner(), form.inner())
}

#[tauri::command]
pub fn get_session(session: State<'_, SessionState>) -> Option<SessionInfo> {
    auth::get_session(session.inner())
}

// =============================================================================
// Cart
// =============================================================================

#[tauri::command]
pub fn get_cart(cart: State<'_, CartState>) -> CartResponse {
    cart::get_cart(cart.inner())
}

#[tauri::command]
pub async fn add_to_cart(
    backend: State<'_, BackendState>,
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
    product_id: ProductId,
) -> Result<AddToCartResponse, ApiError> {
    cart::add_to_cart(backend.inner(), cart.inner(), form.inner(), product_id).await
}

#[tauri::command]
pub fn update_cart_item(
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
    product_id: ProductId,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    cart::update_cart_item(cart.inner(), form.inner(), product_id, quantity)
}

#[tauri::command]
pub fn remove_from_cart(
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
    product_id: ProductId,
) -> Result<CartResponse, ApiError> {
    cart::remove_from_cart(cart.inner(), form.inner(), product_id)
}

#[tauri::command]
pub fn clear_cart(
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
) -> Result<CartResponse, ApiError> {
    cart::clear_cart(cart.inner(), form.inner())
}

// =============================================================================
// Sale Form + Submission
// =============================================================================

#[tauri::command]
pub fn get_sale_form(form: State<'_, SaleFormState>) -> SaleMetadata {
    sale::get_sale_form(form.inner())
}

#[tauri::command]
pub fn set_sale_customer(
    form: State<'_, SaleFormState>,
    customer_id: Option<CustomerId>,
) -> Result<SaleMetadata, ApiError> {
    sale::set_sale_customer(form.inner(), customer_id)
}

#[tauri::command]
pub fn set_payment_method(
    form: State<'_, SaleFormState>,
    method: Option<String>,
) -> Result<SaleMetadata, ApiError> {
    sale::set_payment_method(form.inner(), method)
}

#[tauri::command]
pub fn set_sale_notes(
    form: State<'_, SaleFormState>,
    notes: Option<String>,
) -> Result<SaleMetadata, ApiError> {
    sale::set_sale_notes(form.inner(), notes)
}

#[tauri::command]
pub async fn submit_sale(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    cart: State<'_, CartState>,
    form: State<'_, SaleFormState>,
    config: State<'_, ConfigState>,
) -> Result<SubmitSaleResponse, ApiError> {
    sale::submit_sale(
        session.inner(),
        backend.inner(),
        cart.inner(),
        form.inner(),
        config.inner(),
    )
    .await
}

// =============================================================================
// Catalog
// =============================================================================

#[tauri::command]
pub async fn list_products(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
) -> Result<Vec<Product>, ApiError> {
    product::list_products(session.inner(), backend.inner()).await
}

#[tauri::command]
pub async fn search_products(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    query: String,
) -> Result<Vec<Product>, ApiError> {
    product::search_products(session.inner(), backend.inner(), query).await
}

#[tauri::command]
pub async fn get_product(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: ProductId,
) -> Result<Product, ApiError> {
    product::get_product(session.inner(), backend.inner(), id).await
}

#[tauri::command]
pub async fn create_product(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    product: NewProduct,
) -> Result<ProductId, ApiError> {
    product::create_product(session.inner(), backend.inner(), product).await
}

#[tauri::command]
pub async fn update_product(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: ProductId,
    product: NewProduct,
) -> Result<(), ApiError> {
    product::update_product(session.inner(), backend.inner(), id, product).await
}

#[tauri::command]
pub async fn delete_product(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: ProductId,
) -> Result<(), ApiError> {
    product::delete_product(session.inner(), backend.inner(), id).await
}

// =============================================================================
// Customers
// =============================================================================

#[tauri::command]
pub async fn list_customers(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
) -> Result<Vec<Customer>, ApiError> {
    customer::list_customers(session.inner(), backend.inner()).await
}

#[tauri::command]
pub async fn search_customers(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    query: String,
) -> Result<Vec<Customer>, ApiError> {
    customer::search_customers(session.inner(), backend.inner(), query).await
}

#[tauri::command]
pub async fn create_customer(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    customer: NewCustomer,
) -> Result<CustomerId, ApiError> {
    customer::create_customer(session.inner(), backend.inner(), customer).await
}

#[tauri::command]
pub async fn update_customer(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: CustomerId,
    customer: NewCustomer,
) -> Result<(), ApiError> {
    customer::update_customer(session.inner(), backend.inner(), id, customer).await
}

#[tauri::command]
pub async fn delete_customer(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: CustomerId,
) -> Result<(), ApiError> {
    customer::delete_customer(session.inner(), backend.inner(), id).await
}

// =============================================================================
// Users
// =============================================================================

#[tauri::command]
pub async fn list_users(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
) -> Result<Vec<User>, ApiError> {
    user::list_users(session.inner(), backend.inner()).await
}

#[tauri::command]
pub async fn create_user(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    user: NewUser,
) -> Result<UserId, ApiError> {
    user::create_user(session.inner(), backend.inner(), user).await
}

#[tauri::command]
pub async fn update_user(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    user: User,
) -> Result<(), ApiError> {
    user::update_user(session.inner(), backend.inner(), user).await
}

#[tauri::command]
pub async fn delete_user(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: UserId,
) -> Result<bool, ApiError> {
    user::delete_user(session.inner(), backend.inner(), id).await
}

// =============================================================================
// Dashboard
// =============================================================================

#[tauri::command]
pub async fn list_sales(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    query: Option<SalesQuery>,
) -> Result<Vec<Sale>, ApiError> {
    dashboard::list_sales(
        session.inner(),
        backend.inner(),
        query.unwrap_or_default(),
        dashboard::today(),
    )
    .await
}

#[tauri::command]
pub async fn get_dashboard_stats(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    config: State<'_, ConfigState>,
) -> Result<DashboardStats, ApiError> {
    dashboard::get_dashboard_stats(
        session.inner(),
        backend.inner(),
        config.inner(),
        dashboard::today(),
    )
    .await
}

#[tauri::command]
pub async fn get_sale(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: SaleId,
) -> Result<Sale, ApiError> {
    dashboard::get_sale(session.inner(), backend.inner(), id).await
}

#[tauri::command]
pub async fn get_sale_details(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    sale_id: SaleId,
) -> Result<Vec<SaleDetailWithProduct>, ApiError> {
    dashboard::get_sale_details(session.inner(), backend.inner(), sale_id).await
}

#[tauri::command]
pub async fn cancel_sale(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    id: SaleId,
) -> Result<(), ApiError> {
    dashboard::cancel_sale(session.inner(), backend.inner(), id).await
}

#[tauri::command]
pub async fn get_sale_invoices(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    sale_id: SaleId,
) -> Result<Vec<Invoice>, ApiError> {
    dashboard::get_sale_invoices(session.inner(), backend.inner(), sale_id).await
}

#[tauri::command]
pub async fn cancel_invoice(
    session: State<'_, SessionState>,
    backend: State<'_, BackendState>,
    sale_id: SaleId,
    uuid: String,
) -> Result<(), ApiError> {
    dashboard::cancel_invoice(session.inner(), backend.inner(), sale_id, uuid).await
}
