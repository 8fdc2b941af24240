//! # Headless Walkthrough
//!
//! Drives the UI commands against the in-memory backend: log in as the
//! default administrator, ring up two coffees and a bagel, pay cash, and
//! print each reply as the UI would receive it.
//!
//! ```text
//! login ──► add_to_cart ×3 ──► set_payment_method ──► submit_sale ──► stats
//! ```
//!
//! `cargo run -p salesys-desktop --example walkthrough`
//!
//! Set `RUST_LOG=salesys=debug` to watch each submission stage.

use std::error::Error;
use std::sync::Arc;

use salesys_client::MemoryBackend;
use salesys_core::{Money, NewProduct};
use salesys_desktop::commands::{auth, cart, dashboard, sale};
use salesys_desktop::state::AppConfig;
use salesys_desktop::{init_tracing, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = AppConfig::load_or_default(None);
    info!(store = %config.store_name, "Starting walkthrough");

    let backend = Arc::new(MemoryBackend::new());
    backend.seed_default_admin().await?;
    let coffee = backend
        .insert_product(NewProduct {
            name: "Coffee".to_string(),
            code: "CAF-01".to_string(),
            price: Money::from_cents(1000),
            stock: 50,
        })
        .await;
    let bagel = backend
        .insert_product(NewProduct {
            name: "Bagel".to_string(),
            code: "BAG-01".to_string(),
            price: Money::from_cents(550),
            stock: 30,
        })
        .await;

    let app = AppState::new(config, backend);

    let info = auth::login(
        &app.backend,
        &app.session,
        "AdminSalesys".to_string(),
        "admin".to_string(),
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    for product_id in [coffee, coffee, bagel] {
        cart::add_to_cart(&app.backend, &app.cart, &app.sale_form, product_id).await?;
    }
    println!("{}", serde_json::to_string_pretty(&cart::get_cart(&app.cart))?);

    sale::set_payment_method(&app.sale_form, Some("cash".to_string()))?;
    let submitted = sale::submit_sale(
        &app.session,
        &app.backend,
        &app.cart,
        &app.sale_form,
        &app.config,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&submitted)?);

    let stats =
        dashboard::get_dashboard_stats(&app.session, &app.backend, &app.config, dashboard::today())
            .await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    auth::logout(&app.session, &app.cart, &app.sale_form);
    Ok(())
}
