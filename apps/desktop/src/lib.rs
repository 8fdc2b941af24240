//! # SaleSys Desktop Library
//!
//! Managed state and UI commands for the SaleSys point-of-sale client.
//! With the `tauri` feature, [`run`] opens the desktop window and binds the
//! webview's `invoke` calls to the functions in [`commands`].
//!
//! ## Module Organization
//! ```text
//! salesys_desktop/
//! ├── lib.rs          ◄─── You are here (tracing, AppState, run)
//! ├── shell.rs        ◄─── #[tauri::command] bindings (feature "tauri")
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── backend.rs  ◄─── Backend + submission coordinator
//! │   ├── cart.rs     ◄─── Cart state
//! │   ├── sale_form.rs◄─── Payment method, customer, notes, in-flight flag
//! │   ├── session.rs  ◄─── Logged-in user
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/       ◄─── One file per screen
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌───────────┐ ┌───────────────┐ ┌──────────────┐ ┌──────────────┐    │
//! │  │ CartState │ │ SaleFormState │ │ SessionState │ │ BackendState │    │
//! │  └───────────┘ └───────────────┘ └──────────────┘ └──────────────┘    │
//! │                                                    ┌──────────────┐    │
//! │  Each command only requests the state it needs.    │ ConfigState  │    │
//! │  AppState just bundles them for the host.          └──────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then environment)
//! 3. Connect to the backend gateway
//! 4. Create state objects and hand them to Tauri
//! 5. Register commands and launch the window

pub mod commands;
pub mod error;
#[cfg(feature = "tauri")]
pub mod shell;
pub mod state;

use std::sync::Arc;

use salesys_client::Backend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppConfig, BackendState, CartState, ConfigState, SaleFormState, SessionState};

/// Every piece of managed state, built once at startup.
pub struct AppState {
    pub cart: CartState,
    pub sale_form: SaleFormState,
    pub session: SessionState,
    pub backend: BackendState,
    pub config: ConfigState,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        info!(
            store = %config.store_name,
            call_timeout_ms = config.client.call_timeout_ms,
            "Initializing application state"
        );
        AppState {
            cart: CartState::new(),
            sale_form: SaleFormState::new(),
            session: SessionState::new(),
            backend: BackendState::new(backend, &config.client),
            config: ConfigState::new(config),
        }
    }
}

/// Runs the desktop application.
///
/// Fails before any window opens if the configuration names no usable
/// backend endpoint.
#[cfg(feature = "tauri")]
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    use tauri::Manager;

    init_tracing();
    info!("Starting SaleSys desktop application");

    tauri::Builder::default()
        .setup(|app| {
            let config = AppConfig::load_or_default(None);
            let backend = salesys_client::connect(&config.client)?;

            let AppState {
                cart,
                sale_form,
                session,
                backend,
                config,
            } = AppState::new(config, backend);

            app.manage(cart);
            app.manage(sale_form);
            app.manage(session);
            app.manage(backend);
            app.manage(config);

            info!("State initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            shell::login,
            shell::logout,
            shell::get_session,
            // Cart
            shell::get_cart,
            shell::add_to_cart,
            shell::update_cart_item,
            shell::remove_from_cart,
            shell::clear_cart,
            // Sale
            shell::get_sale_form,
            shell::set_sale_customer,
            shell::set_payment_method,
            shell::set_sale_notes,
            shell::submit_sale,
            // Catalog
            shell::list_products,
            shell::search_products,
            shell::get_product,
            shell::create_product,
            shell::update_product,
            shell::delete_product,
            // Customers
            shell::list_customers,
            shell::search_customers,
            shell::create_customer,
            shell::update_customer,
            shell::delete_customer,
            // Users
            shell::list_users,
            shell::create_user,
            shell::update_user,
            shell::delete_user,
            // Dashboard
            shell::list_sales,
            shell::get_dashboard_stats,
            shell::get_sale,
            shell::get_sale_details,
            shell::cancel_sale,
            shell::get_sale_invoices,
            shell::cancel_invoice,
        ])
        .run(tauri::generate_context!())?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=salesys=trace` - Show trace for salesys crates only
/// - Default: INFO, DEBUG for salesys crates
///
/// Calling it twice is harmless; the second subscriber is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salesys=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesys_client::MemoryBackend;

    #[test]
    fn test_app_state_uses_configured_timeout() {
        let mut config = AppConfig::default();
        config.client.call_timeout_ms = 250;

        let state = AppState::new(config, Arc::new(MemoryBackend::new()));

        assert_eq!(
            state.backend.coordinator().call_timeout(),
            std::time::Duration::from_millis(250)
        );
        assert_eq!(state.config.inner().store_name, "SaleSys");
        assert!(state.session.current().is_none());
    }
}
