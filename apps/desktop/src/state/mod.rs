//! # State Module
//!
//! Managed state for the desktop layer. Each command asks only for the
//! state it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────┐ ┌───────────────┐ ┌──────────────┐                    │
//! │  │  CartState  │ │ SaleFormState │ │ SessionState │                    │
//! │  │             │ │               │ │              │                    │
//! │  │  Mutex<     │ │  Mutex<       │ │  RwLock<     │                    │
//! │  │  CartEngine>│ │  SaleMetadata>│ │  Option<     │                    │
//! │  │             │ │  + in-flight  │ │  Session>>   │                    │
//! │  │             │ │    flag       │ │              │                    │
//! │  └─────────────┘ └───────────────┘ └──────────────┘                    │
//! │                                                                         │
//! │  ┌──────────────────────────────┐ ┌──────────────────┐                 │
//! │  │  BackendState                │ │   ConfigState    │                 │
//! │  │  Arc<dyn Backend>            │ │   AppConfig      │                 │
//! │  │  SaleSubmissionCoordinator   │ │   (read-only)    │                 │
//! │  └──────────────────────────────┘ └──────────────────┘                 │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState / SaleFormState: locked only for quick, synchronous work  │
//! │    (never across a backend call)                                       │
//! │  • SessionState: many readers, written on login/logout                 │
//! │  • BackendState / ConfigState: immutable after startup                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod backend;
mod cart;
mod config;
mod sale_form;
mod session;

pub use backend::BackendState;
pub use cart::CartState;
pub use config::{AppConfig, ConfigState};
pub use sale_form::{SaleFormState, SubmissionGuard};
pub use session::SessionState;
