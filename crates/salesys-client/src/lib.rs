//! # salesys-client: Backend Boundary for SaleSys
//!
//! Every call that leaves the point-of-sale client goes through this crate.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Architecture                               │
//! │                                                                         │
//! │   CartSnapshot + SaleMetadata                                           │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   ┌──────────────────────────────┐                                      │
//! │   │  SaleSubmissionCoordinator   │   1. create_sale                     │
//! │   │  (coordinator.rs)            │   2. add_sale_detail × N (parallel)  │
//! │   │                              │   3. create_invoice                  │
//! │   └──────────────┬───────────────┘                                      │
//! │                  │ Arc<dyn Backend>                                     │
//! │                  ▼                                                      │
//! │   ┌──────────────────────────────┐                                      │
//! │   │  Backend trait (backend/)    │                                      │
//! │   │  ├── RpcBackend<I: Invoke>   │  name + JSON payload transport       │
//! │   │  │   └── HttpTransport       │  POST {endpoint}/{operation}         │
//! │   │  └── MemoryBackend           │  dev double, fault injection         │
//! │   └──────────────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,no_run
//! use std::sync::Arc;
//! use salesys_client::{ClientConfig, MemoryBackend, SaleSubmissionCoordinator};
//! use salesys_core::{CartEngine, Money, PaymentMethod, Product, SaleMetadata};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(MemoryBackend::new());
//! let coordinator = SaleSubmissionCoordinator::new(backend, &ClientConfig::default());
//!
//! let mut cart = CartEngine::new();
//! cart.add_item(&Product::new(1, "Coffee", "CAF-01", Money::from_cents(1000), 10));
//!
//! let mut meta = SaleMetadata::new();
//! meta.set_payment_method(Some(PaymentMethod::Cash));
//!
//! let submitted = coordinator.submit(&cart.snapshot(), &meta).await?;
//! println!("sale {} invoiced as {}", submitted.sale_id, submitted.invoice_uuid);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;

pub use backend::memory::{Fault, MemoryBackend, Trigger};
pub use backend::http::HttpTransport;
pub use backend::rpc::{Invoke, InvokeError, RpcBackend};
pub use backend::{connect, with_timeout, Backend, Operation};
pub use config::ClientConfig;
pub use coordinator::{
    NoOpObserver, SaleSubmissionCoordinator, SubmissionObserver, SubmissionStage, SubmittedSale,
};
pub use error::{BackendError, BackendResult, ClientError, ClientResult, SubmissionError};
