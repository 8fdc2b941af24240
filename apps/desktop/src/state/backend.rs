//! # Backend State
//!
//! The remote backend and the sale submission coordinator built on it.
//! Both are shared and immutable after startup; the backend does its own
//! synchronization.
//!
//! ```rust,ignore
//! let products = backend
//!     .call(Operation::GetAllProducts, backend.inner().get_all_products())
//!     .await?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use salesys_client::{
    with_timeout, Backend, BackendResult, ClientConfig, Operation, SaleSubmissionCoordinator,
};

pub struct BackendState {
    backend: Arc<dyn Backend>,
    coordinator: SaleSubmissionCoordinator,
    call_timeout: Duration,
}

impl BackendState {
    pub fn new(backend: Arc<dyn Backend>, config: &ClientConfig) -> Self {
        BackendState {
            coordinator: SaleSubmissionCoordinator::new(backend.clone(), config),
            backend,
            call_timeout: config.call_timeout(),
        }
    }

    /// Replaces the coordinator, e.g. to attach an observer.
    pub fn with_coordinator(mut self, coordinator: SaleSubmissionCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    pub fn inner(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn coordinator(&self) -> &SaleSubmissionCoordinator {
        &self.coordinator
    }

    /// Runs one backend call under the configured timeout.
    pub async fn call<T, F>(&self, operation: Operation, call: F) -> BackendResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        with_timeout(operation, self.call_timeout, call).await
    }
}
