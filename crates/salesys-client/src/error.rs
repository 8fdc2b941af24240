//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌──────────────────────────┐  ┌───────────────┐  │
//! │  │  BackendError   │  │    SubmissionError       │  │  ClientError  │  │
//! │  │  (one call)     │  │    (one sale attempt)    │  │  (config)     │  │
//! │  │                 │  │                          │  │               │  │
//! │  │  Remote         │  │  local:                  │  │  InvalidConfig│  │
//! │  │  Transport      │  │    EmptyCart             │  │               │  │
//! │  │  Decode         │  │    MissingPaymentMethod  │  │               │  │
//! │  │  NotFound       │  │  remote:                 │  │               │  │
//! │  │  Timeout        │  │    SaleCreationFailed    │  │               │  │
//! │  │                 │  │    DetailRecordingFailed │  │               │  │
//! │  │                 │  │    InvoiceCreationFailed │  │               │  │
//! │  │                 │  │    Timeout               │  │               │  │
//! │  └─────────────────┘  └──────────────────────────┘  └───────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submission errors raised after `create_sale` succeeded carry the sale id:
//! nothing already persisted is rolled back, and the caller must be able to
//! tell the cashier which sale is incomplete.

use std::time::Duration;

use salesys_core::SaleId;
use thiserror::Error;

use crate::backend::Operation;
use crate::coordinator::SubmissionStage;

/// Result type alias for single backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type alias for client setup.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Backend Error
// =============================================================================

/// Failure of one remote operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The backend ran the operation and rejected it.
    #[error("{operation} failed: {message}")]
    Remote {
        operation: Operation,
        message: String,
    },

    /// The call never reached the backend, or its reply was lost.
    #[error("{operation} could not reach the backend: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },

    /// The reply did not have the expected shape.
    #[error("{operation} returned an unexpected reply: {reason}")]
    Decode { operation: Operation, reason: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: Operation,
        after: Duration,
    },
}

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }
}

// =============================================================================
// Submission Error
// =============================================================================

/// Why a sale submission failed. Never carries partial success.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("The cart is empty")]
    EmptyCart,

    #[error("Select a payment method")]
    MissingPaymentMethod,

    /// `create_sale` failed or returned no id. Nothing was persisted.
    #[error("The sale could not be created: {reason}")]
    SaleCreationFailed { reason: String },

    /// At least one `add_sale_detail` failed. Reported only after every
    /// detail call settled; the sale and the other details remain.
    #[error("Sale {sale_id} was created but {failed} of {total} items could not be recorded")]
    DetailRecordingFailed {
        sale_id: SaleId,
        failed: usize,
        total: usize,
    },

    /// `create_invoice` failed; the sale and all its details remain.
    #[error("Sale {sale_id} was recorded but its invoice could not be created: {reason}")]
    InvoiceCreationFailed { sale_id: SaleId, reason: String },

    /// A call of the given stage did not answer in time. Whether it took
    /// effect on the backend is unknown.
    #[error("{}", timeout_message(.stage, .sale_id))]
    Timeout {
        stage: SubmissionStage,
        sale_id: Option<SaleId>,
    },
}

fn timeout_message(stage: &SubmissionStage, sale_id: &Option<SaleId>) -> String {
    match sale_id {
        Some(id) => format!("The backend did not answer while {stage} for sale {id}"),
        None => format!("The backend did not answer while {stage}"),
    }
}

impl SubmissionError {
    /// The persisted sale left behind by a partial failure, if any.
    pub fn sale_id(&self) -> Option<SaleId> {
        match self {
            SubmissionError::DetailRecordingFailed { sale_id, .. }
            | SubmissionError::InvoiceCreationFailed { sale_id, .. } => Some(*sale_id),
            SubmissionError::Timeout { sale_id, .. } => *sale_id,
            _ => None,
        }
    }

    /// True for failures detected before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SubmissionError::EmptyCart | SubmissionError::MissingPaymentMethod
        )
    }
}

// =============================================================================
// Client Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_messages() {
        let err = BackendError::Remote {
            operation: Operation::CreateSale,
            message: "database is locked".to_string(),
        };
        assert_eq!(err.to_string(), "create_sale failed: database is locked");

        let err = BackendError::Timeout {
            operation: Operation::AddSaleDetail,
            after: Duration::from_secs(2),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "add_sale_detail timed out after 2s");
    }

    #[test]
    fn test_submission_error_messages() {
        assert_eq!(SubmissionError::EmptyCart.to_string(), "The cart is empty");

        let err = SubmissionError::DetailRecordingFailed {
            sale_id: 9,
            failed: 1,
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "Sale 9 was created but 1 of 3 items could not be recorded"
        );

        let err = SubmissionError::Timeout {
            stage: SubmissionStage::CreatingInvoice,
            sale_id: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "The backend did not answer while creating the invoice for sale 4"
        );
    }

    #[test]
    fn test_partial_failures_expose_sale_id() {
        assert_eq!(SubmissionError::EmptyCart.sale_id(), None);
        assert!(SubmissionError::MissingPaymentMethod.is_local());

        let err = SubmissionError::InvoiceCreationFailed {
            sale_id: 12,
            reason: "disk full".to_string(),
        };
        assert_eq!(err.sale_id(), Some(12));
        assert!(!err.is_local());
    }
}
