//! # API Error Type
//!
//! Unified error type for desktop commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in SaleSys                                │
//! │                                                                         │
//! │  UI                          Desktop layer                              │
//! │  ──                          ─────────────                              │
//! │                                                                         │
//! │  invoke('submit_sale')                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Validation? ─── ValidationError / CoreError ──┐                │  │
//! │  │  Remote call? ── BackendError ─────────────────┼─► ApiError ───►│  │
//! │  │  Submission? ─── SubmissionError ──────────────┘                │  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code    = "SUBMISSION_FAILED"                                   │
//! │    // e.message = "Sale 9 was created but 1 of 3 items ..."             │
//! │    // e.saleId  = 9                                                     │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use salesys_client::{BackendError, ClientError, SubmissionError};
use salesys_core::{CoreError, SaleId, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error returned from commands.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product 7 not found" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Sale left behind by a partially failed submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<SaleId>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No session, or wrong credentials
    Unauthorized,

    /// The session's role may not use this feature
    Forbidden,

    /// The backend rejected the call or could not be reached
    BackendError,

    /// A backend call did not answer in time
    Timeout,

    /// A sale submission failed after reaching the backend
    SubmissionFailed,

    /// A sale submission is already running
    Busy,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            sale_id: None,
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} {} not found", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn busy(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Busy, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn with_sale_id(mut self, sale_id: Option<SaleId>) -> Self {
        self.sale_id = sale_id;
        self
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AccessDenied { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::InvalidDateRange { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Backend rejections are shown as-is; connectivity and decode problems are
/// logged and replaced with a generic message.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound { entity, id } => ApiError::not_found(entity, id),
            BackendError::Remote { .. } => ApiError::new(ErrorCode::BackendError, err.to_string()),
            BackendError::Timeout { .. } => ApiError::new(ErrorCode::Timeout, err.to_string()),
            BackendError::Transport { .. } => {
                error!(error = %err, "Backend unreachable");
                ApiError::new(ErrorCode::BackendError, "The backend is not available")
            }
            BackendError::Decode { .. } => {
                error!(error = %err, "Unexpected backend reply");
                ApiError::new(ErrorCode::BackendError, "The backend sent an unexpected reply")
            }
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        let code = match &err {
            SubmissionError::EmptyCart | SubmissionError::MissingPaymentMethod => {
                ErrorCode::ValidationError
            }
            SubmissionError::Timeout { .. } => ErrorCode::Timeout,
            _ => ErrorCode::SubmissionFailed,
        };
        ApiError::new(code, err.to_string()).with_sale_id(err.sale_id())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use salesys_client::{Operation, SubmissionStage};
    use salesys_core::{MenuSection, UserRole};

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", 7);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product 7 not found");
        assert!(json.get("saleId").is_none());
    }

    #[test]
    fn test_partial_submission_keeps_sale_id() {
        let err: ApiError = SubmissionError::DetailRecordingFailed {
            sale_id: 9,
            failed: 1,
            total: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::SubmissionFailed);
        assert_eq!(err.sale_id, Some(9));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["saleId"], 9);
    }

    #[test]
    fn test_submission_error_codes() {
        let err: ApiError = SubmissionError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "The cart is empty");

        let err: ApiError = SubmissionError::Timeout {
            stage: SubmissionStage::CreatingSale,
            sale_id: None,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.sale_id, None);
    }

    #[test]
    fn test_transport_errors_are_masked() {
        let err: ApiError = BackendError::Transport {
            operation: Operation::GetAllProducts,
            message: "connection refused at 127.0.0.1".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert!(!err.message.contains("127.0.0.1"));
    }

    #[test]
    fn test_access_denied_is_forbidden() {
        let err: ApiError = CoreError::AccessDenied {
            role: UserRole::Manager,
            section: MenuSection::NewSale,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
