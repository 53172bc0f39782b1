//! # API Error Type
//!
//! Unified error type for command functions.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Procura                                │
//! │                                                                         │
//! │  Command Function ── Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── CoreError::CompositeNotFound ────────► NOT_FOUND            │
//! │         ├── CoreError::Validation ───────────────► VALIDATION_ERROR     │
//! │         ├── CoreError::UnknownContainerType ─────► BUSINESS_LOGIC       │
//! │         ├── ConfigError ─────────────────────────► CONFIG_ERROR         │
//! │         └── io / unexpected ─────────────────────► INTERNAL             │
//! │                                                                         │
//! │  The binary prints the error as JSON on stderr:                        │
//! │  { "code": "NOT_FOUND", "message": "Composite not found: KIT-9" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Degraded input is never an error here. It travels as `EngineWarning`s
//! inside successful results.

use procura_core::CoreError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from command functions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Composite, component or line not found
    NotFound,

    /// Input rejected at write time
    ValidationError,

    /// Request is well-formed but cannot be served
    BusinessLogic,

    /// Configuration could not be loaded, saved or validated
    ConfigError,

    /// Anything unexpected
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CompositeNotFound(sku) => ApiError::not_found("Composite", &sku),
            CoreError::ComponentNotFound {
                composite,
                component,
            } => ApiError::new(
                ErrorCode::NotFound,
                format!("Component {} not found in composite {}", component, composite),
            ),
            CoreError::LineItemNotFound(id) => ApiError::not_found("Quotation line", &id),
            CoreError::UnknownContainerType(code) => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Unknown container type: {}", code),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Malformed JSON input is a validation failure.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Invalid JSON input: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
