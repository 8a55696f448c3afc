//! Handler error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a handler reports back to the reconciliation engine
///
/// One variant per provider error kind. Remote API exceptions reach this
/// type through [`crate::classify`]; resource-reported failures discovered
/// while polling always land on `GeneralServiceError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Access denied for operation on {type_name}: {message}")]
    AccessDenied { type_name: String, message: String },

    #[error("Invalid request provided: {0}")]
    InvalidRequest(String),

    #[error("Internal error reported from downstream service: {0}")]
    ServiceInternalError(String),

    #[error("Limit exceeded for resource of type '{type_name}'. Reason: {message}")]
    ServiceLimitExceeded { type_name: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Rate exceeded: {0}")]
    Throttling(String),

    #[error("Resource conflict: {0}")]
    ResourceConflict(String),

    #[error("Error occurred during operation: {0}")]
    GeneralServiceError(String),
}

impl HandlerError {
    /// Not-found error for a resource that is absent or already failed
    pub fn not_found(type_name: &str, identifier: &str) -> Self {
        Self::NotFound(format!(
            "Resource of type '{}' with identifier '{}' was not found.",
            type_name, identifier
        ))
    }

    /// Stable, serializable code for this error
    pub fn code(&self) -> HandlerErrorCode {
        match self {
            Self::AccessDenied { .. } => HandlerErrorCode::AccessDenied,
            Self::InvalidRequest(_) => HandlerErrorCode::InvalidRequest,
            Self::ServiceInternalError(_) => HandlerErrorCode::ServiceInternalError,
            Self::ServiceLimitExceeded { .. } => HandlerErrorCode::ServiceLimitExceeded,
            Self::NotFound(_) => HandlerErrorCode::NotFound,
            Self::Throttling(_) => HandlerErrorCode::Throttling,
            Self::ResourceConflict(_) => HandlerErrorCode::ResourceConflict,
            Self::GeneralServiceError(_) => HandlerErrorCode::GeneralServiceError,
        }
    }
}

/// Error code carried by a failed progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    AccessDenied,
    InvalidRequest,
    ServiceInternalError,
    ServiceLimitExceeded,
    NotFound,
    Throttling,
    ResourceConflict,
    GeneralServiceError,
}

impl std::fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HandlerErrorCode::AccessDenied => "AccessDenied",
            HandlerErrorCode::InvalidRequest => "InvalidRequest",
            HandlerErrorCode::ServiceInternalError => "ServiceInternalError",
            HandlerErrorCode::ServiceLimitExceeded => "ServiceLimitExceeded",
            HandlerErrorCode::NotFound => "NotFound",
            HandlerErrorCode::Throttling => "Throttling",
            HandlerErrorCode::ResourceConflict => "ResourceConflict",
            HandlerErrorCode::GeneralServiceError => "GeneralServiceError",
        };
        f.write_str(name)
    }
}

/// Exception kinds a remote resource API can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    AccessDenied,
    Validation,
    InternalServerError,
    ServiceQuotaExceeded,
    ResourceNotFound,
    Throttling,
    Conflict,
    /// Anything the API raises outside the kinds above
    Other,
}

/// Implemented by remote API errors so they can be classified
pub trait RemoteFault: std::error::Error {
    fn kind(&self) -> RemoteErrorKind;
}

pub type Result<T> = std::result::Result<T, HandlerError>;
