//! Nimble Studio API error types

use serde::{Deserialize, Serialize};
use studioflow_cloud::{RemoteErrorKind, RemoteFault};
use thiserror::Error;

/// Exception kinds raised by the Nimble Studio API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NimbleErrorKind {
    AccessDenied,
    Validation,
    InternalServerError,
    ServiceQuotaExceeded,
    ResourceNotFound,
    Throttling,
    Conflict,
    Other,
}

impl NimbleErrorKind {
    pub const ALL: [NimbleErrorKind; 8] = [
        NimbleErrorKind::AccessDenied,
        NimbleErrorKind::Validation,
        NimbleErrorKind::InternalServerError,
        NimbleErrorKind::ServiceQuotaExceeded,
        NimbleErrorKind::ResourceNotFound,
        NimbleErrorKind::Throttling,
        NimbleErrorKind::Conflict,
        NimbleErrorKind::Other,
    ];
}

impl std::fmt::Display for NimbleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NimbleErrorKind::AccessDenied => write!(f, "AccessDeniedException"),
            NimbleErrorKind::Validation => write!(f, "ValidationException"),
            NimbleErrorKind::InternalServerError => write!(f, "InternalServerErrorException"),
            NimbleErrorKind::ServiceQuotaExceeded => write!(f, "ServiceQuotaExceededException"),
            NimbleErrorKind::ResourceNotFound => write!(f, "ResourceNotFoundException"),
            NimbleErrorKind::Throttling => write!(f, "ThrottlingException"),
            NimbleErrorKind::Conflict => write!(f, "ConflictException"),
            NimbleErrorKind::Other => write!(f, "NimbleException"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct NimbleError {
    pub kind: NimbleErrorKind,
    pub message: String,
}

impl NimbleError {
    pub fn new(kind: NimbleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self::new(
            NimbleErrorKind::ResourceNotFound,
            format!("{} {} does not exist", what, id),
        )
    }

    pub fn conflict(what: &str, id: &str, state: &str) -> Self {
        Self::new(
            NimbleErrorKind::Conflict,
            format!("{} {} is {}", what, id, state),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(NimbleErrorKind::Validation, message)
    }
}

impl RemoteFault for NimbleError {
    fn kind(&self) -> RemoteErrorKind {
        match self.kind {
            NimbleErrorKind::AccessDenied => RemoteErrorKind::AccessDenied,
            NimbleErrorKind::Validation => RemoteErrorKind::Validation,
            NimbleErrorKind::InternalServerError => RemoteErrorKind::InternalServerError,
            NimbleErrorKind::ServiceQuotaExceeded => RemoteErrorKind::ServiceQuotaExceeded,
            NimbleErrorKind::ResourceNotFound => RemoteErrorKind::ResourceNotFound,
            NimbleErrorKind::Throttling => RemoteErrorKind::Throttling,
            NimbleErrorKind::Conflict => RemoteErrorKind::Conflict,
            NimbleErrorKind::Other => RemoteErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, NimbleError>;
