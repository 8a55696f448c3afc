//! Remote error classification
//!
//! Every remote call boundary (create, get, update, delete, list) funnels its
//! error through [`classify`], so the same remote exception always surfaces
//! as the same handler error no matter which step raised it.

use crate::error::{HandlerError, RemoteErrorKind, RemoteFault};

/// Map a remote API error onto the handler error taxonomy
pub fn classify<E>(type_name: &str, error: &E) -> HandlerError
where
    E: RemoteFault + ?Sized,
{
    let message = error.to_string();
    match error.kind() {
        RemoteErrorKind::AccessDenied => HandlerError::AccessDenied {
            type_name: type_name.to_string(),
            message,
        },
        RemoteErrorKind::Validation => HandlerError::InvalidRequest(message),
        RemoteErrorKind::InternalServerError => HandlerError::ServiceInternalError(message),
        RemoteErrorKind::ServiceQuotaExceeded => HandlerError::ServiceLimitExceeded {
            type_name: type_name.to_string(),
            message,
        },
        RemoteErrorKind::ResourceNotFound => HandlerError::NotFound(message),
        RemoteErrorKind::Throttling => HandlerError::Throttling(message),
        RemoteErrorKind::Conflict => HandlerError::ResourceConflict(message),
        RemoteErrorKind::Other => HandlerError::GeneralServiceError(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerErrorCode;

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct Fault {
        kind: RemoteErrorKind,
        message: String,
    }

    impl RemoteFault for Fault {
        fn kind(&self) -> RemoteErrorKind {
            self.kind
        }
    }

    fn fault(kind: RemoteErrorKind) -> Fault {
        Fault {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_taxonomy() {
        let table = [
            (RemoteErrorKind::AccessDenied, HandlerErrorCode::AccessDenied),
            (RemoteErrorKind::Validation, HandlerErrorCode::InvalidRequest),
            (
                RemoteErrorKind::InternalServerError,
                HandlerErrorCode::ServiceInternalError,
            ),
            (
                RemoteErrorKind::ServiceQuotaExceeded,
                HandlerErrorCode::ServiceLimitExceeded,
            ),
            (RemoteErrorKind::ResourceNotFound, HandlerErrorCode::NotFound),
            (RemoteErrorKind::Throttling, HandlerErrorCode::Throttling),
            (RemoteErrorKind::Conflict, HandlerErrorCode::ResourceConflict),
            (RemoteErrorKind::Other, HandlerErrorCode::GeneralServiceError),
        ];

        for (remote, expected) in table {
            assert_eq!(classify("Test::Widget", &fault(remote)).code(), expected);
        }
    }

    #[test]
    fn test_keeps_original_message() {
        let err = classify("Test::Widget", &fault(RemoteErrorKind::Other));
        assert_eq!(err, HandlerError::GeneralServiceError("boom".to_string()));

        let err = classify("Test::Widget", &fault(RemoteErrorKind::ServiceQuotaExceeded));
        assert!(err.to_string().contains("Test::Widget"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_accepts_trait_objects() {
        let boxed: Box<dyn RemoteFault> = Box::new(fault(RemoteErrorKind::Throttling));
        assert_eq!(
            classify("Test::Widget", boxed.as_ref()).code(),
            HandlerErrorCode::Throttling
        );
    }
}
