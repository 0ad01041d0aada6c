//! Cart error types.

use crate::batch::BatchReport;
use thiserror::Error;
use trip_cache::CacheError;
use trip_commerce::CommerceError;
use trip_data::FetchError;

/// Errors surfaced by cart operations.
///
/// `Clone` because one in-flight cart fetch is shared by every caller that
/// asked for it while it was running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// A required field was missing or out of range; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced line item or activity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the credentials; they have been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Any other non-success response or transport failure.
    #[error("Server error: {0}")]
    Server(String),

    /// At least one request of a fan-out batch failed.
    #[error("{} of {} requests failed", .0.failed(), .0.total())]
    PartialFailure(BatchReport),

    /// Local storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The store behind a handle was disposed or dropped.
    #[error("Cart store is no longer active")]
    Inactive,
}

impl From<FetchError> for CartError {
    fn from(e: FetchError) -> Self {
        if e.is_unauthorized() {
            return CartError::SessionExpired;
        }
        match e {
            FetchError::Api { code: 404, message } => CartError::NotFound(message),
            FetchError::HttpError {
                status: 404,
                message,
            } => CartError::NotFound(message),
            other => CartError::Server(other.to_string()),
        }
    }
}

impl From<CommerceError> for CartError {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::Overflow | CommerceError::CurrencyMismatch { .. } => {
                CartError::Server(e.to_string())
            }
            other => CartError::Validation(other.to_string()),
        }
    }
}

impl From<CacheError> for CartError {
    fn from(e: CacheError) -> Self {
        CartError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        let unauthorized = FetchError::Api {
            code: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(CartError::from(unauthorized), CartError::SessionExpired);

        let http_unauthorized = FetchError::HttpError {
            status: 401,
            message: String::new(),
        };
        assert_eq!(CartError::from(http_unauthorized), CartError::SessionExpired);

        let missing = FetchError::Api {
            code: 404,
            message: "Cart not found".into(),
        };
        assert_eq!(
            CartError::from(missing),
            CartError::NotFound("Cart not found".into())
        );

        assert!(matches!(
            CartError::from(FetchError::Timeout),
            CartError::Server(_)
        ));
        assert!(matches!(
            CartError::from(FetchError::Api {
                code: 500,
                message: "boom".into()
            }),
            CartError::Server(_)
        ));
    }

    #[test]
    fn test_commerce_error_mapping() {
        assert!(matches!(
            CartError::from(CommerceError::InvalidQuantity(0)),
            CartError::Validation(_)
        ));
        assert!(matches!(
            CartError::from(CommerceError::Overflow),
            CartError::Server(_)
        ));
    }
}
