//! Commerce error types.

use thiserror::Error;

/// Errors raised while building or validating domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// A required field was left empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Check-out is not after check-in.
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange { check_in: String, check_out: String },

    /// A date string could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
