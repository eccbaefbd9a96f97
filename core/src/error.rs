//! Error types for the task-list core.
//!
//! # Design
//! Validation failures (`InvalidDate`, `InvalidSort`, `InvalidField`) are
//! raised before any store access and map to a client error. `NotFound`
//! gets a dedicated variant because callers answer it with a 404 rather
//! than a generic failure. Backend problems are carried as `Store`.

use thiserror::Error;

/// Why an 8-digit date string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("must be in yyyymmdd format")]
    Format,
    #[error("Invalid year")]
    Year,
    #[error("Invalid month")]
    Month,
    #[error("Invalid day")]
    Day,
    /// The components passed the range checks but name no calendar day,
    /// e.g. February 31st.
    #[error("day is out of range for month")]
    OutOfRange,
    /// The boundary value was neither a date nor a string.
    #[error("must be a date or yyyymmdd string")]
    Unsupported,
}

/// Why a `sort_by` / `sort_order` pair was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("Invalid sort field: {field}. Valid fields: {valid}")]
    UnknownField { field: String, valid: String },
    #[error("Invalid sort order: {order}. Valid orders: {valid}")]
    UnknownDirection { order: String, valid: String },
    #[error("sort_order is required when sort_by is set. Valid orders: {valid}")]
    MissingDirection { valid: String },
}

/// Errors raised by record-store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds this value.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),

    /// The backing storage failed.
    #[error("store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors returned by the task-list operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {field}: {reason}")]
    InvalidDate { field: &'static str, reason: DateError },

    #[error(transparent)]
    InvalidSort(#[from] SortError),

    /// A length or range constraint on a plain field was violated.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// No record matches the id within the caller's scope.
    #[error("Todo not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// True for input problems the caller can fix by changing the request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidDate { .. } | Error::InvalidSort(_) | Error::InvalidField { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
