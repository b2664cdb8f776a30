//! Error types and retry classification for valuation operations.
//!
//! This module provides:
//! - [`ValuationError`]: The main error enum for all valuation operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Type alias for Result using [`ValuationError`].
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that can occur during valuation operations.
///
/// Each variant is classified via [`retry_class`](Self::retry_class), which
/// tells callers whether repeating the request can ever succeed without
/// fixing something first.
#[derive(Error, Debug)]
pub enum ValuationError {
    /// A required provider parameter is absent from the parameter bag.
    /// Terminal - the assignment must be corrected by the caller.
    #[error("Missing parameter '{field}' for provider {provider}")]
    MissingParams {
        /// The provider whose parameter schema was violated
        provider: String,
        /// The absent field
        field: String,
    },

    /// A provider parameter is present but fails schema or semantic checks.
    /// Terminal - the assignment must be corrected by the caller.
    #[error("Invalid parameters for provider {provider}: {message}")]
    InvalidParams {
        /// The provider whose parameter schema was violated
        provider: String,
        /// Field-specific description of the violation
        message: String,
    },

    /// No provider is registered under the requested code.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// A market-priced asset has no provider assignment yet.
    /// Terminal - the caller must assign a provider first.
    #[error("No provider assigned to asset {asset_id}")]
    AssignmentNotFound {
        /// The asset with no assignment
        asset_id: String,
    },

    /// Two providers were registered under the same code.
    /// This is a startup configuration error, never a runtime condition.
    #[error("Duplicate provider code: {0}")]
    DuplicateProviderCode(String),

    /// The provider does not implement an optional capability.
    /// Distinct from "no results" - callers must be able to tell them apart.
    #[error("Operation '{operation}' not supported by provider {provider}")]
    NotSupported {
        /// The unsupported operation (e.g. "search")
        operation: String,
        /// The provider that lacks the capability
        provider: String,
    },

    /// A network call to an external data source failed.
    #[error("Network error from provider {provider}: {message}")]
    Network {
        /// The provider that failed
        provider: String,
        /// The underlying failure
        message: String,
    },

    /// A provider call exceeded its deadline.
    #[error("Timeout calling provider {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The external source answered but could not serve the request
    /// (HTTP 5xx, malformed payload, declared failure status).
    #[error("Provider {provider} unavailable: {message}")]
    ProviderUnavailable {
        /// The provider that failed
        provider: String,
        /// The underlying failure
        message: String,
    },

    /// A history request with `start > end`.
    #[error("Invalid date range: {start} > {end}")]
    InvalidDateRange {
        /// Requested range start
        start: chrono::NaiveDate,
        /// Requested range end
        end: chrono::NaiveDate,
    },

    /// No observation exists on or before the requested date.
    /// This is an explicit "no data" answer, never a backfill.
    #[error("No data for asset {asset_id}")]
    NoData {
        /// The asset with no usable observations
        asset_id: String,
    },

    /// A computation failed on inputs that passed validation.
    /// Should be unreachable; any occurrence indicates a validation gap.
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// The price or assignment store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl ValuationError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: repeating the identical request cannot
    ///   succeed; the caller must fix the assignment or configuration.
    /// - [`RetryClass::Retryable`]: a later retry of the whole operation
    ///   (e.g. `refresh`) may succeed. The manager itself never auto-retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use valuation_engine::errors::{RetryClass, ValuationError};
    ///
    /// let error = ValuationError::Timeout { provider: "QUOTE_API".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Retryable);
    ///
    /// let error = ValuationError::ProviderNotFound("UNKNOWN".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::MissingParams { .. }
            | Self::InvalidParams { .. }
            | Self::ProviderNotFound(_)
            | Self::AssignmentNotFound { .. }
            | Self::DuplicateProviderCode(_)
            | Self::NotSupported { .. }
            | Self::InvalidDateRange { .. }
            | Self::NoData { .. }
            | Self::Calculation(_) => RetryClass::Never,

            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::ProviderUnavailable { .. }
            | Self::Store(_) => RetryClass::Retryable,
        }
    }
}
