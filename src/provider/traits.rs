//! Valuation provider trait definition.
//!
//! This module defines the core `ValuationProvider` trait that all
//! pricing providers must implement. Providers are stateless with respect
//! to assets: everything they need arrives in the parameter bag, and they
//! return bare price points without touching persistence.

use async_trait::async_trait;

use crate::errors::{Result, ValuationError};
use crate::models::{Day, PricePoint, ProviderParams, SearchResult};

use super::capabilities::ProviderCapabilities;

/// Trait for valuation providers.
///
/// Implement this trait to add support for a new pricing source, whether
/// it fetches observed market data or computes values synthetically from
/// contractual terms. The registry addresses providers by their `code`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use valuation_engine::provider::{ProviderCapabilities, ValuationProvider};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl ValuationProvider for MyProvider {
///     fn code(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn name(&self) -> &'static str {
///         "My Pricing Source"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             synthetic: false,
///             supports_historical: true,
///             supports_search: false,
///         }
///     }
///
///     // ... implement validation and value methods
/// }
/// ```
#[async_trait]
pub trait ValuationProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "SCHEDULED_YIELD" or "QUOTE_API".
    /// Used for registry lookup, assignment records, and logging.
    fn code(&self) -> &'static str;

    /// Human-readable provider name for discovery listings.
    fn name(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Validate a parameter bag against this provider's schema.
    ///
    /// Pure and synchronous: no I/O, no clock reads. Returns
    /// field-specific `MissingParams`/`InvalidParams` errors so callers
    /// can report exactly what is wrong before an assignment is saved.
    fn validate_params(&self, params: &ProviderParams) -> Result<()>;

    /// The current value for the instrument described by `params`.
    ///
    /// Implementations validate `params` first and fail fast before any
    /// I/O or computation.
    async fn current_value(&self, params: &ProviderParams) -> Result<PricePoint>;

    /// Values for each day in `[start, end]`, ordered ascending.
    ///
    /// `start` must not be after `end` (`InvalidDateRange` otherwise).
    /// Market providers return only the days they have observations for;
    /// synthetic providers return every day in the range.
    async fn history_value(
        &self,
        params: &ProviderParams,
        start: Day,
        end: Day,
    ) -> Result<Vec<PricePoint>>;

    /// Search for instruments matching the query.
    ///
    /// Default implementation returns `NotSupported`, which lets callers
    /// distinguish "provider cannot search" from "no results".
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let _ = query;
        Err(ValuationError::NotSupported {
            operation: "search".to_string(),
            provider: self.code().to_string(),
        })
    }
}

/// Shared range check for `history_value` implementations.
pub(crate) fn check_date_range(start: Day, end: Day) -> Result<()> {
    if start > end {
        return Err(ValuationError::InvalidDateRange {
            start: start.date(),
            end: end.date(),
        });
    }
    Ok(())
}
