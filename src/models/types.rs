//! Strong types for the valuation system.
//!
//! These types enforce clear boundaries and prevent mixing of concepts:
//! - `AssetId` - Our internal database identity
//! - `ProviderCode` - Identifies a pricing provider in the registry
//! - `Day` - UTC date bucket for daily valuations
//! - `Currency` - ISO 4217 currency code

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// AssetId
// =============================================================================

/// Database identity - our internal ID.
///
/// This is the canonical identifier for an asset within our system.
/// It should NOT contain provider-specific symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// ProviderCode
// =============================================================================

/// Provider identifier.
///
/// Identifies a pricing provider registered in the [`crate::registry::ProviderRegistry`].
/// Used for assignment records and for tracking where a value came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderCode(pub String);

impl ProviderCode {
    pub const SCHEDULED_YIELD: &'static str = "SCHEDULED_YIELD";
    pub const QUOTE_API: &'static str = "QUOTE_API";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn scheduled_yield() -> Self {
        Self(Self::SCHEDULED_YIELD.to_string())
    }

    pub fn quote_api() -> Self {
        Self(Self::QUOTE_API.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProviderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProviderCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProviderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Day
// =============================================================================

/// UTC date bucket for daily valuations.
///
/// Wraps `NaiveDate` to represent a single valuation day.
/// All prices are normalized to daily granularity using UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Day(pub NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Creates a Day from year, month, day components.
    /// Returns None if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the underlying NaiveDate.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parses a day from "YYYY-MM-DD" format.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }

    /// Returns today's date in UTC.
    pub fn today() -> Self {
        Self(chrono::Utc::now().date_naive())
    }

    /// Number of whole days from `other` to `self` (positive when `self`
    /// is later).
    pub fn days_since(&self, other: Day) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Day> for NaiveDate {
    fn from(day: Day) -> Self {
        day.0
    }
}

/// Every calendar day in `[start, end]`, ascending. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

// =============================================================================
// Currency
// =============================================================================

/// Currency code wrapper.
///
/// Provides type safety for ISO 4217 currency codes (e.g., "USD", "EUR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shape check for ISO 4217: exactly three ASCII uppercase letters.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Tests
// =============================================================================
