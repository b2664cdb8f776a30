//! Price and valuation result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AssetId, Currency, Day};

/// A single observed or computed value, as returned by a provider.
///
/// Providers know nothing about assets or persistence; they hand back bare
/// points and the manager shapes them into [`ValuationResult`]s and
/// [`PriceRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub day: Day,
    pub value: Decimal,
    pub currency: Currency,
    /// Source identifier (provider code or display source string).
    pub source: String,
}

impl PricePoint {
    pub fn new(day: Day, value: Decimal, currency: Currency, source: impl Into<String>) -> Self {
        Self {
            day,
            value,
            currency,
            source: source.into(),
        }
    }
}

/// How a value was carried forward from an earlier observation.
///
/// Present only on backfilled values; exact observations carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillInfo {
    /// The day of the true observation being reused.
    pub observed_on: Day,
    /// Calendar days between the observation and the requested day.
    pub days_carried: i64,
}

/// Persisted price row, keyed by `(asset_id, day)`.
///
/// Only non-synthetic providers produce these; synthetic values are
/// recomputed from terms on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub asset_id: AssetId,
    pub day: Day,
    pub value: Decimal,
    pub currency: Currency,
    pub source: String,
    /// Set when the stored row itself was a carried-forward value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill: Option<BackfillInfo>,
}

impl PriceRecord {
    /// An exact (non-backfilled) record from a provider point.
    pub fn exact(asset_id: AssetId, point: &PricePoint) -> Self {
        Self {
            asset_id,
            day: point.day,
            value: point.value,
            currency: point.currency.clone(),
            source: point.source.clone(),
            backfill: None,
        }
    }
}

/// Uniform output shape of the valuation manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub asset_id: AssetId,
    /// The day this value answers for (may differ from the observation day
    /// when backfilled).
    pub as_of: Day,
    pub value: Decimal,
    pub currency: Currency,
    pub source: String,
    /// `None` when the value is exact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill: Option<BackfillInfo>,
}

impl ValuationResult {
    /// An exact result straight from a provider point.
    pub fn exact(asset_id: AssetId, point: PricePoint) -> Self {
        Self {
            asset_id,
            as_of: point.day,
            value: point.value,
            currency: point.currency,
            source: point.source,
            backfill: None,
        }
    }

    /// A result answering for `as_of` by carrying `record` forward.
    pub fn carried(as_of: Day, record: &PriceRecord) -> Self {
        Self {
            asset_id: record.asset_id.clone(),
            as_of,
            value: record.value,
            currency: record.currency.clone(),
            source: record.source.clone(),
            backfill: Some(BackfillInfo {
                observed_on: record.day,
                days_carried: as_of.days_since(record.day),
            }),
        }
    }

    /// An exact result from a stored record.
    pub fn from_record(record: &PriceRecord) -> Self {
        Self {
            asset_id: record.asset_id.clone(),
            as_of: record.day,
            value: record.value,
            currency: record.currency.clone(),
            source: record.source.clone(),
            backfill: record.backfill,
        }
    }
}
