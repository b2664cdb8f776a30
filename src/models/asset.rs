//! Asset domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AssetId, Currency};

/// How an asset is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationModel {
    /// Priced from observed market data via an assigned provider.
    #[default]
    MarketPrice,
    /// Priced synthetically from contractual terms (loans, bonds, notes).
    ScheduledYield,
}

/// One contiguous stretch of a fixed annual interest rate.
///
/// Both dates are inclusive. Periods need not be gap-free or
/// non-overlapping; when several contain the same date, the one with the
/// latest `start_date` wins.
///
/// Serialized with snake_case field names: this struct appears verbatim in
/// provider parameter bags, whose schema is part of the external interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Annualized rate as a decimal fraction (0.06 = 6%).
    pub rate: Decimal,
}

impl InterestPeriod {
    /// Whether this period covers `date` (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Terms applied after the grace period following maturity.
///
/// Serialized snake_case, same reason as [`InterestPeriod`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateInterestTerms {
    /// Annualized late rate as a decimal fraction.
    pub rate: Decimal,
    /// Days past maturity during which the last scheduled rate still applies.
    pub grace_period_days: u32,
}

/// Contractual terms of a scheduled-yield instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledYieldTerms {
    /// Principal on which interest accrues. Must be positive.
    pub face_value: Decimal,
    pub maturity_date: NaiveDate,
    /// Ordered interest schedule.
    pub interest_schedule: Vec<InterestPeriod>,
    /// Absent means the rate drops to zero after maturity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_interest: Option<LateInterestTerms>,
}

impl ScheduledYieldTerms {
    /// The earliest period start, i.e. the day accrual begins.
    /// None when the schedule is empty.
    pub fn schedule_start(&self) -> Option<NaiveDate> {
        self.interest_schedule.iter().map(|p| p.start_date).min()
    }
}

/// Domain model for a valued asset.
///
/// Bookkeeping fields (name, classification, activity links) live with the
/// asset-management collaborator; this is the slice the valuation engine
/// needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub valuation_model: ValuationModel,
    /// Base currency of the asset.
    pub currency: Currency,
    /// Contractual terms; required for `ScheduledYield` assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<ScheduledYieldTerms>,
}

impl Asset {
    /// A market-priced asset with no contractual terms.
    pub fn market(id: impl Into<AssetId>, currency: impl Into<Currency>) -> Self {
        Self {
            id: id.into(),
            valuation_model: ValuationModel::MarketPrice,
            currency: currency.into(),
            terms: None,
        }
    }

    /// A scheduled-yield asset valued from its own terms.
    pub fn scheduled_yield(
        id: impl Into<AssetId>,
        currency: impl Into<Currency>,
        terms: ScheduledYieldTerms,
    ) -> Self {
        Self {
            id: id.into(),
            valuation_model: ValuationModel::ScheduledYield,
            currency: currency.into(),
            terms: Some(terms),
        }
    }
}
