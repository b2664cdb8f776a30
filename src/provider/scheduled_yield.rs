//! Scheduled-yield provider: computes values from contractual terms.
//!
//! This provider never performs I/O. Every value is derived on demand from
//! the accrual calculator, so its outputs are never persisted; a change to
//! an instrument's terms is reflected on the very next request.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use crate::accrual;
use crate::errors::{Result, ValuationError};
use crate::models::{
    Currency, Day, InterestPeriod, LateInterestTerms, PricePoint, ProviderCode, ProviderParams,
    ScheduledYieldTerms,
};

use super::capabilities::ProviderCapabilities;
use super::traits::{check_date_range, ValuationProvider};

/// Display source attached to every computed point.
pub const SOURCE: &str = "Scheduled Investment Calculator";

/// Parsed and validated scheduled-yield parameters.
///
/// Parameter bags use snake_case field names; see the schema owned by this
/// provider: `face_value` (positive decimal string), `currency` (ISO 4217),
/// `maturity_date`, `interest_schedule`, optional `late_interest`.
#[derive(Debug, Clone)]
struct ScheduledYieldParams {
    terms: ScheduledYieldTerms,
    currency: Currency,
}

impl ScheduledYieldParams {
    fn parse(params: &ProviderParams) -> Result<Self> {
        let code = ProviderCode::SCHEDULED_YIELD;

        let face_value = params.required_decimal(code, "face_value")?;
        if face_value <= Decimal::ZERO {
            return Err(ValuationError::InvalidParams {
                provider: code.to_string(),
                message: "field 'face_value': must be positive".to_string(),
            });
        }

        let currency: Currency = params.required(code, "currency")?;
        if !currency.is_well_formed() {
            return Err(ValuationError::InvalidParams {
                provider: code.to_string(),
                message: format!(
                    "field 'currency': '{}' is not a three-letter ISO 4217 code",
                    currency
                ),
            });
        }

        let maturity_date: NaiveDate = params.required(code, "maturity_date")?;
        let interest_schedule: Vec<InterestPeriod> =
            params.required(code, "interest_schedule")?;

        for period in &interest_schedule {
            if period.start_date > period.end_date {
                return Err(ValuationError::InvalidParams {
                    provider: code.to_string(),
                    message: format!(
                        "field 'interest_schedule': period starting {} ends before it starts",
                        period.start_date
                    ),
                });
            }
            if period.rate < Decimal::ZERO {
                return Err(ValuationError::InvalidParams {
                    provider: code.to_string(),
                    message: format!(
                        "field 'interest_schedule': period starting {} has a negative rate",
                        period.start_date
                    ),
                });
            }
        }

        let late_interest: Option<LateInterestTerms> = params.optional(code, "late_interest")?;
        if let Some(late) = &late_interest {
            if late.rate < Decimal::ZERO {
                return Err(ValuationError::InvalidParams {
                    provider: code.to_string(),
                    message: "field 'late_interest': rate must not be negative".to_string(),
                });
            }
        }

        Ok(Self {
            terms: ScheduledYieldTerms {
                face_value,
                maturity_date,
                interest_schedule,
                late_interest,
            },
            currency,
        })
    }

    fn point_for(&self, day: Day) -> PricePoint {
        let value = accrual::value_at(&self.terms, day.date());
        PricePoint::new(day, value, self.currency.clone(), SOURCE)
    }
}

/// Synthetic provider for scheduled-yield instruments (loans, bonds, notes).
#[derive(Debug, Default)]
pub struct ScheduledYieldProvider;

impl ScheduledYieldProvider {
    pub fn new() -> Self {
        Self
    }

    /// Build a parameter bag from typed terms, the inverse of parsing.
    ///
    /// Used by the manager to auto-assign this provider from an asset's
    /// own terms.
    pub fn params_from_terms(
        terms: &ScheduledYieldTerms,
        currency: &Currency,
    ) -> Result<ProviderParams> {
        let value = serde_json::json!({
            "face_value": terms.face_value,
            "currency": currency,
            "maturity_date": terms.maturity_date,
            "interest_schedule": &terms.interest_schedule,
            "late_interest": &terms.late_interest,
        });
        ProviderParams::from_value(ProviderCode::SCHEDULED_YIELD, value)
    }
}

#[async_trait]
impl ValuationProvider for ScheduledYieldProvider {
    fn code(&self) -> &'static str {
        ProviderCode::SCHEDULED_YIELD
    }

    fn name(&self) -> &'static str {
        SOURCE
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            synthetic: true,
            supports_historical: true,
            supports_search: false,
        }
    }

    fn validate_params(&self, params: &ProviderParams) -> Result<()> {
        ScheduledYieldParams::parse(params).map(|_| ())
    }

    async fn current_value(&self, params: &ProviderParams) -> Result<PricePoint> {
        let parsed = ScheduledYieldParams::parse(params)?;
        let today = Day::today();
        let point = parsed.point_for(today);
        debug!(
            "Computed scheduled-yield value {} {} as of {}",
            point.value, point.currency, today
        );
        Ok(point)
    }

    async fn history_value(
        &self,
        params: &ProviderParams,
        start: Day,
        end: Day,
    ) -> Result<Vec<PricePoint>> {
        check_date_range(start, end)?;
        let parsed = ScheduledYieldParams::parse(params)?;
        Ok(crate::models::days_between(start.date(), end.date())
            .into_iter()
            .map(|date| parsed.point_for(Day::new(date)))
            .collect())
    }
}
