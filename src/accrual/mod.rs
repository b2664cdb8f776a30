//! Accrual calculator: day-count conversion and interest-schedule resolution.
//!
//! Pure functions, no I/O, deterministic given inputs. Used by the
//! scheduled-yield provider to derive valuations from contractual terms
//! alone.
//!
//! Day count is ACT/365 fixed: one calendar day earns `rate / 365` of the
//! annual rate. Interest is summed per calendar day rather than integrated
//! per period, because the active rate can change on any day boundary
//! (schedule edges, maturity, grace-period expiry).

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{InterestPeriod, LateInterestTerms, ScheduledYieldTerms};

/// ACT/365 fixed denominator.
pub const DAYS_PER_YEAR: i64 = 365;

/// ACT/365 year fraction between two dates.
///
/// Negative when `end` precedes `start`; only forward-in-time fractions are
/// meaningful, a negative result indicates a caller error.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days()) / Decimal::from(DAYS_PER_YEAR)
}

/// The scheduled rate on `on`, ignoring maturity.
///
/// When several periods contain the date, the one with the latest
/// `start_date` wins; among equal starts, the later entry in the schedule
/// wins. A date no period covers earns rate zero.
fn scheduled_rate(schedule: &[InterestPeriod], on: NaiveDate) -> Decimal {
    schedule
        .iter()
        .filter(|p| p.contains(on))
        .max_by_key(|p| p.start_date)
        .map(|p| p.rate)
        .unwrap_or(Decimal::ZERO)
}

/// Resolve the annual rate in force on `on`.
///
/// Three regimes:
/// 1. On or before `maturity`: the scheduled rate (latest-start period
///    containing the date wins; uncovered gap means zero).
/// 2. Within the grace period after maturity: the rate that was in force
///    at `maturity` continues.
/// 3. Past the grace period: the late rate, or zero when no late terms
///    exist.
pub fn active_rate(
    schedule: &[InterestPeriod],
    on: NaiveDate,
    maturity: NaiveDate,
    late_interest: Option<&LateInterestTerms>,
) -> Decimal {
    if on <= maturity {
        return scheduled_rate(schedule, on);
    }

    let grace_days = late_interest.map(|l| i64::from(l.grace_period_days)).unwrap_or(0);
    let grace_end = maturity + Duration::days(grace_days);

    if on <= grace_end {
        scheduled_rate(schedule, maturity)
    } else {
        late_interest.map(|l| l.rate).unwrap_or(Decimal::ZERO)
    }
}

/// Simple interest accrued on `face_value` over `[start, end)`.
///
/// Each calendar day contributes `face_value * active_rate(d) / 365`.
/// An empty or inverted window accrues nothing.
pub fn accrued_interest(
    face_value: Decimal,
    start: NaiveDate,
    end: NaiveDate,
    schedule: &[InterestPeriod],
    maturity: NaiveDate,
    late_interest: Option<&LateInterestTerms>,
) -> Decimal {
    if end <= start {
        return Decimal::ZERO;
    }

    let denominator = Decimal::from(DAYS_PER_YEAR);
    let mut total = Decimal::ZERO;
    let mut day = start;
    // Cache the per-day amount across runs of a constant rate.
    let mut current_rate = Decimal::ZERO;
    let mut daily = Decimal::ZERO;

    while day < end {
        let rate = active_rate(schedule, day, maturity, late_interest);
        if rate != current_rate {
            current_rate = rate;
            daily = face_value * rate / denominator;
        }
        total += daily;
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    total
}

/// Total instrument value on `on`: face value plus interest accrued from
/// the start of the schedule.
///
/// Dates before the schedule starts (or an empty schedule with no late
/// terms in play) value at face.
pub fn value_at(terms: &ScheduledYieldTerms, on: NaiveDate) -> Decimal {
    match terms.schedule_start() {
        Some(start) if on > start => {
            terms.face_value
                + accrued_interest(
                    terms.face_value,
                    start,
                    on,
                    &terms.interest_schedule,
                    terms.maturity_date,
                    terms.late_interest.as_ref(),
                )
        }
        _ => terms.face_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate, rate: Decimal) -> InterestPeriod {
        InterestPeriod {
            start_date: start,
            end_date: end,
            rate,
        }
    }

    fn tolerance_eq(a: Decimal, b: Decimal) {
        assert!((a - b).abs() < dec!(0.0001), "{a} != {b}");
    }

    #[test]
    fn test_year_fraction() {
        assert_eq!(
            year_fraction(date(2025, 1, 1), date(2026, 1, 1)),
            Decimal::from(365) / Decimal::from(365)
        );
        tolerance_eq(
            year_fraction(date(2025, 1, 1), date(2025, 1, 31)),
            Decimal::from(30) / Decimal::from(365),
        );
        // Inverted window is negative - caller error signal, not a panic.
        assert!(year_fraction(date(2025, 2, 1), date(2025, 1, 1)) < Decimal::ZERO);
    }

    #[test]
    fn test_gap_in_schedule_earns_zero() {
        let schedule = vec![
            period(date(2025, 1, 1), date(2025, 3, 31), dec!(0.05)),
            period(date(2025, 7, 1), date(2025, 12, 31), dec!(0.07)),
        ];
        let maturity = date(2025, 12, 31);

        assert_eq!(active_rate(&schedule, date(2025, 5, 15), maturity, None), dec!(0));
        assert_eq!(
            active_rate(&schedule, date(2025, 3, 31), maturity, None),
            dec!(0.05)
        );
        assert_eq!(
            active_rate(&schedule, date(2025, 7, 1), maturity, None),
            dec!(0.07)
        );
    }

    #[test]
    fn test_overlap_latest_start_wins() {
        let schedule = vec![
            period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.04)),
            period(date(2025, 6, 1), date(2025, 12, 31), dec!(0.08)),
        ];
        let maturity = date(2025, 12, 31);

        // Before the override kicks in.
        assert_eq!(
            active_rate(&schedule, date(2025, 5, 31), maturity, None),
            dec!(0.04)
        );
        // Both cover this date; the later start wins regardless of order.
        assert_eq!(
            active_rate(&schedule, date(2025, 6, 1), maturity, None),
            dec!(0.08)
        );

        let reversed: Vec<_> = schedule.into_iter().rev().collect();
        assert_eq!(
            active_rate(&reversed, date(2025, 6, 1), maturity, None),
            dec!(0.08)
        );
    }

    #[test]
    fn test_rate_boundaries() {
        let schedule = vec![period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.055))];
        let maturity = date(2025, 12, 31);
        let late = LateInterestTerms {
            rate: dec!(0.15),
            grace_period_days: 30,
        };

        // Exactly at the period end / maturity: still scheduled.
        assert_eq!(
            active_rate(&schedule, maturity, maturity, Some(&late)),
            dec!(0.055)
        );
        // Inside grace: last scheduled rate continues.
        assert_eq!(
            active_rate(&schedule, date(2026, 1, 15), maturity, Some(&late)),
            dec!(0.055)
        );
        // Exactly at maturity + grace_period_days: still grace.
        assert_eq!(
            active_rate(&schedule, date(2026, 1, 30), maturity, Some(&late)),
            dec!(0.055)
        );
        // One day past: late rate takes over.
        assert_eq!(
            active_rate(&schedule, date(2026, 1, 31), maturity, Some(&late)),
            dec!(0.15)
        );
        assert_eq!(
            active_rate(&schedule, date(2026, 2, 5), maturity, Some(&late)),
            dec!(0.15)
        );
    }

    #[test]
    fn test_no_late_terms_means_zero_after_maturity() {
        let schedule = vec![period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.06))];
        let maturity = date(2025, 12, 31);

        assert_eq!(active_rate(&schedule, date(2026, 1, 1), maturity, None), dec!(0));
    }

    #[test]
    fn test_grace_uses_rate_at_maturity_even_for_gapped_schedule() {
        // Schedule ends before maturity: the rate "in force at maturity" is
        // the gap rate, zero.
        let schedule = vec![period(date(2025, 1, 1), date(2025, 6, 30), dec!(0.05))];
        let maturity = date(2025, 12, 31);
        let late = LateInterestTerms {
            rate: dec!(0.10),
            grace_period_days: 10,
        };

        assert_eq!(
            active_rate(&schedule, date(2026, 1, 5), maturity, Some(&late)),
            dec!(0)
        );
        assert_eq!(
            active_rate(&schedule, date(2026, 1, 11), maturity, Some(&late)),
            dec!(0.10)
        );
    }

    #[test]
    fn test_accrual_inverted_window_is_zero() {
        let schedule = vec![period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.06))];
        assert_eq!(
            accrued_interest(
                dec!(5000),
                date(2025, 3, 1),
                date(2025, 1, 1),
                &schedule,
                date(2025, 12, 31),
                None
            ),
            dec!(0)
        );
    }

    // Scenario: 5000 EUR, 6% for calendar year 2025, no late interest.
    fn single_period_terms() -> ScheduledYieldTerms {
        ScheduledYieldTerms {
            face_value: dec!(5000),
            maturity_date: date(2025, 12, 31),
            interest_schedule: vec![period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.06))],
            late_interest: None,
        }
    }

    #[test]
    fn test_single_period_value_after_30_days() {
        let value = value_at(&single_period_terms(), date(2025, 1, 31));
        // 5000 * (1 + 0.06 * 30/365)
        assert_eq!(value.round_dp(2), dec!(5024.66));
    }

    #[test]
    fn test_single_period_value_flat_after_maturity() {
        let terms = single_period_terms();
        let at_rollover = value_at(&terms, date(2026, 1, 1));
        assert_eq!(at_rollover.round_dp(2), dec!(5300.00));

        // No late interest: the value never moves again.
        assert_eq!(value_at(&terms, date(2026, 6, 1)), at_rollover);
        assert_eq!(value_at(&terms, date(2030, 1, 1)), at_rollover);
    }

    #[test]
    fn test_two_period_schedule_full_year() {
        // 10000 at 5% for H1 (181 days) and 7% for H2 (184 days).
        let terms = ScheduledYieldTerms {
            face_value: dec!(10000),
            maturity_date: date(2025, 12, 31),
            interest_schedule: vec![
                period(date(2025, 1, 1), date(2025, 6, 30), dec!(0.05)),
                period(date(2025, 7, 1), date(2025, 12, 31), dec!(0.07)),
            ],
            late_interest: None,
        };

        let value = value_at(&terms, date(2026, 1, 1));
        let expected = dec!(10000)
            + dec!(10000) * dec!(0.05) * Decimal::from(181) / Decimal::from(365)
            + dec!(10000) * dec!(0.07) * Decimal::from(184) / Decimal::from(365);
        tolerance_eq(value, expected);
        assert_eq!(value.round_dp(2), dec!(10600.82));
    }

    #[test]
    fn test_value_before_and_at_schedule_start_is_face() {
        let terms = single_period_terms();
        assert_eq!(value_at(&terms, date(2024, 6, 1)), dec!(5000));
        assert_eq!(value_at(&terms, date(2025, 1, 1)), dec!(5000));
        // The first day of accrual shows up one day later.
        assert!(value_at(&terms, date(2025, 1, 2)) > dec!(5000));
    }

    #[test]
    fn test_empty_schedule_values_at_face() {
        let terms = ScheduledYieldTerms {
            face_value: dec!(750),
            maturity_date: date(2025, 12, 31),
            interest_schedule: vec![],
            late_interest: None,
        };
        assert_eq!(value_at(&terms, date(2025, 6, 1)), dec!(750));
    }

    #[test]
    fn test_monotonic_for_non_negative_rates() {
        let terms = ScheduledYieldTerms {
            face_value: dec!(8000),
            maturity_date: date(2025, 12, 31),
            interest_schedule: vec![
                period(date(2025, 1, 1), date(2025, 3, 31), dec!(0.055)),
                // Gap in April, then a higher rate.
                period(date(2025, 5, 1), date(2025, 12, 31), dec!(0.09)),
            ],
            late_interest: Some(LateInterestTerms {
                rate: dec!(0.15),
                grace_period_days: 30,
            }),
        };

        let mut previous = Decimal::ZERO;
        let mut day = date(2025, 1, 1);
        let end = date(2026, 3, 31);
        while day <= end {
            let value = value_at(&terms, day);
            assert!(value >= previous, "value decreased on {day}");
            previous = value;
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_late_interest_accrues_after_grace() {
        // 8000 at 5.5% to maturity, 15% late after a 30 day grace period.
        let terms = ScheduledYieldTerms {
            face_value: dec!(8000),
            maturity_date: date(2025, 12, 31),
            interest_schedule: vec![period(date(2025, 1, 1), date(2025, 12, 31), dec!(0.055))],
            late_interest: Some(LateInterestTerms {
                rate: dec!(0.15),
                grace_period_days: 30,
            }),
        };

        // Grace days keep accruing at the scheduled rate,
        // so the slope only changes after 2026-01-30.
        let in_grace_slope =
            value_at(&terms, date(2026, 1, 16)) - value_at(&terms, date(2026, 1, 15));
        tolerance_eq(in_grace_slope, dec!(8000) * dec!(0.055) / Decimal::from(365));

        let late_slope = value_at(&terms, date(2026, 2, 6)) - value_at(&terms, date(2026, 2, 5));
        tolerance_eq(late_slope, dec!(8000) * dec!(0.15) / Decimal::from(365));
    }

    #[test]
    fn test_deterministic() {
        let terms = single_period_terms();
        let a = value_at(&terms, date(2025, 8, 17));
        let b = value_at(&terms, date(2025, 8, 17));
        assert_eq!(a, b);
    }
}
