use super::domain::{UrgencyError, UrgencyLevel, UrgencyResult};
use chrono::{NaiveDate, NaiveDateTime};

const CRITICAL_DAYS: i64 = 7;
const WARNING_DAYS: i64 = 30;
const SOON_DAYS: i64 = 60;

const CRITICAL_KM: i64 = 500;
const WARNING_KM: i64 = 1_000;
const SOON_KM: i64 = 2_000;

/// Classifies a date-based fact (inspection, tire change, insurance) against `today`.
///
/// Rules, first match wins:
/// 1) no date → `Ok`, not tracked
/// 2) date in the past → `Expired` ("expired N days ago")
/// 3) date is today → `Expired` ("expires today")
/// 4) within 7 days → `Critical`
/// 5) within 30 days → `Warning`
/// 6) within 60 days → `Soon`
/// 7) otherwise → `Ok`
pub fn classify_by_date(expiry: Option<NaiveDate>, today: NaiveDate) -> UrgencyResult {
    let Some(expiry) = expiry else {
        return UrgencyResult::not_tracked();
    };

    let remaining = (expiry - today).num_days();

    if remaining < 0 {
        let overdue = -remaining;
        return UrgencyResult::new(
            UrgencyLevel::Expired,
            remaining,
            format!("expired {} ago", day_count(overdue)),
        );
    }

    if remaining == 0 {
        return UrgencyResult::new(UrgencyLevel::Expired, 0, "expires today".to_string());
    }

    let level = if remaining <= CRITICAL_DAYS {
        UrgencyLevel::Critical
    } else if remaining <= WARNING_DAYS {
        UrgencyLevel::Warning
    } else if remaining <= SOON_DAYS {
        UrgencyLevel::Soon
    } else {
        UrgencyLevel::Ok
    };

    UrgencyResult::new(level, remaining, day_count(remaining))
}

/// Same as [`classify_by_date`] but drops the time of day first.
pub fn classify_by_datetime(expiry: Option<NaiveDateTime>, now: NaiveDateTime) -> UrgencyResult {
    classify_by_date(expiry.map(|value| value.date()), now.date())
}

/// Classifies the service-due fact from the odometer reading and the target mileage.
///
/// Unlike the date classifier, zero kilometers left is folded into `Expired`
/// without a separate "today" case.
pub fn classify_by_mileage(
    current: i64,
    target: Option<i64>,
) -> Result<UrgencyResult, UrgencyError> {
    if current < 0 {
        return Err(UrgencyError::NegativeMileage { current });
    }

    let Some(target) = target else {
        return Ok(UrgencyResult::not_tracked());
    };

    // Stays below the not-tracked sentinel.
    let remaining = target
        .saturating_sub(current)
        .min(UrgencyResult::NOT_TRACKED_REMAINING - 1);

    let result = if remaining < 0 {
        UrgencyResult::new(
            UrgencyLevel::Expired,
            remaining,
            format!("{} km overdue", remaining.unsigned_abs()),
        )
    } else if remaining == 0 {
        UrgencyResult::new(UrgencyLevel::Expired, 0, "due now".to_string())
    } else {
        let level = if remaining <= CRITICAL_KM {
            UrgencyLevel::Critical
        } else if remaining <= WARNING_KM {
            UrgencyLevel::Warning
        } else if remaining <= SOON_KM {
            UrgencyLevel::Soon
        } else {
            UrgencyLevel::Ok
        };
        UrgencyResult::new(level, remaining, format!("{remaining} km"))
    };

    Ok(result)
}

fn day_count(days: i64) -> String {
    format!("{} day{}", days, if days == 1 { "" } else { "s" })
}
