//! Schedule generator
//!
//! Pure mapping from a contract's terms (type, period, start date) to the
//! ordered sequence of service occurrences due under those terms. Identical
//! inputs always yield an identical sequence.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Milliseconds per day
const MS_PER_DAY: f64 = 86_400_000.0;

/// Average days per month used for the schedule's upper-bound cutoff.
///
/// The cutoff is `start + period_months * 30.44 days`, evaluated in f64
/// milliseconds, while the occurrence dates themselves advance by exact
/// calendar months. The mixed-unit comparison can produce off-by-one
/// occurrence counts near the period boundary; it is kept for
/// compatibility with every schedule already in the field.
const AVG_DAYS_PER_MONTH: f64 = 30.44;

/// Contract cadence. Stored contract types outside the recognized names
/// behave as annual contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractType {
    Quarterly,
    HalfYear,
    Annual,
}

impl ContractType {
    /// Resolve a stored contract type name. Unrecognized names fall back
    /// to annual cadence.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Quarterly Service" => ContractType::Quarterly,
            "Half-year Service" => ContractType::HalfYear,
            _ => ContractType::Annual,
        }
    }

    /// Months between consecutive service visits
    pub fn interval_months(self) -> u32 {
        match self {
            ContractType::Quarterly => 3,
            ContractType::HalfYear => 6,
            ContractType::Annual => 12,
        }
    }

    /// Human-facing label for a cadence slot, e.g. "Q2 2024"
    pub fn period_label(self, period_number: i64, year: i64) -> String {
        match self {
            ContractType::Quarterly => format!("Q{} {}", period_number, year),
            ContractType::HalfYear => format!("H{} {}", period_number, year),
            ContractType::Annual => format!("Annual {}", year),
        }
    }
}

/// A generated, not-yet-persisted candidate service due date.
/// Identity key is `(period_number, year)`, not sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOccurrence {
    pub due_date: NaiveDate,
    pub period_number: i64,
    pub year: i64,
}

fn midnight_ms(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
        .unwrap_or(f64::MAX)
}

/// Generate the service schedule for a contract.
///
/// Starting at `start_date`, due dates advance by the cadence interval in
/// exact calendar months (day-of-month preserved, clamped at month end)
/// for as long as the running date stays within the averaged cutoff.
/// Period labels cycle per cadence: quarters 1..4 then the year rolls,
/// halves alternate 1/2 with the year rolling on return to 1, annual
/// occurrences roll the year every step.
pub fn generate_schedule(
    contract_type: ContractType,
    period_months: i64,
    start_date: NaiveDate,
) -> Vec<ServiceOccurrence> {
    let cutoff_ms = midnight_ms(start_date) + period_months as f64 * AVG_DAYS_PER_MONTH * MS_PER_DAY;

    let mut occurrences = Vec::new();
    let mut current = start_date;
    let mut period_number = 1i64;
    let mut year = start_date.year() as i64;

    while midnight_ms(current) <= cutoff_ms {
        occurrences.push(ServiceOccurrence {
            due_date: current,
            period_number,
            year,
        });

        current = match current.checked_add_months(Months::new(contract_type.interval_months())) {
            Some(next) => next,
            None => break,
        };

        match contract_type {
            ContractType::Quarterly => {
                period_number += 1;
                if period_number > 4 {
                    period_number = 1;
                    year += 1;
                }
            }
            ContractType::HalfYear => {
                period_number = if period_number == 1 { 2 } else { 1 };
                if period_number == 1 {
                    year += 1;
                }
            }
            ContractType::Annual => {
                period_number = 1;
                year += 1;
            }
        }
    }

    occurrences
}
