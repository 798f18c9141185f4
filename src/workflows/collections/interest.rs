//! Statutory late-payment interest under the Late Payment of Commercial Debts
//! (Interest) Act 1998: 8% over the Bank of England base rate, plus a fixed
//! recovery cost tiered by principal. Pure — identical inputs always produce
//! identical output.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::rates::BaseRateTable;

/// Fixed by the 1998 Act; never configurable.
pub const STATUTORY_INTEREST_RATE: f64 = 8.0;

/// Fixed recovery cost tiers, by principal amount only.
const TIER_1_MAX: f64 = 999.99;
const TIER_1_FEE: f64 = 40.0;
const TIER_2_MAX: f64 = 9999.99;
const TIER_2_FEE: f64 = 70.0;
const TIER_3_FEE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestParams {
    /// Principal in pounds.
    pub principal: f64,
    pub due_date: NaiveDate,
    pub evaluation_date: NaiveDate,
    /// Explicit base-rate override; skips the historical lookup when set.
    pub base_rate_override: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum InterestError {
    #[error("principal amount must be greater than zero (got {0:.2})")]
    InvalidAmount(f64),
    #[error("evaluation date {evaluation} precedes due date {due}")]
    InvalidDateRange {
        due: NaiveDate,
        evaluation: NaiveDate,
    },
}

/// Full interest breakdown. Derived data: recomputable at any time from
/// `(principal, due_date, evaluation_date)` against the same rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    pub principal_amount: f64,
    pub bank_base_rate: f64,
    pub statutory_rate: f64,
    /// Annual percentage: statutory + base rate.
    pub interest_rate: f64,
    pub days_overdue: i64,
    pub daily_interest: f64,
    pub interest_accrued: f64,
    pub fixed_recovery_cost: f64,
    pub total_owed: f64,
}

impl InterestCalculation {
    /// Human-readable breakdown used in reminder bodies and the CLI.
    pub fn breakdown_text(&self) -> String {
        format!(
            "Late Payment Interest Breakdown:\n\n\
             Principal Amount:        {}\n\
             Days Overdue:            {} days\n\
             Interest Rate:           {}% per annum\n\
             \x20                        ({}% statutory + {}% BoE base rate)\n\n\
             Daily Interest:          {}\n\
             Interest Accrued:        {}\n\
             Fixed Recovery Cost:     {}\n\n\
             TOTAL OWED:              {}",
            format_currency(self.principal_amount),
            self.days_overdue,
            self.interest_rate,
            self.statutory_rate,
            self.bank_base_rate,
            format_currency(self.daily_interest),
            format_currency(self.interest_accrued),
            format_currency(self.fixed_recovery_cost),
            format_currency(self.total_owed),
        )
    }
}

/// Compute the statutory interest position for an overdue invoice.
///
/// The base rate defaults to the historical lookup mandated by the Act (the
/// rate in force on the 30 June or 31 December preceding `due_date`).
pub fn calculate_late_payment_interest(
    params: &InterestParams,
    rates: &BaseRateTable,
) -> Result<InterestCalculation, InterestError> {
    if params.principal <= 0.0 {
        return Err(InterestError::InvalidAmount(params.principal));
    }
    if params.evaluation_date < params.due_date {
        return Err(InterestError::InvalidDateRange {
            due: params.due_date,
            evaluation: params.evaluation_date,
        });
    }

    let days_overdue = (params.evaluation_date - params.due_date).num_days();

    let bank_base_rate = match params.base_rate_override {
        Some(rate) => rate,
        None => rates.for_due_date(params.due_date).rate,
    };

    let interest_rate = STATUTORY_INTEREST_RATE + bank_base_rate;
    let daily_interest = params.principal * (interest_rate / 100.0) / 365.0;
    let interest_accrued = daily_interest * days_overdue as f64;
    let fixed_recovery_cost = fixed_recovery_cost(params.principal);
    let total_owed = params.principal + interest_accrued + fixed_recovery_cost;

    Ok(InterestCalculation {
        principal_amount: round2(params.principal),
        bank_base_rate,
        statutory_rate: STATUTORY_INTEREST_RATE,
        interest_rate: round2(interest_rate),
        days_overdue,
        daily_interest: round4(daily_interest),
        interest_accrued: round2(interest_accrued),
        fixed_recovery_cost,
        total_owed: round2(total_owed),
    })
}

/// Fixed debt recovery cost for a principal amount, per the 1998 Act.
pub fn fixed_recovery_cost(principal: f64) -> f64 {
    if principal <= TIER_1_MAX {
        TIER_1_FEE
    } else if principal <= TIER_2_MAX {
        TIER_2_FEE
    } else {
        TIER_3_FEE
    }
}

/// Interest for a flat number of days at an explicit base rate; used for
/// projections where no due date exists yet.
pub fn interest_for_days(principal: f64, days: i64, base_rate: f64) -> f64 {
    let interest_rate = STATUTORY_INTEREST_RATE + base_rate;
    let daily_interest = principal * (interest_rate / 100.0) / 365.0;
    round2(daily_interest * days as f64)
}

/// Daily snapshot in an accrual projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccrualSnapshot {
    pub day: i64,
    pub date: NaiveDate,
    pub interest_accrued: f64,
    pub total_owed: f64,
}

/// Project accrual from the due date forward, one snapshot per day.
pub fn project_accrual(
    principal: f64,
    due_date: NaiveDate,
    projection_days: i64,
    rates: &BaseRateTable,
) -> Result<Vec<AccrualSnapshot>, InterestError> {
    if principal <= 0.0 {
        return Err(InterestError::InvalidAmount(principal));
    }

    let fee = fixed_recovery_cost(principal);
    let base_rate = rates.for_due_date(due_date).rate;
    let daily_interest = principal * ((STATUTORY_INTEREST_RATE + base_rate) / 100.0) / 365.0;

    let snapshots = (0..=projection_days.max(0))
        .map(|day| {
            let interest_accrued = daily_interest * day as f64;
            AccrualSnapshot {
                day,
                date: due_date + Duration::days(day),
                interest_accrued: round2(interest_accrued),
                total_owed: round2(principal + interest_accrued + fee),
            }
        })
        .collect();

    Ok(snapshots)
}

pub fn format_currency(amount: f64) -> String {
    format!("£{amount:.2}")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
