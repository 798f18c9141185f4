//! Cost, timeline, and next-step reference data for the escalation paths.

use serde::Serialize;

use super::EscalationOption;

const AGENCY_COMMISSION_MIN_RATE: f64 = 0.15;
const AGENCY_COMMISSION_MAX_RATE: f64 = 0.25;
const COURT_FEE_PERCENTAGE_RATE: f64 = 0.05;
const COURT_FEE_CAP: f64 = 10_000.0;

/// UK County Court fees (Money Claim Online), seven fixed bands up to £10,000
/// then 5% of the claim capped at £10,000.
pub fn county_court_fee(claim_amount: f64) -> f64 {
    if claim_amount <= 300.0 {
        35.0
    } else if claim_amount <= 500.0 {
        50.0
    } else if claim_amount <= 1_000.0 {
        70.0
    } else if claim_amount <= 1_500.0 {
        80.0
    } else if claim_amount <= 3_000.0 {
        115.0
    } else if claim_amount <= 5_000.0 {
        205.0
    } else if claim_amount <= 10_000.0 {
        455.0
    } else {
        (claim_amount * COURT_FEE_PERCENTAGE_RATE).min(COURT_FEE_CAP)
    }
}

/// Typical debt collection agency commission band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommissionRange {
    pub min: f64,
    pub max: f64,
    pub percentage: &'static str,
}

pub fn agency_commission(amount: f64) -> CommissionRange {
    CommissionRange {
        min: round2(amount * AGENCY_COMMISSION_MIN_RATE),
        max: round2(amount * AGENCY_COMMISSION_MAX_RATE),
        percentage: "15-25%",
    }
}

pub(super) fn timelines() -> super::TimelineEstimates {
    super::TimelineEstimates {
        court: "30-90 days (default judgment) or 90-180 days (defended)",
        agency: "60-90 days typical collection period",
    }
}

/// Success-rate bands: UK court statistics and industry averages, discounted
/// for disputed debts.
pub(super) fn success_rates(disputed: bool) -> super::SuccessEstimates {
    if disputed {
        super::SuccessEstimates {
            court: "40-50%",
            agency: "30-40%",
        }
    } else {
        super::SuccessEstimates {
            court: "66-75%",
            agency: "50-60%",
        }
    }
}

pub(super) fn next_steps(
    option: EscalationOption,
    court_fee: f64,
    commission_percentage: &str,
) -> Vec<String> {
    match option {
        EscalationOption::Court => vec![
            "1. File claim online via Money Claim Online: https://www.moneyclaim.gov.uk"
                .to_string(),
            format!("2. Pay court fee of £{court_fee:.2}"),
            "3. Court serves claim on debtor (5-7 days)".to_string(),
            "4. Debtor has 14 days to respond".to_string(),
            "5. If no response -> Default Judgment (automatic)".to_string(),
            "6. If defended -> Hearing in 8-12 weeks".to_string(),
            "7. Upon judgment, enforce via bailiffs/charging order".to_string(),
        ],
        EscalationOption::Agency => vec![
            "1. Select registered UK debt collection agency".to_string(),
            format!("2. Expected commission: {commission_percentage} of recovered amount"),
            "3. Agency sends formal demand letter (14-day notice)".to_string(),
            "4. Intensive collection period (60-90 days)".to_string(),
            "5. If successful, receive net amount after commission".to_string(),
            "6. If unsuccessful, agency may recommend Court or write-off".to_string(),
        ],
        EscalationOption::ContinueInternal => vec![
            "1. Send formal Letter Before Action (LBA)".to_string(),
            "2. Make final phone call attempt".to_string(),
            "3. Offer payment plan or settlement discount".to_string(),
            "4. If no response after 14 days, re-evaluate escalation".to_string(),
            "5. Document all communication for potential Court case".to_string(),
        ],
        EscalationOption::WriteOff => vec![
            "1. Send final demand letter".to_string(),
            "2. Inform client that account will be closed".to_string(),
            "3. Record as bad debt for tax purposes".to_string(),
            "4. Consider selling debt to recovery company (10-20% of value)".to_string(),
            "5. Focus efforts on higher-value debts".to_string(),
        ],
    }
}

pub(super) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
