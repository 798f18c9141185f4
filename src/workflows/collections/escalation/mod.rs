//! Escalation-path recommendation: County Court claim, debt collection
//! agency, continued internal chasing, or write-off.
//!
//! A rule-based scorer: eight weighted factors each contribute deltas to four
//! accumulators with a human-readable reasoning trail, then the argmax wins
//! with an explicit evaluation-order tie-break. Side-effect-free and fully
//! reproducible from its inputs.

mod costs;
mod factors;

pub use costs::{agency_commission, county_court_fee, CommissionRange};

use serde::{Deserialize, Serialize};

/// Who owes the money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtorType {
    Business,
    Individual,
    Unknown,
}

/// Commercial value of the ongoing client relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipValue {
    High,
    Medium,
    Low,
}

/// Inputs to the scorer. `days_overdue` is supplied by the caller; the scorer
/// has no clock of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscalationParams {
    /// Amount outstanding in pounds.
    pub invoice_amount: f64,
    pub days_overdue: i64,
    pub is_disputed_debt: bool,
    pub debtor_type: DebtorType,
    pub previous_attempts: u32,
    pub relationship_value: RelationshipValue,
    pub has_written_contract: bool,
    pub has_proof_of_delivery: bool,
    /// Tri-state: known assets, known none, or unknown.
    pub debtor_has_assets: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("invoice amount must be greater than zero (got {0:.2})")]
    InvalidAmount(f64),
    #[error("days overdue cannot be negative (got {0})")]
    InvalidDays(i64),
}

/// The four escalation paths, in tie-break precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationOption {
    Court,
    Agency,
    ContinueInternal,
    WriteOff,
}

impl EscalationOption {
    pub const fn label(self) -> &'static str {
        match self {
            EscalationOption::Court => "court",
            EscalationOption::Agency => "agency",
            EscalationOption::ContinueInternal => "continue_internal",
            EscalationOption::WriteOff => "write_off",
        }
    }

    /// Confidence ceiling per path.
    const fn confidence_cap(self) -> f64 {
        match self {
            EscalationOption::Court | EscalationOption::Agency => 95.0,
            EscalationOption::ContinueInternal => 90.0,
            EscalationOption::WriteOff => 85.0,
        }
    }
}

/// One factor's contribution to the four accumulators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreDelta {
    pub court: i32,
    pub agency: i32,
    pub continue_internal: i32,
    pub write_off: i32,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
}

/// Final accumulator totals, kept on the output so the weighting is auditable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub court: i32,
    pub agency: i32,
    pub continue_internal: i32,
    pub write_off: i32,
}

impl ScoreTally {
    fn apply(&mut self, delta: &ScoreDelta) {
        self.court += delta.court;
        self.agency += delta.agency;
        self.continue_internal += delta.continue_internal;
        self.write_off += delta.write_off;
    }

    /// Argmax with the fixed precedence order: court, agency, continue
    /// internal, write-off. A later option must strictly beat the leader.
    pub fn leader(&self) -> (EscalationOption, i32) {
        let ordered = [
            (EscalationOption::Court, self.court),
            (EscalationOption::Agency, self.agency),
            (EscalationOption::ContinueInternal, self.continue_internal),
            (EscalationOption::WriteOff, self.write_off),
        ];

        let mut leader = ordered[0];
        for candidate in &ordered[1..] {
            if candidate.1 > leader.1 {
                leader = *candidate;
            }
        }
        leader
    }
}

/// Cost estimates for each path. Output-only, like the recommendation that
/// carries them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimates {
    pub county_court_fee: f64,
    pub agency_commission: CommissionRange,
    pub net_recovery_court: f64,
    pub net_recovery_agency_min: f64,
    pub net_recovery_agency_max: f64,
}

/// Indicative timelines per path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEstimates {
    pub court: &'static str,
    pub agency: &'static str,
}

/// Indicative success-rate bands per path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessEstimates {
    pub court: &'static str,
    pub agency: &'static str,
}

/// The recommendation. Computed on demand for UI/reporting; never persisted as
/// authoritative invoice state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationRecommendation {
    pub primary_option: EscalationOption,
    /// 0–100.
    pub confidence: u8,
    pub scores: ScoreTally,
    pub reasoning: Vec<String>,
    pub warnings: Vec<String>,
    pub costs: CostEstimates,
    pub timeline: TimelineEstimates,
    pub success_rate: SuccessEstimates,
    pub next_steps: Vec<String>,
}

/// Produce a recommendation for an overdue invoice.
pub fn recommend(params: &EscalationParams) -> Result<EscalationRecommendation, DecisionError> {
    if params.invoice_amount <= 0.0 {
        return Err(DecisionError::InvalidAmount(params.invoice_amount));
    }
    if params.days_overdue < 0 {
        return Err(DecisionError::InvalidDays(params.days_overdue));
    }

    let court_fee = county_court_fee(params.invoice_amount);
    let commission = agency_commission(params.invoice_amount);

    let mut tally = ScoreTally::default();
    let mut reasoning = Vec::new();
    let mut warnings = Vec::new();

    for delta in factors::evaluate_all(params, court_fee) {
        tally.apply(&delta);
        reasoning.extend(delta.reasoning);
        warnings.extend(delta.warnings);
    }

    let (primary_option, max_score) = tally.leader();

    let raw_confidence = (max_score as f64 / 200.0) * 100.0;
    let confidence = raw_confidence
        .min(primary_option.confidence_cap())
        .max(0.0)
        .round() as u8;

    let costs = CostEstimates {
        county_court_fee: court_fee,
        net_recovery_court: costs::round2(params.invoice_amount - court_fee),
        net_recovery_agency_min: costs::round2(params.invoice_amount - commission.max),
        net_recovery_agency_max: costs::round2(params.invoice_amount - commission.min),
        agency_commission: commission,
    };

    Ok(EscalationRecommendation {
        primary_option,
        confidence,
        scores: tally,
        reasoning,
        warnings,
        costs,
        timeline: costs::timelines(),
        success_rate: costs::success_rates(params.is_disputed_debt),
        next_steps: costs::next_steps(primary_option, court_fee, commission.percentage),
    })
}
