//! Escalation stage classification.
//!
//! A pure classifier, not a stored state machine: every evaluation recomputes
//! the stage from days overdue. The one wrinkle is the payment-claim pause,
//! which freezes commercial escalation at the last recorded stage while
//! statutory interest keeps accruing independently.

use serde::{Deserialize, Serialize};

use super::domain::InvoiceStatus;

pub const DAY_5_THRESHOLD: i64 = 5;
pub const DAY_15_THRESHOLD: i64 = 15;
pub const DAY_30_THRESHOLD: i64 = 30;
pub const AGENCY_THRESHOLD: i64 = 45;

/// Ordered collections milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EscalationStage {
    OnTime,
    Day5,
    Day15,
    Day30,
    AgencyReferred,
}

impl EscalationStage {
    pub const fn label(self) -> &'static str {
        match self {
            EscalationStage::OnTime => "on_time",
            EscalationStage::Day5 => "day_5",
            EscalationStage::Day15 => "day_15",
            EscalationStage::Day30 => "day_30",
            EscalationStage::AgencyReferred => "agency_referred",
        }
    }

    /// Highest threshold met for a day count, ignoring pause and override.
    pub fn for_days_overdue(days_overdue: i64) -> Self {
        if days_overdue >= AGENCY_THRESHOLD {
            EscalationStage::AgencyReferred
        } else if days_overdue >= DAY_30_THRESHOLD {
            EscalationStage::Day30
        } else if days_overdue >= DAY_15_THRESHOLD {
            EscalationStage::Day15
        } else if days_overdue >= DAY_5_THRESHOLD {
            EscalationStage::Day5
        } else {
            EscalationStage::OnTime
        }
    }
}

/// Resolve the current stage for an invoice.
///
/// Precedence: manual override, then pause freeze (the last recorded stage, or
/// `OnTime` when none was ever recorded), then the computed threshold. A
/// non-overdue status is always `OnTime` regardless of dates.
pub fn resolve_stage(
    status: InvoiceStatus,
    days_overdue: i64,
    pause_active: bool,
    last_stage: Option<EscalationStage>,
    manual_override: Option<EscalationStage>,
) -> EscalationStage {
    if let Some(stage) = manual_override {
        return stage;
    }

    if !status.is_overdue_like() || days_overdue <= 0 {
        return EscalationStage::OnTime;
    }

    if pause_active {
        return last_stage.unwrap_or(EscalationStage::OnTime);
    }

    EscalationStage::for_days_overdue(days_overdue)
}
