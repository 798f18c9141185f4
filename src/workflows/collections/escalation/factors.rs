//! The eight weighted factors, each a pure function of the params returning a
//! [`ScoreDelta`]. Keeping them separate keeps the weights auditable and
//! testable in isolation.

use super::{DebtorType, EscalationParams, RelationshipValue, ScoreDelta};

pub(super) fn evaluate_all(params: &EscalationParams, court_fee: f64) -> Vec<ScoreDelta> {
    vec![
        amount_band(params, court_fee),
        days_overdue_band(params),
        dispute_status(params),
        evidence_strength(params),
        debtor_type(params),
        asset_presence(params),
        relationship_value(params),
        attempt_count(params),
    ]
}

fn amount_band(params: &EscalationParams, court_fee: f64) -> ScoreDelta {
    let amount = params.invoice_amount;
    let mut delta = ScoreDelta::default();

    if amount < 500.0 {
        delta.write_off += 30;
        delta.continue_internal += 20;
        delta.reasoning.push(format!(
            "Low invoice amount (£{amount:.2}) - recovery costs may exceed debt"
        ));
        delta.warnings.push(format!(
            "Court fee (£{court_fee:.0}) is {:.0}% of invoice value",
            court_fee / amount * 100.0
        ));
    } else if amount < 1500.0 {
        delta.court += 20;
        delta.agency += 10;
        delta.reasoning.push(format!(
            "Medium invoice amount (£{amount:.2}) - County Court is cost-effective"
        ));
    } else if amount < 5000.0 {
        delta.court += 30;
        delta.agency += 20;
        delta
            .reasoning
            .push(format!("Good amount for County Court (£{amount:.2})"));
    } else {
        delta.court += 25;
        delta.agency += 35;
        delta.reasoning.push(format!(
            "High value debt (£{amount:.2}) - both options viable"
        ));
    }

    delta
}

fn days_overdue_band(params: &EscalationParams) -> ScoreDelta {
    let days = params.days_overdue;
    let mut delta = ScoreDelta::default();

    if days < 30 {
        delta.continue_internal += 40;
        delta.reasoning.push(format!(
            "Recently overdue ({days} days) - continue internal attempts"
        ));
    } else if days < 60 {
        delta.continue_internal += 20;
        delta.court += 20;
        delta.agency += 10;
        delta.reasoning.push(format!(
            "Moderately overdue ({days} days) - consider escalation soon"
        ));
    } else if days < 90 {
        delta.court += 30;
        delta.agency += 30;
        delta.reasoning.push(format!(
            "Significantly overdue ({days} days) - escalation recommended"
        ));
    } else {
        delta.court += 40;
        delta.agency += 35;
        delta.write_off += 10;
        delta.reasoning.push(format!(
            "Severely overdue ({days} days) - urgent escalation needed"
        ));
    }

    delta
}

fn dispute_status(params: &EscalationParams) -> ScoreDelta {
    let mut delta = ScoreDelta::default();

    if params.is_disputed_debt {
        delta.court += 40;
        delta.agency -= 20;
        delta.write_off += 10;
        delta
            .reasoning
            .push("Disputed debt - County Court better for formal judgment".to_string());
        delta
            .warnings
            .push("Disputed debts have lower success rates with agencies".to_string());
    } else {
        delta.agency += 25;
        delta.court += 20;
        delta
            .reasoning
            .push("Clear debt - both court and agency viable".to_string());
    }

    delta
}

fn evidence_strength(params: &EscalationParams) -> ScoreDelta {
    let mut delta = ScoreDelta::default();
    let mut evidence = 0;

    if params.has_written_contract {
        evidence += 1;
        delta
            .reasoning
            .push("Written contract strengthens case".to_string());
    }
    if params.has_proof_of_delivery {
        evidence += 1;
        delta
            .reasoning
            .push("Proof of delivery available".to_string());
    }

    if evidence >= 2 {
        delta.court += 30;
        delta
            .reasoning
            .push("Strong evidence - excellent for County Court".to_string());
    } else if evidence == 1 {
        delta.court += 15;
        delta.agency += 10;
    } else {
        delta.agency += 20;
        delta.court -= 10;
        delta
            .warnings
            .push("Weak evidence may reduce Court success rate".to_string());
    }

    delta
}

fn debtor_type(params: &EscalationParams) -> ScoreDelta {
    let mut delta = ScoreDelta::default();

    match params.debtor_type {
        DebtorType::Business => {
            delta.court += 30;
            delta.reasoning.push(
                "Business debtor - County Court CCJ has strong impact on credit rating".to_string(),
            );
        }
        DebtorType::Individual => {
            delta.agency += 25;
            delta.reasoning.push(
                "Individual debtor - Agency may be more flexible with payment plans".to_string(),
            );
        }
        DebtorType::Unknown => {
            delta.court += 10;
            delta.agency += 10;
        }
    }

    delta
}

fn asset_presence(params: &EscalationParams) -> ScoreDelta {
    let mut delta = ScoreDelta::default();

    match params.debtor_has_assets {
        Some(true) => {
            delta.court += 25;
            delta
                .reasoning
                .push("Debtor has assets - Court judgment can be enforced".to_string());
        }
        Some(false) => {
            delta.write_off += 20;
            delta.agency += 10;
            delta
                .warnings
                .push("Debtor has no assets - recovery may be difficult".to_string());
        }
        None => {}
    }

    delta
}

fn relationship_value(params: &EscalationParams) -> ScoreDelta {
    let mut delta = ScoreDelta::default();

    match params.relationship_value {
        RelationshipValue::High => {
            delta.agency += 25;
            delta.court -= 15;
            delta
                .reasoning
                .push("High-value relationship - Agency less damaging than Court action".to_string());
        }
        RelationshipValue::Medium => {
            delta.court += 10;
            delta.agency += 10;
        }
        RelationshipValue::Low => {
            delta.court += 20;
            delta
                .reasoning
                .push("Low relationship value - Court action acceptable".to_string());
        }
    }

    delta
}

fn attempt_count(params: &EscalationParams) -> ScoreDelta {
    let attempts = params.previous_attempts;
    let mut delta = ScoreDelta::default();

    if attempts < 3 {
        delta.continue_internal += 30;
        delta.reasoning.push(format!(
            "Few collection attempts ({attempts}) - try more internal methods first"
        ));
    } else if attempts < 6 {
        delta.court += 20;
        delta.agency += 20;
        delta.reasoning.push(format!(
            "Multiple attempts made ({attempts}) - escalation reasonable"
        ));
    } else {
        delta.court += 30;
        delta.agency += 30;
        delta.reasoning.push(format!(
            "Many failed attempts ({attempts}) - escalation strongly recommended"
        ));
    }

    delta
}
