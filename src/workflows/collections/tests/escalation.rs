use crate::workflows::collections::escalation::{
    agency_commission, county_court_fee, recommend, DebtorType, DecisionError, EscalationOption,
    EscalationParams, RelationshipValue,
};

fn base_params() -> EscalationParams {
    EscalationParams {
        invoice_amount: 1000.0,
        days_overdue: 45,
        is_disputed_debt: false,
        debtor_type: DebtorType::Unknown,
        previous_attempts: 3,
        relationship_value: RelationshipValue::Medium,
        has_written_contract: true,
        has_proof_of_delivery: false,
        debtor_has_assets: None,
    }
}

#[test]
fn court_fee_bands() {
    assert_eq!(county_court_fee(300.0), 35.0);
    assert_eq!(county_court_fee(300.01), 50.0);
    assert_eq!(county_court_fee(500.0), 50.0);
    assert_eq!(county_court_fee(1000.0), 70.0);
    assert_eq!(county_court_fee(1500.0), 80.0);
    assert_eq!(county_court_fee(3000.0), 115.0);
    assert_eq!(county_court_fee(5000.0), 205.0);
    assert_eq!(county_court_fee(10_000.0), 455.0);
    assert_eq!(county_court_fee(20_000.0), 1000.0);
    assert_eq!(county_court_fee(500_000.0), 10_000.0);
}

#[test]
fn agency_commission_band() {
    let commission = agency_commission(1000.0);
    assert_eq!(commission.min, 150.0);
    assert_eq!(commission.max, 250.0);
    assert_eq!(commission.percentage, "15-25%");
}

#[test]
fn rejects_non_positive_amount() {
    let params = EscalationParams {
        invoice_amount: 0.0,
        ..base_params()
    };
    match recommend(&params) {
        Err(DecisionError::InvalidAmount(amount)) => assert_eq!(amount, 0.0),
        other => panic!("expected InvalidAmount, got {other:?}"),
    }
}

#[test]
fn rejects_negative_days_overdue() {
    let params = EscalationParams {
        days_overdue: -1,
        ..base_params()
    };
    match recommend(&params) {
        Err(DecisionError::InvalidDays(days)) => assert_eq!(days, -1),
        other => panic!("expected InvalidDays, got {other:?}"),
    }
}

#[test]
fn identical_params_produce_identical_recommendations() {
    let params = base_params();
    let first = recommend(&params).expect("valid params");
    let second = recommend(&params).expect("valid params");
    assert_eq!(first, second);
}

#[test]
fn strong_evidence_against_a_business_debtor_goes_to_court() {
    let params = EscalationParams {
        invoice_amount: 2500.0,
        days_overdue: 95,
        is_disputed_debt: true,
        debtor_type: DebtorType::Business,
        previous_attempts: 7,
        relationship_value: RelationshipValue::Low,
        has_written_contract: true,
        has_proof_of_delivery: true,
        debtor_has_assets: Some(true),
    };

    let recommendation = recommend(&params).expect("valid params");
    assert_eq!(recommendation.primary_option, EscalationOption::Court);
    assert_eq!(recommendation.scores.court, 245);
    // 245/200 would exceed 100%; capped at the court ceiling.
    assert_eq!(recommendation.confidence, 95);
    assert!(recommendation
        .next_steps
        .iter()
        .any(|step| step.contains("Money Claim Online")));
}

#[test]
fn court_wins_an_exact_tie_with_agency() {
    let params = EscalationParams {
        invoice_amount: 2000.0,
        days_overdue: 95,
        is_disputed_debt: false,
        debtor_type: DebtorType::Business,
        previous_attempts: 4,
        relationship_value: RelationshipValue::Medium,
        has_written_contract: false,
        has_proof_of_delivery: false,
        debtor_has_assets: Some(false),
    };

    let recommendation = recommend(&params).expect("valid params");
    assert_eq!(recommendation.scores.court, 140);
    assert_eq!(recommendation.scores.agency, 140);
    assert_eq!(recommendation.primary_option, EscalationOption::Court);
    assert_eq!(recommendation.confidence, 70);
}

#[test]
fn fresh_small_debt_stays_internal() {
    let params = EscalationParams {
        invoice_amount: 400.0,
        days_overdue: 10,
        is_disputed_debt: false,
        debtor_type: DebtorType::Unknown,
        previous_attempts: 1,
        relationship_value: RelationshipValue::Medium,
        has_written_contract: false,
        has_proof_of_delivery: false,
        debtor_has_assets: None,
    };

    let recommendation = recommend(&params).expect("valid params");
    assert_eq!(
        recommendation.primary_option,
        EscalationOption::ContinueInternal
    );
    assert_eq!(recommendation.scores.continue_internal, 90);
    assert_eq!(recommendation.confidence, 45);
    // Court fee disproportionate to the debt, and no evidence on file.
    assert_eq!(recommendation.warnings.len(), 2);
    assert!(recommendation
        .next_steps
        .iter()
        .any(|step| step.contains("Letter Before Action")));
}

#[test]
fn cost_estimates_net_off_fees_and_commission() {
    let recommendation = recommend(&base_params()).expect("valid params");

    assert_eq!(recommendation.costs.county_court_fee, 70.0);
    assert_eq!(recommendation.costs.net_recovery_court, 930.0);
    assert_eq!(recommendation.costs.net_recovery_agency_min, 750.0);
    assert_eq!(recommendation.costs.net_recovery_agency_max, 850.0);
}

#[test]
fn disputed_debts_quote_discounted_success_rates() {
    let clear = recommend(&base_params()).expect("valid params");
    assert_eq!(clear.success_rate.court, "66-75%");
    assert_eq!(clear.success_rate.agency, "50-60%");

    let disputed = recommend(&EscalationParams {
        is_disputed_debt: true,
        ..base_params()
    })
    .expect("valid params");
    assert_eq!(disputed.success_rate.court, "40-50%");
    assert_eq!(disputed.success_rate.agency, "30-40%");
    assert!(disputed
        .warnings
        .iter()
        .any(|warning| warning.contains("lower success rates")));
}

#[test]
fn reasoning_trail_is_never_empty() {
    let recommendation = recommend(&base_params()).expect("valid params");
    assert!(!recommendation.reasoning.is_empty());
    assert!(recommendation.confidence <= 95);
}

#[test]
fn recommendation_serializes_for_reporting() {
    let recommendation = recommend(&base_params()).expect("valid params");
    let json = serde_json::to_value(&recommendation).expect("serializes");

    assert_eq!(json["costs"]["county_court_fee"], 70.0);
    assert_eq!(json["costs"]["agency_commission"]["percentage"], "15-25%");
    assert_eq!(json["timeline"]["agency"], "60-90 days typical collection period");
    assert_eq!(json["success_rate"]["court"], "66-75%");
}

#[test]
fn option_labels() {
    assert_eq!(EscalationOption::Court.label(), "court");
    assert_eq!(EscalationOption::Agency.label(), "agency");
    assert_eq!(
        EscalationOption::ContinueInternal.label(),
        "continue_internal"
    );
    assert_eq!(EscalationOption::WriteOff.label(), "write_off");
}
