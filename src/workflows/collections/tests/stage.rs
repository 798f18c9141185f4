use crate::workflows::collections::domain::InvoiceStatus;
use crate::workflows::collections::stage::{resolve_stage, EscalationStage};

#[test]
fn thresholds_map_to_stages() {
    let cases = [
        (0, EscalationStage::OnTime),
        (4, EscalationStage::OnTime),
        (5, EscalationStage::Day5),
        (14, EscalationStage::Day5),
        (15, EscalationStage::Day15),
        (29, EscalationStage::Day15),
        (30, EscalationStage::Day30),
        (44, EscalationStage::Day30),
        (45, EscalationStage::AgencyReferred),
        (400, EscalationStage::AgencyReferred),
    ];

    for (days, expected) in cases {
        assert_eq!(
            EscalationStage::for_days_overdue(days),
            expected,
            "wrong stage at {days} days"
        );
    }
}

#[test]
fn stages_are_ordered_by_severity() {
    assert!(EscalationStage::OnTime < EscalationStage::Day5);
    assert!(EscalationStage::Day5 < EscalationStage::Day15);
    assert!(EscalationStage::Day15 < EscalationStage::Day30);
    assert!(EscalationStage::Day30 < EscalationStage::AgencyReferred);
}

#[test]
fn labels_are_snake_case() {
    assert_eq!(EscalationStage::OnTime.label(), "on_time");
    assert_eq!(EscalationStage::Day5.label(), "day_5");
    assert_eq!(EscalationStage::Day15.label(), "day_15");
    assert_eq!(EscalationStage::Day30.label(), "day_30");
    assert_eq!(EscalationStage::AgencyReferred.label(), "agency_referred");
}

#[test]
fn manual_override_wins_over_everything() {
    let stage = resolve_stage(
        InvoiceStatus::Paid,
        200,
        true,
        Some(EscalationStage::Day30),
        Some(EscalationStage::Day5),
    );
    assert_eq!(stage, EscalationStage::Day5);
}

#[test]
fn non_overdue_status_is_always_on_time() {
    for status in [InvoiceStatus::Draft, InvoiceStatus::Sent, InvoiceStatus::Paid] {
        assert_eq!(
            resolve_stage(status, 60, false, None, None),
            EscalationStage::OnTime
        );
    }
}

#[test]
fn zero_days_overdue_is_on_time() {
    assert_eq!(
        resolve_stage(InvoiceStatus::Overdue, 0, false, None, None),
        EscalationStage::OnTime
    );
}

#[test]
fn pause_freezes_at_last_recorded_stage() {
    // 40 days overdue would normally be Day30, but a payment-claim pause keeps
    // the invoice at the stage it held when the claim was raised.
    let stage = resolve_stage(
        InvoiceStatus::Overdue,
        40,
        true,
        Some(EscalationStage::Day15),
        None,
    );
    assert_eq!(stage, EscalationStage::Day15);
}

#[test]
fn pause_with_no_recorded_stage_falls_back_to_on_time() {
    let stage = resolve_stage(InvoiceStatus::Overdue, 40, true, None, None);
    assert_eq!(stage, EscalationStage::OnTime);
}

#[test]
fn unpaused_overdue_invoice_uses_the_threshold() {
    let stage = resolve_stage(
        InvoiceStatus::InCollections,
        40,
        false,
        Some(EscalationStage::Day15),
        None,
    );
    assert_eq!(stage, EscalationStage::Day30);
}
