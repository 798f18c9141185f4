use chrono::NaiveDate;

use super::common::date;
use crate::workflows::collections::rates::{BaseRateEntry, BaseRateTable, RateTableError};

fn entry(effective: NaiveDate, rate: f64, reference: NaiveDate) -> BaseRateEntry {
    BaseRateEntry {
        effective_from: effective,
        rate,
        reference_date: reference,
    }
}

#[test]
fn reference_date_uses_prior_december_for_first_half_due_dates() {
    assert_eq!(
        BaseRateTable::reference_date_for(date(2024, 3, 15)),
        date(2023, 12, 31)
    );
    assert_eq!(
        BaseRateTable::reference_date_for(date(2024, 1, 1)),
        date(2023, 12, 31)
    );
    assert_eq!(
        BaseRateTable::reference_date_for(date(2024, 6, 30)),
        date(2023, 12, 31)
    );
}

#[test]
fn reference_date_uses_same_year_june_for_second_half_due_dates() {
    assert_eq!(
        BaseRateTable::reference_date_for(date(2024, 7, 1)),
        date(2024, 6, 30)
    );
    assert_eq!(
        BaseRateTable::reference_date_for(date(2024, 12, 31)),
        date(2024, 6, 30)
    );
}

#[test]
fn resolves_historical_rate_for_due_date() {
    let table = BaseRateTable::uk_default();

    let autumn_2024 = table.for_due_date(date(2024, 10, 1));
    assert_eq!(autumn_2024.rate, 5.25);
    assert_eq!(autumn_2024.reference_date, date(2024, 6, 30));

    let spring_2023 = table.for_due_date(date(2023, 3, 10));
    assert_eq!(spring_2023.rate, 3.50);
    assert_eq!(spring_2023.reference_date, date(2022, 12, 31));
}

#[test]
fn due_date_before_table_start_falls_back_to_oldest_rate() {
    let table = BaseRateTable::uk_default();
    let resolved = table.for_due_date(date(2018, 5, 1));
    assert_eq!(resolved.rate, 0.75);
    assert_eq!(resolved.reference_date, date(2019, 12, 31));
}

#[test]
fn empty_table_is_rejected() {
    match BaseRateTable::new(Vec::new()) {
        Err(RateTableError::Empty) => {}
        other => panic!("expected Empty error, got {other:?}"),
    }
}

#[test]
fn entries_are_sorted_newest_first_regardless_of_input_order() {
    let table = BaseRateTable::new(vec![
        entry(date(2023, 1, 1), 3.50, date(2022, 12, 31)),
        entry(date(2024, 1, 1), 5.25, date(2023, 12, 31)),
        entry(date(2022, 1, 1), 0.25, date(2021, 12, 31)),
    ])
    .expect("non-empty table");

    assert_eq!(table.current_rate(), 5.25);
}

#[test]
fn parses_csv_history() {
    let csv = "effective_from,rate,reference_date\n\
               2024-01-01,5.25,2023-12-31\n\
               2023-07-01,5.00,2023-06-30\n";
    let table = BaseRateTable::from_csv_reader(csv.as_bytes()).expect("valid csv");

    assert_eq!(table.current_rate(), 5.25);
    assert_eq!(table.for_due_date(date(2023, 11, 1)).rate, 5.00);
}

#[test]
fn csv_with_bad_rate_is_rejected() {
    let csv = "effective_from,rate,reference_date\n2024-01-01,five,2023-12-31\n";
    match BaseRateTable::from_csv_reader(csv.as_bytes()) {
        Err(RateTableError::InvalidRate { value }) => assert_eq!(value, "five"),
        other => panic!("expected InvalidRate error, got {other:?}"),
    }
}

#[test]
fn csv_with_bad_date_is_rejected() {
    let csv = "effective_from,rate,reference_date\n01/01/2024,5.25,2023-12-31\n";
    match BaseRateTable::from_csv_reader(csv.as_bytes()) {
        Err(RateTableError::InvalidDate { value }) => assert_eq!(value, "01/01/2024"),
        other => panic!("expected InvalidDate error, got {other:?}"),
    }
}

#[test]
fn update_due_flags_missing_entry_inside_seven_day_window() {
    let table = BaseRateTable::uk_default();

    // uk_default has no 2026-01-01 entry yet.
    let due = table
        .update_due(date(2025, 12, 28))
        .expect("update should be due");
    assert_eq!(due.next_update_date, date(2026, 1, 1));
    assert_eq!(due.days_until_update, 4);
}

#[test]
fn update_due_is_quiet_when_entry_already_recorded() {
    let table = BaseRateTable::uk_default();
    // 2025-07-01 is within the window from 2025-06-27 but already on record.
    assert_eq!(table.update_due(date(2025, 6, 27)), None);
}

#[test]
fn update_due_is_quiet_mid_half_year() {
    let table = BaseRateTable::uk_default();
    assert_eq!(table.update_due(date(2025, 3, 15)), None);
    assert_eq!(table.update_due(date(2025, 9, 10)), None);
}
