//! Bank of England base-rate history.
//!
//! The Late Payment of Commercial Debts (Interest) Act 1998 requires the base
//! rate in force on the 30 June or 31 December immediately preceding the date
//! the debt became overdue, not the rate in force today. The table is injected
//! wherever interest is computed so tests can supply synthetic histories.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One half-yearly rate entry. `effective_from` is 1 January or 1 July;
/// `reference_date` is the preceding 31 December or 30 June used for the
/// statutory lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRateEntry {
    pub effective_from: NaiveDate,
    pub rate: f64,
    pub reference_date: NaiveDate,
}

/// Result of a statutory rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRateResolution {
    pub rate: f64,
    pub reference_date: NaiveDate,
    pub effective_from: NaiveDate,
}

/// Reported when a new half-year entry is approaching and missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateUpdateDue {
    pub next_update_date: NaiveDate,
    pub days_until_update: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("rate table must contain at least one entry")]
    Empty,
    #[error("failed to read rate table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rate table row: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid date '{value}' in rate table (expected YYYY-MM-DD)")]
    InvalidDate { value: String },
    #[error("invalid rate '{value}' in rate table")]
    InvalidRate { value: String },
}

/// Historical base-rate table, newest entry first.
#[derive(Debug, Clone)]
pub struct BaseRateTable {
    entries: Vec<BaseRateEntry>,
}

fn entry(
    (ey, em, ed): (i32, u32, u32),
    rate: f64,
    (ry, rm, rd): (i32, u32, u32),
) -> BaseRateEntry {
    BaseRateEntry {
        effective_from: NaiveDate::from_ymd_opt(ey, em, ed).expect("valid calendar date"),
        rate,
        reference_date: NaiveDate::from_ymd_opt(ry, rm, rd).expect("valid calendar date"),
    }
}

impl BaseRateTable {
    pub fn new(mut entries: Vec<BaseRateEntry>) -> Result<Self, RateTableError> {
        if entries.is_empty() {
            return Err(RateTableError::Empty);
        }
        entries.sort_by(|a, b| b.effective_from.cmp(&a.effective_from));
        Ok(Self { entries })
    }

    /// The published Bank of England history, 2020 onwards.
    /// Source: https://www.bankofengland.co.uk/boeapps/database/Bank-Rate.asp
    pub fn uk_default() -> Self {
        let entries = vec![
            entry((2025, 7, 1), 5.25, (2025, 6, 30)),
            entry((2025, 1, 1), 5.00, (2024, 12, 31)),
            entry((2024, 7, 1), 5.25, (2024, 6, 30)),
            entry((2024, 1, 1), 5.25, (2023, 12, 31)),
            entry((2023, 7, 1), 5.00, (2023, 6, 30)),
            entry((2023, 1, 1), 3.50, (2022, 12, 31)),
            entry((2022, 7, 1), 1.25, (2022, 6, 30)),
            entry((2022, 1, 1), 0.25, (2021, 12, 31)),
            entry((2021, 7, 1), 0.10, (2021, 6, 30)),
            entry((2021, 1, 1), 0.10, (2020, 12, 31)),
            entry((2020, 7, 1), 0.10, (2020, 6, 30)),
            entry((2020, 1, 1), 0.75, (2019, 12, 31)),
        ];
        Self::new(entries).expect("default table is non-empty")
    }

    /// Load a table from CSV with header `effective_from,rate,reference_date`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for row in csv_reader.records() {
            let record = row?;
            let effective_from = parse_date(record.get(0).unwrap_or_default())?;
            let raw_rate = record.get(1).unwrap_or_default();
            let rate = raw_rate
                .trim()
                .parse::<f64>()
                .map_err(|_| RateTableError::InvalidRate {
                    value: raw_rate.to_string(),
                })?;
            let reference_date = parse_date(record.get(2).unwrap_or_default())?;

            entries.push(BaseRateEntry {
                effective_from,
                rate,
                reference_date,
            });
        }

        Self::new(entries)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RateTableError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// The statutory reference date for a due date: 30 June of the same year
    /// for July–December due dates, else 31 December of the previous year.
    pub fn reference_date_for(due_date: NaiveDate) -> NaiveDate {
        if due_date.month() >= 7 {
            NaiveDate::from_ymd_opt(due_date.year(), 6, 30).expect("valid calendar date")
        } else {
            NaiveDate::from_ymd_opt(due_date.year() - 1, 12, 31).expect("valid calendar date")
        }
    }

    /// Resolve the legally correct rate for an invoice due date. Due dates
    /// before the table's start fail closed to the oldest known rate.
    pub fn for_due_date(&self, due_date: NaiveDate) -> BaseRateResolution {
        let reference_date = Self::reference_date_for(due_date);

        let matched = self
            .entries
            .iter()
            .find(|candidate| candidate.reference_date <= reference_date);

        let entry = match matched {
            Some(entry) => entry,
            None => {
                let oldest = self.entries.last().expect("table is non-empty");
                warn!(
                    %reference_date,
                    fallback_rate = oldest.rate,
                    "no base rate on record for reference date; using oldest known rate"
                );
                oldest
            }
        };

        BaseRateResolution {
            rate: entry.rate,
            reference_date: entry.reference_date,
            effective_from: entry.effective_from,
        }
    }

    /// Most recent rate on record.
    pub fn current_rate(&self) -> f64 {
        self.entries[0].rate
    }

    /// Flag an approaching half-year boundary (within 7 days of 1 Jan / 1 Jul)
    /// that has no entry yet, so operators know to check the published rate.
    pub fn update_due(&self, today: NaiveDate) -> Option<RateUpdateDue> {
        let year = today.year();
        let july_first = NaiveDate::from_ymd_opt(year, 7, 1).expect("valid calendar date");
        let next_update_date = if today <= july_first {
            july_first
        } else {
            NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid calendar date")
        };

        let days_until_update = (next_update_date - today).num_days();
        if !(0..=7).contains(&days_until_update) {
            return None;
        }

        let already_recorded = self
            .entries
            .iter()
            .any(|candidate| candidate.effective_from == next_update_date);
        if already_recorded {
            return None;
        }

        Some(RateUpdateDue {
            next_update_date,
            days_until_update,
        })
    }
}

impl Default for BaseRateTable {
    fn default() -> Self {
        Self::uk_default()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, RateTableError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RateTableError::InvalidDate {
        value: raw.to_string(),
    })
}
