//! Storage abstractions so the scheduler can be exercised in isolation.
//!
//! Production adapters wrap Firestore; the bundled `memory` module implements
//! the same contracts for the CLI demo and tests. Every mutating method is
//! conditional or atomic because overlapping scheduler runs are an expected
//! condition, not an exceptional one.

use super::domain::{
    AttemptId, CollectionAttempt, DeliveryUpdate, DunningStep, FreelancerId, FreelancerProfile,
    Invoice, InvoiceId,
};
use super::stage::EscalationStage;
use chrono::{DateTime, Utc};

/// Invoice document store.
pub trait InvoiceStore: Send + Sync {
    /// Invoices eligible for collections: overdue-like status with
    /// `collections_enabled`, capped at `limit`.
    fn overdue_for_collections(&self, limit: usize) -> Result<Vec<Invoice>, StoreError>;

    fn fetch(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// Set `first_reminder_sent_at` only if currently unset, incrementing the
    /// attempt counter in the same write. Returns `false` when another run got
    /// there first.
    fn mark_first_reminder(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// As `mark_first_reminder` for the second stage; also transitions the
    /// invoice status to `in_collections`.
    fn mark_second_reminder(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Atomic increment; returns the new counter value.
    fn increment_attempts(&self, id: &InvoiceId) -> Result<u32, StoreError>;

    /// Record the stage the scheduler last computed.
    fn record_stage(&self, id: &InvoiceId, stage: EscalationStage) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invoice not found")]
    NotFound,
    #[error("invoice store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only attempt ledger with a uniqueness constraint on
/// `(invoice_id, DunningStep)` — the idempotency authority for dispatch.
pub trait AttemptLedger: Send + Sync {
    /// Insert a new entry. Fails with [`LedgerError::Duplicate`] when the
    /// `(invoice, step)` key already exists.
    fn append(&self, attempt: CollectionAttempt) -> Result<AttemptId, LedgerError>;

    fn contains(&self, invoice: &InvoiceId, step: DunningStep) -> Result<bool, LedgerError>;

    fn for_invoice(&self, invoice: &InvoiceId) -> Result<Vec<CollectionAttempt>, LedgerError>;

    /// Append delivery-status fields from an async provider webhook. The only
    /// permitted mutation of a ledger entry.
    fn record_delivery(&self, id: &AttemptId, update: DeliveryUpdate) -> Result<(), LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("attempt already recorded for invoice {invoice} step {step}")]
    Duplicate { invoice: String, step: &'static str },
    #[error("attempt not found")]
    NotFound,
    #[error("attempt ledger unavailable: {0}")]
    Unavailable(String),
}

/// Read-only consent and capability snapshot for a freelancer.
pub trait ProfileReader: Send + Sync {
    fn fetch(&self, freelancer: &FreelancerId) -> Result<FreelancerProfile, ProfileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("freelancer profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
