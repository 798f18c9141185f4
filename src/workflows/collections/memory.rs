//! In-memory store implementations with the same conditional-write semantics
//! as the production adapters. They back the CLI fixture runs and the test
//! suites; nothing here is a mock, the idempotency behavior is real.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{
    AttemptId, CollectionAttempt, DeliveryUpdate, DunningStep, FreelancerId, FreelancerProfile,
    Invoice, InvoiceId,
};
use super::repository::{
    AttemptLedger, InvoiceStore, LedgerError, ProfileError, ProfileReader, StoreError,
};
use super::stage::EscalationStage;

static ATTEMPT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_attempt_id() -> AttemptId {
    let id = ATTEMPT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttemptId(format!("att-{id:06}"))
}

/// Invoice store over a mutex-guarded map. Conditional updates happen under
/// the lock, mirroring the compare-and-set writes the Firestore adapter uses.
#[derive(Default)]
pub struct MemoryInvoiceStore {
    invoices: Mutex<BTreeMap<InvoiceId, Invoice>>,
}

impl MemoryInvoiceStore {
    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        let map = invoices
            .into_iter()
            .map(|invoice| (invoice.id.clone(), invoice))
            .collect();
        Self {
            invoices: Mutex::new(map),
        }
    }

    pub fn insert(&self, invoice: Invoice) {
        self.invoices
            .lock()
            .expect("invoice store poisoned")
            .insert(invoice.id.clone(), invoice);
    }
}

impl InvoiceStore for MemoryInvoiceStore {
    fn overdue_for_collections(&self, limit: usize) -> Result<Vec<Invoice>, StoreError> {
        let invoices = self.invoices.lock().expect("invoice store poisoned");
        Ok(invoices
            .values()
            .filter(|invoice| invoice.status.is_overdue_like() && invoice.collections_enabled)
            .take(limit)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let invoices = self.invoices.lock().expect("invoice store poisoned");
        Ok(invoices.get(id).cloned())
    }

    fn mark_first_reminder(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut invoices = self.invoices.lock().expect("invoice store poisoned");
        let invoice = invoices.get_mut(id).ok_or(StoreError::NotFound)?;
        if invoice.first_reminder_sent_at.is_some() {
            return Ok(false);
        }
        invoice.first_reminder_sent_at = Some(at);
        invoice.collections_attempts += 1;
        Ok(true)
    }

    fn mark_second_reminder(&self, id: &InvoiceId, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut invoices = self.invoices.lock().expect("invoice store poisoned");
        let invoice = invoices.get_mut(id).ok_or(StoreError::NotFound)?;
        if invoice.second_reminder_sent_at.is_some() {
            return Ok(false);
        }
        invoice.second_reminder_sent_at = Some(at);
        invoice.collections_attempts += 1;
        invoice.status = super::domain::InvoiceStatus::InCollections;
        Ok(true)
    }

    fn increment_attempts(&self, id: &InvoiceId) -> Result<u32, StoreError> {
        let mut invoices = self.invoices.lock().expect("invoice store poisoned");
        let invoice = invoices.get_mut(id).ok_or(StoreError::NotFound)?;
        invoice.collections_attempts += 1;
        Ok(invoice.collections_attempts)
    }

    fn record_stage(&self, id: &InvoiceId, stage: EscalationStage) -> Result<(), StoreError> {
        let mut invoices = self.invoices.lock().expect("invoice store poisoned");
        let invoice = invoices.get_mut(id).ok_or(StoreError::NotFound)?;
        invoice.current_stage = Some(stage);
        Ok(())
    }
}

/// Append-only ledger with the `(invoice, step)` uniqueness constraint held in
/// a key set so duplicate appends fail even across interleaved runs.
#[derive(Default)]
pub struct MemoryAttemptLedger {
    entries: Mutex<Vec<(AttemptId, CollectionAttempt)>>,
    keys: Mutex<BTreeSet<(InvoiceId, DunningStep)>>,
}

impl MemoryAttemptLedger {
    pub fn entries(&self) -> Vec<CollectionAttempt> {
        self.entries
            .lock()
            .expect("ledger poisoned")
            .iter()
            .map(|(_, attempt)| attempt.clone())
            .collect()
    }
}

impl AttemptLedger for MemoryAttemptLedger {
    fn append(&self, attempt: CollectionAttempt) -> Result<AttemptId, LedgerError> {
        let key = (attempt.invoice_id.clone(), attempt.step);
        {
            let mut keys = self.keys.lock().expect("ledger poisoned");
            if !keys.insert(key) {
                return Err(LedgerError::Duplicate {
                    invoice: attempt.invoice_id.0,
                    step: attempt.step.label(),
                });
            }
        }

        let id = next_attempt_id();
        self.entries
            .lock()
            .expect("ledger poisoned")
            .push((id.clone(), attempt));
        Ok(id)
    }

    fn contains(&self, invoice: &InvoiceId, step: DunningStep) -> Result<bool, LedgerError> {
        let keys = self.keys.lock().expect("ledger poisoned");
        Ok(keys.contains(&(invoice.clone(), step)))
    }

    fn for_invoice(&self, invoice: &InvoiceId) -> Result<Vec<CollectionAttempt>, LedgerError> {
        let entries = self.entries.lock().expect("ledger poisoned");
        Ok(entries
            .iter()
            .filter(|(_, attempt)| &attempt.invoice_id == invoice)
            .map(|(_, attempt)| attempt.clone())
            .collect())
    }

    fn record_delivery(&self, id: &AttemptId, update: DeliveryUpdate) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().expect("ledger poisoned");
        let entry = entries
            .iter_mut()
            .find(|(entry_id, _)| entry_id == id)
            .ok_or(LedgerError::NotFound)?;
        entry.1.delivery = Some(update);
        Ok(())
    }
}

/// Profile reader over a fixed map of freelancer snapshots.
#[derive(Default)]
pub struct MemoryProfileReader {
    profiles: Mutex<BTreeMap<FreelancerId, FreelancerProfile>>,
}

impl MemoryProfileReader {
    pub fn with_profiles(profiles: Vec<FreelancerProfile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (profile.freelancer_id.clone(), profile))
            .collect();
        Self {
            profiles: Mutex::new(map),
        }
    }

    pub fn insert(&self, profile: FreelancerProfile) {
        self.profiles
            .lock()
            .expect("profile store poisoned")
            .insert(profile.freelancer_id.clone(), profile);
    }
}

impl ProfileReader for MemoryProfileReader {
    fn fetch(&self, freelancer: &FreelancerId) -> Result<FreelancerProfile, ProfileError> {
        let profiles = self.profiles.lock().expect("profile store poisoned");
        profiles.get(freelancer).cloned().ok_or(ProfileError::NotFound)
    }
}
