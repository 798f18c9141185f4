//! The cron-invoked collections pass.
//!
//! Stateless between invocations; all state lives in the invoice store and the
//! attempt ledger. Invocations may overlap, so every state-advancing write is
//! conditional and the ledger's `(invoice, step)` uniqueness is the dispatch
//! authority. A failure processing one invoice never aborts the rest of the
//! batch; only an unavailable invoice store aborts the run.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::channels::{
    ChannelSet, EmailLevel, EmailReminder, LetterLevel, LetterRequest, SmsReminder,
};
use super::domain::{
    AttemptResult, CollectionAttempt, DunningStep, Invoice, InvoiceId, PostalAddress,
    FreelancerProfile,
};
use super::interest::{calculate_late_payment_interest, InterestCalculation, InterestError, InterestParams};
use super::rates::BaseRateTable;
use super::repository::{AttemptLedger, InvoiceStore, LedgerError, ProfileError, ProfileReader, StoreError};
use super::stage::{
    resolve_stage, DAY_15_THRESHOLD, DAY_30_THRESHOLD, DAY_5_THRESHOLD,
};

/// Day offset for the premium SMS nudge. Sits between the two email stages and
/// is gated by tier and consent rather than an invoice timestamp.
pub const SMS_DAY_THRESHOLD: i64 = 14;

/// Aggregate outcome of one scheduler pass. Partial failures land in `errors`;
/// the run itself only fails when the invoice store cannot be queried.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionsRunSummary {
    pub scanned: usize,
    pub first_reminders_sent: usize,
    pub sms_reminders_sent: usize,
    pub second_reminders_sent: usize,
    pub letters_sent: usize,
    pub skipped_paused: usize,
    /// Invoices where a letter was due but no usable postal address exists;
    /// flagged for user follow-up rather than treated as failures.
    pub missing_address: Vec<InvoiceId>,
    pub errors: Vec<InvoiceFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceFailure {
    pub invoice_id: InvoiceId,
    pub reason: String,
}

/// Run-aborting failure: nothing to iterate over.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("failed to query overdue invoices: {0}")]
    Store(#[from] StoreError),
}

/// Per-invoice failure, contained at the batch boundary.
#[derive(Debug, thiserror::Error)]
enum InvoiceProcessingError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Profile(#[from] ProfileError),
    #[error("{0}")]
    Interest(#[from] InterestError),
}

/// Orchestrates one collections pass over the overdue book.
pub struct CollectionsProcessor<S, L, P> {
    invoices: Arc<S>,
    ledger: Arc<L>,
    profiles: Arc<P>,
    channels: ChannelSet,
    rates: Arc<BaseRateTable>,
    batch_limit: usize,
}

impl<S, L, P> CollectionsProcessor<S, L, P>
where
    S: InvoiceStore + 'static,
    L: AttemptLedger + 'static,
    P: ProfileReader + 'static,
{
    pub fn new(
        invoices: Arc<S>,
        ledger: Arc<L>,
        profiles: Arc<P>,
        channels: ChannelSet,
        rates: Arc<BaseRateTable>,
        batch_limit: usize,
    ) -> Self {
        Self {
            invoices,
            ledger,
            profiles,
            channels,
            rates,
            batch_limit,
        }
    }

    /// Execute one pass. `now` stamps writes; `today` is the civil date used
    /// for day-offset gates, normalized by the caller to Europe/London.
    pub fn run(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<CollectionsRunSummary, ProcessorError> {
        let batch = self.invoices.overdue_for_collections(self.batch_limit)?;

        let mut summary = CollectionsRunSummary {
            scanned: batch.len(),
            ..CollectionsRunSummary::default()
        };

        for invoice in &batch {
            if let Err(err) = self.process_invoice(invoice, now, today, &mut summary) {
                warn!(invoice = %invoice.id.0, error = %err, "invoice processing failed");
                summary.errors.push(InvoiceFailure {
                    invoice_id: invoice.id.clone(),
                    reason: err.to_string(),
                });
            }
        }

        info!(
            scanned = summary.scanned,
            first = summary.first_reminders_sent,
            sms = summary.sms_reminders_sent,
            second = summary.second_reminders_sent,
            letters = summary.letters_sent,
            paused = summary.skipped_paused,
            errors = summary.errors.len(),
            "collections pass complete"
        );

        Ok(summary)
    }

    fn process_invoice(
        &self,
        invoice: &Invoice,
        now: DateTime<Utc>,
        today: NaiveDate,
        summary: &mut CollectionsRunSummary,
    ) -> Result<(), InvoiceProcessingError> {
        if invoice.pause_active(now) {
            debug!(invoice = %invoice.id.0, "payment claim pause active; skipping");
            summary.skipped_paused += 1;
            return Ok(());
        }

        let days_overdue = invoice.days_overdue(today);
        if days_overdue < DAY_5_THRESHOLD {
            return Ok(());
        }

        let interest = calculate_late_payment_interest(
            &InterestParams {
                principal: invoice.amount_pounds(),
                due_date: invoice.due_date,
                evaluation_date: today,
                base_rate_override: None,
            },
            &self.rates,
        )?;

        // Ledger numbering continues from the stored counter; each step that
        // actually dispatches in this pass takes the next number.
        let mut attempt_number = invoice.collections_attempts;

        if invoice.first_reminder_sent_at.is_none() {
            self.email_step(
                invoice,
                DunningStep::Day5Email,
                EmailLevel::FirstReminder,
                &interest,
                now,
                &mut attempt_number,
                summary,
            )?;
        }

        if days_overdue >= DAY_15_THRESHOLD && invoice.second_reminder_sent_at.is_none() {
            self.email_step(
                invoice,
                DunningStep::Day15Email,
                EmailLevel::SecondReminder,
                &interest,
                now,
                &mut attempt_number,
                summary,
            )?;
        }

        let stage = resolve_stage(
            invoice.status,
            days_overdue,
            false,
            invoice.current_stage,
            invoice.stage_override,
        );
        if invoice.current_stage != Some(stage) {
            self.invoices.record_stage(&invoice.id, stage)?;
        }

        // Only the premium channels read the consent snapshot; a
        // profile-store miss surfaces here, after the email stages and the
        // stage record have already landed.
        if days_overdue >= SMS_DAY_THRESHOLD {
            let profile = self.profiles.fetch(&invoice.freelancer_id)?;

            self.sms_step(invoice, &profile, &interest, now, &mut attempt_number, summary)?;

            if days_overdue >= DAY_30_THRESHOLD {
                self.letter_step(
                    invoice,
                    &profile,
                    &interest,
                    days_overdue,
                    now,
                    &mut attempt_number,
                    summary,
                )?;
            }
        }

        Ok(())
    }

    /// Shared path for the day-5 and day-15 email stages. The ledger key is
    /// authoritative; a marker missing while the ledger entry exists means a
    /// previous run crashed between the two writes, so the marker is repaired
    /// without re-sending.
    fn email_step(
        &self,
        invoice: &Invoice,
        step: DunningStep,
        level: EmailLevel,
        interest: &InterestCalculation,
        now: DateTime<Utc>,
        attempt_number: &mut u32,
        summary: &mut CollectionsRunSummary,
    ) -> Result<(), InvoiceProcessingError> {
        if self.ledger.contains(&invoice.id, step)? {
            let repaired = self.mark_email_stage(invoice, step, now)?;
            if repaired {
                warn!(
                    invoice = %invoice.id.0,
                    step = step.label(),
                    "ledger entry present without stage marker; marker repaired"
                );
            }
            return Ok(());
        }

        let reminder = EmailReminder {
            invoice_id: invoice.id.clone(),
            invoice_reference: invoice.reference.clone(),
            recipient_email: invoice.client_email.clone(),
            client_name: invoice.client_name.clone(),
            level,
            interest: interest.clone(),
            payment_link: invoice.payment_link.clone(),
        };

        let receipt = match self.channels.email.send(&reminder) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(invoice = %invoice.id.0, step = step.label(), error = %err, "email send failed; will retry next run");
                summary.errors.push(InvoiceFailure {
                    invoice_id: invoice.id.clone(),
                    reason: format!("{} send failed: {err}", step.label()),
                });
                return Ok(());
            }
        };

        let numbered = *attempt_number + 1;
        match self.ledger.append(CollectionAttempt {
            invoice_id: invoice.id.clone(),
            freelancer_id: invoice.freelancer_id.clone(),
            step,
            attempt_type: step.channel(),
            attempt_number: numbered,
            attempt_date: now,
            result: AttemptResult::Success,
            correlation_id: Some(receipt.message_id),
            interest: Some(interest.clone()),
            delivery: None,
        }) {
            Ok(_) => *attempt_number = numbered,
            Err(LedgerError::Duplicate { .. }) => {
                // Concurrent run dispatched first; its ledger write wins.
                warn!(invoice = %invoice.id.0, step = step.label(), "duplicate ledger append; concurrent run detected");
                return Ok(());
            }
            Err(other) => return Err(other.into()),
        }

        let marked = self.mark_email_stage(invoice, step, now)?;
        if !marked {
            warn!(invoice = %invoice.id.0, step = step.label(), "stage marker already set by concurrent run");
            return Ok(());
        }

        match level {
            EmailLevel::FirstReminder => summary.first_reminders_sent += 1,
            EmailLevel::SecondReminder => summary.second_reminders_sent += 1,
        }

        Ok(())
    }

    fn mark_email_stage(
        &self,
        invoice: &Invoice,
        step: DunningStep,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match step {
            DunningStep::Day15Email => self.invoices.mark_second_reminder(&invoice.id, now),
            _ => self.invoices.mark_first_reminder(&invoice.id, now),
        }
    }

    fn sms_step(
        &self,
        invoice: &Invoice,
        profile: &FreelancerProfile,
        interest: &InterestCalculation,
        now: DateTime<Utc>,
        attempt_number: &mut u32,
        summary: &mut CollectionsRunSummary,
    ) -> Result<(), InvoiceProcessingError> {
        if !profile.tier.is_paid() {
            debug!(invoice = %invoice.id.0, tier = profile.tier.label(), "sms reminder is a paid-tier feature");
            return Ok(());
        }
        if !profile.consents.allows_sms() {
            info!(invoice = %invoice.id.0, "no sms consent; skipping sms reminder");
            return Ok(());
        }
        let phone = match &profile.phone_number {
            Some(phone) if !phone.trim().is_empty() => phone.clone(),
            _ => {
                info!(invoice = %invoice.id.0, "no phone number on file; skipping sms reminder");
                return Ok(());
            }
        };

        if self.ledger.contains(&invoice.id, DunningStep::Day14Sms)? {
            return Ok(());
        }

        let reminder = SmsReminder {
            recipient_phone: phone,
            invoice_reference: invoice.reference.clone(),
            amount_owed: interest.total_owed,
            payment_link: invoice.payment_link.clone(),
        };

        let receipt = match self.channels.sms.send(&reminder) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(invoice = %invoice.id.0, error = %err, "sms send failed; will retry next run");
                summary.errors.push(InvoiceFailure {
                    invoice_id: invoice.id.clone(),
                    reason: format!("day_14_sms send failed: {err}"),
                });
                return Ok(());
            }
        };

        let numbered = *attempt_number + 1;
        match self.ledger.append(CollectionAttempt {
            invoice_id: invoice.id.clone(),
            freelancer_id: invoice.freelancer_id.clone(),
            step: DunningStep::Day14Sms,
            attempt_type: DunningStep::Day14Sms.channel(),
            attempt_number: numbered,
            attempt_date: now,
            result: AttemptResult::Success,
            correlation_id: Some(receipt.message_sid),
            interest: Some(interest.clone()),
            delivery: None,
        }) {
            Ok(_) => *attempt_number = numbered,
            Err(LedgerError::Duplicate { .. }) => {
                warn!(invoice = %invoice.id.0, "duplicate sms ledger append; concurrent run detected");
                return Ok(());
            }
            Err(other) => return Err(other.into()),
        }

        self.invoices.increment_attempts(&invoice.id)?;
        summary.sms_reminders_sent += 1;
        Ok(())
    }

    fn letter_step(
        &self,
        invoice: &Invoice,
        profile: &FreelancerProfile,
        interest: &InterestCalculation,
        days_overdue: i64,
        now: DateTime<Utc>,
        attempt_number: &mut u32,
        summary: &mut CollectionsRunSummary,
    ) -> Result<(), InvoiceProcessingError> {
        if !profile.tier.is_paid() {
            debug!(invoice = %invoice.id.0, tier = profile.tier.label(), "physical letter is a paid-tier feature");
            return Ok(());
        }
        if !profile.consents.allows_physical_mail() {
            info!(invoice = %invoice.id.0, "no postal consent; skipping letter");
            return Ok(());
        }

        if self.ledger.contains(&invoice.id, DunningStep::Day30Letter)? {
            return Ok(());
        }

        let address = match profile.business_address.as_ref().filter(|a| address_complete(a)) {
            Some(address) => address.clone(),
            None => {
                info!(invoice = %invoice.id.0, "letter due but no usable postal address; flagged for follow-up");
                summary.missing_address.push(invoice.id.clone());
                return Ok(());
            }
        };

        let request = LetterRequest {
            recipient: address,
            invoice_reference: invoice.reference.clone(),
            level: LetterLevel::Lba,
            amount_owed: interest.total_owed,
            days_past_due: days_overdue,
        };

        let receipt = match self.channels.letters.send(&request) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(invoice = %invoice.id.0, error = %err, "letter send failed; will retry next run");
                summary.errors.push(InvoiceFailure {
                    invoice_id: invoice.id.clone(),
                    reason: format!("day_30_letter send failed: {err}"),
                });
                return Ok(());
            }
        };

        let numbered = *attempt_number + 1;
        match self.ledger.append(CollectionAttempt {
            invoice_id: invoice.id.clone(),
            freelancer_id: invoice.freelancer_id.clone(),
            step: DunningStep::Day30Letter,
            attempt_type: DunningStep::Day30Letter.channel(),
            attempt_number: numbered,
            attempt_date: now,
            result: AttemptResult::Success,
            correlation_id: Some(receipt.letter_id),
            interest: Some(interest.clone()),
            delivery: None,
        }) {
            Ok(_) => *attempt_number = numbered,
            Err(LedgerError::Duplicate { .. }) => {
                warn!(invoice = %invoice.id.0, "duplicate letter ledger append; concurrent run detected");
                return Ok(());
            }
            Err(other) => return Err(other.into()),
        }

        self.invoices.increment_attempts(&invoice.id)?;
        summary.letters_sent += 1;
        Ok(())
    }
}

fn address_complete(address: &PostalAddress) -> bool {
    !address.line1.trim().is_empty()
        && !address.city.trim().is_empty()
        && !address.postcode.trim().is_empty()
}
