use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::workflows::collections::channels::{
    ChannelSet, EmailReceipt, EmailReminder, EmailSender, LetterReceipt, LetterRequest,
    LetterSender, SendError, SmsReceipt, SmsReminder, SmsSender,
};
use crate::workflows::collections::domain::{
    ConsentSnapshot, FreelancerId, FreelancerProfile, Invoice, InvoiceId, InvoiceStatus,
    PostalAddress, SubscriptionTier,
};
use crate::workflows::collections::memory::{
    MemoryAttemptLedger, MemoryInvoiceStore, MemoryProfileReader,
};
use crate::workflows::collections::rates::BaseRateTable;
use crate::workflows::collections::scheduler::CollectionsProcessor;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn at_noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).expect("valid test time"))
}

/// An overdue £1,000 invoice owned by `fr-1`, collections enabled, untouched.
pub fn overdue_invoice(id: &str, due_date: NaiveDate) -> Invoice {
    Invoice {
        id: InvoiceId(id.to_string()),
        reference: format!("INV-{}-{id}", due_date.format("%Y%m%d")),
        freelancer_id: FreelancerId("fr-1".to_string()),
        client_id: None,
        client_name: "Acme Corp".to_string(),
        client_email: "accounts@acme.example".to_string(),
        amount_pence: 100_000,
        currency: "GBP".to_string(),
        due_date,
        status: InvoiceStatus::Overdue,
        collections_enabled: true,
        collections_attempts: 0,
        first_reminder_sent_at: None,
        second_reminder_sent_at: None,
        payment_claim_status: None,
        collections_paused_until: None,
        current_stage: None,
        stage_override: None,
        payment_link: Some("https://pay.example/inv".to_string()),
    }
}

pub fn business_address() -> PostalAddress {
    PostalAddress {
        line1: "1 Market Street".to_string(),
        line2: None,
        city: "Leeds".to_string(),
        postcode: "LS1 1AA".to_string(),
        country: "United Kingdom".to_string(),
    }
}

pub fn paid_profile() -> FreelancerProfile {
    FreelancerProfile {
        freelancer_id: FreelancerId("fr-1".to_string()),
        tier: SubscriptionTier::Pro,
        consents: ConsentSnapshot {
            sms_consent: true,
            sms_opted_out: false,
            physical_mail_consent: true,
            physical_mail_opted_out: false,
        },
        phone_number: Some("+447700900123".to_string()),
        business_address: Some(business_address()),
    }
}

pub fn free_profile() -> FreelancerProfile {
    FreelancerProfile {
        tier: SubscriptionTier::Free,
        consents: ConsentSnapshot::default(),
        phone_number: None,
        business_address: None,
        ..paid_profile()
    }
}

#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<EmailReminder>>,
    sequence: AtomicUsize,
}

impl EmailSender for RecordingEmailSender {
    fn send(&self, reminder: &EmailReminder) -> Result<EmailReceipt, SendError> {
        self.sent
            .lock()
            .expect("email recorder poisoned")
            .push(reminder.clone());
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(EmailReceipt {
            message_id: format!("msg-{id:04}"),
        })
    }
}

#[derive(Default)]
pub struct RecordingSmsSender {
    pub sent: Mutex<Vec<SmsReminder>>,
    sequence: AtomicUsize,
}

impl SmsSender for RecordingSmsSender {
    fn send(&self, reminder: &SmsReminder) -> Result<SmsReceipt, SendError> {
        self.sent
            .lock()
            .expect("sms recorder poisoned")
            .push(reminder.clone());
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(SmsReceipt {
            message_sid: format!("SM{id:04}"),
            cost: Some(0.04),
        })
    }
}

#[derive(Default)]
pub struct RecordingLetterSender {
    pub sent: Mutex<Vec<LetterRequest>>,
    sequence: AtomicUsize,
}

impl LetterSender for RecordingLetterSender {
    fn send(&self, request: &LetterRequest) -> Result<LetterReceipt, SendError> {
        self.sent
            .lock()
            .expect("letter recorder poisoned")
            .push(request.clone());
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(LetterReceipt {
            letter_id: format!("ltr-{id:04}"),
            tracking_url: None,
        })
    }
}

/// Sender that always fails with a transport error.
pub struct FailingEmailSender;

impl EmailSender for FailingEmailSender {
    fn send(&self, _reminder: &EmailReminder) -> Result<EmailReceipt, SendError> {
        Err(SendError::Transport("smtp relay unreachable".to_string()))
    }
}

pub struct TestHarness {
    pub invoices: Arc<MemoryInvoiceStore>,
    pub ledger: Arc<MemoryAttemptLedger>,
    pub profiles: Arc<MemoryProfileReader>,
    pub email: Arc<RecordingEmailSender>,
    pub sms: Arc<RecordingSmsSender>,
    pub letters: Arc<RecordingLetterSender>,
    pub processor:
        CollectionsProcessor<MemoryInvoiceStore, MemoryAttemptLedger, MemoryProfileReader>,
}

pub fn harness(invoices: Vec<Invoice>, profiles: Vec<FreelancerProfile>) -> TestHarness {
    let invoices = Arc::new(MemoryInvoiceStore::with_invoices(invoices));
    let ledger = Arc::new(MemoryAttemptLedger::default());
    let profiles = Arc::new(MemoryProfileReader::with_profiles(profiles));
    let email = Arc::new(RecordingEmailSender::default());
    let sms = Arc::new(RecordingSmsSender::default());
    let letters = Arc::new(RecordingLetterSender::default());

    let processor = CollectionsProcessor::new(
        invoices.clone(),
        ledger.clone(),
        profiles.clone(),
        ChannelSet {
            email: email.clone(),
            sms: sms.clone(),
            letters: letters.clone(),
        },
        Arc::new(BaseRateTable::uk_default()),
        100,
    );

    TestHarness {
        invoices,
        ledger,
        profiles,
        email,
        sms,
        letters,
        processor,
    }
}
