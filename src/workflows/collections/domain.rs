use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::interest::InterestCalculation;
use super::stage::EscalationStage;

/// Identifier wrapper for invoices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvoiceId(pub String);

/// Identifier wrapper for the owning freelancer account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FreelancerId(pub String);

/// Identifier wrapper for repeat clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

/// Identifier assigned to ledger entries on append.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    InCollections,
    Cancelled,
}

impl InvoiceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::InCollections => "in_collections",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses eligible for collections processing. `InCollections` stays in
    /// the scan set so day-30 letters still fire after the day-15 transition.
    pub const fn is_overdue_like(self) -> bool {
        matches!(self, InvoiceStatus::Overdue | InvoiceStatus::InCollections)
    }
}

/// Outcome of a client "I already paid" assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentClaimStatus {
    PendingVerification,
    Confirmed,
    Rejected,
}

/// Invoice fields the collections engine reads and conditionally updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Human-facing reference, e.g. `INV-20241001-00042`.
    pub reference: String,
    pub freelancer_id: FreelancerId,
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub client_email: String,
    /// Amount in minor units (pence).
    pub amount_pence: i64,
    pub currency: String,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub collections_enabled: bool,
    /// Monotonically incrementing dispatch counter.
    pub collections_attempts: u32,
    pub first_reminder_sent_at: Option<DateTime<Utc>>,
    pub second_reminder_sent_at: Option<DateTime<Utc>>,
    pub payment_claim_status: Option<PaymentClaimStatus>,
    pub collections_paused_until: Option<DateTime<Utc>>,
    /// Last stage the scheduler recorded; the resolver freezes here while a
    /// payment-claim pause is active.
    pub current_stage: Option<EscalationStage>,
    /// Manual correction applied by support; wins over the computed stage.
    pub stage_override: Option<EscalationStage>,
    pub payment_link: Option<String>,
}

impl Invoice {
    pub fn amount_pounds(&self) -> f64 {
        self.amount_pence as f64 / 100.0
    }

    /// Whole civil days past the due date; zero or negative means not overdue.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.due_date).num_days()
    }

    pub fn pause_active(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.payment_claim_status,
            Some(PaymentClaimStatus::PendingVerification)
        ) || self
            .collections_paused_until
            .map(|until| until > now)
            .unwrap_or(false)
    }
}

/// Channel classification stored on ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptType {
    EmailReminder,
    SmsReminder,
    PhysicalLetter,
    AiVoiceCall,
}

impl AttemptType {
    pub const fn label(self) -> &'static str {
        match self {
            AttemptType::EmailReminder => "email_reminder",
            AttemptType::SmsReminder => "sms_reminder",
            AttemptType::PhysicalLetter => "physical_letter",
            AttemptType::AiVoiceCall => "ai_voice_call",
        }
    }
}

/// The scheduler's dunning milestones. Each is at-most-once per invoice: the
/// ledger enforces uniqueness on `(invoice_id, DunningStep)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DunningStep {
    Day5Email,
    Day14Sms,
    Day15Email,
    Day30Letter,
}

impl DunningStep {
    pub const fn label(self) -> &'static str {
        match self {
            DunningStep::Day5Email => "day_5_email",
            DunningStep::Day14Sms => "day_14_sms",
            DunningStep::Day15Email => "day_15_email",
            DunningStep::Day30Letter => "day_30_letter",
        }
    }

    pub const fn channel(self) -> AttemptType {
        match self {
            DunningStep::Day5Email | DunningStep::Day15Email => AttemptType::EmailReminder,
            DunningStep::Day14Sms => AttemptType::SmsReminder,
            DunningStep::Day30Letter => AttemptType::PhysicalLetter,
        }
    }
}

/// Dispatch result recorded at append time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptResult {
    Success,
    Failed,
}

/// Async delivery status appended by provider webhooks after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryUpdate {
    pub status: DeliveryStatus,
    pub at: DateTime<Utc>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    Undelivered,
    Returned,
}

/// Append-only ledger entry, created once per dispatched reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionAttempt {
    pub invoice_id: InvoiceId,
    pub freelancer_id: FreelancerId,
    pub step: DunningStep,
    pub attempt_type: AttemptType,
    pub attempt_number: u32,
    pub attempt_date: DateTime<Utc>,
    pub result: AttemptResult,
    /// Provider correlation id: message id, SMS SID, or letter id.
    pub correlation_id: Option<String>,
    /// Interest snapshot quoted to the client in this reminder.
    pub interest: Option<InterestCalculation>,
    pub delivery: Option<DeliveryUpdate>,
}

/// Subscription tier gating premium channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionTier {
    Free,
    Starter,
    Pro,
}

impl SubscriptionTier {
    pub const fn is_paid(self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }

    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Starter => "starter",
            SubscriptionTier::Pro => "pro",
        }
    }
}

/// Per-channel consent flags. A channel never fires when consent is absent or
/// explicitly revoked, regardless of stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentSnapshot {
    pub sms_consent: bool,
    pub sms_opted_out: bool,
    pub physical_mail_consent: bool,
    pub physical_mail_opted_out: bool,
}

impl ConsentSnapshot {
    pub fn allows_sms(&self) -> bool {
        self.sms_consent && !self.sms_opted_out
    }

    pub fn allows_physical_mail(&self) -> bool {
        self.physical_mail_consent && !self.physical_mail_opted_out
    }
}

/// UK postal address for letter dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

/// Read-only freelancer snapshot consumed by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub freelancer_id: FreelancerId,
    pub tier: SubscriptionTier,
    pub consents: ConsentSnapshot,
    pub phone_number: Option<String>,
    pub business_address: Option<PostalAddress>,
}
