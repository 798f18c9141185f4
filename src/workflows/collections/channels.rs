//! Outbound channel contracts.
//!
//! These are the narrow seams the messaging collaborators (SendGrid, Twilio,
//! Lob) implement. The engine never sees provider wire formats, only a receipt
//! with the correlation id it records on the attempt ledger.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{InvoiceId, PostalAddress};
use super::interest::InterestCalculation;

/// Email reminder escalation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailLevel {
    FirstReminder,
    SecondReminder,
}

impl EmailLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EmailLevel::FirstReminder => "first_reminder",
            EmailLevel::SecondReminder => "second_reminder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailReminder {
    pub invoice_id: InvoiceId,
    pub invoice_reference: String,
    pub recipient_email: String,
    pub client_name: String,
    pub level: EmailLevel,
    /// Interest position quoted in the reminder body.
    pub interest: InterestCalculation,
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
}

pub trait EmailSender: Send + Sync {
    fn send(&self, reminder: &EmailReminder) -> Result<EmailReceipt, SendError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsReminder {
    pub recipient_phone: String,
    pub invoice_reference: String,
    /// Total owed including accrued interest, in pounds.
    pub amount_owed: f64,
    pub payment_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub message_sid: String,
    /// Provider cost in pounds, when reported.
    pub cost: Option<f64>,
}

/// SMS dispatch. Implementations must enforce UK comms-hours compliance
/// themselves (no sends outside 8am–9pm or on Sundays) and reject with
/// [`SendError::Rejected`] outside the window.
pub trait SmsSender: Send + Sync {
    fn send(&self, reminder: &SmsReminder) -> Result<SmsReceipt, SendError>;
}

/// Physical letter escalation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterLevel {
    Gentle,
    FinalWarning,
    /// Letter Before Action.
    Lba,
}

impl LetterLevel {
    pub const fn label(self) -> &'static str {
        match self {
            LetterLevel::Gentle => "gentle",
            LetterLevel::FinalWarning => "final_warning",
            LetterLevel::Lba => "lba",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterRequest {
    pub recipient: PostalAddress,
    pub invoice_reference: String,
    pub level: LetterLevel,
    pub amount_owed: f64,
    pub days_past_due: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterReceipt {
    pub letter_id: String,
    pub tracking_url: Option<String>,
}

pub trait LetterSender: Send + Sync {
    fn send(&self, request: &LetterRequest) -> Result<LetterReceipt, SendError>;
}

/// Transient or policy failure from a channel provider. The scheduler logs it
/// and leaves the stage un-advanced so the next run retries.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("channel transport unavailable: {0}")]
    Transport(String),
    #[error("send rejected by provider: {0}")]
    Rejected(String),
}

/// The set of outbound channels injected into the scheduler.
#[derive(Clone)]
pub struct ChannelSet {
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
    pub letters: Arc<dyn LetterSender>,
}
