//! Invoice collections: statutory interest, staged reminders, and
//! escalation-path recommendations.

pub mod channels;
pub mod domain;
pub mod escalation;
pub mod interest;
pub mod memory;
pub mod rates;
pub mod repository;
pub mod scheduler;
pub mod stage;

#[cfg(test)]
mod tests;

pub use channels::{
    ChannelSet, EmailLevel, EmailReceipt, EmailReminder, EmailSender, LetterLevel, LetterReceipt,
    LetterRequest, LetterSender, SendError, SmsReceipt, SmsReminder, SmsSender,
};
pub use domain::{
    AttemptId, AttemptResult, AttemptType, ClientId, CollectionAttempt, ConsentSnapshot,
    DeliveryStatus, DeliveryUpdate, DunningStep, FreelancerId, FreelancerProfile, Invoice,
    InvoiceId, InvoiceStatus, PaymentClaimStatus, PostalAddress, SubscriptionTier,
};
pub use interest::{
    calculate_late_payment_interest, fixed_recovery_cost, format_currency, InterestCalculation,
    InterestError, InterestParams, STATUTORY_INTEREST_RATE,
};
pub use rates::{BaseRateEntry, BaseRateResolution, BaseRateTable, RateTableError};
pub use repository::{
    AttemptLedger, InvoiceStore, LedgerError, ProfileError, ProfileReader, StoreError,
};
pub use scheduler::{
    CollectionsProcessor, CollectionsRunSummary, InvoiceFailure, ProcessorError,
    SMS_DAY_THRESHOLD,
};
pub use stage::{resolve_stage, EscalationStage};
