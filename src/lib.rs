//! Collections escalation engine for freelancer invoicing.
//!
//! The crate implements the recovery pipeline for overdue invoices: the UK
//! statutory late-payment interest calculator, the time-staged reminder
//! scheduler, and the escalation-path decision scorer. Storage and outbound
//! messaging live behind narrow traits so the engine can run against the
//! production SDK adapters or the bundled in-memory doubles.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
