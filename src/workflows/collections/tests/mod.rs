mod common;

mod escalation;
mod rates;
mod stage;
