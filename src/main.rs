use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use recoup::config::AppConfig;
use recoup::error::AppError;
use recoup::telemetry;
use recoup::workflows::collections::channels::{
    ChannelSet, EmailReceipt, EmailReminder, EmailSender, LetterReceipt, LetterRequest,
    LetterSender, SendError, SmsReceipt, SmsReminder, SmsSender,
};
use recoup::workflows::collections::escalation::{
    recommend, DebtorType, EscalationParams, RelationshipValue,
};
use recoup::workflows::collections::interest::{
    calculate_late_payment_interest, format_currency, InterestParams,
};
use recoup::workflows::collections::memory::{
    MemoryAttemptLedger, MemoryInvoiceStore, MemoryProfileReader,
};
use recoup::workflows::collections::rates::BaseRateTable;
use recoup::workflows::collections::scheduler::{CollectionsProcessor, CollectionsRunSummary};
use recoup::workflows::collections::{FreelancerProfile, Invoice};
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "recoup",
    about = "Collections escalation engine: statutory interest, staged reminders, and escalation advice",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute one collections pass over a JSON invoice fixture
    Run(RunArgs),
    /// Print the statutory late-payment interest breakdown for an invoice
    Interest(InterestArgs),
    /// Recommend an escalation path for an unpaid invoice
    Advise(AdviseArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to a JSON fixture with invoices and freelancer profiles
    #[arg(long)]
    fixture: PathBuf,
    /// Civil date for day-offset gates (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Optional base-rate history CSV (defaults to the published BoE table)
    #[arg(long)]
    rates_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InterestArgs {
    /// Principal amount in pounds
    #[arg(long)]
    amount: f64,
    /// Invoice due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    due_date: NaiveDate,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Explicit BoE base rate, skipping the historical lookup
    #[arg(long)]
    base_rate: Option<f64>,
    /// Optional base-rate history CSV (defaults to the published BoE table)
    #[arg(long)]
    rates_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AdviseArgs {
    /// Amount outstanding in pounds
    #[arg(long)]
    amount: f64,
    /// Days past the due date
    #[arg(long)]
    days_overdue: i64,
    /// The client disputes owing the debt
    #[arg(long)]
    disputed: bool,
    /// Debtor type: business, individual, or unknown
    #[arg(long, default_value = "unknown", value_parser = parse_debtor_type)]
    debtor_type: DebtorType,
    /// Collection attempts already made
    #[arg(long, default_value_t = 0)]
    attempts: u32,
    /// Ongoing relationship value: high, medium, or low
    #[arg(long, default_value = "medium", value_parser = parse_relationship)]
    relationship: RelationshipValue,
    /// A written contract exists for the work
    #[arg(long)]
    contract: bool,
    /// Proof of delivery or acceptance exists
    #[arg(long)]
    proof_of_delivery: bool,
    /// Whether the debtor has known assets (omit when unknown)
    #[arg(long)]
    has_assets: Option<bool>,
}

/// Invoice book snapshot consumed by `run`.
#[derive(Debug, Deserialize)]
struct CollectionsFixture {
    invoices: Vec<Invoice>,
    profiles: Vec<FreelancerProfile>,
}

/// Reminder senders for fixture runs: each dispatch is logged instead of
/// leaving the process.
struct ConsoleEmailSender;
struct ConsoleSmsSender;
struct ConsoleLetterSender;

impl EmailSender for ConsoleEmailSender {
    fn send(&self, reminder: &EmailReminder) -> Result<EmailReceipt, SendError> {
        info!(
            invoice = %reminder.invoice_reference,
            recipient = %reminder.recipient_email,
            total_owed = reminder.interest.total_owed,
            "email reminder dispatched"
        );
        Ok(EmailReceipt {
            message_id: format!("console-email-{}", reminder.invoice_id.0),
        })
    }
}

impl SmsSender for ConsoleSmsSender {
    fn send(&self, reminder: &SmsReminder) -> Result<SmsReceipt, SendError> {
        info!(
            invoice = %reminder.invoice_reference,
            recipient = %reminder.recipient_phone,
            "sms reminder dispatched"
        );
        Ok(SmsReceipt {
            message_sid: format!("console-sms-{}", reminder.invoice_reference),
            cost: None,
        })
    }
}

impl LetterSender for ConsoleLetterSender {
    fn send(&self, request: &LetterRequest) -> Result<LetterReceipt, SendError> {
        info!(
            invoice = %request.invoice_reference,
            postcode = %request.recipient.postcode,
            "letter dispatched"
        );
        Ok(LetterReceipt {
            letter_id: format!("console-letter-{}", request.invoice_reference),
            tracking_url: None,
        })
    }
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run_collections_pass(args),
        Command::Interest(args) => run_interest_breakdown(args),
        Command::Advise(args) => run_escalation_advice(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_debtor_type(raw: &str) -> Result<DebtorType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "business" => Ok(DebtorType::Business),
        "individual" => Ok(DebtorType::Individual),
        "unknown" => Ok(DebtorType::Unknown),
        other => Err(format!(
            "unknown debtor type '{other}' (expected business, individual, or unknown)"
        )),
    }
}

fn parse_relationship(raw: &str) -> Result<RelationshipValue, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "high" => Ok(RelationshipValue::High),
        "medium" => Ok(RelationshipValue::Medium),
        "low" => Ok(RelationshipValue::Low),
        other => Err(format!(
            "unknown relationship value '{other}' (expected high, medium, or low)"
        )),
    }
}

fn load_rate_table(path: Option<PathBuf>) -> Result<BaseRateTable, AppError> {
    match path {
        Some(path) => Ok(BaseRateTable::from_path(path)?),
        None => Ok(BaseRateTable::uk_default()),
    }
}

fn run_collections_pass(args: RunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let rates = Arc::new(load_rate_table(args.rates_csv)?);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let raw = fs::read_to_string(&args.fixture)?;
    let fixture: CollectionsFixture = serde_json::from_str(&raw)?;

    info!(
        invoices = fixture.invoices.len(),
        profiles = fixture.profiles.len(),
        %today,
        "fixture loaded"
    );

    if let Some(due) = rates.update_due(today) {
        println!(
            "NOTE: base-rate table has no entry for {} ({} days away); check the published BoE rate",
            due.next_update_date, due.days_until_update
        );
    }

    let invoices = Arc::new(MemoryInvoiceStore::with_invoices(fixture.invoices));
    let ledger = Arc::new(MemoryAttemptLedger::default());
    let profiles = Arc::new(MemoryProfileReader::with_profiles(fixture.profiles));

    let processor = CollectionsProcessor::new(
        invoices,
        ledger.clone(),
        profiles,
        ChannelSet {
            email: Arc::new(ConsoleEmailSender),
            sms: Arc::new(ConsoleSmsSender),
            letters: Arc::new(ConsoleLetterSender),
        },
        rates,
        config.collections.batch_limit,
    );

    let summary = processor.run(Utc::now(), today)?;
    render_run_summary(&summary);

    Ok(())
}

fn render_run_summary(summary: &CollectionsRunSummary) {
    println!("Collections pass complete");
    println!("Invoices scanned:        {}", summary.scanned);
    println!("First reminders sent:    {}", summary.first_reminders_sent);
    println!("SMS reminders sent:      {}", summary.sms_reminders_sent);
    println!("Second reminders sent:   {}", summary.second_reminders_sent);
    println!("Letters sent:            {}", summary.letters_sent);
    println!("Paused (payment claim):  {}", summary.skipped_paused);

    if summary.missing_address.is_empty() {
        println!("Missing addresses: none");
    } else {
        println!("Missing addresses");
        for invoice in &summary.missing_address {
            println!("- {}", invoice.0);
        }
    }

    if summary.errors.is_empty() {
        println!("Errors: none");
    } else {
        println!("Errors");
        for failure in &summary.errors {
            println!("- {}: {}", failure.invoice_id.0, failure.reason);
        }
    }
}

fn run_interest_breakdown(args: InterestArgs) -> Result<(), AppError> {
    let rates = load_rate_table(args.rates_csv)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let calculation = calculate_late_payment_interest(
        &InterestParams {
            principal: args.amount,
            due_date: args.due_date,
            evaluation_date: as_of,
            base_rate_override: args.base_rate,
        },
        &rates,
    )?;

    println!("{}", calculation.breakdown_text());
    Ok(())
}

fn run_escalation_advice(args: AdviseArgs) -> Result<(), AppError> {
    let params = EscalationParams {
        invoice_amount: args.amount,
        days_overdue: args.days_overdue,
        is_disputed_debt: args.disputed,
        debtor_type: args.debtor_type,
        previous_attempts: args.attempts,
        relationship_value: args.relationship,
        has_written_contract: args.contract,
        has_proof_of_delivery: args.proof_of_delivery,
        debtor_has_assets: args.has_assets,
    };

    let recommendation = recommend(&params)?;

    println!(
        "Recommended path: {} ({}% confidence)",
        recommendation.primary_option.label(),
        recommendation.confidence
    );
    println!(
        "Scores: court {}, agency {}, continue_internal {}, write_off {}",
        recommendation.scores.court,
        recommendation.scores.agency,
        recommendation.scores.continue_internal,
        recommendation.scores.write_off
    );

    println!("\nReasoning");
    for line in &recommendation.reasoning {
        println!("- {line}");
    }

    if !recommendation.warnings.is_empty() {
        println!("\nWarnings");
        for warning in &recommendation.warnings {
            println!("- {warning}");
        }
    }

    println!("\nCosts");
    println!(
        "- County Court fee: {}",
        format_currency(recommendation.costs.county_court_fee)
    );
    println!(
        "- Agency commission ({}): {} to {}",
        recommendation.costs.agency_commission.percentage,
        format_currency(recommendation.costs.agency_commission.min),
        format_currency(recommendation.costs.agency_commission.max)
    );
    println!(
        "- Net recovery via court: {}",
        format_currency(recommendation.costs.net_recovery_court)
    );
    println!(
        "- Net recovery via agency: {} to {}",
        format_currency(recommendation.costs.net_recovery_agency_min),
        format_currency(recommendation.costs.net_recovery_agency_max)
    );

    println!("\nTimeline");
    println!("- Court: {}", recommendation.timeline.court);
    println!("- Agency: {}", recommendation.timeline.agency);

    println!("\nSuccess rates");
    println!("- Court: {}", recommendation.success_rate.court);
    println!("- Agency: {}", recommendation.success_rate.agency);

    println!("\nNext steps");
    for step in &recommendation.next_steps {
        println!("{step}");
    }

    Ok(())
}
