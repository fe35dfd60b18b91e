use anyhow::{anyhow, Result};

use crate::cli::commands::{cell, report_service, Command};
use crate::config::ReportDeskConfig;
use crate::service::ServiceError;
use crate::workflows::errors::{INVALID_PAYMENT_DATE, MISSING_VERIFIED_COUNT};
use crate::workflows::{
    AdvanceInput, Record, RecordFilter, RecordStatus, RequiredInput, WorkflowError,
};

/// Parse a `--status` or `--from` argument into one of the known stages
pub fn parse_status_arg(value: Option<&str>) -> Result<Option<RecordStatus>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => RecordStatus::parse_known(raw).map(Some).ok_or_else(|| {
            anyhow!(
                "unknown status '{}', expected one of {}",
                raw,
                RecordStatus::KNOWN
                    .iter()
                    .map(RecordStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }),
    }
}

pub struct ListReportsCommand {
    config: ReportDeskConfig,
    search: Option<String>,
    status: Option<String>,
    json: bool,
}

impl ListReportsCommand {
    pub fn new(config: ReportDeskConfig) -> Self {
        Self {
            config,
            search: None,
            status: None,
            json: false,
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for ListReportsCommand {
    async fn execute(&self) -> Result<()> {
        let filter = RecordFilter::new()
            .with_search(self.search.clone().unwrap_or_default())
            .with_status(parse_status_arg(self.status.as_deref())?);

        let service = report_service(&self.config)?;
        let listing = service.list(&filter).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&listing.records)?);
            return Ok(());
        }

        if listing.records.is_empty() {
            println!("📋 No reports match");
        } else {
            println!(
                "{:>6}  {:<9}  {:<20}  {:<24}  {:<14}  {:>8}  {:>8}  {:<10}",
                "ID", "STATUS", "COURSE", "CENTER", "TECHNOLOGY", "STUDENTS", "VERIFIED", "PAID ON"
            );
            for record in &listing.records {
                println!("{}", report_row(record));
            }
        }
        println!();
        println!("{}", listing.summary());
        Ok(())
    }
}

fn report_row(record: &Record) -> String {
    format!(
        "{:>6}  {:<9}  {:<20}  {:<24}  {:<14}  {:>8}  {:>8}  {:<10}",
        record.id,
        record.status.as_str(),
        cell(record.course_name()),
        cell(record.center_name()),
        cell(record.tech_name()),
        record.student_count,
        cell(record.verified_count),
        cell(record.payment_date),
    )
}

/// Prints what a report needs before it can advance
pub struct NextStepCommand {
    config: ReportDeskConfig,
    id: u64,
}

impl NextStepCommand {
    pub fn new(config: ReportDeskConfig, id: u64) -> Self {
        Self { config, id }
    }
}

impl Command for NextStepCommand {
    async fn execute(&self) -> Result<()> {
        let service = report_service(&self.config)?;
        let (record, required) = service.required_input(self.id).await?;

        println!("📋 Report #{} is {}", record.id, record.status);
        match record.status.next() {
            Some(next) => println!("   ➡️  Next status: {next}"),
            None => println!("   🏁 Final status reached"),
        }
        println!("   💡 {}", required.prompt());
        match required {
            RequiredInput::VerifiedCount => println!(
                "      report-desk reports advance {} --verified-count <N>",
                record.id
            ),
            RequiredInput::PaymentDate => println!(
                "      report-desk reports advance {} --payment-date <YYYY-MM-DD>",
                record.id
            ),
            RequiredInput::Nothing => {
                println!("      report-desk reports advance {}", record.id)
            }
            RequiredInput::Terminal => {}
        }
        Ok(())
    }
}

pub struct AdvanceReportCommand {
    config: ReportDeskConfig,
    id: u64,
    verified_count: Option<String>,
    payment_date: Option<String>,
    from: Option<String>,
}

impl AdvanceReportCommand {
    pub fn new(config: ReportDeskConfig, id: u64) -> Self {
        Self {
            config,
            id,
            verified_count: None,
            payment_date: None,
            from: None,
        }
    }

    pub fn with_verified_count(mut self, verified_count: Option<String>) -> Self {
        self.verified_count = verified_count;
        self
    }

    pub fn with_payment_date(mut self, payment_date: Option<String>) -> Self {
        self.payment_date = payment_date;
        self
    }

    pub fn with_from(mut self, from: Option<String>) -> Self {
        self.from = from;
        self
    }

    fn input(&self) -> AdvanceInput {
        AdvanceInput::from_form(self.verified_count.as_deref(), self.payment_date.as_deref())
    }

    /// The status the operator expects the report to be at, stated or implied
    fn expected_from(&self, input: &AdvanceInput) -> Result<Option<RecordStatus>> {
        Ok(parse_status_arg(self.from.as_deref())?.or_else(|| input.implied_from()))
    }
}

impl Command for AdvanceReportCommand {
    async fn execute(&self) -> Result<()> {
        let input = self.input();
        let from = self.expected_from(&input)?;

        let service = report_service(&self.config)?;
        match service.advance_from(self.id, from, &input).await {
            Ok(outcome) => {
                println!("{}", success_message(&outcome.record, outcome.applied));
                Ok(())
            }
            Err(ServiceError::Workflow(err)) => Err(anyhow!(workflow_message(self.id, &err))),
            Err(err) => Err(err.into()),
        }
    }
}

/// Operator-facing text for a refused advance
pub fn workflow_message(id: u64, err: &WorkflowError) -> String {
    match err {
        WorkflowError::Validation(message) => match validation_prompt(message) {
            Some(required) => format!("{}. {}", message, required.prompt()),
            None => message.clone(),
        },
        WorkflowError::TerminalState => RequiredInput::Terminal.prompt().to_string(),
        WorkflowError::Stale { actual, .. } => format!(
            "report #{id} is now {actual}; run 'report-desk reports next {id}' and try again"
        ),
        WorkflowError::UnknownState(_) => err.to_string(),
    }
}

fn validation_prompt(message: &str) -> Option<RequiredInput> {
    match message {
        MISSING_VERIFIED_COUNT => Some(RequiredInput::VerifiedCount),
        INVALID_PAYMENT_DATE => Some(RequiredInput::PaymentDate),
        _ => None,
    }
}

/// Operator-facing confirmation after an advance
pub fn success_message(record: &Record, applied: bool) -> String {
    if !applied {
        return format!("✅ Report #{} is already {}", record.id, record.status);
    }
    match record.status {
        RecordStatus::Payment => "✅ Payment date saved and status updated".to_string(),
        ref status => format!("✅ Status updated to {status}"),
    }
}
