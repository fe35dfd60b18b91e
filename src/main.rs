use anyhow::Result;
use clap::Parser;

use report_desk::cli::commands::config::{InitConfigCommand, ShowConfigCommand};
use report_desk::cli::commands::invoices::{
    CreateInvoiceCommand, InvoiceSummaryCommand, ListInvoicesCommand, ShowInvoiceCommand,
};
use report_desk::cli::commands::reports::{
    AdvanceReportCommand, ListReportsCommand, NextStepCommand,
};
use report_desk::cli::commands::Command;
use report_desk::cli::{Cli, Commands, ConfigCommand, InvoicesCommand, ReportsCommand};
use report_desk::config::ReportDeskConfig;
use report_desk::invoice::NewInvoice;
use report_desk::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config init` runs without loading the existing configuration
    if let Commands::Config {
        command: ConfigCommand::Init { path, force },
    } = &cli.command
    {
        return tokio::runtime::Runtime::new()?
            .block_on(async { InitConfigCommand::new(path, *force).execute().await });
    }

    ReportDeskConfig::load_env_file()?;
    let config = report_desk::config()?.clone();
    init_telemetry(&config.observability)?;
    tracing::debug!("Configuration loaded successfully");

    tokio::runtime::Runtime::new()?.block_on(async { run(cli.command, config).await })
}

async fn run(command: Commands, config: ReportDeskConfig) -> Result<()> {
    match command {
        Commands::Reports { command } => match command {
            ReportsCommand::List {
                search,
                status,
                json,
            } => {
                ListReportsCommand::new(config)
                    .with_search(search)
                    .with_status(status)
                    .with_json(json)
                    .execute()
                    .await
            }
            ReportsCommand::Next { id } => NextStepCommand::new(config, id).execute().await,
            ReportsCommand::Advance {
                id,
                verified_count,
                payment_date,
                from,
            } => {
                AdvanceReportCommand::new(config, id)
                    .with_verified_count(verified_count)
                    .with_payment_date(payment_date)
                    .with_from(from)
                    .execute()
                    .await
            }
        },
        Commands::Invoices { command } => match command {
            InvoicesCommand::List { search, json } => {
                ListInvoicesCommand::new(config)
                    .with_search(search)
                    .with_json(json)
                    .execute()
                    .await
            }
            InvoicesCommand::Create {
                dealer_id,
                vehicle_id,
                customer_name,
                vehicle_price,
            } => {
                let invoice = NewInvoice::new(dealer_id, vehicle_id, customer_name, vehicle_price);
                CreateInvoiceCommand::new(config, invoice).execute().await
            }
            InvoicesCommand::Show {
                invoice_number,
                json,
            } => {
                ShowInvoiceCommand::new(config, invoice_number)
                    .with_json(json)
                    .execute()
                    .await
            }
            InvoicesCommand::Summary => InvoiceSummaryCommand::new(config).execute().await,
        },
        Commands::Config { command } => match command {
            ConfigCommand::Show => ShowConfigCommand::new(config).execute().await,
            ConfigCommand::Init { path, force } => {
                InitConfigCommand::new(path, force).execute().await
            }
        },
    }
}
