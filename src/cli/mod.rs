use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "report-desk")]
#[command(about = "Review resource-center reports and dealership invoices")]
#[command(long_about = "report-desk moves resource-center reports through their review stages \
                       (ENTERED, VERIFIED, FINANCE, PAYMENT) against the reports backend, and \
                       lists or creates dealership invoices. Start with 'report-desk reports list'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and advance resource-center reports
    Reports {
        #[command(subcommand)]
        command: ReportsCommand,
    },
    /// List, create and summarise dealership invoices
    Invoices {
        #[command(subcommand)]
        command: InvoicesCommand,
    },
    /// Show or write the report-desk configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ReportsCommand {
    /// List reports, optionally filtered
    List {
        /// Case-insensitive text matched against technology, course, center, resources and package id
        #[arg(long, help = "Search text for technology, course, center, resources or package id")]
        search: Option<String>,
        /// Only show reports at this status
        #[arg(long, help = "Status filter: ENTERED, VERIFIED, FINANCE or PAYMENT")]
        status: Option<String>,
        /// Print the records as JSON
        #[arg(long, help = "Print matching records as JSON instead of a table")]
        json: bool,
    },
    /// Show what a report needs before it can advance
    Next {
        /// Report id
        id: u64,
    },
    /// Advance a report to its next status
    Advance {
        /// Report id
        id: u64,
        /// Verified student count (required to leave ENTERED)
        #[arg(long, help = "Verified student count, required when the report is ENTERED")]
        verified_count: Option<String>,
        /// Payment date (required to leave FINANCE)
        #[arg(long, help = "Payment date as YYYY-MM-DD, required when the report is at FINANCE")]
        payment_date: Option<String>,
        /// Status the report is expected to be at before this advance
        #[arg(long, help = "Expected current status; implied by --verified-count or --payment-date when omitted")]
        from: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum InvoicesCommand {
    /// List invoices
    List {
        /// Case-insensitive text matched against customer, invoice number and transaction id
        #[arg(long, help = "Search text for customer name, invoice number or transaction id")]
        search: Option<String>,
        /// Print the invoices as JSON
        #[arg(long, help = "Print matching invoices as JSON instead of a table")]
        json: bool,
    },
    /// Create a new invoice
    Create {
        #[arg(long, help = "Dealer id")]
        dealer_id: i64,
        #[arg(long, help = "Vehicle id")]
        vehicle_id: i64,
        #[arg(long, help = "Customer name")]
        customer_name: String,
        #[arg(long, help = "Vehicle price before tax")]
        vehicle_price: f64,
    },
    /// Show one invoice as a report
    Show {
        /// Invoice number, e.g. INV-1001
        invoice_number: String,
        /// Print the invoice as JSON
        #[arg(long, help = "Print the invoice as JSON instead of a report")]
        json: bool,
    },
    /// Show total revenue, invoice count and average value
    Summary,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration with the token masked
    Show,
    /// Write a default configuration file
    Init {
        /// Where to write the file
        #[arg(long, default_value = crate::config::CONFIG_FILE, help = "Path of the configuration file to write")]
        path: String,
        /// Overwrite an existing file
        #[arg(long, help = "Overwrite the file if it already exists")]
        force: bool,
    },
}
