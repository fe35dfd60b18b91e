use anyhow::{anyhow, Result};

use crate::cli::commands::{connect_backend, Command};
use crate::config::ReportDeskConfig;
use crate::invoice::{
    find_by_number, format_inr, submit_invoice, Invoice, InvoiceFilter, InvoiceStore,
    InvoiceSummary, NewInvoice,
};

pub struct ListInvoicesCommand {
    config: ReportDeskConfig,
    search: Option<String>,
    json: bool,
}

impl ListInvoicesCommand {
    pub fn new(config: ReportDeskConfig) -> Self {
        Self {
            config,
            search: None,
            json: false,
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for ListInvoicesCommand {
    async fn execute(&self) -> Result<()> {
        let backend = connect_backend(&self.config)?;
        let invoices = backend.list_invoices().await?;
        let filter = InvoiceFilter::new(self.search.clone().unwrap_or_default());
        let matching = filter.apply(&invoices);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&matching)?);
            return Ok(());
        }

        if matching.is_empty() {
            println!("🧾 No invoices match");
        } else {
            println!(
                "{:<14}  {:<24}  {:>8}  {:>8}  {:>16}  {:>16}  {:<10}",
                "INVOICE", "CUSTOMER", "DEALER", "VEHICLE", "PRICE", "TOTAL", "DATE"
            );
            for invoice in &matching {
                println!("{}", invoice_row(invoice));
            }
        }
        println!();
        println!("Showing {} of {} invoice(s).", matching.len(), invoices.len());
        Ok(())
    }
}

fn invoice_row(invoice: &Invoice) -> String {
    format!(
        "{:<14}  {:<24}  {:>8}  {:>8}  {:>16}  {:>16}  {:<10}",
        invoice.invoice_number,
        invoice.customer_name,
        invoice.dealer_id,
        invoice.vehicle_id,
        format_inr(invoice.vehicle_price),
        format_inr(invoice.total_price),
        invoice
            .created_on()
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string()),
    )
}

pub struct CreateInvoiceCommand {
    config: ReportDeskConfig,
    invoice: NewInvoice,
}

impl CreateInvoiceCommand {
    pub fn new(config: ReportDeskConfig, invoice: NewInvoice) -> Self {
        Self { config, invoice }
    }
}

impl Command for CreateInvoiceCommand {
    async fn execute(&self) -> Result<()> {
        // Reject bad input before opening a client
        self.invoice.validate()?;

        let backend = connect_backend(&self.config)?;
        let created = submit_invoice(&backend, &self.invoice).await?;

        println!("✅ Invoice {} created", created.invoice_number);
        println!("   👤 Customer: {}", created.customer_name);
        println!("   🚗 Vehicle price: {}", format_inr(created.vehicle_price));
        println!("   🧮 Tax: {}", format_inr(created.tax));
        println!("   💰 Total: {}", format_inr(created.total_price));
        if !created.transaction_id.is_empty() {
            println!("   🔖 Transaction: {}", created.transaction_id);
        }
        Ok(())
    }
}

/// Prints one invoice as a report
pub struct ShowInvoiceCommand {
    config: ReportDeskConfig,
    invoice_number: String,
    json: bool,
}

impl ShowInvoiceCommand {
    pub fn new(config: ReportDeskConfig, invoice_number: impl Into<String>) -> Self {
        Self {
            config,
            invoice_number: invoice_number.into(),
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for ShowInvoiceCommand {
    async fn execute(&self) -> Result<()> {
        let backend = connect_backend(&self.config)?;
        let invoices = backend.list_invoices().await?;
        let invoice = find_by_number(&invoices, &self.invoice_number)
            .ok_or_else(|| anyhow!("invoice {} not found", self.invoice_number.trim()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(invoice)?);
        } else {
            print!("{}", render_invoice_report(invoice));
        }
        Ok(())
    }
}

/// The per-invoice report: one labelled row per field
pub fn render_invoice_report(invoice: &Invoice) -> String {
    let dash = |value: &str| {
        if value.trim().is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };
    let rows = [
        ("Invoice Number", dash(&invoice.invoice_number)),
        ("Customer Name", dash(&invoice.customer_name)),
        ("Vehicle ID", invoice.vehicle_id.to_string()),
        ("Vehicle Price", format_inr(invoice.vehicle_price)),
        ("Tax", format_inr(invoice.tax)),
        ("Total Price", format_inr(invoice.total_price)),
        ("Transaction ID", dash(&invoice.transaction_id)),
        ("Date", invoice.created_at_display()),
    ];

    let mut report = String::from("🧾 Invoice Report\n");
    for (label, value) in rows {
        report.push_str(&format!("   {:<16} {}\n", format!("{label}:"), value));
    }
    report
}

pub struct InvoiceSummaryCommand {
    config: ReportDeskConfig,
}

impl InvoiceSummaryCommand {
    pub fn new(config: ReportDeskConfig) -> Self {
        Self { config }
    }
}

impl Command for InvoiceSummaryCommand {
    async fn execute(&self) -> Result<()> {
        let backend = connect_backend(&self.config)?;
        let invoices = backend.list_invoices().await?;
        print!("{}", render_summary(&InvoiceSummary::from_invoices(&invoices)));
        Ok(())
    }
}

pub fn render_summary(summary: &InvoiceSummary) -> String {
    format!(
        "📊 Invoice summary\n   Total revenue:  {}\n   Invoices:       {}\n   Average value:  {}\n",
        format_inr(summary.total_revenue),
        summary.invoice_count,
        format_inr(summary.average_value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_invoice_report() {
        let invoice = Invoice {
            id: 1,
            dealer_id: 3,
            vehicle_id: 4,
            customer_name: "Ravi Kumar".to_string(),
            vehicle_price: 100_000.0,
            tax: 18_000.0,
            total_price: 118_000.0,
            invoice_number: "INV-1001".to_string(),
            created_at: "2025-08-12T10:15:00".to_string(),
            transaction_id: String::new(),
        };

        let report = render_invoice_report(&invoice);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "🧾 Invoice Report");
        assert_eq!(lines[1], "   Invoice Number:  INV-1001");
        assert_eq!(lines[2], "   Customer Name:   Ravi Kumar");
        assert_eq!(lines[3], "   Vehicle ID:      4");
        assert_eq!(lines[4], "   Vehicle Price:   ₹1,00,000.00");
        assert_eq!(lines[5], "   Tax:             ₹18,000.00");
        assert_eq!(lines[6], "   Total Price:     ₹1,18,000.00");
        assert_eq!(lines[7], "   Transaction ID:  -");
        assert_eq!(lines[8], "   Date:            Aug 12, 2025, 10:15 AM");
    }

    #[test]
    fn test_render_summary() {
        let summary = InvoiceSummary {
            total_revenue: 2_360_000.0,
            invoice_count: 2,
            average_value: 1_180_000.0,
        };
        let rendered = render_summary(&summary);
        assert!(rendered.contains("Total revenue:  ₹23,60,000.00"));
        assert!(rendered.contains("Invoices:       2"));
        assert!(rendered.contains("Average value:  ₹11,80,000.00"));
    }
}
