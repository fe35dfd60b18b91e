// Invoice types for the dealership backend

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflows::types::wire_date;

/// An invoice as stored by the backend; tax and total are computed there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: u64,
    pub dealer_id: i64,
    pub vehicle_id: i64,
    pub customer_name: String,
    pub vehicle_price: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total_price: f64,
    pub invoice_number: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub transaction_id: String,
}

impl Invoice {
    /// Calendar day the backend created the invoice, if its timestamp parses
    pub fn created_on(&self) -> Option<NaiveDate> {
        wire_date::parse(&self.created_at)
    }

    /// Creation time as `Aug 12, 2025, 10:15 AM`.
    ///
    /// Falls back to the raw timestamp when it does not parse, and to `-`
    /// when the backend sent none.
    pub fn created_at_display(&self) -> String {
        let raw = self.created_at.trim();
        if raw.is_empty() {
            return "-".to_string();
        }
        let timestamp = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
            .or_else(|| self.created_on().and_then(|date| date.and_hms_opt(0, 0, 0)));
        match timestamp {
            Some(at) => at.format("%b %-d, %Y, %I:%M %p").to_string(),
            None => raw.to_string(),
        }
    }
}

/// Look an invoice up by its number, ignoring case and surrounding space
pub fn find_by_number<'a>(invoices: &'a [Invoice], invoice_number: &str) -> Option<&'a Invoice> {
    let wanted = invoice_number.trim();
    invoices
        .iter()
        .find(|invoice| invoice.invoice_number.eq_ignore_ascii_case(wanted))
}

/// Invoice creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub dealer_id: i64,
    pub vehicle_id: i64,
    pub customer_name: String,
    pub vehicle_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceValidationError {
    #[error("dealer id must be a positive number")]
    InvalidDealerId,
    #[error("vehicle id must be a positive number")]
    InvalidVehicleId,
    #[error("customer name is required")]
    MissingCustomerName,
    #[error("vehicle price must be a positive amount")]
    InvalidVehiclePrice,
}

impl NewInvoice {
    pub fn new(
        dealer_id: i64,
        vehicle_id: i64,
        customer_name: impl Into<String>,
        vehicle_price: f64,
    ) -> Self {
        Self {
            dealer_id,
            vehicle_id,
            customer_name: customer_name.into().trim().to_string(),
            vehicle_price,
        }
    }

    /// Check the payload before it is sent to the backend
    pub fn validate(&self) -> Result<(), InvoiceValidationError> {
        if self.dealer_id <= 0 {
            return Err(InvoiceValidationError::InvalidDealerId);
        }
        if self.vehicle_id <= 0 {
            return Err(InvoiceValidationError::InvalidVehicleId);
        }
        if self.customer_name.trim().is_empty() {
            return Err(InvoiceValidationError::MissingCustomerName);
        }
        if !self.vehicle_price.is_finite() || self.vehicle_price <= 0.0 {
            return Err(InvoiceValidationError::InvalidVehiclePrice);
        }
        Ok(())
    }
}

/// Case-insensitive search over customer name, invoice number and
/// transaction id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    search: String,
}

impl InvoiceFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into().trim().to_lowercase(),
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.search.is_empty()
            || [
                &invoice.customer_name,
                &invoice.invoice_number,
                &invoice.transaction_id,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.search))
    }

    pub fn apply<'a>(&self, invoices: &'a [Invoice]) -> Vec<&'a Invoice> {
        invoices.iter().filter(|invoice| self.matches(invoice)).collect()
    }
}

/// Revenue figures across a set of invoices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceSummary {
    pub total_revenue: f64,
    pub invoice_count: usize,
    pub average_value: f64,
}

impl InvoiceSummary {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        let total_revenue: f64 = invoices.iter().map(|invoice| invoice.total_price).sum();
        let invoice_count = invoices.len();
        let average_value = if invoice_count > 0 {
            total_revenue / invoice_count as f64
        } else {
            0.0
        };
        Self {
            total_revenue,
            invoice_count,
            average_value,
        }
    }
}

/// Format an amount as Indian rupees with lakh/crore digit grouping,
/// e.g. `₹12,34,567.50`
pub fn format_inr(amount: f64) -> String {
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = (paise / 100).to_string();
    let fraction = paise % 100;

    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice(number: &str, customer: &str, total: f64) -> Invoice {
        Invoice {
            id: 1,
            dealer_id: 10,
            vehicle_id: 20,
            customer_name: customer.to_string(),
            vehicle_price: total,
            tax: 0.0,
            total_price: total,
            invoice_number: number.to_string(),
            created_at: "2025-08-12T10:15:00".to_string(),
            transaction_id: format!("TXN-{number}"),
        }
    }

    #[test]
    fn test_new_invoice_validation() {
        assert!(NewInvoice::new(1, 2, "Asha Rao", 850_000.0).validate().is_ok());
        assert_eq!(
            NewInvoice::new(0, 2, "Asha", 1.0).validate(),
            Err(InvoiceValidationError::InvalidDealerId)
        );
        assert_eq!(
            NewInvoice::new(1, -2, "Asha", 1.0).validate(),
            Err(InvoiceValidationError::InvalidVehicleId)
        );
        assert_eq!(
            NewInvoice::new(1, 2, "   ", 1.0).validate(),
            Err(InvoiceValidationError::MissingCustomerName)
        );
        assert_eq!(
            NewInvoice::new(1, 2, "Asha", f64::NAN).validate(),
            Err(InvoiceValidationError::InvalidVehiclePrice)
        );
    }

    #[test]
    fn test_new_invoice_wire_shape() {
        let payload = serde_json::to_value(NewInvoice::new(3, 4, "Ravi", 120000.0)).unwrap();
        assert_eq!(
            payload,
            json!({"dealerId": 3, "vehicleId": 4, "customerName": "Ravi", "vehiclePrice": 120000.0})
        );
    }

    #[test]
    fn test_invoice_filter() {
        let invoices = vec![
            invoice("INV-1001", "Asha Rao", 100.0),
            invoice("INV-1002", "Ravi Kumar", 200.0),
        ];

        assert_eq!(InvoiceFilter::new("").apply(&invoices).len(), 2);
        assert_eq!(InvoiceFilter::new("ravi").apply(&invoices)[0].invoice_number, "INV-1002");
        assert_eq!(InvoiceFilter::new("inv-1001").apply(&invoices).len(), 1);
        assert_eq!(InvoiceFilter::new("txn-inv-1002").apply(&invoices).len(), 1);
        assert!(InvoiceFilter::new("meera").apply(&invoices).is_empty());
    }

    #[test]
    fn test_summary() {
        let invoices = vec![invoice("A", "x", 100.0), invoice("B", "y", 300.0)];
        let summary = InvoiceSummary::from_invoices(&invoices);
        assert_eq!(summary.invoice_count, 2);
        assert_eq!(summary.total_revenue, 400.0);
        assert_eq!(summary.average_value, 200.0);

        let empty = InvoiceSummary::from_invoices(&[]);
        assert_eq!(empty.average_value, 0.0);
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(999.5), "₹999.50");
        assert_eq!(format_inr(1000.0), "₹1,000.00");
        assert_eq!(format_inr(123456.0), "₹1,23,456.00");
        assert_eq!(format_inr(12345678.9), "₹1,23,45,678.90");
        assert_eq!(format_inr(-1500.0), "-₹1,500.00");
    }

    #[test]
    fn test_created_at_display() {
        assert_eq!(
            invoice("A", "x", 1.0).created_at_display(),
            "Aug 12, 2025, 10:15 AM"
        );

        let mut zoned = invoice("A", "x", 1.0);
        zoned.created_at = "2025-01-05T16:40:00.000+05:30".to_string();
        assert_eq!(zoned.created_at_display(), "Jan 5, 2025, 04:40 PM");

        let mut blank = invoice("A", "x", 1.0);
        blank.created_at = String::new();
        assert_eq!(blank.created_at_display(), "-");

        let mut odd = invoice("A", "x", 1.0);
        odd.created_at = "yesterday".to_string();
        assert_eq!(odd.created_at_display(), "yesterday");
    }

    #[test]
    fn test_find_by_number() {
        let invoices = vec![invoice("INV-1001", "Asha", 1.0), invoice("INV-1002", "Ravi", 2.0)];
        assert_eq!(
            find_by_number(&invoices, " inv-1002 ").map(|i| i.customer_name.as_str()),
            Some("Ravi")
        );
        assert!(find_by_number(&invoices, "INV-9").is_none());
    }

    #[test]
    fn test_created_on() {
        assert_eq!(
            invoice("A", "x", 1.0).created_on(),
            NaiveDate::from_ymd_opt(2025, 8, 12)
        );
    }
}
