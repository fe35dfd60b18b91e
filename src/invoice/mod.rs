// Dealership invoices - creation, listing and revenue summary

pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::store::StoreError;

pub use types::{
    find_by_number, format_inr, Invoice, InvoiceFilter, InvoiceSummary, InvoiceValidationError,
    NewInvoice,
};

/// The backend's invoice endpoints
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError>;

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, StoreError>;
}

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Validation(#[from] InvoiceValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate locally, then create the invoice through the store
pub async fn submit_invoice<S>(store: &S, invoice: &NewInvoice) -> Result<Invoice, InvoiceError>
where
    S: InvoiceStore + ?Sized,
{
    invoice.validate()?;
    Ok(store.create_invoice(invoice).await?)
}
