use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::http::RateLimitedHttpClient;
use crate::invoice::{Invoice, InvoiceStore, NewInvoice};
use crate::store::{RecordStore, StoreError};
use crate::workflows::{Record, TransitionRequest};

/// HTTP client for the dealership backend
///
/// Reports and invoices are served from separate base URLs.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: RateLimitedHttpClient,
    reports_url: String,
    invoices_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, StoreError> {
        let http = RateLimitedHttpClient::new(
            config.token.clone(),
            Duration::from_secs(config.timeout_seconds),
            &config.rate_limit,
        )?;

        Ok(Self {
            http,
            reports_url: config.reports_url.trim_end_matches('/').to_string(),
            invoices_url: config.invoices_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn reports_url(&self) -> &str {
        &self.reports_url
    }

    pub fn invoices_url(&self) -> &str {
        &self.invoices_url
    }
}

#[async_trait]
impl RecordStore for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let url = format!("{}/api/viewfile", self.reports_url);
        let records: Vec<Record> = self.http.execute_json(self.http.get(&url)).await?;
        debug!(count = records.len(), "Fetched resource-center records");
        Ok(records)
    }

    async fn persist_transition(
        &self,
        id: u64,
        request: &TransitionRequest,
    ) -> Result<Record, StoreError> {
        let url = format!("{}/api/update-status/{}", self.reports_url, id);
        let builder = self.http.post(&url).query(&request.query_pairs());
        let updated: Record = self.http.execute_json(builder).await?;
        info!(
            record_id = id,
            requested = %request.new_status,
            stored = %updated.status,
            "Record store accepted status update"
        );
        Ok(updated)
    }
}

#[async_trait]
impl InvoiceStore for HttpBackend {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, StoreError> {
        let url = format!("{}/invoices", self.invoices_url);
        self.http.execute_json(self.http.get(&url)).await
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, StoreError> {
        let url = format!("{}/invoices/save", self.invoices_url);
        let created: Invoice = self
            .http
            .execute_json(self.http.post(&url).json(invoice))
            .await?;
        info!(invoice_number = %created.invoice_number, "Invoice created");
        Ok(created)
    }
}
