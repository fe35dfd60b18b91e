use anyhow::Result;

use crate::config::ReportDeskConfig;
use crate::service::ReportService;
use crate::store::HttpBackend;
use crate::workflows::{StatusWorkflowEngine, SystemClock};

pub mod config;
pub mod invoices;
pub mod reports;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Build the HTTP backend from configuration
pub fn connect_backend(config: &ReportDeskConfig) -> Result<HttpBackend> {
    let backend = HttpBackend::new(&config.backend)?;
    tracing::debug!(
        reports_url = backend.reports_url(),
        invoices_url = backend.invoices_url(),
        "Backend client ready"
    );
    Ok(backend)
}

/// Build a report service over the HTTP backend and the configured clock
pub fn report_service(config: &ReportDeskConfig) -> Result<ReportService<HttpBackend>> {
    let backend = connect_backend(config)?;
    let engine = StatusWorkflowEngine::new(SystemClock::new(config.workflow.clock));
    Ok(ReportService::new(backend, engine))
}

/// Render an optional cell for table output
pub(crate) fn cell(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
