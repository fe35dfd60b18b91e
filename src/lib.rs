// report-desk library - status workflow and invoice desk for resource-center reports
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod http;
pub mod invoice;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{config, ReportDeskConfig};
pub use http::RateLimitedHttpClient;
pub use invoice::{submit_invoice, Invoice, InvoiceError, InvoiceStore, InvoiceSummary, NewInvoice};
pub use service::{AdvanceOutcome, RecordListing, ReportService, ServiceError};
pub use store::{HttpBackend, RecordStore, StoreError};
pub use telemetry::{create_transition_span, generate_correlation_id, init_telemetry};
pub use workflows::{
    advance, advance_against, describe_required_input, Advance, AdvanceInput, Clock, ClockZone,
    FixedClock, Record, RecordFilter, RecordStatus, RequiredInput, StatusWorkflowEngine,
    SystemClock, TransitionRequest, WorkflowError,
};
