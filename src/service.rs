// Report service - runs the status workflow against the record store
//
// One fetch/persist cycle per call, no internal retries. The store's answer
// always replaces the caller's view of a record.

use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::store::{RecordStore, StoreError};
use crate::telemetry::{create_transition_span, generate_correlation_id};
use crate::workflows::{
    Advance, AdvanceInput, Clock, FilterSummary, Record, RecordFilter, RecordStatus,
    RequiredInput, StatusWorkflowEngine, SystemClock, TransitionRequest, WorkflowError,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Workflow(err) => err.is_retryable(),
            ServiceError::Store(err) => err.is_retryable(),
        }
    }
}

/// Records matching a filter, plus the size of the unfiltered list
#[derive(Debug, Clone)]
pub struct RecordListing {
    pub records: Vec<Record>,
    pub total: usize,
}

impl RecordListing {
    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            shown: self.records.len(),
            total: self.total,
        }
    }
}

/// Result of a successful advance
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    /// The record as the store now holds it
    pub record: Record,
    /// False when the store already held the target status
    pub applied: bool,
}

pub struct ReportService<S, C = SystemClock> {
    store: S,
    engine: StatusWorkflowEngine<C>,
}

impl<S, C> ReportService<S, C>
where
    S: RecordStore,
    C: Clock,
{
    pub fn new(store: S, engine: StatusWorkflowEngine<C>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &StatusWorkflowEngine<C> {
        &self.engine
    }

    pub async fn list(&self, filter: &RecordFilter) -> Result<RecordListing, ServiceError> {
        let all = self.store.fetch_all().await?;
        let total = all.len();
        let records = all.into_iter().filter(|record| filter.matches(record)).collect();
        Ok(RecordListing { records, total })
    }

    /// Fetch the authoritative record and describe its next required input
    pub async fn required_input(&self, id: u64) -> Result<(Record, RequiredInput), ServiceError> {
        let record = self.store.fetch(id).await?;
        let required = self.engine.describe_required_input(&record)?;
        Ok((record, required))
    }

    /// Advance `local` one stage.
    ///
    /// Input is validated against `local` before any network call. The store's
    /// current copy is then re-read so a retried request is recognised and a
    /// concurrent change surfaces as [`WorkflowError::Stale`]. `local` is only
    /// borrowed; on error the caller keeps what it had.
    pub async fn advance(
        &self,
        local: &Record,
        input: &AdvanceInput,
    ) -> Result<AdvanceOutcome, ServiceError> {
        let correlation_id = generate_correlation_id();
        let span = create_transition_span(local.id, local.status.as_str(), &correlation_id);

        self.apply_advance(local, input).instrument(span).await
    }

    async fn apply_advance(
        &self,
        local: &Record,
        input: &AdvanceInput,
    ) -> Result<AdvanceOutcome, ServiceError> {
        self.engine.advance(local, input)?;
        let stored = self.fetch_checked(local.id).await?;
        self.settle(local, &stored, input).await
    }

    /// Advance a record known only by id.
    ///
    /// The starting status is whatever `input` implies (see
    /// [`AdvanceInput::implied_from`]), falling back to the store's status.
    pub async fn advance_by_id(
        &self,
        id: u64,
        input: &AdvanceInput,
    ) -> Result<AdvanceOutcome, ServiceError> {
        self.advance_from(id, input.implied_from(), input).await
    }

    /// Advance record `id` from the status the caller believes it is at.
    ///
    /// The record is fetched once. With `from` set, a store already at the
    /// target status answers `applied: false` and any other status is
    /// [`WorkflowError::Stale`]. Without it the store's status is taken as the
    /// starting point.
    pub async fn advance_from(
        &self,
        id: u64,
        from: Option<RecordStatus>,
        input: &AdvanceInput,
    ) -> Result<AdvanceOutcome, ServiceError> {
        let stored = self.fetch_checked(id).await?;
        let local = match from {
            Some(status) if status != stored.status => stored.clone().with_status(status),
            _ => stored.clone(),
        };

        let correlation_id = generate_correlation_id();
        let span = create_transition_span(id, local.status.as_str(), &correlation_id);

        self.settle(&local, &stored, input).instrument(span).await
    }

    async fn fetch_checked(&self, id: u64) -> Result<Record, ServiceError> {
        let stored = self.store.fetch(id).await?;
        for violation in stored.invariant_violations() {
            warn!(record_id = stored.id, %violation, "Stored record breaks a field invariant");
        }
        Ok(stored)
    }

    async fn settle(
        &self,
        local: &Record,
        stored: &Record,
        input: &AdvanceInput,
    ) -> Result<AdvanceOutcome, ServiceError> {
        match self.engine.advance_against(local, stored, input)? {
            Advance::Apply(proposed) => {
                let request = TransitionRequest::from_proposed(&proposed);
                let updated = self.store.persist_transition(local.id, &request).await?;
                if updated.status != proposed.status {
                    warn!(
                        record_id = updated.id,
                        expected = %proposed.status,
                        stored = %updated.status,
                        "Record store answered with a different status"
                    );
                }
                info!(record_id = updated.id, status = %updated.status, "Status updated");
                Ok(AdvanceOutcome {
                    record: updated,
                    applied: true,
                })
            }
            Advance::AlreadyApplied(record) => Ok(AdvanceOutcome {
                record,
                applied: false,
            }),
        }
    }
}
