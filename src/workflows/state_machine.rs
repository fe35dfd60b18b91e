// Report status workflow - ENTERED -> VERIFIED -> FINANCE -> PAYMENT
//
// Pure transition logic. Nothing here performs I/O: the caller persists the
// proposed record and adopts whatever the record store answers.

use chrono::NaiveDate;

use crate::workflows::clock::{Clock, SystemClock};
use crate::workflows::errors::WorkflowError;
use crate::workflows::types::{wire_date, Advance, AdvanceInput, Record, RecordStatus, RequiredInput};

/// Describe what the caller must supply before `record` can advance.
pub fn describe_required_input(record: &Record) -> Result<RequiredInput, WorkflowError> {
    match &record.status {
        RecordStatus::Entered => Ok(RequiredInput::VerifiedCount),
        RecordStatus::Verified => Ok(RequiredInput::Nothing),
        RecordStatus::Finance => Ok(RequiredInput::PaymentDate),
        RecordStatus::Payment => Ok(RequiredInput::Terminal),
        RecordStatus::Unknown(raw) => Err(WorkflowError::UnknownState(raw.clone())),
    }
}

/// Compute the record that results from advancing `record` one stage.
///
/// The argument is never modified; on error the caller's record stands as-is.
pub fn advance(
    record: &Record,
    input: &AdvanceInput,
    today: NaiveDate,
) -> Result<Record, WorkflowError> {
    let mut proposed = record.clone();

    match &record.status {
        RecordStatus::Entered => {
            proposed.verified_count = Some(validated_verified_count(input)?);
            proposed.status = RecordStatus::Verified;
        }
        RecordStatus::Verified => {
            proposed.status = RecordStatus::Finance;
        }
        RecordStatus::Finance => {
            proposed.payment_date = Some(validated_payment_date(input, today)?);
            proposed.status = RecordStatus::Payment;
        }
        RecordStatus::Payment => return Err(WorkflowError::TerminalState),
        RecordStatus::Unknown(raw) => return Err(WorkflowError::UnknownState(raw.clone())),
    }

    tracing::debug!(
        record_id = record.id,
        from = %record.status,
        to = %proposed.status,
        "Computed status transition"
    );
    Ok(proposed)
}

/// Validate an advance against the store's current copy of the record.
///
/// `stored` must be the same record as `local`, freshly read from the store.
/// When the store already holds the status this advance would produce (a
/// retried request whose first attempt landed), the stored record is returned
/// as [`Advance::AlreadyApplied`] and nothing must be re-sent.
pub fn advance_against(
    local: &Record,
    stored: &Record,
    input: &AdvanceInput,
    today: NaiveDate,
) -> Result<Advance, WorkflowError> {
    if let RecordStatus::Unknown(raw) = &stored.status {
        return Err(WorkflowError::UnknownState(raw.clone()));
    }

    if stored.status == local.status {
        return advance(stored, input, today).map(Advance::Apply);
    }

    // Retries still need valid input
    let proposed = advance(local, input, today)?;

    if stored.status == proposed.status {
        if stored.verified_count != proposed.verified_count
            || stored.payment_date != proposed.payment_date
        {
            tracing::warn!(
                record_id = stored.id,
                status = %stored.status,
                "Record already advanced with different values; keeping stored values"
            );
        }
        tracing::info!(
            record_id = stored.id,
            status = %stored.status,
            "Transition already applied"
        );
        return Ok(Advance::AlreadyApplied(stored.clone()));
    }

    Err(WorkflowError::Stale {
        expected: local.status.clone(),
        actual: stored.status.clone(),
    })
}

fn validated_verified_count(input: &AdvanceInput) -> Result<u32, WorkflowError> {
    input
        .verified_count
        .filter(|count| *count > 0)
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(WorkflowError::missing_verified_count)
}

fn validated_payment_date(input: &AdvanceInput, today: NaiveDate) -> Result<NaiveDate, WorkflowError> {
    input
        .payment_date
        .as_deref()
        .and_then(wire_date::parse)
        .filter(|date| *date <= today)
        .ok_or_else(WorkflowError::invalid_payment_date)
}

/// The workflow bound to a calendar source
#[derive(Debug, Clone, Default)]
pub struct StatusWorkflowEngine<C = SystemClock> {
    clock: C,
}

impl<C: Clock> StatusWorkflowEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn describe_required_input(&self, record: &Record) -> Result<RequiredInput, WorkflowError> {
        describe_required_input(record)
    }

    pub fn advance(&self, record: &Record, input: &AdvanceInput) -> Result<Record, WorkflowError> {
        advance(record, input, self.today())
    }

    pub fn advance_against(
        &self,
        local: &Record,
        stored: &Record,
        input: &AdvanceInput,
    ) -> Result<Advance, WorkflowError> {
        advance_against(local, stored, input, self.today())
    }
}
