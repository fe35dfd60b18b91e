// Resource-center report workflow
//
// A closed set of statuses and a single transition function; the record
// store stays the source of truth.

pub mod clock;
pub mod errors;
pub mod filter;
pub mod state_machine;
pub mod types;

pub use clock::{Clock, ClockZone, FixedClock, SystemClock};
pub use errors::WorkflowError;
pub use filter::{FilterSummary, RecordFilter};
pub use state_machine::{advance, advance_against, describe_required_input, StatusWorkflowEngine};
pub use types::{
    Advance, AdvanceInput, InvariantViolation, Record, RecordStatus, RequiredInput,
    TransitionRequest,
};
