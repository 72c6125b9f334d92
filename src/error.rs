//! Error taxonomy for the scheduler core.
//!
//! `AllocFailure` and `InvariantViolation` propagate to the top of the
//! control loop; `Empty` is recovered locally by checking emptiness before
//! dispatch.

use thiserror::Error;

use crate::pcb::ProcessState;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// PCB or queue allocation failed.
    #[error("PCB or queue allocation failed: {0}")]
    AllocFailure(String),

    /// Dequeue or peek attempted on an empty queue.
    #[error("dequeue/peek on an empty queue")]
    Empty,

    /// A PCB's state is inconsistent with the pool that holds it.
    #[error("PCB state {found:?} is inconsistent with its containing pool ({context})")]
    InvariantViolation {
        found: ProcessState,
        context: &'static str,
    },
}
