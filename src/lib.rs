//! Simulated multilevel-feedback-queue round-robin CPU scheduler: a PCB
//! state machine, a plain FIFO pool, an MLFQ ready structure with aging,
//! and the tick/ISR/dispatch control loop that drives them.

pub mod config;
pub mod error;
pub mod fifo;
pub mod pcb;
pub mod priority_queue;
pub mod render;
pub mod rng;
pub mod scheduler;

pub use config::{Config, NUM_PRIORITIES};
pub use error::SchedulerError;
pub use pcb::{CpuContext, Pcb, PidAllocator, ProcessState};
pub use priority_queue::PriorityQueue;
pub use rng::{SeededRng, TickRng};
pub use scheduler::{Scheduler, TeardownReport, TickReport};
