//! Startup constants.
//!
//! `NUM_PRIORITIES` is a true compile-time constant: the priority queue is
//! a fixed-size array indexed by level, so its size has to be known at
//! compile time. Everything else that the original source hard-coded with
//! `#define` is gathered into [`Config`] so the CLI driver can override a
//! couple of knobs without touching the scheduler's source.

/// Number of MLFQ priority levels. 0 is highest priority.
pub const NUM_PRIORITIES: usize = 4;

/// Tunable startup constants, with recommended defaults below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Upper bound (exclusive) on PCB arrivals drawn per tick.
    pub max_pcb_in_round: u32,
    /// The loop terminates once cumulative arrivals reach this count.
    pub max_pcb_total: u32,
    /// Lower bound of the PC-advance band.
    pub min_pc_jump: u32,
    /// Modulus used to draw the raw PC jump before boosting into the band.
    pub max_pc_jump: u32,
    /// Width of the boosted PC-advance band.
    pub pc_jump_limit: u32,
    /// Termination roll is drawn in `[0, 101)`; rolls at or below this
    /// value halt the running PCB.
    pub max_value_privileged: u32,
    /// Number of halts that triggers a reclamation batch.
    pub total_terminated: u32,
    /// Diagnostic cadence only; no semantic effect on scheduling.
    pub switch_calls: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_pcb_in_round: 5,
            max_pcb_total: 50,
            min_pc_jump: 3000,
            max_pc_jump: 4000,
            pc_jump_limit: 1000,
            max_value_privileged: 15,
            total_terminated: 10,
            switch_calls: 5,
        }
    }
}
