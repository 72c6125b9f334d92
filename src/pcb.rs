//! Process Control Block and its embedded CPU context.

use crate::config::NUM_PRIORITIES;
use crate::error::SchedulerError;
use crate::render;

/// Closed state enum covering a PCB's lifetime: allocated, waiting to run,
/// running, timed out, waiting on I/O, or retired. Ingress from an untyped
/// representation (e.g. a wire format) should reject anything else rather
/// than default to a variant — there is none here to reject from, since
/// every constructor in this crate only ever produces one of these six,
/// but the closedness itself is what callers rely on when matching on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Interrupted,
    Blocked,
    Halted,
}

/// CPU context: program counter, instruction register, and eight
/// general-purpose registers, all zero-initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuContext {
    pub pc: u32,
    pub ir: u32,
    pub r0: u32,
    pub r1: u32,
    pub r2: u32,
    pub r3: u32,
    pub r4: u32,
    pub r5: u32,
    pub r6: u32,
    pub r7: u32,
}

/// A process descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Pcb {
    pub pid: u64,
    pub parent: u64,
    pub priority: usize,
    pub state: ProcessState,
    pub mem: usize,
    pub size: usize,
    pub channel_no: u32,
    pub context: CpuContext,
}

impl Pcb {
    /// Allocate a PCB: zeroed context, `state = New`, `priority = 0`.
    pub fn new(pid: u64) -> Pcb {
        Pcb {
            pid,
            parent: 0,
            priority: 0,
            state: ProcessState::New,
            mem: 0,
            size: 0,
            channel_no: 0,
            context: CpuContext::default(),
        }
    }

    /// Unconditional state write. Callers are responsible for keeping the
    /// state consistent with whichever pool currently holds the PCB.
    pub fn assign_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Clamps to `min(priority, NUM_PRIORITIES - 1)` so an out-of-range
    /// priority can never index past the lowest MLFQ level.
    pub fn assign_priority(&mut self, priority: usize) {
        self.priority = priority.min(NUM_PRIORITIES - 1);
    }

    pub fn assign_parent(&mut self, parent: u64) {
        self.parent = parent;
    }

    /// Demotes one level toward `NUM_PRIORITIES - 1`, the MLFQ aging rule
    /// applied on re-enqueue after an interruption. No-op at the floor.
    pub fn age(&mut self) {
        if self.priority < NUM_PRIORITIES - 1 {
            self.priority += 1;
        }
    }

    /// Renders this PCB as a diagnostic line; `verbose` also includes
    /// priority, memory bookkeeping, and the full register file.
    pub fn render(&self, verbose: bool) -> String {
        render::pcb_line(self, verbose)
    }
}

/// Scheduler-owned, monotonically increasing pid source, so that two
/// `Scheduler`s never share — or fight over — a pid sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidAllocator {
    next: u64,
}

impl PidAllocator {
    pub fn new() -> PidAllocator {
        PidAllocator { next: 0 }
    }

    /// Returns the next pid, or `AllocFailure` if the counter is exhausted.
    pub fn next(&mut self) -> Result<u64, SchedulerError> {
        let pid = self.next;
        self.next = self
            .next
            .checked_add(1)
            .ok_or_else(|| SchedulerError::AllocFailure("pid counter exhausted".into()))?;
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pcb_is_zeroed_and_new() {
        let pcb = Pcb::new(7);
        assert_eq!(pcb.pid, 7);
        assert_eq!(pcb.state, ProcessState::New);
        assert_eq!(pcb.priority, 0);
        assert_eq!(pcb.context, CpuContext::default());
    }

    #[test]
    fn assign_priority_clamps_to_floor() {
        let mut pcb = Pcb::new(0);
        pcb.assign_priority(NUM_PRIORITIES + 10);
        assert_eq!(pcb.priority, NUM_PRIORITIES - 1);
    }

    #[test]
    fn age_increments_until_floor_then_stops() {
        let mut pcb = Pcb::new(0);
        for _ in 0..NUM_PRIORITIES + 5 {
            pcb.age();
        }
        assert_eq!(pcb.priority, NUM_PRIORITIES - 1);
    }

    #[test]
    fn render_delegates_to_the_pcb_line_formatter() {
        let pcb = Pcb::new(3);
        assert_eq!(pcb.render(false), crate::render::pcb_line(&pcb, false));
    }

    #[test]
    fn pid_allocator_is_strictly_monotonic() {
        let mut alloc = PidAllocator::new();
        let a = alloc.next().unwrap();
        let b = alloc.next().unwrap();
        let c = alloc.next().unwrap();
        assert_eq!([a, b, c], [0, 1, 2]);
    }

    #[test]
    fn pid_allocator_fails_on_overflow() {
        let mut alloc = PidAllocator { next: u64::MAX };
        assert!(alloc.next().is_ok());
        assert!(alloc.next().is_err());
    }

    #[quickcheck_macros::quickcheck]
    fn pids_from_a_fresh_allocator_are_unique(n: u8) -> bool {
        let mut alloc = PidAllocator::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..n {
            let pid = alloc.next().unwrap();
            if !seen.insert(pid) {
                return false;
            }
        }
        true
    }
}
