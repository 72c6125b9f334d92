//! The control loop: the timer tick, ISR, scheduling decision, and IRET.
//! This is the heart of the core.

use crate::config::Config;
use crate::error::SchedulerError;
use crate::fifo::FifoQueue;
use crate::pcb::{Pcb, PidAllocator, ProcessState};
use crate::priority_queue::PriorityQueue;
use crate::rng::TickRng;

/// Summary of one `tick()`, returned so the driver can log/render it
/// without reaching into scheduler internals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// How many PCBs arrived this tick (Phase A).
    pub arrivals: u32,
    /// Whether the termination roll halted the running PCB this tick.
    pub halted_running: bool,
    /// pid dispatched into the running slot this tick, if any.
    pub dispatched_pid: Option<u64>,
    /// pid that aged and was re-enqueued to ready this tick, if any.
    pub requeued_pid: Option<u64>,
    /// pid moved to the killed pool this tick, if any.
    pub halted_pid: Option<u64>,
    /// PCBs destroyed by a reclamation batch this tick.
    pub reclaimed: usize,
}

/// Summary returned by `destruct()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
    pub created_total: u64,
    pub destroyed_total: u64,
}

/// The scheduler container: the four pools, the running slot, and the
/// bookkeeping the control loop needs.
#[derive(Debug)]
pub struct Scheduler {
    created: FifoQueue<Pcb>,
    ready: PriorityQueue,
    blocked: FifoQueue<Pcb>,
    killed: FifoQueue<Pcb>,
    running: Option<Pcb>,
    /// pid of the PCB most recently moved out of `running` into
    /// `Interrupted`, kept only for diagnostics — never a second owning
    /// handle to the same PCB.
    last_interrupted_pid: Option<u64>,
    is_new: bool,
    pid_allocator: PidAllocator,
    /// The system-stack scalar: written in Phase B, read in Phases D and F.
    sysstack: u32,
    terminated_since_reclaim: u32,
    created_total: u64,
    destroyed_total: u64,
    config: Config,
}

impl Scheduler {
    /// Empty `created`/`blocked`/`killed`, empty MLFQ, no running PCB,
    /// `is_new = true`.
    pub fn construct(config: Config) -> Scheduler {
        Scheduler {
            created: FifoQueue::new(),
            ready: PriorityQueue::new(),
            blocked: FifoQueue::new(),
            killed: FifoQueue::new(),
            running: None,
            last_interrupted_pid: None,
            is_new: true,
            pid_allocator: PidAllocator::new(),
            sysstack: 0,
            terminated_since_reclaim: 0,
            created_total: 0,
            destroyed_total: 0,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn running(&self) -> Option<&Pcb> {
        self.running.as_ref()
    }

    pub fn ready(&self) -> &PriorityQueue {
        &self.ready
    }

    pub fn blocked(&self) -> &FifoQueue<Pcb> {
        &self.blocked
    }

    pub fn killed(&self) -> &FifoQueue<Pcb> {
        &self.killed
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn created_total(&self) -> u64 {
        self.created_total
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed_total
    }

    /// Runs Phases A-F once.
    pub fn tick(&mut self, rng: &mut dyn TickRng) -> Result<TickReport, SchedulerError> {
        // Captured before Phase A: a PCB the bootstrap dispatches this same
        // tick has not "run" yet, so it must not be immediately timed out by
        // Phase D. The timer only interrupts a context that was already
        // running when the tick began.
        let had_runner_before_arrivals = self.running.is_some();

        log::debug!("tick: phase A (arrivals)");
        let arrivals = self.phase_a_arrivals(rng)?;

        log::debug!("tick: phase B (process advancement)");
        self.phase_b_advance(rng);

        log::debug!("tick: phase C (termination roll)");
        let halted_running = self.phase_c_terminate(rng);

        let mut report = TickReport {
            arrivals,
            halted_running,
            ..Default::default()
        };

        if had_runner_before_arrivals {
            log::debug!("tick: phase D (timer ISR)");
            self.phase_d_isr(&mut report)?;
        }

        Ok(report)
    }

    /// Phase A: draw arrivals, create and drain them into `ready`,
    /// bootstrap the first run.
    fn phase_a_arrivals(&mut self, rng: &mut dyn TickRng) -> Result<u32, SchedulerError> {
        let bound = self.config.max_pcb_in_round.max(1);
        let k = rng.next_u32() % bound;

        for _ in 0..k {
            let pid = self.pid_allocator.next()?;
            let mut pcb = Pcb::new(pid);
            pcb.assign_state(ProcessState::New);
            self.created.enqueue(pcb);
            self.created_total += 1;
        }

        let mut enqueued_any = false;
        while !self.created.is_empty() {
            let mut pcb = self.created.dequeue()?;
            pcb.assign_state(ProcessState::Ready);
            log::trace!("phase A: pid {} NEW -> READY", pcb.pid);
            self.ready.enqueue(pcb);
            enqueued_any = true;
        }

        if self.is_new && enqueued_any {
            if let Ok(mut pcb) = self.ready.dequeue() {
                pcb.assign_state(ProcessState::Running);
                log::debug!("phase A: bootstrap dispatch of pid {}", pcb.pid);
                self.running = Some(pcb);
                self.is_new = false;
            }
        }

        Ok(k)
    }

    /// Phase B: advance the simulated PC by a jump in
    /// `[min_pc_jump, min_pc_jump + pc_jump_limit)`, publishing the result
    /// into the system stack.
    fn phase_b_advance(&mut self, rng: &mut dyn TickRng) {
        let modulus = self.config.max_pc_jump.max(1);
        let mut jump = rng.next_u32() % modulus;
        if jump < self.config.min_pc_jump {
            let limit = self.config.pc_jump_limit.max(1);
            jump += (self.config.min_pc_jump - jump) + (rng.next_u32() % limit);
        }
        self.sysstack = self.sysstack.wrapping_add(jump);
    }

    /// Phase C: roll for termination. Advisory only — the move to
    /// `killed` happens in the scheduling decision (Phase E).
    fn phase_c_terminate(&mut self, rng: &mut dyn TickRng) -> bool {
        let roll = rng.next_u32() % 101;
        if let Some(running) = self.running.as_mut() {
            if roll <= self.config.max_value_privileged {
                log::debug!("phase C: halting running pid {} (roll {})", running.pid, roll);
                running.assign_state(ProcessState::Halted);
                return true;
            }
        }
        false
    }

    /// Phase D: the timer ISR. Saves context (unless already halted),
    /// invokes the scheduling decision, then executes IRET.
    fn phase_d_isr(&mut self, report: &mut TickReport) -> Result<(), SchedulerError> {
        let mut taken = self.running.take().ok_or(SchedulerError::Empty)?;
        let halted = taken.state == ProcessState::Halted;

        if !halted && taken.state != ProcessState::Running {
            return Err(SchedulerError::InvariantViolation {
                found: taken.state,
                context: "running slot held a PCB that was neither RUNNING nor HALTED",
            });
        }

        if !halted {
            taken.assign_state(ProcessState::Interrupted);
            taken.context.pc = self.sysstack;
            self.last_interrupted_pid = Some(taken.pid);
        }

        self.scheduling_decision(taken, halted, report)?;
        self.iret();
        Ok(())
    }

    /// Phase E: re-enqueue the interrupted PCB (aged one level) or move
    /// the halted PCB to `killed`; dispatch the next runnable PCB;
    /// reclaim `killed` once the batch threshold is reached.
    fn scheduling_decision(
        &mut self,
        mut taken: Pcb,
        halted: bool,
        report: &mut TickReport,
    ) -> Result<(), SchedulerError> {
        let pid = taken.pid;

        if halted {
            self.killed.enqueue(taken);
            self.terminated_since_reclaim += 1;
            report.halted_pid = Some(pid);
            log::debug!("phase E: pid {pid} HALTED -> killed");
        } else {
            taken.age();
            taken.assign_state(ProcessState::Ready);
            self.ready.enqueue(taken);
            report.requeued_pid = Some(pid);
            log::trace!("phase E: pid {pid} INTERRUPTED -> READY");
        }

        if let Some(head) = self.ready.peek() {
            if head.state != ProcessState::Halted {
                let mut next = self.ready.dequeue()?;
                if next.state != ProcessState::Ready {
                    return Err(SchedulerError::InvariantViolation {
                        found: next.state,
                        context: "ready queue held a PCB that was not READY",
                    });
                }
                let next_pid = next.pid;
                next.assign_state(ProcessState::Running);
                report.dispatched_pid = Some(next_pid);
                log::debug!("phase E: dispatching pid {next_pid}");
                self.running = Some(next);
            }
        }

        if self.terminated_since_reclaim >= self.config.total_terminated {
            let residual = std::mem::take(&mut self.killed).drain();
            report.reclaimed = residual.len();
            log::info!("phase E: reclaimed {} killed PCB(s)", residual.len());
            self.destroyed_total += residual.len() as u64;
            self.terminated_since_reclaim = 0;
        }

        Ok(())
    }

    /// Phase F: restore the dispatched PCB's PC from the system stack.
    fn iret(&mut self) {
        if let Some(running) = self.running.as_mut() {
            running.context.pc = self.sysstack;
        }
    }

    /// Releases all four pools and the running slot. Never double-releases
    /// `last_interrupted_pid` — it is a pid, not a second owning handle.
    pub fn destruct(mut self) -> TeardownReport {
        let created_residual = self.created.drain().len();
        let ready_residual = self.ready.drain().len();
        let blocked_residual = self.blocked.drain().len();
        let killed_residual = self.killed.drain().len();
        let running_residual = if self.running.take().is_some() { 1 } else { 0 };

        let released = created_residual + ready_residual + blocked_residual + killed_residual + running_residual;
        self.destroyed_total += released as u64;

        log::info!(
            "destruct: released {released} PCB(s) (created_total={}, destroyed_total={})",
            self.created_total,
            self.destroyed_total
        );

        TeardownReport {
            created_total: self.created_total,
            destroyed_total: self.destroyed_total,
        }
    }
}
