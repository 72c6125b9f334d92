//! Diagnostic rendering: borrows PCB/queue handles and returns owned text;
//! never retains what it borrows.

use std::fmt::Write as _;

use crate::pcb::Pcb;
use crate::priority_queue::PriorityQueue;

/// Renders one PCB. Non-verbose: pid, state, memory, pc. Verbose also
/// includes priority, size, channel, and the full register file — the two
/// verbosity levels `toStringPCB` in the original source produced.
pub fn pcb_line(pcb: &Pcb, verbose: bool) -> String {
    let mut out = String::new();
    if verbose {
        write!(
            out,
            "contents: PID: 0x{:X}, Priority: 0x{:X}, state: {:?}, memloc: 0x{:X} size: {} channel: 0x{:X} \
             PC: 0x{:04X}, IR: {:04X}, r0: {:04X}, r1: {:04X}, r2: {:04X}, r3: {:04X}, \
             r4: {:04X}, r5: {:04X}, r6: {:04X}, r7: {:04X}",
            pcb.pid,
            pcb.priority,
            pcb.state,
            pcb.mem,
            pcb.size,
            pcb.channel_no,
            pcb.context.pc,
            pcb.context.ir,
            pcb.context.r0,
            pcb.context.r1,
            pcb.context.r2,
            pcb.context.r3,
            pcb.context.r4,
            pcb.context.r5,
            pcb.context.r6,
            pcb.context.r7,
        )
        .expect("writing to a String never fails");
    } else {
        write!(
            out,
            "contents: PID: 0x{:X}, state: {:?}, memloc: 0x{:X} PC: 0x{:04X}",
            pcb.pid, pcb.state, pcb.mem, pcb.context.pc,
        )
        .expect("writing to a String never fails");
    }
    out
}

/// Renders a label plus every PCB currently in a plain FIFO pool, in
/// order, without disturbing it.
pub fn fifo_queue<'a>(label: &str, pcbs: impl Iterator<Item = &'a Pcb>) -> String {
    let mut out = format!("{label}:\n");
    let mut any = false;
    for pcb in pcbs {
        any = true;
        writeln!(out, "  {}", pcb_line(pcb, false)).expect("writing to a String never fails");
    }
    if !any {
        out.push_str("  (empty)\n");
    }
    out
}

/// Renders the whole MLFQ ready structure, highest priority first.
pub fn priority_queue(ready: &PriorityQueue) -> String {
    let mut out = String::from("ready (MLFQ):\n");
    let mut any = false;
    for (level, pcb) in ready.iter_by_level() {
        any = true;
        writeln!(out, "  [level {level}] {}", pcb_line(pcb, false))
            .expect("writing to a String never fails");
    }
    if !any {
        out.push_str("  (empty)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::ProcessState;

    #[test]
    fn non_verbose_omits_priority_and_registers() {
        let mut pcb = Pcb::new(3);
        pcb.assign_state(ProcessState::Ready);
        pcb.context.pc = 0x4A00;
        let line = pcb_line(&pcb, false);
        assert!(line.contains("PID: 0x3"));
        assert!(line.contains("PC: 0x4A00"));
        assert!(!line.contains("Priority"));
        assert!(!line.contains("r0"));
    }

    #[test]
    fn verbose_includes_priority_and_registers() {
        let mut pcb = Pcb::new(3);
        pcb.assign_priority(2);
        pcb.context.r3 = 9;
        let line = pcb_line(&pcb, true);
        assert!(line.contains("Priority: 0x2"));
        assert!(line.contains("r3: 0009"));
    }

    #[test]
    fn empty_priority_queue_renders_empty_marker() {
        let pq = PriorityQueue::new();
        assert!(priority_queue(&pq).contains("(empty)"));
    }
}
