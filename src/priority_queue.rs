//! MLFQ ready structure: a fixed-size array of [`FifoQueue`]s indexed by
//! priority level. Strict priority across levels, FIFO within a level.

use crate::config::NUM_PRIORITIES;
use crate::error::SchedulerError;
use crate::fifo::FifoQueue;
use crate::pcb::Pcb;

#[derive(Debug)]
pub struct PriorityQueue {
    levels: [FifoQueue<Pcb>; NUM_PRIORITIES],
}

impl PriorityQueue {
    pub fn new() -> PriorityQueue {
        PriorityQueue {
            levels: std::array::from_fn(|_| FifoQueue::new()),
        }
    }

    /// Appends to the queue at `pcb.priority`.
    pub fn enqueue(&mut self, pcb: Pcb) {
        let level = pcb.priority;
        self.levels[level].enqueue(pcb);
    }

    /// Removes and returns the head of the lowest non-empty index
    /// (0 = highest priority). `Empty` if every level is empty.
    pub fn dequeue(&mut self) -> Result<Pcb, SchedulerError> {
        for level in self.levels.iter_mut() {
            if !level.is_empty() {
                return level.dequeue();
            }
        }
        Err(SchedulerError::Empty)
    }

    /// Same as `dequeue` without removing.
    pub fn peek(&self) -> Option<&Pcb> {
        self.levels.iter().find_map(|level| level.peek())
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(FifoQueue::is_empty)
    }

    /// Total PCBs across every level.
    pub fn len(&self) -> usize {
        self.levels.iter().map(FifoQueue::len).sum()
    }

    /// Iterates every level from highest to lowest priority, each in FIFO
    /// order, without disturbing the queue. Used by the renderer.
    pub fn iter_by_level(&self) -> impl Iterator<Item = (usize, &Pcb)> {
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(level, q)| q.iter().map(move |pcb| (level, pcb)))
    }

    /// Consumes the queue, draining every level and returning the
    /// residual PCBs in priority-then-FIFO order.
    pub fn drain(self) -> Vec<Pcb> {
        self.levels.into_iter().flat_map(FifoQueue::drain).collect()
    }
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcb::ProcessState;

    fn pcb_at(pid: u64, priority: usize) -> Pcb {
        let mut pcb = Pcb::new(pid);
        pcb.assign_priority(priority);
        pcb.assign_state(ProcessState::Ready);
        pcb
    }

    #[test]
    fn empty_queue_dequeues_err() {
        let mut pq = PriorityQueue::new();
        assert!(pq.is_empty());
        assert!(matches!(pq.dequeue(), Err(SchedulerError::Empty)));
    }

    #[test]
    fn strict_priority_across_levels() {
        let mut pq = PriorityQueue::new();
        pq.enqueue(pcb_at(1, 2));
        pq.enqueue(pcb_at(2, 0));
        pq.enqueue(pcb_at(3, 1));
        // Level 0 first, then level 1, then level 2, regardless of
        // enqueue order.
        assert_eq!(pq.dequeue().unwrap().pid, 2);
        assert_eq!(pq.dequeue().unwrap().pid, 3);
        assert_eq!(pq.dequeue().unwrap().pid, 1);
    }

    #[test]
    fn fifo_within_a_level() {
        let mut pq = PriorityQueue::new();
        pq.enqueue(pcb_at(1, 0));
        pq.enqueue(pcb_at(2, 0));
        pq.enqueue(pcb_at(3, 0));
        assert_eq!(pq.dequeue().unwrap().pid, 1);
        assert_eq!(pq.dequeue().unwrap().pid, 2);
        assert_eq!(pq.dequeue().unwrap().pid, 3);
    }

    #[test]
    fn drain_returns_every_level_in_priority_order() {
        let mut pq = PriorityQueue::new();
        pq.enqueue(pcb_at(1, 3));
        pq.enqueue(pcb_at(2, 0));
        let residual = pq.drain();
        assert_eq!(residual.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[quickcheck_macros::quickcheck]
    fn a_pcb_at_level_i_never_dequeues_before_any_at_level_j_lt_i(levels: Vec<u8>) -> bool {
        let mut pq = PriorityQueue::new();
        for (pid, &lvl) in levels.iter().enumerate() {
            pq.enqueue(pcb_at(pid as u64, lvl as usize % NUM_PRIORITIES));
        }
        let mut last_level = 0usize;
        while let Ok(pcb) = pq.dequeue() {
            if pcb.priority < last_level {
                return false;
            }
            last_level = pcb.priority;
        }
        true
    }
}
