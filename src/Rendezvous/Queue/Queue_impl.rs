use std::collections::VecDeque;

use super::Queue::{OpId, PendingQueue, Queued};

impl<Op: Queued> PendingQueue<Op> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Append a newly arrived operation.
    pub fn push(&mut self, op: Op) {
        debug_assert!(
            self.entries.back().map_or(true, |last| last.seq() < op.seq()),
            "pending queue must stay in arrival order"
        );
        self.entries.push_back(op);
    }

    /// Remove the oldest waiting operation, if any.
    pub fn pop_oldest(&mut self) -> Option<Op> {
        self.entries.pop_front()
    }

    /// Remove one operation by sequence number, keeping the others in order.
    pub fn remove(&mut self, seq: OpId) -> Option<Op> {
        let idx = self
            .entries
            .binary_search_by_key(&seq, |op| op.seq())
            .ok()?;
        self.entries.remove(idx)
    }

    /// Take every waiting operation, oldest first.
    pub fn drain_all(&mut self) -> Vec<Op> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence numbers currently waiting, oldest first.
    pub fn seqs(&self) -> Vec<OpId> {
        self.entries.iter().map(Queued::seq).collect()
    }
}

impl<Op: Queued> Default for PendingQueue<Op> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry(OpId);

    impl Queued for Entry {
        fn seq(&self) -> OpId {
            self.0
        }
    }

    fn queue_of(seqs: &[OpId]) -> PendingQueue<Entry> {
        let mut q = PendingQueue::new();
        for &s in seqs {
            q.push(Entry(s));
        }
        q
    }

    #[test]
    fn pops_in_arrival_order() {
        let mut q = queue_of(&[1, 2, 3]);
        assert_eq!(q.pop_oldest().map(|e| e.0), Some(1));
        assert_eq!(q.pop_oldest().map(|e| e.0), Some(2));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut q = queue_of(&[4, 7, 9, 12]);
        assert_eq!(q.remove(9).map(|e| e.0), Some(9));
        assert!(q.remove(9).is_none());
        assert_eq!(q.seqs(), vec![4, 7, 12]);
    }

    #[test]
    fn drain_empties_queue() {
        let mut q = queue_of(&[1, 2]);
        let drained: Vec<OpId> = q.drain_all().into_iter().map(|e| e.0).collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(q.is_empty());
    }
}
