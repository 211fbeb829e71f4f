// Holding area for operations that arrived before their counterpart.

use crate::Core::completion::Completion;
use std::collections::VecDeque;

/// Arrival sequence number. Unique per channel, strictly increasing.
pub type OpId = u64;

/// A parked producer: owns the payload until a consumer takes it.
pub struct ProducerOp<T> {
    pub(crate) seq: OpId,
    pub(crate) payload: T,
    pub(crate) completion: Completion<usize>,
}

/// A parked consumer: an empty destination waiting for a payload.
pub struct ConsumerOp<T> {
    pub(crate) seq: OpId,
    pub(crate) completion: Completion<T>,
}

/// Anything that can sit in a `PendingQueue`.
pub trait Queued {
    fn seq(&self) -> OpId;
}

impl<T> Queued for ProducerOp<T> {
    fn seq(&self) -> OpId {
        self.seq
    }
}

impl<T> Queued for ConsumerOp<T> {
    fn seq(&self) -> OpId {
        self.seq
    }
}

/// FIFO of parked operations of one kind.
///
/// Entries are kept in ascending `seq` order: sequence numbers are handed out
/// under the same lock that appends, so arrival order and `seq` order agree.
/// Removal happens at the front, except for cancellation which may remove
/// from anywhere without disturbing the relative order of the rest.
pub struct PendingQueue<Op> {
    pub(crate) entries: VecDeque<Op>,
}
