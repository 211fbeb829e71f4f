// src/Rendezvous/channel.rs

use crate::Core::completion::{completion_pair, Ticket};
use crate::Core::error::{BridgeError, Result};
use crate::Core::stats::{ChannelStats, StatsSnapshot};
use crate::Rendezvous::Queue::{ConsumerOp, OpId, PendingQueue, ProducerOp};
use crate::Rendezvous::Structs::Packet_Structs::Payload;
use log::{debug, trace};
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which side of a pairing an operation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Producer,
    Consumer,
}

/// Lock-protected state of one channel.
///
/// Only one of the two queues is ever non-empty: an arrival first tries to
/// pair with the opposite queue and only parks when that queue is empty.
pub(crate) struct Queues<T> {
    pub(crate) pending_out: PendingQueue<ProducerOp<T>>,
    pub(crate) pending_in: PendingQueue<ConsumerOp<T>>,
    next_seq: OpId,
    closed: bool,
}

impl<T> Queues<T> {
    fn next_seq(&mut self) -> OpId {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

pub(crate) struct Shared<T> {
    pub(crate) name: &'static str,
    queues: Mutex<Queues<T>>,
    pub(crate) stats: ChannelStats,
}

/// A rendezvous point pairing one producer with one consumer at a time.
///
/// There is no buffering: a payload handed to `submit` either goes straight
/// to the oldest waiting consumer, or waits (owned by its operation) until a
/// consumer arrives. Every pairing decision happens under one lock; the
/// payload move and both completions happen after the lock is released.
pub struct RendezvousChannel<T> {
    pub(crate) shared: Arc<Shared<T>>,
}

/// Result of handing an operation to a channel.
pub enum Submission<R> {
    /// A counterpart was waiting; both sides are already complete.
    Ready(R),
    /// No counterpart yet; the operation is parked.
    Parked(Pending<R>),
}

/// Caller-side handle of a parked operation.
///
/// Dropping the handle while the operation is still parked withdraws it, the
/// same as `cancel`. A parked operation therefore always has a listener, so a
/// paired payload can never be handed to nobody.
pub struct Pending<R> {
    seq: OpId,
    role: Role,
    ticket: Ticket<R>,
    owner: Arc<dyn Withdraw>,
}

/// Removal of a parked operation by whoever holds its handle.
pub(crate) trait Withdraw: Send + Sync {
    fn withdraw(&self, seq: OpId, role: Role) -> bool;
}

/// Operations taken out of a channel on teardown.
pub(crate) struct Drained<T> {
    producers: Vec<ProducerOp<T>>,
    consumers: Vec<ConsumerOp<T>>,
}

impl<T: Payload> RendezvousChannel<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                queues: Mutex::new(Queues {
                    pending_out: PendingQueue::new(),
                    pending_in: PendingQueue::new(),
                    next_seq: 0,
                    closed: false,
                }),
                stats: ChannelStats::new(),
            }),
        }
    }

    /// Offer a payload. Pairs with the oldest waiting consumer or parks.
    ///
    /// On pairing, the returned byte count is what both sides report.
    pub fn submit(&self, payload: T) -> Result<Submission<usize>> {
        let mut queues = self.shared.queues.lock();
        if queues.closed {
            return Err(BridgeError::Unavailable);
        }

        if let Some(consumer) = queues.pending_in.pop_oldest() {
            drop(queues);
            let len = payload.byte_len();
            trace!(
                "{}: producer paired with waiting consumer #{} ({} bytes)",
                self.shared.name,
                consumer.seq,
                len
            );
            consumer.completion.complete(Ok(payload));
            self.shared.stats.record_paired();
            return Ok(Submission::Ready(len));
        }

        let seq = queues.next_seq();
        let (completion, ticket) = completion_pair();
        queues.pending_out.push(ProducerOp {
            seq,
            payload,
            completion,
        });
        drop(queues);

        trace!("{}: producer #{} parked", self.shared.name, seq);
        self.shared.stats.record_parked();
        Ok(Submission::Parked(self.pending(seq, Role::Producer, ticket)))
    }

    /// Ask for the next payload. Pairs with the oldest waiting producer or
    /// parks.
    pub fn receive(&self) -> Result<Submission<T>> {
        let mut queues = self.shared.queues.lock();
        if queues.closed {
            return Err(BridgeError::Unavailable);
        }

        if let Some(producer) = queues.pending_out.pop_oldest() {
            drop(queues);
            let ProducerOp {
                seq,
                payload,
                completion,
            } = producer;
            let len = payload.byte_len();
            trace!(
                "{}: consumer paired with waiting producer #{} ({} bytes)",
                self.shared.name,
                seq,
                len
            );
            completion.complete(Ok(len));
            self.shared.stats.record_paired();
            return Ok(Submission::Ready(payload));
        }

        let seq = queues.next_seq();
        let (completion, ticket) = completion_pair();
        queues.pending_in.push(ConsumerOp { seq, completion });
        drop(queues);

        trace!("{}: consumer #{} parked", self.shared.name, seq);
        self.shared.stats.record_parked();
        Ok(Submission::Parked(self.pending(seq, Role::Consumer, ticket)))
    }

    /// Refuse new operations and resolve every parked one to `Unavailable`.
    ///
    /// Returns how many parked operations were resolved.
    pub fn close(&self) -> usize {
        let drained = {
            let mut queues = self.shared.queues.lock();
            Self::close_locked(&mut queues)
        };
        drained.resolve(&self.shared)
    }

    /// Mark closed and take both queues. The caller holds the lock.
    pub(crate) fn close_locked(queues: &mut Queues<T>) -> Drained<T> {
        queues.closed = true;
        Drained {
            producers: queues.pending_out.drain_all(),
            consumers: queues.pending_in.drain_all(),
        }
    }

    pub(crate) fn lock_queues(&self) -> MutexGuard<'_, Queues<T>> {
        self.shared.queues.lock()
    }

    fn pending<R>(&self, seq: OpId, role: Role, ticket: Ticket<R>) -> Pending<R> {
        Pending {
            seq,
            role,
            ticket,
            owner: Arc::clone(&self.shared) as Arc<dyn Withdraw>,
        }
    }
}

impl<T> RendezvousChannel<T> {
    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    /// Number of producers currently parked.
    pub fn pending_out_len(&self) -> usize {
        self.shared.queues.lock().pending_out.len()
    }

    /// Number of consumers currently parked.
    pub fn pending_in_len(&self) -> usize {
        self.shared.queues.lock().pending_in.len()
    }

    /// Sequence numbers of parked producers and consumers, oldest first.
    pub fn parked_seqs(&self) -> (Vec<OpId>, Vec<OpId>) {
        let queues = self.shared.queues.lock();
        (queues.pending_out.seqs(), queues.pending_in.seqs())
    }

    pub fn is_closed(&self) -> bool {
        self.shared.queues.lock().closed
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }
}

impl<T> Drained<T> {
    pub(crate) fn len(&self) -> usize {
        self.producers.len() + self.consumers.len()
    }

    /// Complete everything with `Unavailable`. Call without holding the lock.
    pub(crate) fn resolve(self, shared: &Shared<T>) -> usize {
        let count = self.len();
        for op in self.producers {
            op.completion.complete(Err(BridgeError::Unavailable));
        }
        for op in self.consumers {
            op.completion.complete(Err(BridgeError::Unavailable));
        }
        shared.stats.record_drained(count);
        if count > 0 {
            debug!("{}: resolved {} parked operations on close", shared.name, count);
        }
        count
    }
}

impl<T: Payload> Withdraw for Shared<T> {
    fn withdraw(&self, seq: OpId, role: Role) -> bool {
        let mut queues = self.queues.lock();
        // Whichever of pairing and withdrawal takes the lock first decides the
        // outcome; a paired operation is no longer in either queue.
        let withdrawn = match role {
            Role::Producer => {
                let op = queues.pending_out.remove(seq);
                drop(queues);
                op.map(|op| op.completion.complete(Err(BridgeError::Cancelled)))
            }
            Role::Consumer => {
                let op = queues.pending_in.remove(seq);
                drop(queues);
                op.map(|op| op.completion.complete(Err(BridgeError::Cancelled)))
            }
        };

        if withdrawn.is_some() {
            self.stats.record_cancelled();
            debug!("{}: {:?} #{} cancelled", self.name, role, seq);
            true
        } else {
            false
        }
    }
}

impl<R> Pending<R> {
    /// Arrival sequence number within its channel.
    pub fn seq(&self) -> OpId {
        self.seq
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_complete(&self) -> bool {
        self.ticket.is_complete()
    }

    /// Take the outcome if the operation has already been resolved.
    pub fn try_take(&self) -> Option<Result<R>> {
        self.ticket.try_take()
    }

    /// Block until the operation is paired, cancelled or drained.
    pub fn wait(self) -> Result<R> {
        self.ticket.wait()
    }

    /// Block up to `timeout`, then withdraw the operation.
    ///
    /// If a counterpart paired with it before the withdrawal took effect,
    /// the paired outcome is returned instead of `Cancelled`.
    pub fn wait_timeout(self, timeout: Duration) -> Result<R> {
        if let Some(outcome) = self.ticket.wait_timeout(timeout) {
            return outcome;
        }
        self.cancel();
        // Either we withdrew it, or the pairing thread is about to publish.
        self.ticket.wait()
    }

    /// Withdraw the operation if it is still parked.
    ///
    /// Returns `true` when this call removed it (its outcome is now
    /// `Cancelled`), `false` when it had already been resolved.
    pub fn cancel(&self) -> bool {
        self.owner.withdraw(self.seq, self.role)
    }
}

impl<R> Drop for Pending<R> {
    fn drop(&mut self) {
        if !self.ticket.is_complete() {
            self.owner.withdraw(self.seq, self.role);
        }
    }
}

impl<R> Submission<R> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Submission::Ready(_))
    }

    /// The parked handle, if the operation had to wait.
    pub fn into_pending(self) -> Option<Pending<R>> {
        match self {
            Submission::Ready(_) => None,
            Submission::Parked(pending) => Some(pending),
        }
    }

    /// Resolve the submission, blocking if it was parked.
    pub fn wait(self) -> Result<R> {
        match self {
            Submission::Ready(value) => Ok(value),
            Submission::Parked(pending) => pending.wait(),
        }
    }

    /// Resolve the submission, withdrawing it if it stays parked past
    /// `timeout`.
    pub fn wait_timeout(self, timeout: Duration) -> Result<R> {
        match self {
            Submission::Ready(value) => Ok(value),
            Submission::Parked(pending) => pending.wait_timeout(timeout),
        }
    }
}

impl<T> fmt::Debug for RendezvousChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_rendezvous_channel(self, f)
    }
}

impl<R> fmt::Debug for Pending<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_pending(self, f)
    }
}

impl<R: fmt::Debug> fmt::Debug for Submission<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Submission::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Submission::Parked(pending) => f.debug_tuple("Parked").field(pending).finish(),
        }
    }
}
