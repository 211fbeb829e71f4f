// One-shot completion slot shared between a parked operation and its caller.
//
// The core owns the `Completion` half while the operation sits in a queue; the
// external caller holds the `Ticket` half and is told about the outcome from
// whichever thread resolves the operation.

use super::error::{BridgeError, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

enum SlotState<R> {
    Waiting,
    Ready(Result<R>),
    Taken,
}

struct Slot<R> {
    state: Mutex<SlotState<R>>,
    ready: Condvar,
}

/// Writing half. Consumed by `complete`, so an operation resolves at most once.
pub struct Completion<R> {
    slot: Arc<Slot<R>>,
}

/// Reading half held by the caller of a parked operation.
pub struct Ticket<R> {
    slot: Arc<Slot<R>>,
}

/// Create a connected completion/ticket pair.
pub fn completion_pair<R>() -> (Completion<R>, Ticket<R>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Waiting),
        ready: Condvar::new(),
    });
    (
        Completion { slot: Arc::clone(&slot) },
        Ticket { slot },
    )
}

impl<R> Completion<R> {
    /// Publish the outcome and wake the waiter.
    pub fn complete(self, outcome: Result<R>) {
        self.publish(outcome);
    }

    fn publish(&self, outcome: Result<R>) {
        let mut state = self.slot.state.lock();
        if matches!(*state, SlotState::Waiting) {
            *state = SlotState::Ready(outcome);
            drop(state);
            self.slot.ready.notify_all();
        }
    }
}

impl<R> Drop for Completion<R> {
    // A completion that goes away unresolved means its owner was torn down.
    fn drop(&mut self) {
        self.publish(Err(BridgeError::Unavailable));
    }
}

impl<R> Ticket<R> {
    /// Whether an outcome has been published (taken or not).
    pub fn is_complete(&self) -> bool {
        !matches!(*self.slot.state.lock(), SlotState::Waiting)
    }

    /// Take the outcome if it is already available.
    ///
    /// Returns `None` while the operation is still pending, and after the
    /// outcome has been taken once.
    pub fn try_take(&self) -> Option<Result<R>> {
        let mut state = self.slot.state.lock();
        take_ready(&mut state)
    }

    /// Block the calling thread until the outcome is published.
    ///
    /// The outcome can be taken once; waiting again afterwards reports
    /// `Unavailable`.
    pub fn wait(&self) -> Result<R> {
        let mut state = self.slot.state.lock();
        loop {
            match std::mem::replace(&mut *state, SlotState::Taken) {
                SlotState::Ready(outcome) => return outcome,
                SlotState::Taken => return Err(BridgeError::Unavailable),
                SlotState::Waiting => {
                    *state = SlotState::Waiting;
                    self.slot.ready.wait(&mut state);
                }
            }
        }
    }

    /// Block up to `timeout`. Returns `None` if nothing was published in time.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<R>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.slot.state.lock();
        loop {
            if let Some(outcome) = take_ready(&mut state) {
                return Some(outcome);
            }
            if matches!(*state, SlotState::Taken) {
                return None;
            }
            if self.slot.ready.wait_until(&mut state, deadline).timed_out() {
                return take_ready(&mut state);
            }
        }
    }
}

fn take_ready<R>(state: &mut SlotState<R>) -> Option<Result<R>> {
    match std::mem::replace(state, SlotState::Taken) {
        SlotState::Ready(outcome) => Some(outcome),
        other => {
            *state = other;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn outcome_crosses_threads() {
        let (completion, ticket) = completion_pair::<u32>();
        let t = thread::spawn(move || completion.complete(Ok(7)));
        assert_eq!(ticket.wait(), Ok(7));
        t.join().unwrap();
    }

    #[test]
    fn first_outcome_wins() {
        let (completion, ticket) = completion_pair::<u32>();
        completion.publish(Ok(1));
        completion.complete(Err(BridgeError::Cancelled));
        assert_eq!(ticket.try_take(), Some(Ok(1)));
        assert_eq!(ticket.try_take(), None);
    }

    #[test]
    fn dropped_completion_reports_unavailable() {
        let (completion, ticket) = completion_pair::<u32>();
        drop(completion);
        assert!(ticket.is_complete());
        assert_eq!(ticket.wait(), Err(BridgeError::Unavailable));
    }

    #[test]
    fn wait_timeout_expires_while_pending() {
        let (_completion, ticket) = completion_pair::<u32>();
        assert_eq!(ticket.wait_timeout(Duration::from_millis(10)), None);
        assert!(!ticket.is_complete());
    }
}
