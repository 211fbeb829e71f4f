// src/Rendezvous/bridge.rs

use super::back::BackHandle;
use super::builder::BridgeConfig;
use super::channel::{RendezvousChannel, Submission};
use super::Structs::Packet_Structs::{check_report, Packet};
use crate::Core::error::Result;
use log::{info, warn};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Full-duplex link between the front and back sides.
///
/// Channel F carries front-produced packets to back-side readers; channel B
/// carries back-produced packets to front-side readers. The two directions
/// never share a lock.
pub struct Bridge {
    front_to_back: RendezvousChannel<Packet>,
    back_to_front: RendezvousChannel<Packet>,
    config: BridgeConfig,
    shut_down: AtomicBool,
}

impl Bridge {
    pub(crate) fn new(config: BridgeConfig) -> Self {
        info!(
            "bridge created (report id {:#04x}, back path {})",
            config.report_id, config.device_path
        );
        Self {
            front_to_back: RendezvousChannel::new("front->back"),
            back_to_front: RendezvousChannel::new("back->front"),
            config,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Front side hands off a packet (channel F, producer).
    pub fn front_send(&self, packet: Packet) -> Result<Submission<usize>> {
        self.front_to_back.submit(packet)
    }

    /// Front side asks for the next back-produced packet (channel B, consumer).
    pub fn front_receive(&self) -> Result<Submission<Packet>> {
        self.back_to_front.receive()
    }

    /// Back side hands off a packet (channel B, producer).
    pub fn back_send(&self, packet: Packet) -> Result<Submission<usize>> {
        self.back_to_front.submit(packet)
    }

    /// Back side asks for the next front-produced packet (channel F, consumer).
    pub fn back_receive(&self) -> Result<Submission<Packet>> {
        self.front_to_back.receive()
    }

    /// Validate an output report, then `front_send` it.
    ///
    /// The identifier is checked before the length; a rejected report never
    /// reaches channel F.
    pub fn front_write_report(&self, report_id: u8, data: &[u8]) -> Result<Submission<usize>> {
        let packet = Packet::from_report(report_id, self.config.report_id, data)
            .inspect_err(|e| warn!("front write rejected: {}", e))?;
        self.front_send(packet)
    }

    /// Validate an input report request, then `front_receive`.
    pub fn front_read_report(&self, report_id: u8, buffer_len: usize) -> Result<Submission<Packet>> {
        check_report(report_id, self.config.report_id, buffer_len)
            .inspect_err(|e| warn!("front read rejected: {}", e))?;
        self.front_receive()
    }

    /// Tear the bridge down.
    ///
    /// Both channels are closed under their locks (F, then B) before any
    /// parked operation is resolved, so no submission can slip in between the
    /// two drains. Every parked operation resolves to `Unavailable`; later
    /// calls fail with `Unavailable`. Returns the number resolved here.
    pub fn shutdown(&self) -> usize {
        let (drained_f, drained_b) = {
            let mut f = self.front_to_back.lock_queues();
            let mut b = self.back_to_front.lock_queues();
            (
                RendezvousChannel::close_locked(&mut *f),
                RendezvousChannel::close_locked(&mut *b),
            )
        };

        let from_f = drained_f.resolve(&self.front_to_back.shared);
        let from_b = drained_b.resolve(&self.back_to_front.shared);

        if !self.shut_down.swap(true, Ordering::AcqRel) {
            info!(
                "bridge shut down: {} parked on front->back, {} on back->front",
                from_f, from_b
            );
        }
        from_f + from_b
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Open the back-side handle at the configured path.
    pub fn open_back(self: &Arc<Self>) -> BackHandle {
        BackHandle::attach(Arc::clone(self))
    }

    /// Open the back-side handle by path, as an external process would.
    pub fn open_back_at(self: &Arc<Self>, path: &str) -> io::Result<BackHandle> {
        BackHandle::open(self, path)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Channel F: front produces, back consumes.
    pub fn front_to_back(&self) -> &RendezvousChannel<Packet> {
        &self.front_to_back
    }

    /// Channel B: back produces, front consumes.
    pub fn back_to_front(&self) -> &RendezvousChannel<Packet> {
        &self.back_to_front
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_bridge(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Core::error::BridgeError;
    use crate::Rendezvous::BridgeBuilder;

    #[test]
    fn directions_are_independent() {
        let bridge = BridgeBuilder::new().build();
        let parked = bridge.front_send(Packet::filled(1)).unwrap().into_pending().unwrap();
        // A front read must not see the front's own packet.
        let reader = bridge.front_receive().unwrap().into_pending().unwrap();
        assert_eq!(bridge.front_to_back().pending_out_len(), 1);
        assert_eq!(bridge.back_to_front().pending_in_len(), 1);

        assert_eq!(bridge.back_receive().unwrap().wait(), Ok(Packet::filled(1)));
        assert_eq!(parked.wait(), Ok(64));
        assert!(bridge.back_send(Packet::filled(2)).unwrap().is_ready());
        assert_eq!(reader.wait(), Ok(Packet::filled(2)));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let bridge = BridgeBuilder::new().build();
        let a = bridge.front_receive().unwrap().into_pending().unwrap();
        let b = bridge.front_send(Packet::default()).unwrap().into_pending().unwrap();
        assert_eq!(bridge.shutdown(), 2);
        assert_eq!(bridge.shutdown(), 0);
        assert!(bridge.is_shut_down());
        assert_eq!(a.wait(), Err(BridgeError::Unavailable));
        assert_eq!(b.wait(), Err(BridgeError::Unavailable));
        assert!(matches!(bridge.back_receive(), Err(BridgeError::Unavailable)));
    }

    #[test]
    fn dropping_the_bridge_resolves_parked_operations() {
        let bridge = BridgeBuilder::new().build();
        let pending = bridge.back_receive().unwrap().into_pending().unwrap();
        drop(bridge);
        assert_eq!(pending.wait(), Err(BridgeError::Unavailable));
    }
}
