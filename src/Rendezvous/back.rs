// src/Rendezvous/back.rs

use super::bridge::Bridge;
use super::channel::Submission;
use super::Structs::{Packet, PACKET_SIZE};
use crate::Core::error::{BridgeError, Result};
use log::{debug, warn};
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

/// File-like handle the back-side process uses.
///
/// Every `read` and `write` moves exactly one 64-byte packet; any other buffer
/// length fails with `InvalidInput` before touching the bridge. Calls block
/// until paired, or until the handle's timeout withdraws the operation; that
/// surfaces as `TimedOut` so `read_exact` and `write_all` stop instead of
/// retrying.
#[derive(Debug)]
pub struct BackHandle {
    bridge: Arc<Bridge>,
    timeout: Option<Duration>,
}

impl BackHandle {
    /// Open the handle by path. Only the bridge's configured path exists.
    pub fn open(bridge: &Arc<Bridge>, path: &str) -> io::Result<Self> {
        if path != bridge.config().device_path {
            warn!("back: no bridge at {}", path);
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no bridge device at {}", path),
            ));
        }
        if bridge.is_shut_down() {
            return Err(BridgeError::Unavailable.into());
        }
        debug!("back: opened {}", path);
        Ok(Self::attach(Arc::clone(bridge)))
    }

    pub(crate) fn attach(bridge: Arc<Bridge>) -> Self {
        Self {
            bridge,
            timeout: None,
        }
    }

    /// Bound each blocking call. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Queue a read without blocking (channel F, consumer).
    pub fn submit_read(&self) -> Result<Submission<Packet>> {
        self.bridge.back_receive()
    }

    /// Queue a write without blocking (channel B, producer).
    pub fn submit_write(&self, data: &[u8]) -> Result<Submission<usize>> {
        let packet = Packet::from_slice(data)?;
        self.bridge.back_send(packet)
    }

    fn settle<R>(&self, submission: Submission<R>) -> Result<R> {
        match self.timeout {
            Some(timeout) => submission.wait_timeout(timeout),
            None => submission.wait(),
        }
    }
}

impl Read for BackHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.len() != PACKET_SIZE {
            return Err(BridgeError::buffer_size(PACKET_SIZE, buf.len()).into());
        }
        let packet = self.settle(self.submit_read()?)?;
        Ok(packet.write_to(buf)?)
    }
}

impl Write for BackHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let submission = self.submit_write(buf)?;
        Ok(self.settle(submission)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
