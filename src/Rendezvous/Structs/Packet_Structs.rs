// The unit of exchange between the front and back sides.

use crate::Core::error::{BridgeError, Result};
use std::fmt;

/// Size in bytes of every report crossing the bridge.
pub const PACKET_SIZE: usize = 64;

/// The single report identifier the device declares.
pub const DEFAULT_REPORT_ID: u8 = 0x00;

/// A fixed 64-byte report. No header, no length field; equality is byte-wise.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    data: [u8; PACKET_SIZE],
}

/// Anything a rendezvous channel can carry.
///
/// `byte_len` is what both sides of a pairing report as transferred.
pub trait Payload: Send + 'static {
    fn byte_len(&self) -> usize;
}

impl Payload for Packet {
    fn byte_len(&self) -> usize {
        PACKET_SIZE
    }
}

impl Packet {
    pub const fn new(data: [u8; PACKET_SIZE]) -> Self {
        Self { data }
    }

    /// A packet with every byte set to `byte`.
    pub const fn filled(byte: u8) -> Self {
        Self {
            data: [byte; PACKET_SIZE],
        }
    }

    /// Copy exactly `PACKET_SIZE` bytes out of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let data: [u8; PACKET_SIZE] = bytes
            .try_into()
            .map_err(|_| BridgeError::buffer_size(PACKET_SIZE, bytes.len()))?;
        Ok(Self { data })
    }

    /// Validate a report as the adapters receive it: identifier first, then
    /// length.
    pub fn from_report(report_id: u8, expected_id: u8, bytes: &[u8]) -> Result<Self> {
        check_report(report_id, expected_id, bytes.len())?;
        Self::from_slice(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.data
    }

    pub fn into_bytes(self) -> [u8; PACKET_SIZE] {
        self.data
    }

    /// Copy the packet into a caller buffer that must be exactly one report.
    pub fn write_to(&self, out: &mut [u8]) -> Result<usize> {
        if out.len() != PACKET_SIZE {
            return Err(BridgeError::buffer_size(PACKET_SIZE, out.len()));
        }
        out.copy_from_slice(&self.data);
        Ok(PACKET_SIZE)
    }
}

/// Gate applied before any operation reaches a channel.
pub fn check_report(report_id: u8, expected_id: u8, len: usize) -> Result<()> {
    if report_id != expected_id {
        return Err(BridgeError::InvalidArgument(u32::from(report_id)));
    }
    if len != PACKET_SIZE {
        return Err(BridgeError::buffer_size(PACKET_SIZE, len));
    }
    Ok(())
}

impl Default for Packet {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl From<[u8; PACKET_SIZE]> for Packet {
    fn from(data: [u8; PACKET_SIZE]) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_packet(self, f)
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_checked_before_length() {
        assert_eq!(
            Packet::from_report(2, DEFAULT_REPORT_ID, &[0u8; 10]),
            Err(BridgeError::InvalidArgument(2))
        );
        assert_eq!(
            Packet::from_report(0, DEFAULT_REPORT_ID, &[0u8; 60]),
            Err(BridgeError::buffer_size(64, 60))
        );
        assert!(Packet::from_report(0, DEFAULT_REPORT_ID, &[9u8; 64]).is_ok());
    }

    #[test]
    fn oversized_slices_are_rejected() {
        assert_eq!(
            Packet::from_slice(&[0u8; 65]),
            Err(BridgeError::buffer_size(64, 65))
        );
    }

    #[test]
    fn write_to_requires_exact_buffer() {
        let packet = Packet::filled(0xAB);
        let mut short = [0u8; 32];
        assert!(packet.write_to(&mut short).is_err());
        let mut out = [0u8; PACKET_SIZE];
        assert_eq!(packet.write_to(&mut out), Ok(PACKET_SIZE));
        assert_eq!(out, [0xAB; PACKET_SIZE]);
    }
}
