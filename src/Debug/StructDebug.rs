use std::fmt;
use crate::Rendezvous::{Bridge, Packet, Pending, RendezvousChannel};

/// Debug function for Packet
///
/// Renders the 64 bytes as one hex string so a failed comparison shows
/// exactly which byte differs.
pub fn debug_packet(packet: &Packet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Packet(")?;
    for byte in packet.as_bytes() {
        write!(f, "{:02x}", byte)?;
    }
    f.write_str(")")
}

/// Debug function for RendezvousChannel
///
/// Shows:
/// - Channel name
/// - Parked producers / consumers
/// - Whether the channel is closed
/// - Counter snapshot
pub fn debug_rendezvous_channel<T>(channel: &RendezvousChannel<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (pending_out, pending_in) = channel.parked_seqs();
    f.debug_struct("RendezvousChannel")
        .field("name", &channel.name())
        .field("pending_out", &pending_out)
        .field("pending_in", &pending_in)
        .field("closed", &channel.is_closed())
        .field("stats", &channel.stats())
        .finish()
}

/// Debug function for Pending
///
/// Never takes the outcome, only reports whether one exists.
pub fn debug_pending<R>(pending: &Pending<R>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pending")
        .field("seq", &pending.seq())
        .field("role", &pending.role())
        .field("complete", &pending.is_complete())
        .finish_non_exhaustive()
}

pub fn debug_bridge(bridge: &Bridge, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let config = bridge.config();
    f.debug_struct("Bridge")
        .field("report_id", &format_args!("{:#04x}", config.report_id))
        .field("device_path", &config.device_path)
        .field("front_to_back", bridge.front_to_back())
        .field("back_to_front", bridge.back_to_front())
        .field("shut_down", &bridge.is_shut_down())
        .finish()
}
