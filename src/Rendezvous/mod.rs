mod back;
mod bridge;
mod builder;
mod channel;
mod front;

pub use back::BackHandle;
pub use bridge::Bridge;
pub use builder::{BridgeBuilder, BridgeConfig, DEFAULT_DEVICE_PATH};
pub use channel::{Pending, RendezvousChannel, Role, Submission};
pub use front::{FrontAdapter, FrontReply, HidRequest};
pub use Structs::Packet;

pub mod Queue {
    pub mod Queue;
    pub mod Queue_impl;
    pub use Queue::{ConsumerOp, OpId, PendingQueue, ProducerOp, Queued}; // re-export for stable path
}

pub mod Structs {
    pub mod Packet_Structs;
    pub use Packet_Structs::{Packet, Payload, DEFAULT_REPORT_ID, PACKET_SIZE}; // re-export for stable path
}
