// Module naming follows project convention (Rendezvous = the pairing core)
#[allow(non_snake_case)]
pub mod Rendezvous;

#[allow(non_snake_case)]
pub mod Core {
    pub mod completion;
    pub mod descriptor;
    pub mod error;
    pub mod stats;
    pub use completion::{Completion, Ticket};
    pub use error::{BridgeError, Result};
    pub use stats::{ChannelStats, StatsSnapshot};
}

#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod ffi;

pub use Core::{BridgeError, Result};
pub use Rendezvous::Structs::{DEFAULT_REPORT_ID, PACKET_SIZE};
pub use Rendezvous::{
    BackHandle, Bridge, BridgeBuilder, BridgeConfig, FrontAdapter, FrontReply, HidRequest,
    Packet, Pending, RendezvousChannel, Role, Submission, DEFAULT_DEVICE_PATH,
};
