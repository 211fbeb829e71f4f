use std::io;
use thiserror::Error;

/// Outcome of a bridge request that did not succeed.
///
/// Validation errors (`InvalidArgument`, `InvalidBufferSize`) are reported
/// synchronously and never reach a queue. A parked operation resolves to
/// exactly one of success, `Cancelled` or `Unavailable`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeError {
    /// The request named an identifier the device does not have: a report id
    /// other than the configured one, or an unknown string id or index.
    #[error("invalid parameter: unknown id {0:#x}")]
    InvalidArgument(u32),
    /// The request buffer was not exactly one report long.
    #[error("invalid buffer size: expected {expected} bytes, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },
    /// The operation was withdrawn before a counterpart arrived.
    #[error("operation cancelled before pairing")]
    Cancelled,
    /// Administrative request with no implementation.
    #[error("request not supported")]
    NotSupported,
    /// The bridge was torn down.
    #[error("bridge unavailable")]
    Unavailable,
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    pub(crate) fn buffer_size(expected: usize, actual: usize) -> Self {
        BridgeError::InvalidBufferSize { expected, actual }
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            BridgeError::InvalidArgument(_) | BridgeError::InvalidBufferSize { .. } => {
                io::ErrorKind::InvalidInput
            }
            // Not `Interrupted`: std's I/O helpers retry those, re-parking forever.
            BridgeError::Cancelled => io::ErrorKind::TimedOut,
            BridgeError::NotSupported => io::ErrorKind::Unsupported,
            BridgeError::Unavailable => io::ErrorKind::BrokenPipe,
        }
    }
}

impl From<BridgeError> for io::Error {
    fn from(err: BridgeError) -> Self {
        io::Error::new(err.io_kind(), err)
    }
}
