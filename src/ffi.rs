use crate::Core::error::BridgeError;
use crate::Rendezvous::Structs::PACKET_SIZE;
use crate::Rendezvous::{Bridge, BridgeBuilder, Submission};
use log::error;
use std::sync::Arc;
use std::time::Duration;

// Status codes
pub const VHID_SUCCESS: i32 = 0;
pub const VHID_ERROR_NULL_POINTER: i32 = -1;
pub const VHID_ERROR_INVALID_ARG: i32 = -2;
pub const VHID_ERROR_INVALID_BUFFER_SIZE: i32 = -3;
pub const VHID_ERROR_CANCELLED: i32 = -4;
pub const VHID_ERROR_NOT_SUPPORTED: i32 = -5;
pub const VHID_ERROR_UNAVAILABLE: i32 = -6;

/// Handle to a bridge instance (opaque pointer)
///
/// Safe to share between the front and back threads; every call takes it by
/// shared reference.
pub struct BridgeHandle {
    inner: Arc<Bridge>,
}

fn status(err: BridgeError) -> i32 {
    match err {
        BridgeError::InvalidArgument(_) => VHID_ERROR_INVALID_ARG,
        BridgeError::InvalidBufferSize { .. } => VHID_ERROR_INVALID_BUFFER_SIZE,
        BridgeError::Cancelled => VHID_ERROR_CANCELLED,
        BridgeError::NotSupported => VHID_ERROR_NOT_SUPPORTED,
        BridgeError::Unavailable => VHID_ERROR_UNAVAILABLE,
    }
}

// 0 means no deadline.
fn settle<R>(submission: Submission<R>, timeout_ms: u32) -> Result<R, BridgeError> {
    if timeout_ms == 0 {
        submission.wait()
    } else {
        submission.wait_timeout(Duration::from_millis(u64::from(timeout_ms)))
    }
}

fn report(op: &str, err: BridgeError) -> i32 {
    if err != BridgeError::Cancelled {
        error!("FFI Error: {} failed: {}", op, err);
    }
    status(err)
}

// -----------------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------------

/// Create a new bridge with default descriptors.
///
/// # Arguments
/// * `report_id` - The single report identifier the front side accepts.
///
/// # Returns
/// * Pointer to `BridgeHandle`. Release it with `vhid_bridge_free`.
#[no_mangle]
pub extern "C" fn vhid_bridge_new(report_id: u8) -> *mut BridgeHandle {
    let bridge = BridgeBuilder::new().with_report_id(report_id).build();
    Box::into_raw(Box::new(BridgeHandle { inner: bridge }))
}

/// Tear the bridge down. Parked calls on other threads return
/// `VHID_ERROR_UNAVAILABLE`.
///
/// # Returns
/// * Number of parked operations resolved, or a negative error code.
#[no_mangle]
pub extern "C" fn vhid_bridge_shutdown(handle: *mut BridgeHandle) -> i32 {
    if handle.is_null() {
        return VHID_ERROR_NULL_POINTER;
    }
    let bridge = unsafe { &(*handle).inner };
    i32::try_from(bridge.shutdown()).unwrap_or(i32::MAX)
}

/// Free a bridge handle. Shuts the bridge down first.
///
/// No other thread may still be inside a call on this handle.
#[no_mangle]
pub extern "C" fn vhid_bridge_free(handle: *mut BridgeHandle) {
    if !handle.is_null() {
        unsafe {
            let handle = Box::from_raw(handle);
            handle.inner.shutdown();
        }
    }
}

// -----------------------------------------------------------------------------
// Front side
// -----------------------------------------------------------------------------

/// Write one output report.
///
/// # Arguments
/// * `handle` - Pointer to `BridgeHandle`.
/// * `report_id` - Report identifier; must match the bridge's.
/// * `data` - Pointer to the report.
/// * `len` - Length of the report; must be 64.
/// * `timeout_ms` - How long to wait for the back side to read it, 0 = forever.
///
/// # Returns
/// * Bytes transferred (64) on success, negative error code otherwise.
#[no_mangle]
pub extern "C" fn vhid_bridge_front_write(
    handle: *mut BridgeHandle,
    report_id: u8,
    data: *const u8,
    len: usize,
    timeout_ms: u32,
) -> i32 {
    if handle.is_null() || data.is_null() {
        return VHID_ERROR_NULL_POINTER;
    }

    let bridge = unsafe { &(*handle).inner };
    let slice = unsafe { std::slice::from_raw_parts(data, len) };

    match bridge
        .front_write_report(report_id, slice)
        .and_then(|submission| settle(submission, timeout_ms))
    {
        Ok(n) => n as i32,
        Err(e) => report("front write", e),
    }
}

/// Read the next input report.
///
/// # Arguments
/// * `out_buf` - Buffer receiving the report.
/// * `len` - Size of `out_buf`; must be 64.
///
/// # Returns
/// * Bytes received (64) on success, negative error code otherwise.
#[no_mangle]
pub extern "C" fn vhid_bridge_front_read(
    handle: *mut BridgeHandle,
    report_id: u8,
    out_buf: *mut u8,
    len: usize,
    timeout_ms: u32,
) -> i32 {
    if handle.is_null() || out_buf.is_null() {
        return VHID_ERROR_NULL_POINTER;
    }

    let bridge = unsafe { &(*handle).inner };
    let out = unsafe { std::slice::from_raw_parts_mut(out_buf, len) };

    match bridge
        .front_read_report(report_id, len)
        .and_then(|submission| settle(submission, timeout_ms))
        .and_then(|packet| packet.write_to(out))
    {
        Ok(n) => n as i32,
        Err(e) => report("front read", e),
    }
}

// -----------------------------------------------------------------------------
// Back side
// -----------------------------------------------------------------------------

/// Write one packet from the back side. Same conventions as the front calls.
#[no_mangle]
pub extern "C" fn vhid_bridge_back_write(
    handle: *mut BridgeHandle,
    data: *const u8,
    len: usize,
    timeout_ms: u32,
) -> i32 {
    if handle.is_null() || data.is_null() {
        return VHID_ERROR_NULL_POINTER;
    }

    let bridge = unsafe { &(*handle).inner };
    let slice = unsafe { std::slice::from_raw_parts(data, len) };

    match bridge
        .open_back()
        .submit_write(slice)
        .and_then(|submission| settle(submission, timeout_ms))
    {
        Ok(n) => n as i32,
        Err(e) => report("back write", e),
    }
}

/// Read the next packet produced by the front side.
#[no_mangle]
pub extern "C" fn vhid_bridge_back_read(
    handle: *mut BridgeHandle,
    out_buf: *mut u8,
    len: usize,
    timeout_ms: u32,
) -> i32 {
    if handle.is_null() || out_buf.is_null() {
        return VHID_ERROR_NULL_POINTER;
    }
    if len != PACKET_SIZE {
        return report("back read", BridgeError::buffer_size(PACKET_SIZE, len));
    }

    let bridge = unsafe { &(*handle).inner };
    let out = unsafe { std::slice::from_raw_parts_mut(out_buf, len) };

    match bridge
        .back_receive()
        .and_then(|submission| settle(submission, timeout_ms))
        .and_then(|packet| packet.write_to(out))
    {
        Ok(n) => n as i32,
        Err(e) => report("back read", e),
    }
}
