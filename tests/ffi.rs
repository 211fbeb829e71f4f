use std::thread;
use vhid_bridge::ffi::*;

struct SendHandle(*mut BridgeHandle);
unsafe impl Send for SendHandle {}

#[test]
fn front_write_pairs_with_back_read() {
    let handle = vhid_bridge_new(0);
    assert!(!handle.is_null());

    let back = SendHandle(handle);
    let reader = thread::spawn(move || {
        let back = back;
        let mut buf = [0u8; 64];
        let n = vhid_bridge_back_read(back.0, buf.as_mut_ptr(), buf.len(), 0);
        (n, buf)
    });

    let report = [0x31u8; 64];
    assert_eq!(vhid_bridge_front_write(handle, 0, report.as_ptr(), report.len(), 0), 64);

    let (n, buf) = reader.join().unwrap();
    assert_eq!(n, 64);
    assert_eq!(buf, report);

    vhid_bridge_free(handle);
}

#[test]
fn back_write_pairs_with_front_read() {
    let handle = vhid_bridge_new(0);
    let back = SendHandle(handle);
    let writer = thread::spawn(move || {
        let back = back;
        let packet = [0x7Eu8; 64];
        vhid_bridge_back_write(back.0, packet.as_ptr(), packet.len(), 0)
    });

    let mut buf = [0u8; 64];
    assert_eq!(vhid_bridge_front_read(handle, 0, buf.as_mut_ptr(), buf.len(), 0), 64);
    assert_eq!(buf, [0x7E; 64]);
    assert_eq!(writer.join().unwrap(), 64);

    vhid_bridge_free(handle);
}

#[test]
fn errors_map_to_status_codes() {
    let handle = vhid_bridge_new(0);
    let short = [0u8; 60];
    let full = [0u8; 64];
    let mut out = [0u8; 64];

    assert_eq!(
        vhid_bridge_front_write(std::ptr::null_mut(), 0, full.as_ptr(), 64, 0),
        VHID_ERROR_NULL_POINTER
    );
    assert_eq!(
        vhid_bridge_front_write(handle, 0, short.as_ptr(), short.len(), 0),
        VHID_ERROR_INVALID_BUFFER_SIZE
    );
    assert_eq!(
        vhid_bridge_front_write(handle, 4, full.as_ptr(), full.len(), 0),
        VHID_ERROR_INVALID_ARG
    );
    assert_eq!(
        vhid_bridge_back_read(handle, out.as_mut_ptr(), 32, 0),
        VHID_ERROR_INVALID_BUFFER_SIZE
    );
    assert_eq!(
        vhid_bridge_back_read(handle, out.as_mut_ptr(), out.len(), 10),
        VHID_ERROR_CANCELLED
    );

    assert_eq!(vhid_bridge_shutdown(handle), VHID_SUCCESS);
    assert_eq!(
        vhid_bridge_front_read(handle, 0, out.as_mut_ptr(), out.len(), 0),
        VHID_ERROR_UNAVAILABLE
    );
    vhid_bridge_free(handle);
}

#[test]
fn shutdown_releases_a_blocked_caller() {
    let handle = vhid_bridge_new(0);
    let back = SendHandle(handle);
    let reader = thread::spawn(move || {
        let back = back;
        let mut buf = [0u8; 64];
        vhid_bridge_back_read(back.0, buf.as_mut_ptr(), buf.len(), 0)
    });

    // Keep shutting down until the reader has parked and been released.
    while !reader.is_finished() {
        vhid_bridge_shutdown(handle);
        thread::yield_now();
    }
    assert_eq!(reader.join().unwrap(), VHID_ERROR_UNAVAILABLE);
    vhid_bridge_free(handle);
}
