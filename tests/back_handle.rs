use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use vhid_bridge::{BackHandle, BridgeBuilder, BridgeError, Packet, DEFAULT_DEVICE_PATH};

#[test]
fn open_by_path() -> io::Result<()> {
    let bridge = BridgeBuilder::new().with_device_path("/run/probe-bridge").build();

    let err = BackHandle::open(&bridge, DEFAULT_DEVICE_PATH).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);

    let handle = bridge.open_back_at("/run/probe-bridge")?;
    assert_eq!(handle.timeout(), None);
    Ok(())
}

#[test]
fn open_after_shutdown_is_broken_pipe() {
    let bridge = BridgeBuilder::new().build();
    bridge.shutdown();
    let err = BackHandle::open(&bridge, DEFAULT_DEVICE_PATH).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn read_blocks_until_the_front_writes() -> io::Result<()> {
    let bridge = BridgeBuilder::new().build();
    let mut handle = bridge.open_back();

    let front = {
        let bridge = bridge.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            let mut report = [0u8; 64];
            report[0] = 0x02; // DAP_Connect
            bridge.front_write_report(0, &report).and_then(|s| s.wait())
        })
    };

    let mut buf = [0u8; 64];
    assert_eq!(handle.read(&mut buf)?, 64);
    assert_eq!(buf[0], 0x02);
    assert!(buf[1..].iter().all(|&b| b == 0));
    assert_eq!(front.join().unwrap(), Ok(64));
    Ok(())
}

#[test]
fn write_completes_when_the_front_reads() -> io::Result<()> {
    let bridge = BridgeBuilder::new().build();
    let reader = bridge.front_receive().unwrap();

    let mut handle = bridge.open_back();
    assert_eq!(handle.write(&[0xEE; 64])?, 64);
    handle.flush()?;
    assert_eq!(reader.wait(), Ok(Packet::filled(0xEE)));
    Ok(())
}

#[test]
fn command_response_round_trip() {
    let bridge = BridgeBuilder::new().build();

    // The back service echoes each command with the first byte inverted.
    let service = {
        let mut handle = bridge.open_back();
        thread::spawn(move || -> io::Result<usize> {
            let mut served = 0;
            let mut buf = [0u8; 64];
            loop {
                match handle.read(&mut buf) {
                    Ok(_) => {
                        buf[0] = !buf[0];
                        handle.write(&buf)?;
                        served += 1;
                    }
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(served),
                    Err(e) => return Err(e),
                }
            }
        })
    };

    for cmd in 0u8..16 {
        let mut report = [cmd; 64];
        report[0] = cmd;
        let sent = bridge.front_write_report(0, &report).unwrap();
        let response = bridge.front_read_report(0, 64).unwrap().wait().unwrap();
        assert_eq!(sent.wait(), Ok(64));
        assert_eq!(response.as_bytes()[0], !cmd);
        assert_eq!(response.as_bytes()[1], cmd);
    }

    bridge.shutdown();
    assert_eq!(service.join().unwrap().unwrap(), 16);
}

#[test]
fn submit_read_does_not_block() {
    let bridge = BridgeBuilder::new().build();
    let handle = bridge.open_back();
    let pending = handle.submit_read().unwrap();
    assert!(!pending.is_ready());
    assert_eq!(bridge.front_to_back().pending_in_len(), 1);

    bridge.shutdown();
    assert_eq!(pending.wait(), Err(BridgeError::Unavailable));
}

#[test]
fn timeout_surfaces_as_timed_out_and_can_be_retried() {
    let bridge = BridgeBuilder::new().build();
    let mut handle = bridge.open_back().with_timeout(Some(Duration::from_millis(10)));

    let err = handle.write(&[1u8; 64]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    assert_eq!(bridge.back_to_front().pending_out_len(), 0);

    let reader = bridge.front_receive().unwrap();
    handle.set_timeout(None);
    assert_eq!(handle.write(&[2u8; 64]).unwrap(), 64);
    assert_eq!(reader.wait(), Ok(Packet::filled(2)));
}

#[test]
fn timed_handle_stops_std_io_helpers() {
    let bridge = BridgeBuilder::new().build();

    // Each helper runs on its own thread so a retry loop fails the test
    // instead of hanging it.
    let (tx, rx) = mpsc::channel();
    let mut reader = bridge.open_back().with_timeout(Some(Duration::from_millis(20)));
    let read_tx = tx.clone();
    thread::spawn(move || {
        let mut buf = [0u8; 64];
        let _ = read_tx.send(("read_exact", reader.read_exact(&mut buf)));
    });
    let mut writer = bridge.open_back().with_timeout(Some(Duration::from_millis(20)));
    thread::spawn(move || {
        let _ = tx.send(("write_all", writer.write_all(&[1u8; 64])));
    });

    for _ in 0..2 {
        let (op, outcome) = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("helper kept retrying after the timeout");
        let err = outcome.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut, "{}", op);
        let inner = err.get_ref().and_then(|e| e.downcast_ref::<BridgeError>()).copied();
        assert_eq!(inner, Some(BridgeError::Cancelled), "{}", op);
    }

    // Nothing was left parked by either helper.
    let f = bridge.front_to_back();
    let b = bridge.back_to_front();
    assert_eq!((f.pending_in_len(), b.pending_out_len()), (0, 0));
}
