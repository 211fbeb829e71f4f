// In demos/back_service.rs
//
// Runs the back side the way an external bridge process would: open the
// handle by path, then read commands and write responses until the bridge
// goes away. A simulated host keeps the front side busy.
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vhid_bridge::{BackHandle, BridgeBuilder, FrontAdapter, FrontReply, HidRequest, DEFAULT_DEVICE_PATH};

const DAP_INFO: u8 = 0x00;

fn main() -> io::Result<()> {
    env_logger::init();

    let bridge = BridgeBuilder::new().build();
    let keep_alive = Arc::new(AtomicBool::new(true));
    {
        let bridge = bridge.clone();
        let keep_alive = keep_alive.clone();
        ctrlc::set_handler(move || {
            println!("\nReceived Ctrl+C, shutting down...");
            keep_alive.store(false, Ordering::SeqCst);
            bridge.shutdown();
        })
        .expect("Error setting Ctrl-C handler");
    }

    // Simulated host: enumerates, then polls DAP_Info once a second.
    let host = {
        let front = FrontAdapter::new(bridge.clone());
        let keep_alive = keep_alive.clone();
        thread::spawn(move || {
            if let Ok(FrontReply::Attributes(attrs)) = front.dispatch(HidRequest::GetDeviceAttributes) {
                println!("Host: enumerated {:04x}:{:04x}", attrs.vendor_id, attrs.product_id);
            }
            while keep_alive.load(Ordering::SeqCst) {
                let mut command = vec![0u8; 64];
                command[0] = DAP_INFO;
                command[1] = 0x04; // Firmware version
                if front.write_report(0, &command).and_then(|s| s.wait()).is_err() {
                    break;
                }
                match front.read_report(0, 64).and_then(|r| r.wait()) {
                    Ok(response) => println!("Host: response {:02x?}", &response.as_bytes()[..8]),
                    Err(_) => break,
                }
                thread::sleep(Duration::from_secs(1));
            }
        })
    };

    println!("Back: opening {}", DEFAULT_DEVICE_PATH);
    let mut handle = BackHandle::open(&bridge, DEFAULT_DEVICE_PATH)?;
    let mut buf = [0u8; 64];
    loop {
        match handle.read(&mut buf) {
            Ok(_) => {
                let version = b"1.0.0\0";
                let mut response = [0u8; 64];
                response[0] = buf[0];
                response[1] = version.len() as u8;
                response[2..2 + version.len()].copy_from_slice(version);
                handle.write_all(&response)?;
            }
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
            Err(e) => return Err(e),
        }
    }

    let _ = host.join();
    println!("Back: bridge closed");
    Ok(())
}
