// In demos/loopback.rs
//
// Front side sends a stream of DAP-style commands; a back service thread
// answers each one. Ctrl+C tears the bridge down mid-stream.
use std::env;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use vhid_bridge::{BridgeBuilder, BridgeError};

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let rounds: u32 = match args.get(1).map(|s| s.parse()) {
        None => 1000,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("Usage: {} [rounds]", args[0]);
            std::process::exit(1);
        }
    };

    let bridge = BridgeBuilder::new().build();
    let keep_alive = Arc::new(AtomicBool::new(true));

    {
        let bridge = bridge.clone();
        let keep_alive = keep_alive.clone();
        ctrlc::set_handler(move || {
            println!("\nReceived Ctrl+C, shutting down bridge...");
            keep_alive.store(false, Ordering::SeqCst);
            bridge.shutdown();
        })
        .expect("Error setting Ctrl-C handler");
    }

    let mut back = bridge.open_back();
    let service = thread::spawn(move || -> io::Result<u32> {
        let mut served = 0;
        let mut buf = [0u8; 64];
        loop {
            match back.read(&mut buf) {
                Ok(_) => {
                    // Response echoes the command id followed by DAP_OK.
                    buf[1] = 0x00;
                    back.write_all(&buf)?;
                    served += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(served),
                Err(e) => return Err(e),
            }
        }
    });

    println!("Loopback: {} rounds", rounds);
    let start = Instant::now();
    let mut completed = 0;
    while completed < rounds && keep_alive.load(Ordering::SeqCst) {
        let mut report = [0u8; 64];
        report[0] = (completed % 0x20) as u8;
        report[1] = 0xFF;

        let sent = bridge.front_write_report(0, &report);
        let response = bridge
            .front_read_report(0, 64)
            .and_then(|r| r.wait());
        match (sent.and_then(|s| s.wait()), response) {
            (Ok(_), Ok(packet)) => {
                if packet.as_bytes()[0] != report[0] || packet.as_bytes()[1] != 0x00 {
                    eprintln!("Unexpected response to round {}", completed);
                }
            }
            (Err(BridgeError::Unavailable), _) | (_, Err(BridgeError::Unavailable)) => break,
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("Round {} failed: {}", completed, e);
                break;
            }
        }
        completed += 1;

        if completed % 100 == 0 {
            println!("--- {} rounds ---", completed);
        }
    }

    let elapsed = start.elapsed();
    bridge.shutdown();
    let served = service.join().unwrap_or(Ok(0))?;

    println!("\nDone: {} rounds in {:.2?}, back served {}", completed, elapsed, served);
    if completed > 0 {
        println!("Avg round trip: {:.2?}", elapsed / completed);
    }
    println!("front->back: {:?}", bridge.front_to_back().stats());
    println!("back->front: {:?}", bridge.back_to_front().stats());
    Ok(())
}
