//! Interactive CAT console against a real RS-HFIQ on a serial port.
//!
//! Lines typed on stdin are fed through the dispatcher byte by byte,
//! exactly as a controller program would send them. A leading `*` is
//! added for you if missing.
//!
//! Usage: cat_repl [port]   (defaults to /dev/ttyUSB0, 57600 baud)

use std::io::{BufRead, Read, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use serialport::SerialPort;

use rshfiq_cat::{freq, DispatchOutcome, Dispatcher, Link, Transport, Wait};

struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl Transport for SerialLink {
    fn bytes_available(&self) -> usize {
        self.port.bytes_to_read().unwrap_or(0) as usize
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.bytes_available() == 0 {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Err(err) = self.port.write_all(bytes) {
            eprintln!("serial write failed: {}", err);
        }
    }

    fn connection_state(&self) -> Link {
        Link::Connected
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args();
    args.next(); // skip program name
    let port_name = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    // The RS-HFIQ talks 57600 8N1.
    let port = serialport::new(&port_name, 57_600)
        .timeout(Duration::from_millis(100))
        .open()
        .with_context(|| format!("failed to open {}", port_name))?;

    let link = SerialLink { port };
    let mut cat = Dispatcher::new(link, freq(7_074_000), Wait::Timeout(Duration::from_millis(500)));

    println!("Connected to {}. Enter commands like FA7074000, F?, X1, SW0.", port_name);
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        let mut wire = Vec::with_capacity(trimmed.len() + 2);
        if !trimmed.starts_with('*') {
            wire.push(b'*');
        }
        wire.extend_from_slice(trimmed.as_bytes());
        wire.push(b'\r');

        for &byte in &wire {
            if let Some(outcome) = cat.feed(byte) {
                match outcome {
                    Ok(DispatchOutcome::FrequencySet { vfo, freq, band }) => {
                        println!("{:?} = {} ({})", vfo, freq, band)
                    }
                    Ok(DispatchOutcome::LocalReply(reply))
                    | Ok(DispatchOutcome::DeviceReply(reply)) => {
                        println!("{}", reply.as_str())
                    }
                    Ok(DispatchOutcome::FlagChanged { flag, value }) => {
                        println!("{:?} = {}", flag, value)
                    }
                    Ok(DispatchOutcome::Forwarded) => println!("(sent)"),
                    Ok(DispatchOutcome::NoReply) => println!("(no reply)"),
                    Err(err) => println!("error: {}", err),
                }
            }
        }
        print!("> ");
        std::io::stdout().flush()?;
    }
    Ok(())
}
