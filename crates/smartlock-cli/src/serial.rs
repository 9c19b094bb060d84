//! Serial port bridge.
//!
//! `serialport` is blocking, so two threads shuttle bytes between the port
//! and one end of an in-memory duplex; the node gets the other end as an
//! ordinary async stream.

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use smartlock_protocol::LinkConfig;

/// How long a port read blocks before the reader thread checks in again.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

const BRIDGE_BUFFER: usize = 64;

/// Open `port_name` as 8N1 at the configured baud rate and bridge it to an
/// async stream.
///
/// Must be called from within a tokio runtime.
pub fn open(port_name: &str, config: &LinkConfig) -> Result<DuplexStream> {
    let port = serialport::new(port_name, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("failed to open serial port {port_name}"))?;
    let reader = port
        .try_clone()
        .with_context(|| format!("failed to clone serial port {port_name}"))?;
    info!(port = port_name, baud = config.baud_rate, "serial port open");

    let (node_end, bridge_end) = tokio::io::duplex(BRIDGE_BUFFER);
    let (from_node, to_node) = tokio::io::split(bridge_end);
    let runtime = Handle::current();

    let inbound = runtime.clone();
    thread::Builder::new()
        .name("serial-rx".to_string())
        .spawn(move || port_to_node(reader, &inbound, to_node))
        .context("failed to start serial reader")?;
    thread::Builder::new()
        .name("serial-tx".to_string())
        .spawn(move || node_to_port(port, &runtime, from_node))
        .context("failed to start serial writer")?;

    Ok(node_end)
}

fn port_to_node(
    mut port: Box<dyn SerialPort>,
    runtime: &Handle,
    mut to_node: WriteHalf<DuplexStream>,
) {
    let mut buf = [0u8; BRIDGE_BUFFER];
    loop {
        match port.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                debug!(bytes = n, "serial rx");
                if runtime.block_on(to_node.write_all(&buf[..n])).is_err() {
                    // Node side is gone.
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => {
                warn!(error = %e, "serial read failed, closing link");
                let _ = runtime.block_on(to_node.shutdown());
                return;
            }
        }
    }
}

fn node_to_port(
    mut port: Box<dyn SerialPort>,
    runtime: &Handle,
    mut from_node: ReadHalf<DuplexStream>,
) {
    let mut buf = [0u8; BRIDGE_BUFFER];
    loop {
        let n = match runtime.block_on(from_node.read(&mut buf)) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        if let Err(e) = port.write_all(&buf[..n]).and_then(|()| port.flush()) {
            warn!(error = %e, "serial write failed");
            return;
        }
        debug!(bytes = n, "serial tx");
    }
}
