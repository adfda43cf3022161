//! Best-effort discovery of the host address stamped onto records.

use std::io;
use std::net::UdpSocket;
use std::sync::OnceLock;

/// Fallback when no routable local address can be determined.
const LOOPBACK: &str = "127.0.0.1";

static ORIGIN_HOST: OnceLock<String> = OnceLock::new();

/// The local IPv4 address records carry as their origin.
///
/// Resolved once per process and cached; record creation after the first
/// call pays only an atomic load. Falls back to the loopback literal when
/// discovery fails, so offline and sandboxed hosts still get a value.
pub fn origin_host() -> &'static str {
    ORIGIN_HOST.get_or_init(|| match discover() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::warn!(error = %err, "origin host discovery failed, using loopback");
            LOOPBACK.to_string()
        }
    })
}

/// Asks the OS which local address would route to a public destination.
/// Connecting a UDP socket sends no packets; it only fixes the local half
/// of the pair.
fn discover() -> io::Result<String> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(("8.8.8.8", 80))?;
    Ok(socket.local_addr()?.ip().to_string())
}
