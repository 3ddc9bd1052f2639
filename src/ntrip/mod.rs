//! NTRIP transport: shared request-building and connection helpers used
//! by both the streaming session (§4.G) and the sourcetable retriever
//! (§4.H), plus their respective submodules.

pub mod session;
pub mod sourcetable;

use std::net::TcpStream;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{NtripError, Result};

/// Bounds every blocking `recv` so the worker can poll cancellation
/// between reads, per spec.md §5.
pub const RECV_TIMEOUT: Duration = Duration::from_millis(200);

/// Immutable session configuration, alive for the duration of one
/// connection (spec.md §3's "Session config").
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub caster_host: String,
    pub caster_port: u16,
    pub mountpoint: String,
    pub username: String,
    pub password: String,
    pub rover_lat_deg: f64,
    pub rover_lon_deg: f64,
}

impl SessionConfig {
    fn basic_auth(&self) -> String {
        BASE64.encode(format!("{}:{}", self.username, self.password))
    }
}

/// Builds the exact request bytes from spec.md §6: a sourcetable
/// request when `mountpoint` is `None` (omits `Ntrip-Version`), or a
/// mountpoint subscription otherwise.
fn build_request(host: &str, path: &str, auth_userpass: Option<&str>) -> String {
    let mut request = format!("GET {} HTTP/1.1\r\nHost: {}\r\n", path, host);
    if path != "/" {
        request.push_str("Ntrip-Version: Ntrip/2.0\r\n");
    }
    request.push_str("User-Agent: NTRIP CClient/1.0\r\n");
    if let Some(userpass) = auth_userpass {
        request.push_str(&format!("Authorization: Basic {}\r\n", userpass));
    }
    request.push_str("\r\n");
    request
}

fn connect(host: &str, port: u16) -> Result<TcpStream> {
    use std::net::ToSocketAddrs;
    let addr = format!("{}:{}", host, port);
    let mut addrs = addr
        .to_socket_addrs()
        .map_err(|e| NtripError::DnsFailed(format!("{}: {}", host, e)))?;
    let resolved = addrs
        .next()
        .ok_or_else(|| NtripError::DnsFailed(format!("{} resolved to no addresses", host)))?;
    TcpStream::connect(resolved).map_err(NtripError::ConnectFailed)
}
