//! Error taxonomy for the NTRIP session and its ambient I/O.
//!
//! Modeled on the teacher crate's hand-rolled `GpsdError`: a plain enum,
//! `From` conversions for the underlying I/O/JSON errors, and a manual
//! `Display` impl instead of pulling in a derive-macro error crate.

use std::fmt;
use std::io;

/// Failure classes reported by a session, per spec.md §7.
#[derive(Debug)]
pub enum NtripError {
    /// Config file missing, unreadable, or failed JSON parsing/validation.
    ConfigInvalid(String),
    /// DNS resolution of the caster host failed.
    DnsFailed(String),
    /// The local socket could not be created.
    SocketCreateFailed(io::Error),
    /// TCP connect to the resolved endpoint failed.
    ConnectFailed(io::Error),
    /// The caster replied to the handshake with neither `200` nor `ICY`.
    HandshakeRejected(String),
    /// A `send` call failed (request, or periodic GGA uplink).
    SendFailed(io::Error),
    /// A `recv` call failed for a reason other than a timeout.
    RecvError(io::Error),
    /// The caster closed the connection in an orderly fashion.
    ServerClosed,
    /// The session was cancelled by the consumer.
    Cancelled,
    /// Catch-all I/O error outside the session state machine (e.g. writing
    /// a template config file).
    Io(io::Error),
    /// Catch-all JSON error outside the session state machine.
    Json(serde_json::Error),
}

impl fmt::Display for NtripError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NtripError::ConfigInvalid(e) => write!(f, "invalid configuration: {}", e),
            NtripError::DnsFailed(host) => write!(f, "DNS resolution failed for {}", host),
            NtripError::SocketCreateFailed(e) => write!(f, "socket creation failed: {}", e),
            NtripError::ConnectFailed(e) => write!(f, "connect failed: {}", e),
            NtripError::HandshakeRejected(body) => {
                write!(f, "caster rejected handshake: {}", body)
            }
            NtripError::SendFailed(e) => write!(f, "send failed: {}", e),
            NtripError::RecvError(e) => write!(f, "recv error: {}", e),
            NtripError::ServerClosed => write!(f, "caster closed the connection"),
            NtripError::Cancelled => write!(f, "session cancelled"),
            NtripError::Io(e) => write!(f, "io error: {}", e),
            NtripError::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for NtripError {}

impl From<io::Error> for NtripError {
    fn from(err: io::Error) -> NtripError {
        NtripError::Io(err)
    }
}

impl From<serde_json::Error> for NtripError {
    fn from(err: serde_json::Error) -> NtripError {
        NtripError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, NtripError>;
