//! Sourcetable retrieval (spec.md §4.H) and parsing (spec.md §4.K).

use std::io::{Read, Write};

use crate::error::{NtripError, Result};
use crate::geo::haversine_km;

use super::{build_request, connect, RECV_TIMEOUT};

/// One `STR;` record from a sourcetable body, keyed by mountpoint name
/// per spec.md §3's "Sourcetable entry".
#[derive(Debug, Clone, PartialEq)]
pub struct SourcetableEntry {
    pub mountpoint: String,
    pub identifier: String,
    pub format: String,
    pub format_details: String,
    pub carrier: String,
    pub nav_system: String,
    pub network: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance from the rover, kilometres to one decimal;
    /// `None` when either endpoint is the coordinate origin.
    pub distance_km: Option<f64>,
}

const MIN_FIELDS: usize = 11;

fn parse_str_line(line: &str, rover: Option<(f64, f64)>) -> Option<SourcetableEntry> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() < MIN_FIELDS || fields[0] != "STR" {
        return None;
    }
    let latitude: f64 = fields[9].trim().parse().unwrap_or(0.0);
    let longitude: f64 = fields[10].trim().parse().unwrap_or(0.0);

    let distance_km = match rover {
        Some((rlat, rlon)) if (rlat, rlon) != (0.0, 0.0) && (latitude, longitude) != (0.0, 0.0) => {
            let d = haversine_km(rlat, rlon, latitude, longitude);
            Some((d * 10.0).round() / 10.0)
        }
        _ => None,
    };

    Some(SourcetableEntry {
        mountpoint: fields[1].to_string(),
        identifier: fields[2].to_string(),
        format: fields[3].to_string(),
        format_details: fields[4].to_string(),
        carrier: fields[5].to_string(),
        nav_system: fields[6].to_string(),
        network: fields[7].to_string(),
        country: fields[8].to_string(),
        latitude,
        longitude,
        distance_km,
    })
}

/// Splits `body` on CR and LF, keeping only well-formed `STR;` records.
pub fn parse_sourcetable(body: &str, rover: Option<(f64, f64)>) -> Vec<SourcetableEntry> {
    body.split(['\r', '\n'])
        .filter(|line| line.starts_with("STR;"))
        .filter_map(|line| parse_str_line(line, rover))
        .collect()
}

/// Requests the sourcetable (path `/`) and accumulates the response
/// body, doubling the read buffer, until `ENDSOURCETABLE` appears or
/// the caster closes the connection.
pub fn fetch_sourcetable(host: &str, port: u16) -> Result<String> {
    let mut stream = connect(host, port)?;
    stream.set_read_timeout(Some(RECV_TIMEOUT)).map_err(NtripError::RecvError)?;

    let request = build_request(host, "/", None);
    stream.write_all(request.as_bytes()).map_err(NtripError::SendFailed)?;

    let mut body = Vec::with_capacity(4096);
    let mut chunk = vec![0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                body.extend_from_slice(&chunk[..n]);
                if String::from_utf8_lossy(&body).contains("ENDSOURCETABLE") {
                    break;
                }
                if chunk.len() < body.len() {
                    chunk = vec![0u8; chunk.len() * 2];
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => return Err(NtripError::RecvError(e)),
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
