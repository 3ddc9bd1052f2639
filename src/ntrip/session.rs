//! NTRIP streaming session state machine (spec.md §4.G), run on a
//! dedicated worker thread that owns the socket end to end.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::decode::{self, RoverPosition};
use crate::detect::{self, DetectedFormat, FormatHint};
use crate::error::{NtripError, Result};
use crate::events::{Event, EventBus, SharedState};
use crate::frame::Framer;
use crate::gga::build_gga;
use crate::ntrip::sourcetable;
use crate::sink::DecodedSink;
use crate::stats::StatsTable;

use super::{build_request, connect, SessionConfig, RECV_TIMEOUT};

/// How long one streaming session runs before the worker exits on its
/// own, and what it reports when that bound elapses (spec.md §6 `-t`
/// and `-s` name distinct summary tables).
#[derive(Debug, Clone, Copy)]
pub enum SessionMode {
    Streaming,
    /// Bounded `-t` run: reports the per-message-type statistic table.
    AnalysisTypes(Duration),
    /// Bounded `-s` run: reports the per-GNSS satellite visibility table.
    AnalysisSatellites(Duration),
}

impl SessionMode {
    fn bound(self) -> Option<Duration> {
        match self {
            SessionMode::Streaming => None,
            SessionMode::AnalysisTypes(d) | SessionMode::AnalysisSatellites(d) => Some(d),
        }
    }
}

fn read_handshake_response(stream: &mut TcpStream) -> Result<String> {
    let mut buf = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Err(NtripError::ServerClosed),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if find_subslice(&buf, b"\r\n\r\n").is_some() {
                    return Ok(String::from_utf8_lossy(&buf).into_owned());
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => return Err(NtripError::RecvError(e)),
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn handshake_accepted(response: &str) -> bool {
    response.contains("200") || response.contains("ICY")
}

/// Looks up `mountpoint`'s sourcetable row (if the caster will give us
/// one) so the stream detector can use its declared `Format`/`Details`
/// as a hint (spec.md §4.D rules 1-4) instead of relying solely on the
/// byte-pattern fallback. Failure here is not fatal to the session.
fn lookup_format_hint(host: &str, port: u16, mountpoint: &str) -> Option<(String, String)> {
    let body = sourcetable::fetch_sourcetable(host, port).ok()?;
    let entries = sourcetable::parse_sourcetable(&body, None);
    entries
        .into_iter()
        .find(|e| e.mountpoint == mountpoint)
        .map(|e| (e.format, e.format_details))
}

/// Runs one NTRIP streaming session to completion: resolve, connect,
/// handshake, stream until cancelled (or, in an `Analysis` mode, until
/// the bound elapses), then close. Every event and atomic update goes
/// through `bus`; the caller drains the paired `EventSink`. Frames whose
/// type is excluded by `type_filter` (spec.md §6 `-d TYPES`) are emitted
/// as a bare integer line instead of being fully decoded; `None` means
/// decode everything.
pub fn run(
    config: SessionConfig,
    mode: SessionMode,
    type_filter: Option<Vec<u16>>,
    shared: Arc<SharedState>,
    bus: EventBus,
    sink: &mut dyn DecodedSink,
) {
    bus.post(Event::StreamInfo(format!(
        "resolving {}:{}",
        config.caster_host, config.caster_port
    )));

    let mut stream = match connect(&config.caster_host, config.caster_port) {
        Ok(s) => s,
        Err(e) => {
            bus.post(Event::StreamDone { reason: e.to_string() });
            return;
        }
    };
    if let Err(e) = stream.set_read_timeout(Some(RECV_TIMEOUT)) {
        bus.post(Event::StreamDone { reason: e.to_string() });
        return;
    }

    bus.post(Event::StreamInfo("handshaking".to_string()));
    let auth = config.basic_auth();
    let path = format!("/{}", config.mountpoint);
    let request = build_request(&config.caster_host, &path, Some(&auth));
    if let Err(e) = stream.write_all(request.as_bytes()) {
        bus.post(Event::MountResult { success: false, detail: e.to_string() });
        bus.post(Event::StreamDone { reason: "send failed".to_string() });
        return;
    }

    let response = match read_handshake_response(&mut stream) {
        Ok(r) => r,
        Err(e) => {
            bus.post(Event::MountResult { success: false, detail: e.to_string() });
            bus.post(Event::StreamDone { reason: e.to_string() });
            return;
        }
    };
    if !handshake_accepted(&response) {
        bus.post(Event::MountResult { success: false, detail: response.clone() });
        bus.post(Event::StreamDone {
            reason: format!("handshake rejected: {}", response),
        });
        return;
    }
    bus.post(Event::MountResult { success: true, detail: "streaming".to_string() });
    bus.post(Event::StreamInfo("streaming".to_string()));

    let hint_owned = lookup_format_hint(&config.caster_host, config.caster_port, &config.mountpoint);
    let hint = match &hint_owned {
        Some((format, details)) => FormatHint { format: Some(format.as_str()), details: Some(details.as_str()) },
        None => FormatHint::default(),
    };

    stream_loop(stream, &config, mode, type_filter.as_deref(), &hint, &shared, &bus, sink);
}

#[allow(clippy::too_many_arguments)]
fn stream_loop(
    mut stream: TcpStream,
    config: &SessionConfig,
    mode: SessionMode,
    type_filter: Option<&[u16]>,
    hint: &FormatHint,
    shared: &Arc<SharedState>,
    bus: &EventBus,
    sink: &mut dyn DecodedSink,
) {
    let mut framer = Framer::new();
    let mut stats = StatsTable::new();
    let mut first_data_check = true;
    let mut chunk = [0u8; 4096];
    let started = Instant::now();
    let mut last_gga = Instant::now() - Duration::from_secs(1);
    let mut bound_elapsed = false;

    let rover = if config.rover_lat_deg != 0.0 || config.rover_lon_deg != 0.0 {
        Some(RoverPosition { lat_deg: config.rover_lat_deg, lon_deg: config.rover_lon_deg })
    } else {
        None
    };

    loop {
        if shared.is_cancelled() {
            break;
        }
        if let Some(bound) = mode.bound() {
            if started.elapsed() >= bound {
                bound_elapsed = true;
                break;
            }
        }

        if last_gga.elapsed() >= Duration::from_secs(1) {
            use chrono::Timelike;
            let now = chrono::Utc::now();
            let sentence = build_gga(
                config.rover_lat_deg,
                config.rover_lon_deg,
                now.hour(),
                now.minute(),
                now.second() as f64,
            );
            if let Err(e) = stream.write_all(sentence.as_bytes()) {
                bus.post(Event::StreamDone { reason: format!("GGA send failed: {}", e) });
                return;
            }
            last_gga = Instant::now();
        }

        match stream.read(&mut chunk) {
            Ok(0) => {
                bus.post(Event::StreamDone { reason: "server closed".to_string() });
                return;
            }
            Ok(n) => {
                shared.add_bytes(n as u64);

                if !shared.format_confirmed() {
                    let detected = detect::detect(hint, &chunk[..n], &mut first_data_check);
                    if detected != DetectedFormat::None {
                        shared.set_format(detected);
                    }
                }

                if shared.format().decoding_active() || shared.format() == DetectedFormat::None {
                    let frames = framer.feed(&chunk[..n]);
                    for frame in frames {
                        if !shared.format_confirmed() {
                            shared.set_format(DetectedFormat::Rtcm3);
                            shared.confirm_format();
                            bus.post(Event::StreamInfo("format confirmed: RTCM3".to_string()));
                        }
                        let message_type = frame.message_type();
                        let now = Instant::now();
                        let type_stats = stats.record(message_type, now);
                        bus.post(Event::StatUpdate { message_type, stats: type_stats });

                        if let Some(mask) = decode::msm::satellite_mask(frame.payload()) {
                            stats.record_satellites(message_type, mask);
                            if let Some(gnss) = crate::stats::GnssId::from_message_type(message_type) {
                                if let Some(set) = stats.satellites(gnss) {
                                    bus.post(Event::SatUpdate { gnss, set: *set });
                                }
                            }
                        }

                        let decode_fully = match type_filter {
                            Some(types) => types.contains(&message_type),
                            None => true,
                        };
                        if decode_fully {
                            decode::dispatch(message_type, frame.payload(), sink, rover);
                        } else {
                            sink.write_line(&message_type.to_string());
                        }
                        bus.post(Event::MsgRaw { message_type, bytes: frame.bytes().to_vec() });
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => {
                bus.post(Event::StreamDone { reason: format!("recv error: {}", e) });
                return;
            }
        }
    }

    if bound_elapsed {
        bus.post(Event::AnalysisSummary {
            type_stats: stats.iter_types().map(|(&t, &s)| (t, s)).collect(),
            satellite_stats: stats.iter_gnss().map(|(&g, &s)| (g, s)).collect(),
        });
        bus.post(Event::StreamDone { reason: "analysis complete".to_string() });
    } else {
        bus.post(Event::StreamDone { reason: "cancelled".to_string() });
    }
}
