//! The event bus: the single channel through which the session worker
//! thread (owns the socket, the framer, the decoders, the stats table)
//! communicates with whatever is consuming the session (the CLI's
//! stdout loop, or a future embedder), per spec.md §9's redirectable
//! event-bus redesign note.
//!
//! The worker is the sole producer; byte count, detected format and the
//! cancellation flag are additionally exposed as atomics so a consumer
//! can poll lightweight progress without waiting on a channel recv.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::detect::DetectedFormat;
use crate::stats::{GnssId, MessageTypeStats, SatelliteSet};

impl DetectedFormat {
    fn to_u8(self) -> u8 {
        match self {
            DetectedFormat::None => 0,
            DetectedFormat::Rtcm3 => 1,
            DetectedFormat::Ubx => 2,
            DetectedFormat::Sbf => 3,
            DetectedFormat::Rt27 => 4,
            DetectedFormat::Lb2 => 5,
            DetectedFormat::Unknown => 6,
        }
    }

    fn from_u8(v: u8) -> DetectedFormat {
        match v {
            1 => DetectedFormat::Rtcm3,
            2 => DetectedFormat::Ubx,
            3 => DetectedFormat::Sbf,
            4 => DetectedFormat::Rt27,
            5 => DetectedFormat::Lb2,
            6 => DetectedFormat::Unknown,
            _ => DetectedFormat::None,
        }
    }
}

/// One item posted to the event bus, per spec.md §4.G.
#[derive(Debug, Clone)]
pub enum Event {
    /// A human-readable line describing session/handshake progress
    /// (connecting, handshaking, mountpoint result, sourcetable summary).
    StreamInfo(String),
    /// Updated interarrival statistic for one RTCM message type.
    StatUpdate { message_type: u16, stats: MessageTypeStats },
    /// Updated satellite visibility for one GNSS constellation.
    SatUpdate { gnss: GnssId, set: SatelliteSet },
    /// A raw, successfully framed message, for consumers that want the
    /// bytes themselves (e.g. a `-s` save-to-file sink).
    MsgRaw { message_type: u16, bytes: Vec<u8> },
    /// The caster's HTTP response line/status to a mountpoint request.
    MountResult { success: bool, detail: String },
    /// Posted once, when a bounded `Analysis` session's time bound
    /// elapses: the accumulated per-type and per-GNSS tables, for the
    /// consumer to render as a final summary (spec.md §6 `-t`/`-s`).
    AnalysisSummary {
        type_stats: Vec<(u16, MessageTypeStats)>,
        satellite_stats: Vec<(GnssId, SatelliteSet)>,
    },
    /// The worker has exited (socket closed, or cancelled).
    StreamDone { reason: String },
}

/// Shared, lock-free session progress: total bytes received, the
/// currently detected format, whether detection has locked in after a
/// verified decode, and a cooperative cancellation flag.
pub struct SharedState {
    bytes_received: AtomicU64,
    detected_format: AtomicU8,
    format_confirmed: AtomicBool,
    cancelled: AtomicBool,
}

impl Default for SharedState {
    fn default() -> Self {
        SharedState {
            bytes_received: AtomicU64::new(0),
            detected_format: AtomicU8::new(DetectedFormat::None.to_u8()),
            format_confirmed: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }
}

impl SharedState {
    pub fn add_bytes(&self, n: u64) {
        self.bytes_received.fetch_add(n, Ordering::Relaxed);
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    pub fn set_format(&self, format: DetectedFormat) {
        self.detected_format.store(format.to_u8(), Ordering::Relaxed);
    }

    pub fn format(&self) -> DetectedFormat {
        DetectedFormat::from_u8(self.detected_format.load(Ordering::Relaxed))
    }

    /// Locks detection in; per spec.md §4.D rule 7, happens once, on the
    /// framer's first CRC-verified decode, and is never undone.
    pub fn confirm_format(&self) {
        self.format_confirmed.store(true, Ordering::Relaxed);
    }

    pub fn format_confirmed(&self) -> bool {
        self.format_confirmed.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// The producer half, held by the session worker thread.
pub struct EventBus {
    tx: Sender<Event>,
    shared: Arc<SharedState>,
}

/// The consumer half, held by whoever drains events (CLI main loop).
pub struct EventSink {
    rx: Receiver<Event>,
    shared: Arc<SharedState>,
}

/// Builds a connected producer/consumer pair sharing one `SharedState`.
pub fn channel() -> (EventBus, EventSink) {
    let (tx, rx) = mpsc::channel();
    let shared = Arc::new(SharedState::default());
    (
        EventBus { tx, shared: shared.clone() },
        EventSink { rx, shared },
    )
}

impl EventBus {
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Posts an event; the only failure mode is the consumer having
    /// dropped its `EventSink`, which we treat as "nobody is listening
    /// any more" rather than an error worth propagating.
    pub fn post(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl EventSink {
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Blocks for the next event, or returns `None` once the worker has
    /// dropped its `EventBus` and the channel is drained.
    pub fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    pub fn iter(&self) -> mpsc::Iter<'_, Event> {
        self.rx.iter()
    }
}
