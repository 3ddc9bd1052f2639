//! Per-message-type interarrival statistics and per-GNSS satellite
//! visibility, owned exclusively by the session worker (spec.md §4.F,
//! §5).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// GNSS constellation identifier, derived from the RTCM message-type
/// range (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GnssId {
    Gps,
    Glonass,
    Galileo,
    Qzss,
    BeiDou,
    Sbas,
}

impl GnssId {
    /// Maps an RTCM message type to the GNSS it belongs to, per the
    /// ranges in spec.md §3. Returns `None` for types outside every MSM
    /// range (no satellite update is produced for those).
    pub fn from_message_type(message_type: u16) -> Option<GnssId> {
        match message_type {
            1070..=1079 => Some(GnssId::Gps),
            1080..=1089 => Some(GnssId::Glonass),
            1090..=1099 => Some(GnssId::Galileo),
            1110..=1119 => Some(GnssId::Qzss),
            1120..=1129 => Some(GnssId::BeiDou),
            1130..=1139 => Some(GnssId::Sbas),
            _ => None,
        }
    }
}

/// Per-type interarrival statistic (spec.md §3 "Message-type statistic").
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTypeStats {
    pub seen: bool,
    pub count: u64,
    last_seen: Option<Instant>,
    pub sum_dt: Duration,
    pub min_dt: Duration,
    pub max_dt: Duration,
}

impl MessageTypeStats {
    /// Average interarrival time; only meaningful once `count >= 2`.
    pub fn avg_dt(&self) -> Duration {
        if self.count < 2 {
            return Duration::ZERO;
        }
        self.sum_dt / (self.count as u32 - 1)
    }

    fn observe(&mut self, now: Instant) {
        if !self.seen {
            self.seen = true;
            self.count = 1;
            self.last_seen = Some(now);
            self.sum_dt = Duration::ZERO;
            self.min_dt = Duration::ZERO;
            self.max_dt = Duration::ZERO;
            return;
        }
        let dt = now.saturating_duration_since(self.last_seen.unwrap_or(now));
        self.last_seen = Some(now);
        self.count += 1;
        self.sum_dt += dt;
        self.min_dt = if self.min_dt == Duration::ZERO || dt < self.min_dt {
            dt
        } else {
            self.min_dt
        };
        self.max_dt = self.max_dt.max(dt);
    }
}

/// A satellite visibility set for one GNSS: a 64-bit bitset indexed by
/// PRN/slot plus a cached popcount (spec.md §9's "fixed-capacity
/// small-map" redesign note).
#[derive(Debug, Clone, Copy, Default)]
pub struct SatelliteSet {
    mask: u64,
    count: u32,
}

impl SatelliteSet {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_set(&self, prn: u8) -> bool {
        prn < 64 && (self.mask & (1u64 << prn)) != 0
    }

    /// Sets bit `prn`; idempotent (feeding the same satellite twice
    /// leaves the set and count unchanged).
    fn set(&mut self, prn: u8) {
        if prn >= 64 {
            return;
        }
        let bit = 1u64 << prn;
        if self.mask & bit == 0 {
            self.mask |= bit;
            self.count += 1;
        }
    }
}

/// Owns every per-type statistic row and per-GNSS satellite set for one
/// session. The worker thread is the sole writer; `.snapshot()` produces
/// an owned copy to post on the event bus.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    by_type: BTreeMap<u16, MessageTypeStats>,
    by_gnss: BTreeMap<GnssId, SatelliteSet>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successfully framed message of `message_type` at `now`,
    /// per spec.md §4.F.
    pub fn record(&mut self, message_type: u16, now: Instant) -> MessageTypeStats {
        let entry = self.by_type.entry(message_type).or_default();
        entry.observe(now);
        *entry
    }

    /// Feeds an MSM 64-bit satellite mask (MSB-first, bit 0 = satellite
    /// 1) into the per-GNSS set for `message_type`'s constellation, if
    /// the type falls in an MSM range.
    pub fn record_satellites(&mut self, message_type: u16, sat_mask: u64) {
        let Some(gnss) = GnssId::from_message_type(message_type) else {
            return;
        };
        let set = self.by_gnss.entry(gnss).or_default();
        for bit_index in 0..64u8 {
            // MSB-first: bit 0 of the mask corresponds to satellite 1.
            if sat_mask & (1u64 << (63 - bit_index)) != 0 {
                set.set(bit_index + 1);
            }
        }
    }

    pub fn get(&self, message_type: u16) -> Option<&MessageTypeStats> {
        self.by_type.get(&message_type)
    }

    pub fn satellites(&self, gnss: GnssId) -> Option<&SatelliteSet> {
        self.by_gnss.get(&gnss)
    }

    pub fn iter_types(&self) -> impl Iterator<Item = (&u16, &MessageTypeStats)> {
        self.by_type.iter()
    }

    pub fn iter_gnss(&self) -> impl Iterator<Item = (&GnssId, &SatelliteSet)> {
        self.by_gnss.iter()
    }
}
