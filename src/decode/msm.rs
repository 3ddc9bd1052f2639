//! MSM4 (1074/1084/1094/1124) and MSM7 (1077/1087/1097/1117/1127/1137)
//! multi-signal-message observation decoders. Both share one header
//! layout and a satellite-by-signal cell mask; MSM7 additionally
//! carries a per-satellite extended-info block.

use crate::bitreader::{bits, signed_bits};
use crate::constants::msm::*;
use crate::sink::DecodedSink;

use super::too_short;

const STATION_BITS: usize = 12;
const EPOCH_BITS: usize = 30;
const MM_BITS: usize = 1;
const IODS_BITS: usize = 3;
const RESERVED_BITS: usize = 7;
const CLOCK_STEERING_BITS: usize = 2;
const EXT_CLOCK_BITS: usize = 2;
const DIV_FREE_BITS: usize = 1;
const SMOOTHING_INTERVAL_BITS: usize = 3;
const SAT_MASK_BITS: usize = 64;
const SIG_MASK_BITS: usize = 32;

const TYPE_BITS: usize = 12;
const SAT_MASK_OFFSET: usize = TYPE_BITS
    + STATION_BITS
    + EPOCH_BITS
    + MM_BITS
    + IODS_BITS
    + RESERVED_BITS
    + CLOCK_STEERING_BITS
    + EXT_CLOCK_BITS
    + DIV_FREE_BITS
    + SMOOTHING_INTERVAL_BITS;
const SIG_MASK_OFFSET: usize = SAT_MASK_OFFSET + SAT_MASK_BITS;
const CELL_MASK_OFFSET: usize = SIG_MASK_OFFSET + SIG_MASK_BITS;

struct MsmHeader {
    station_id: u64,
    epoch: u64,
    multiple_message: u64,
    iods: u64,
    clock_steering: u64,
    ext_clock: u64,
    divergence_free_smoothing: u64,
    smoothing_interval: u64,
    satellites: Vec<u8>,
    signals: Vec<u8>,
}

/// Extracts just the 64-bit satellite mask, for callers (the stat
/// aggregator) that only care which satellites were observed and don't
/// need the full text decode.
pub fn satellite_mask(payload: &[u8]) -> Option<u64> {
    if payload.len() * 8 < SIG_MASK_OFFSET {
        return None;
    }
    Some(bits(payload, SAT_MASK_OFFSET, SAT_MASK_BITS))
}

fn decode_header(payload: &[u8]) -> Option<MsmHeader> {
    if payload.len() * 8 < CELL_MASK_OFFSET {
        return None;
    }
    let station_id = bits(payload, TYPE_BITS, STATION_BITS);
    let epoch = bits(payload, TYPE_BITS + STATION_BITS, EPOCH_BITS);
    let mut pos = TYPE_BITS + STATION_BITS + EPOCH_BITS;
    let multiple_message = bits(payload, pos, MM_BITS);
    pos += MM_BITS;
    let iods = bits(payload, pos, IODS_BITS);
    pos += IODS_BITS + RESERVED_BITS;
    let clock_steering = bits(payload, pos, CLOCK_STEERING_BITS);
    pos += CLOCK_STEERING_BITS;
    let ext_clock = bits(payload, pos, EXT_CLOCK_BITS);
    pos += EXT_CLOCK_BITS;
    let divergence_free_smoothing = bits(payload, pos, DIV_FREE_BITS);
    pos += DIV_FREE_BITS;
    let smoothing_interval = bits(payload, pos, SMOOTHING_INTERVAL_BITS);

    let sat_mask = bits(payload, SAT_MASK_OFFSET, SAT_MASK_BITS);
    let sig_mask = bits(payload, SIG_MASK_OFFSET, SIG_MASK_BITS);

    let satellites: Vec<u8> = (0..64u8)
        .filter(|&i| sat_mask & (1u64 << (63 - i)) != 0)
        .map(|i| i + 1)
        .collect();
    let signals: Vec<u8> = (0..32u8)
        .filter(|&i| sig_mask & (1u32 << (31 - i)) != 0)
        .map(|i| i + 1)
        .collect();

    Some(MsmHeader {
        station_id,
        epoch,
        multiple_message,
        iods,
        clock_steering,
        ext_clock,
        divergence_free_smoothing,
        smoothing_interval,
        satellites,
        signals,
    })
}

fn write_header_line(message_type: u16, header: &MsmHeader, sink: &mut dyn DecodedSink) {
    sink.write_line(&format!(
        "type {}: station {} epoch {} multiple-message {} iods {} clock-steering {} ext-clock {} div-free-smoothing {} smoothing-interval {}",
        message_type,
        header.station_id,
        header.epoch,
        header.multiple_message,
        header.iods,
        header.clock_steering,
        header.ext_clock,
        header.divergence_free_smoothing,
        header.smoothing_interval
    ));
    sink.write_line(&format!(
        "  satellites {} ({:?}) signals {} ({:?})",
        header.satellites.len(),
        header.satellites,
        header.signals.len(),
        header.signals
    ));
}

pub fn decode_msm4(message_type: u16, payload: &[u8], sink: &mut dyn DecodedSink) {
    let Some(header) = decode_header(payload) else {
        too_short(sink, message_type, CELL_MASK_OFFSET, payload.len() * 8);
        return;
    };
    let s = header.satellites.len();
    let g = header.signals.len();
    let cell_count = s * g;
    if payload.len() * 8 < CELL_MASK_OFFSET + cell_count {
        too_short(sink, message_type, CELL_MASK_OFFSET + cell_count, payload.len() * 8);
        return;
    }
    let cell_mask: Vec<bool> = (0..cell_count)
        .map(|i| bits(payload, CELL_MASK_OFFSET + i, 1) != 0)
        .collect();
    let active_cells = cell_mask.iter().filter(|&&b| b).count();

    write_header_line(message_type, &header, sink);
    sink.write_line(&format!("  cell mask: {} of {} cells active", active_cells, cell_count));

    let is_1124_extended = message_type == 1124;
    let phase_bits = if is_1124_extended { 24 } else { 22 };
    let pseudorange_scale = if is_1124_extended {
        MSM4_PSEUDORANGE_FINE_SCALE_QZSS_1124
    } else {
        MSM4_PSEUDORANGE_FINE_SCALE
    };
    let cell_bits = 15 + phase_bits + 4 + 1 + 6;

    let mut pos = CELL_MASK_OFFSET + cell_count;
    for (idx, &active) in cell_mask.iter().enumerate() {
        if !active {
            continue;
        }
        if payload.len() * 8 < pos + cell_bits {
            too_short(sink, message_type, pos + cell_bits, payload.len() * 8);
            return;
        }
        let fine_pseudorange = signed_bits(payload, pos, 15) as f64 * pseudorange_scale;
        let fine_phase_range = signed_bits(payload, pos + 15, phase_bits) as f64 * MSM4_PHASERANGE_FINE_SCALE;
        let lock_time = bits(payload, pos + 15 + phase_bits, 4);
        let half_cycle = bits(payload, pos + 15 + phase_bits + 4, 1);
        let cnr = bits(payload, pos + 15 + phase_bits + 5, 6);

        let sat = header.satellites[idx / g];
        let sig = header.signals[idx % g];
        sink.write_line(&format!(
            "  cell sat={} sig={}: pseudorange {:.3} m phase {:.4} m lock {} half-cycle {} cnr {}",
            sat, sig, fine_pseudorange, fine_phase_range, lock_time, half_cycle, cnr
        ));
        pos += cell_bits;
    }
}

pub fn decode_msm7(message_type: u16, payload: &[u8], sink: &mut dyn DecodedSink) {
    let Some(header) = decode_header(payload) else {
        too_short(sink, message_type, CELL_MASK_OFFSET, payload.len() * 8);
        return;
    };
    let s = header.satellites.len();
    let g = header.signals.len();
    let cell_count = s * g;
    if payload.len() * 8 < CELL_MASK_OFFSET + cell_count {
        too_short(sink, message_type, CELL_MASK_OFFSET + cell_count, payload.len() * 8);
        return;
    }
    let cell_mask: Vec<bool> = (0..cell_count)
        .map(|i| bits(payload, CELL_MASK_OFFSET + i, 1) != 0)
        .collect();
    let active_cells = cell_mask.iter().filter(|&&b| b).count();

    write_header_line(message_type, &header, sink);
    sink.write_line(&format!("  cell mask: {} of {} cells active", active_cells, cell_count));

    const SAT_INFO_BITS: usize = 8 + 4 + 10 + 14;
    let mut pos = CELL_MASK_OFFSET + cell_count;
    if payload.len() * 8 < pos + s * SAT_INFO_BITS {
        too_short(sink, message_type, pos + s * SAT_INFO_BITS, payload.len() * 8);
        return;
    }
    for &sat in &header.satellites {
        let rough_range = bits(payload, pos, 8);
        let ext_info = bits(payload, pos + 8, 4);
        let rough_range_mod = bits(payload, pos + 12, 10) as f64 * ROUGH_RANGE_MODULO_SCALE;
        let rough_phase_rate = signed_bits(payload, pos + 22, 14) as f64 * MSM7_ROUGH_PHASERANGE_RATE_SCALE;
        sink.write_line(&format!(
            "  sat {} extended: rough-range {} ext-info {} rough-range-mod {:.6} ms rough-phase-rate {:.4} m/s",
            sat, rough_range, ext_info, rough_range_mod, rough_phase_rate
        ));
        pos += SAT_INFO_BITS;
    }

    const CELL_BITS: usize = 20 + 24 + 10 + 1 + 10 + 15;
    for (idx, &active) in cell_mask.iter().enumerate() {
        if !active {
            continue;
        }
        if payload.len() * 8 < pos + CELL_BITS {
            too_short(sink, message_type, pos + CELL_BITS, payload.len() * 8);
            return;
        }
        let fine_pseudorange = signed_bits(payload, pos, 20) as f64 * MSM7_PSEUDORANGE_FINE_SCALE;
        let fine_phase_range = signed_bits(payload, pos + 20, 24) as f64 * MSM7_PHASERANGE_FINE_SCALE;
        let lock_time = bits(payload, pos + 44, 10);
        let half_cycle = bits(payload, pos + 54, 1);
        let cnr = bits(payload, pos + 55, 10) as f64 * MSM7_CNR_SCALE;
        let fine_phase_rate = signed_bits(payload, pos + 65, 15) as f64 * MSM7_PHASERANGE_RATE_FINE_SCALE;

        let sat = header.satellites[idx / g];
        let sig = header.signals[idx % g];
        sink.write_line(&format!(
            "  cell sat={} sig={}: pseudorange {:.9} ms phase {:.9} ms lock {} half-cycle {} cnr {:.4} dB-Hz phase-rate {:.4} m/s",
            sat, sig, fine_pseudorange, fine_phase_range, lock_time, half_cycle, cnr, fine_phase_rate
        ));
        pos += CELL_BITS;
    }
}
