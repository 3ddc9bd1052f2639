//! 1005/1006 — stationary antenna reference point.

use crate::bitreader::{bits, signed_bits};
use crate::constants::{ANTENNA_HEIGHT_SCALE, ARP_POSITION_SCALE};
use crate::geo::{ecef_to_geodetic, haversine_km, initial_bearing_deg};
use crate::sink::DecodedSink;

use super::{too_short, RoverPosition};

const HEADER_BITS_1005: usize = 154;
const HEADER_BITS_1006: usize = 170;

fn decode_common(payload: &[u8], sink: &mut dyn DecodedSink, message_type: u16, rover: Option<RoverPosition>) -> Option<f64> {
    let need_bits = if message_type == 1006 { HEADER_BITS_1006 } else { HEADER_BITS_1005 };
    if payload.len() * 8 < need_bits {
        too_short(sink, message_type, need_bits, payload.len() * 8);
        return None;
    }

    let station_id = bits(payload, 12, 12);
    let itrf_year = bits(payload, 24, 6);
    let gps_ind = bits(payload, 30, 1);
    let glonass_ind = bits(payload, 31, 1);
    let galileo_ind = bits(payload, 32, 1);
    let reference_ind = bits(payload, 33, 1);
    let ecef_x = signed_bits(payload, 34, 38) as f64 * ARP_POSITION_SCALE;
    let ecef_y = signed_bits(payload, 74, 38) as f64 * ARP_POSITION_SCALE;
    let ecef_z = signed_bits(payload, 114, 38) as f64 * ARP_POSITION_SCALE;

    let pos = ecef_to_geodetic(ecef_x, ecef_y, ecef_z);

    sink.write_line(&format!(
        "type {}: station {} itrf-year {} gps={} glonass={} galileo={} ref-station={}",
        message_type, station_id, itrf_year, gps_ind, glonass_ind, galileo_ind, reference_ind
    ));
    sink.write_line(&format!(
        "  ecef x={:.4} y={:.4} z={:.4} m -> lat {:.7} lon {:.7} alt {:.3} m",
        ecef_x, ecef_y, ecef_z, pos.lat_deg, pos.lon_deg, pos.alt_m
    ));

    if let Some(r) = rover {
        let dist = haversine_km(r.lat_deg, r.lon_deg, pos.lat_deg, pos.lon_deg);
        let bearing = initial_bearing_deg(r.lat_deg, r.lon_deg, pos.lat_deg, pos.lon_deg);
        sink.write_line(&format!("  distance {:.1} km bearing {:.1} deg from rover", dist, bearing));
    }

    Some(pos.alt_m)
}

pub fn decode_1005(payload: &[u8], sink: &mut dyn DecodedSink, rover: Option<RoverPosition>) {
    decode_common(payload, sink, 1005, rover);
}

pub fn decode_1006(payload: &[u8], sink: &mut dyn DecodedSink, rover: Option<RoverPosition>) {
    if decode_common(payload, sink, 1006, rover).is_none() {
        return;
    }
    let height = bits(payload, 154, 16) as f64 * ANTENNA_HEIGHT_SCALE;
    sink.write_line(&format!("  antenna height {:.4} m", height));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn pack_header(station: u64, ecef_x: i64, ecef_y: i64, ecef_z: i64, antenna_height: Option<u64>) -> Vec<u8> {
        let mut bit_len = HEADER_BITS_1005;
        if antenna_height.is_some() {
            bit_len = HEADER_BITS_1006;
        }
        let mut buf = vec![0u8; (bit_len + 7) / 8];
        let mut write = |value: u64, start: usize, width: usize, buf: &mut Vec<u8>| {
            for i in 0..width {
                let bit = (value >> (width - 1 - i)) & 1;
                if bit != 0 {
                    let idx = start + i;
                    buf[idx / 8] |= 1 << (7 - (idx % 8));
                }
            }
        };
        write(1005, 0, 12, &mut buf);
        write(station, 12, 12, &mut buf);
        write(18, 24, 6, &mut buf); // itrf year
        write(1, 30, 1, &mut buf);
        write(1, 31, 1, &mut buf);
        write(0, 32, 1, &mut buf);
        write(0, 33, 1, &mut buf);
        write((ecef_x as u64) & ((1u64 << 38) - 1), 34, 38, &mut buf);
        write((ecef_y as u64) & ((1u64 << 38) - 1), 74, 38, &mut buf);
        write((ecef_z as u64) & ((1u64 << 38) - 1), 114, 38, &mut buf);
        if let Some(h) = antenna_height {
            write(h, 154, 16, &mut buf);
        }
        buf
    }

    #[test]
    fn decodes_1005_station_and_position() {
        // ECEF for roughly 52N, 5E, sea level, scaled by 0.0001 m/unit.
        let ecef_x = (3960000.0 / ARP_POSITION_SCALE) as i64;
        let ecef_y = (346000.0 / ARP_POSITION_SCALE) as i64;
        let ecef_z = (5010000.0 / ARP_POSITION_SCALE) as i64;
        let payload = pack_header(42, ecef_x, ecef_y, ecef_z, None);
        let mut sink = StringSink::new();
        decode_1005(&payload, &mut sink, None);
        assert!(sink.as_str().contains("station 42"));
        assert!(sink.as_str().contains("lat"));
    }

    #[test]
    fn decodes_1006_antenna_height() {
        let payload = pack_header(7, 1_000_000, 2_000_000, 3_000_000, Some(15000));
        let mut sink = StringSink::new();
        decode_1006(&payload, &mut sink, None);
        assert!(sink.as_str().contains("antenna height 1.5000 m"));
    }

    #[test]
    fn too_short_payload_emits_single_diagnostic() {
        let mut sink = StringSink::new();
        decode_1005(&[0u8; 4], &mut sink, None);
        assert_eq!(sink.lines().count(), 1);
        assert!(sink.as_str().contains("too short"));
    }

    #[test]
    fn rover_position_adds_distance_and_bearing() {
        let ecef_x = (3960000.0 / ARP_POSITION_SCALE) as i64;
        let ecef_y = (346000.0 / ARP_POSITION_SCALE) as i64;
        let ecef_z = (5010000.0 / ARP_POSITION_SCALE) as i64;
        let payload = pack_header(1, ecef_x, ecef_y, ecef_z, None);
        let mut sink = StringSink::new();
        let rover = RoverPosition { lat_deg: 52.0, lon_deg: 5.0 };
        decode_1005(&payload, &mut sink, Some(rover));
        assert!(sink.as_str().contains("distance"));
        assert!(sink.as_str().contains("bearing"));
    }
}
