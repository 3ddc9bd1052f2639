//! 1013 — system parameters (station description, modified Julian day,
//! and the announced message schedule).

use chrono::NaiveDate;

use crate::bitreader::bits;
use crate::constants::ANNOUNCE_INTERVAL_SCALE_S;
use crate::sink::DecodedSink;

use super::too_short;

const HEADER_BITS: usize = 62;
const ANNOUNCE_BITS: usize = 29;

/// Modified Julian Day 0 is 1858-11-17 (the MJD epoch).
fn mjd_to_date(mjd: u64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1858, 11, 17)?.checked_add_signed(chrono::Duration::days(mjd as i64))
}

fn seconds_of_day_to_hms(seconds: u64) -> (u64, u64, u64) {
    (seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

pub fn decode_1013(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1013, HEADER_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let mjd = bits(payload, 24, 16);
    let seconds_of_day = bits(payload, 40, 17);
    let announce_count = bits(payload, 57, 5);

    let date_str = match mjd_to_date(mjd) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => format!("invalid-mjd-{}", mjd),
    };
    let (hh, mm, ss) = seconds_of_day_to_hms(seconds_of_day);

    sink.write_line(&format!(
        "type 1013: station {} date {} time {:02}:{:02}:{:02} announcements {}",
        station_id, date_str, hh, mm, ss, announce_count
    ));

    let mut pos = HEADER_BITS;
    for i in 0..announce_count {
        if payload.len() * 8 < pos + ANNOUNCE_BITS {
            too_short(sink, 1013, pos + ANNOUNCE_BITS, payload.len() * 8);
            return;
        }
        let message_id = bits(payload, pos, 12);
        let sync = bits(payload, pos + 12, 1);
        let interval = bits(payload, pos + 13, 16) as f64 * ANNOUNCE_INTERVAL_SCALE_S;
        sink.write_line(&format!(
            "  announce {}: message {} sync {} interval {:.1} s",
            i, message_id, sync, interval
        ));
        pos += ANNOUNCE_BITS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn pack(fields: &[(u64, usize)]) -> Vec<u8> {
        let total_bits: usize = fields.iter().map(|(_, w)| w).sum();
        let mut buf = vec![0u8; (total_bits + 7) / 8];
        let mut pos = 0;
        for &(value, width) in fields {
            for i in 0..width {
                let bit = (value >> (width - 1 - i)) & 1;
                if bit != 0 {
                    let idx = pos + i;
                    buf[idx / 8] |= 1 << (7 - (idx % 8));
                }
            }
            pos += width;
        }
        buf
    }

    #[test]
    fn mjd_converts_to_known_date() {
        // MJD 60000 is 2023-02-25.
        let date = mjd_to_date(60000).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2023-02-25");
    }

    #[test]
    fn decodes_header_and_one_announcement() {
        let fields = vec![
            (1013u64, 12),
            (9u64, 12),
            (60000u64, 16),
            (3661u64, 17), // 01:01:01
            (1u64, 5),
            (1005u64, 12),
            (1u64, 1),
            (50u64, 16), // 5.0 s
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1013(&payload, &mut sink);
        assert!(sink.as_str().contains("2023-02-25"));
        assert!(sink.as_str().contains("01:01:01"));
        assert!(sink.as_str().contains("message 1005"));
        assert!(sink.as_str().contains("interval 5.0 s"));
    }

    #[test]
    fn truncated_announcement_emits_diagnostic() {
        let fields = vec![
            (1013u64, 12),
            (9u64, 12),
            (60000u64, 16),
            (0u64, 17),
            (2u64, 5), // claims two announcements, none present
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1013(&payload, &mut sink);
        assert!(sink.as_str().contains("too short"));
    }
}
