//! 1230 — GLONASS code-phase biases.

use crate::bitreader::{bits, signed_bits};
use crate::constants::GLONASS_BIAS_SCALE_NS;
use crate::sink::DecodedSink;

use super::too_short;

const HEADER_BITS: usize = 24;
const COUNT_BITS: usize = 6;
const SAT_BITS: usize = 22;

pub fn decode_1230(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS + COUNT_BITS {
        too_short(sink, 1230, HEADER_BITS + COUNT_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let sat_count = bits(payload, HEADER_BITS, COUNT_BITS);

    sink.write_line(&format!("type 1230: station {} satellites {}", station_id, sat_count));

    let mut pos = HEADER_BITS + COUNT_BITS;
    for i in 0..sat_count {
        if payload.len() * 8 < pos + SAT_BITS {
            too_short(sink, 1230, pos + SAT_BITS, payload.len() * 8);
            return;
        }
        let slot = bits(payload, pos, 6);
        let bias_ns = signed_bits(payload, pos + 6, 16) as f64 * GLONASS_BIAS_SCALE_NS;
        sink.write_line(&format!("  sat {}: slot {} bias {:.2} ns", i, slot, bias_ns));
        pos += SAT_BITS;
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
    fn decodes_two_satellites() {
        let fields = vec![
            (1230u64, 12),
            (4u64, 12),
            (2u64, 6),
            (1u64, 6),
            (100u64, 16), // 1.0 ns
            (2u64, 6),
            (0xFFFFu64, 16), // -1 unit = -0.01 ns
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1230(&payload, &mut sink);
        assert!(sink.as_str().contains("station 4"));
        assert!(sink.as_str().contains("satellites 2"));
        assert!(sink.as_str().contains("bias 1.00 ns"));
        assert!(sink.as_str().contains("bias -0.01 ns"));
    }

    #[test]
    fn truncated_satellite_list_emits_diagnostic() {
        let fields = vec![(1230u64, 12), (4u64, 12), (3u64, 6)];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1230(&payload, &mut sink);
        assert!(sink.as_str().contains("too short"));
    }
}
