//! 1012 — GLONASS L1/L2 observables.

use crate::bitreader::bits;
use crate::sink::DecodedSink;

use super::too_short;

const HEADER_BITS: usize = 62;
const SAT_BITS: usize = 125;

pub fn decode_1012(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1012, HEADER_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let epoch = bits(payload, 24, 27);
    let sync = bits(payload, 51, 1);
    let n_sats = bits(payload, 52, 6);
    let smoothing = bits(payload, 58, 1);
    let smoothing_interval = bits(payload, 59, 3);

    sink.write_line(&format!(
        "type 1012: station {} epoch {} sync {} sats {} smoothing {} interval {}",
        station_id, epoch, sync, n_sats, smoothing, smoothing_interval
    ));

    let mut pos = HEADER_BITS;
    for i in 0..n_sats {
        if payload.len() * 8 < pos + SAT_BITS {
            too_short(sink, 1012, pos + SAT_BITS, payload.len() * 8);
            return;
        }
        let slot = bits(payload, pos, 6);
        let l1_code = bits(payload, pos + 6, 1);
        let l1_pr = bits(payload, pos + 7, 25);
        let l1_phase = bits(payload, pos + 32, 20);
        let l1_lock = bits(payload, pos + 52, 7);
        let l1_amb = bits(payload, pos + 59, 7);
        let l1_cnr = bits(payload, pos + 66, 8);
        let l2_code = bits(payload, pos + 74, 2);
        let l2_pr_diff = bits(payload, pos + 76, 14);
        let l2_phase_diff = bits(payload, pos + 90, 20);
        let l2_lock = bits(payload, pos + 110, 7);
        let l2_cnr = bits(payload, pos + 117, 8);

        sink.write_line(&format!(
            "  sat {}: slot {} l1[code={} pr={} phase={} lock={} amb={} cnr={}] l2[code={} pr_diff={} phase_diff={} lock={} cnr={}]",
            i, slot, l1_code, l1_pr, l1_phase, l1_lock, l1_amb, l1_cnr,
            l2_code, l2_pr_diff, l2_phase_diff, l2_lock, l2_cnr
        ));
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
    fn decodes_header_and_one_satellite() {
        let mut fields = vec![
            (1012u64, 12),
            (9u64, 12),
            (1000u64, 27),
            (0u64, 1),
            (1u64, 6), // one satellite
            (0u64, 1),
            (0u64, 3),
        ];
        // one satellite block, all zero except slot
        fields.push((5u64, 6));
        fields.extend_from_slice(&[
            (0, 1),
            (0, 25),
            (0, 20),
            (0, 7),
            (0, 7),
            (0, 8),
            (0, 2),
            (0, 14),
            (0, 20),
            (0, 7),
            (0, 8),
        ]);
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1012(&payload, &mut sink);
        assert!(sink.as_str().contains("station 9"));
        assert!(sink.as_str().contains("slot 5"));
    }

    #[test]
    fn truncated_satellite_block_emits_diagnostic() {
        let fields = vec![
            (1012u64, 12),
            (9u64, 12),
            (1000u64, 27),
            (0u64, 1),
            (2u64, 6), // claims two satellites but payload has none
            (0u64, 1),
            (0u64, 3),
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1012(&payload, &mut sink);
        assert!(sink.as_str().contains("too short"));
    }
}
