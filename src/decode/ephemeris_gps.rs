//! 1019 — GPS broadcast ephemeris.

use crate::bitreader::{bits, signed_bits};
use crate::constants::gps_eph::*;
use crate::sink::DecodedSink;

use super::too_short;

/// Field widths in declared order (spec.md §4.E), not counting the
/// 12-bit message type already consumed by the framer/dispatcher.
const FIELD_BITS: usize = 6 + 10 + 4 + 2 + 14 + 8 + 16 + 8 + 16 + 22 + 10 + 16 + 16 + 32 + 16 + 16 + 16 + 16 + 16 + 16 + 32 + 32 + 16 + 1 + 5 + 6 + 8 + 16 + 2;
const HEADER_BITS: usize = 12 + FIELD_BITS;

pub fn decode_1019(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1019, HEADER_BITS, payload.len() * 8);
        return;
    }

    let mut pos = 12usize;
    macro_rules! next_u {
        ($w:expr) => {{
            let v = bits(payload, pos, $w);
            pos += $w;
            v
        }};
    }
    macro_rules! next_s {
        ($w:expr) => {{
            let v = signed_bits(payload, pos, $w);
            pos += $w;
            v
        }};
    }

    let prn = next_u!(6);
    let week = next_u!(10);
    let sv_accuracy = next_u!(4);
    let code_on_l2 = next_u!(2);
    let idot = next_s!(14) as f64 * IDOT_SCALE;
    let iode = next_u!(8);
    let toc = next_u!(16) as f64 * TOC_SCALE;
    let af2 = next_s!(8) as f64 * AF2_SCALE;
    let af1 = next_s!(16) as f64 * AF1_SCALE;
    let af0 = next_s!(22) as f64 * AF0_SCALE;
    let iodc = next_u!(10);
    let crs = next_s!(16) as f64 * CRS_SCALE;
    let delta_n = next_s!(16) as f64 * DELTA_N_SCALE;
    let m0 = next_s!(32) as f64 * M0_SCALE;
    let cuc = next_s!(16) as f64 * CUC_SCALE;
    let cus = next_s!(16) as f64 * CUS_SCALE;
    let crc = next_s!(16) as f64 * CRC_SCALE;
    let crs2 = next_s!(16) as f64 * CRS_SCALE;
    let cic = next_s!(16) as f64 * CIC_SCALE;
    let cis = next_s!(16) as f64 * CIS_SCALE;
    let e = next_u!(32) as f64 * E_SCALE;
    let sqrt_a = next_u!(32) as f64 * SQRT_A_SCALE;
    let toe = next_u!(16) as f64 * TOE_SCALE;
    let fit_flag = next_u!(1);
    let aodo = next_u!(5);
    let health = next_u!(6);
    let tgd = next_s!(8) as f64 * TGD_SCALE;
    let tx_time = next_u!(16) as f64 * TX_TIME_SCALE;
    let _reserved = next_u!(2);

    sink.write_line(&format!(
        "type 1019: PRN {} week {} sv-accuracy {} code-on-l2 {} health {}",
        prn, week, sv_accuracy, code_on_l2, health
    ));
    sink.write_line(&format!(
        "  toc {:.1} af0 {:.6e} af1 {:.6e} af2 {:.6e} iodc {} iode {} tgd {:.6e}",
        toc, af0, af1, af2, iodc, iode, tgd
    ));
    sink.write_line(&format!(
        "  m0 {:.9} delta_n {:.6e} idot {:.6e} e {:.9} sqrt_a {:.6} toe {:.1}",
        m0, delta_n, idot, e, sqrt_a, toe
    ));
    sink.write_line(&format!(
        "  cuc {:.6e} cus {:.6e} crc {:.4} crs {:.4} crs2 {:.4} cic {:.6e} cis {:.6e}",
        cuc, cus, crc, crs, crs2, cic, cis
    ));
    sink.write_line(&format!(
        "  fit-flag {} aodo {} tx-time {:.1} s",
        fit_flag, aodo, tx_time
    ));
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
    fn header_bits_matches_declared_field_list() {
        assert_eq!(FIELD_BITS, 394);
    }

    #[test]
    fn decodes_all_fields_without_panicking() {
        let fields: Vec<(u64, usize)> = vec![
            (1019, 12),
            (12, 6),
            (2200, 10),
            (0, 4),
            (0, 2),
            (0x3FFF, 14), // idot = -1 (all ones)
            (5, 8),
            (100, 16),
            (0, 8),
            (0, 16),
            (0, 22),
            (10, 10),
            (0, 16),
            (0, 16),
            (0, 32),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 32),
            (0, 32),
            (100, 16),
            (1, 1),
            (0, 5),
            (0, 6),
            (0, 8),
            (100, 16),
            (0, 2),
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1019(&payload, &mut sink);
        assert!(sink.as_str().contains("PRN 12"));
        assert!(sink.as_str().contains("week 2200"));
    }

    #[test]
    fn too_short_payload_emits_diagnostic() {
        let mut sink = StringSink::new();
        decode_1019(&[0u8; 4], &mut sink);
        assert!(sink.as_str().contains("too short"));
    }
}
