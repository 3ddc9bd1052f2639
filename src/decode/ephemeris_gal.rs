//! 1045 — Galileo F/NAV ephemeris.

use crate::bitreader::{bits, signed_bits};
use crate::constants::gal_eph::*;
use crate::sink::DecodedSink;

use super::too_short;

const FIELD_BITS: usize = 6 + 12 + 10 + 8 + 14 + 16 + 32 + 32 + 32 + 32 + 32 + 32 + 24 + 16 + 16 + 16 + 16 + 16 + 16 + 14 + 10 + 10 + 6;
const HEADER_BITS: usize = 12 + FIELD_BITS;

pub fn decode_1045(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1045, HEADER_BITS, payload.len() * 8);
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

    let svid = next_u!(6);
    let week = next_u!(12);
    let iod_nav = next_u!(10);
    let sisa = next_u!(8);
    let idot = next_s!(14) as f64 * IDOT_SCALE;
    let delta_n = next_s!(16) as f64 * DELTA_N_SCALE;
    let m0 = next_s!(32) as f64 * M0_SCALE;
    let e = next_u!(32) as f64 * E_SCALE;
    let sqrt_a = next_u!(32) as f64 * SQRT_A_SCALE;
    let omega0 = next_s!(32) as f64 * OMEGA0_SCALE;
    let i0 = next_s!(32) as f64 * I0_SCALE;
    let omega = next_s!(32) as f64 * OMEGA_SCALE;
    let omega_dot = next_s!(24) as f64 * OMEGA_DOT_SCALE;
    let cuc = next_s!(16) as f64 * CUC_SCALE;
    let cus = next_s!(16) as f64 * CUS_SCALE;
    let crc = next_s!(16) as f64 * CRC_SCALE;
    let crs = next_s!(16) as f64 * CRS_SCALE;
    let cic = next_s!(16) as f64 * CIC_SCALE;
    let cis = next_s!(16) as f64 * CIS_SCALE;
    let toe = next_u!(14) as f64 * TOE_SCALE;
    let bgd_e5a_e1 = next_s!(10) as f64 * BGD_SCALE;
    let bgd_e5b_e1 = next_s!(10) as f64 * BGD_SCALE;
    let health = next_u!(6);

    sink.write_line(&format!(
        "type 1045: SVID {} week {} iod-nav {} sisa {} health {}",
        svid, week, iod_nav, sisa, health
    ));
    sink.write_line(&format!(
        "  toe {:.1} m0 {:.9} e {:.9} sqrt_a {:.6} idot {:.6e} delta_n {:.6e}",
        toe, m0, e, sqrt_a, idot, delta_n
    ));
    sink.write_line(&format!(
        "  omega0 {:.9} i0 {:.9} omega {:.9} omega_dot {:.6e}",
        omega0, i0, omega, omega_dot
    ));
    sink.write_line(&format!(
        "  cuc {:.6e} cus {:.6e} crc {:.4} crs {:.4} cic {:.6e} cis {:.6e}",
        cuc, cus, crc, crs, cic, cis
    ));
    sink.write_line(&format!(
        "  bgd-e5a-e1 {:.6e} bgd-e5b-e1 {:.6e}",
        bgd_e5a_e1, bgd_e5b_e1
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
        assert_eq!(FIELD_BITS, 418);
    }

    #[test]
    fn decodes_all_fields_without_panicking() {
        let fields: Vec<(u64, usize)> = vec![
            (1045, 12),
            (7, 6),
            (1100, 12),
            (20, 10),
            (0, 8),
            (0, 14),
            (0, 16),
            (0, 32),
            (0, 32),
            (0, 32),
            (0, 32),
            (0, 32),
            (0, 32),
            (0, 24),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (0, 16),
            (100, 14),
            (0, 10),
            (0, 10),
            (0, 6),
        ];
        let payload = pack(&fields);
        let mut sink = StringSink::new();
        decode_1045(&payload, &mut sink);
        assert!(sink.as_str().contains("SVID 7"));
        assert!(sink.as_str().contains("week 1100"));
    }

    #[test]
    fn too_short_payload_emits_diagnostic() {
        let mut sink = StringSink::new();
        decode_1045(&[0u8; 4], &mut sink);
        assert!(sink.as_str().contains("too short"));
    }
}
