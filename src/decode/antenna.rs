//! 1007/1008 (antenna descriptor, optional serial) and 1033 (receiver &
//! antenna descriptor).

use crate::bitreader::bits;
use crate::sink::DecodedSink;

use super::too_short;

const MAX_STRING_LEN: usize = 64;
const HEADER_BITS: usize = 24;

/// Reads an 8-bit length followed by that many ASCII bytes, starting at
/// `start_bit`. Returns the decoded string and the bit offset just past
/// it, or `None` if the payload doesn't have room for the declared
/// length or the length exceeds `MAX_STRING_LEN`.
fn read_length_prefixed(payload: &[u8], start_bit: usize) -> Option<(String, usize)> {
    if payload.len() * 8 < start_bit + 8 {
        return None;
    }
    let len = bits(payload, start_bit, 8) as usize;
    if len > MAX_STRING_LEN {
        return None;
    }
    let data_start = start_bit + 8;
    if payload.len() * 8 < data_start + len * 8 {
        return None;
    }
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(bits(payload, data_start + i * 8, 8) as u8);
    }
    Some((String::from_utf8_lossy(&out).into_owned(), data_start + len * 8))
}

pub fn decode_1007(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1007, HEADER_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let Some((descriptor, next)) = read_length_prefixed(payload, HEADER_BITS) else {
        too_short(sink, 1007, HEADER_BITS + 8, payload.len() * 8);
        return;
    };
    if payload.len() * 8 < next + 8 {
        too_short(sink, 1007, next + 8, payload.len() * 8);
        return;
    }
    let setup_id = bits(payload, next, 8);
    sink.write_line(&format!(
        "type 1007: station {} antenna \"{}\" setup {}",
        station_id, descriptor, setup_id
    ));
}

pub fn decode_1008(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1008, HEADER_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let Some((descriptor, next)) = read_length_prefixed(payload, HEADER_BITS) else {
        too_short(sink, 1008, HEADER_BITS + 8, payload.len() * 8);
        return;
    };
    let Some((serial, _)) = read_length_prefixed(payload, next) else {
        too_short(sink, 1008, next + 8, payload.len() * 8);
        return;
    };
    sink.write_line(&format!(
        "type 1008: station {} antenna \"{}\" serial \"{}\"",
        station_id, descriptor, serial
    ));
}

pub fn decode_1033(payload: &[u8], sink: &mut dyn DecodedSink) {
    if payload.len() * 8 < HEADER_BITS {
        too_short(sink, 1033, HEADER_BITS, payload.len() * 8);
        return;
    }
    let station_id = bits(payload, 12, 12);
    let mut pos = HEADER_BITS;
    let mut fields = Vec::with_capacity(4);
    let labels = ["antenna descriptor", "antenna serial", "receiver type", "receiver serial"];
    for label in labels {
        match read_length_prefixed(payload, pos) {
            Some((s, next)) => {
                fields.push((label, s));
                pos = next;
            }
            None => {
                too_short(sink, 1033, pos + 8, payload.len() * 8);
                return;
            }
        }
    }
    sink.write_line(&format!("type 1033: station {}", station_id));
    for (label, value) in fields {
        sink.write_line(&format!("  {}: \"{}\"", label, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn pack_string_field(s: &str) -> Vec<u8> {
        let mut out = vec![s.len() as u8];
        out.extend_from_slice(s.as_bytes());
        out
    }

    fn pack_header(station: u16) -> Vec<u8> {
        let mut buf = vec![0u8; 3];
        let v = ((1007u32 & 0xFFF) << 12) | (station as u32 & 0xFFF);
        buf[0] = (v >> 16) as u8;
        buf[1] = (v >> 8) as u8;
        buf[2] = v as u8;
        buf
    }

    #[test]
    fn decodes_1007_descriptor_and_setup() {
        let mut payload = pack_header(3);
        payload.extend(pack_string_field("TRM_R10"));
        payload.push(2); // setup id
        let mut sink = StringSink::new();
        decode_1007(&payload, &mut sink);
        assert!(sink.as_str().contains("TRM_R10"));
        assert!(sink.as_str().contains("setup 2"));
    }

    #[test]
    fn decodes_1008_descriptor_and_serial() {
        let mut payload = pack_header(3);
        payload.extend(pack_string_field("TRM_R10"));
        payload.extend(pack_string_field("SN123"));
        let mut sink = StringSink::new();
        decode_1008(&payload, &mut sink);
        assert!(sink.as_str().contains("SN123"));
    }

    #[test]
    fn decodes_1033_four_strings() {
        let mut payload = pack_header(3);
        for s in ["ANT1", "ANTSN1", "RCV1", "RCVSN1"] {
            payload.extend(pack_string_field(s));
        }
        let mut sink = StringSink::new();
        decode_1033(&payload, &mut sink);
        for s in ["ANT1", "ANTSN1", "RCV1", "RCVSN1"] {
            assert!(sink.as_str().contains(s));
        }
    }

    #[test]
    fn string_length_over_64_is_rejected() {
        let mut payload = pack_header(3);
        payload.push(65);
        payload.extend(vec![b'x'; 65]);
        let mut sink = StringSink::new();
        decode_1007(&payload, &mut sink);
        assert!(sink.as_str().contains("too short"));
    }

    #[test]
    fn too_short_header_emits_diagnostic() {
        let mut sink = StringSink::new();
        decode_1033(&[0u8; 2], &mut sink);
        assert_eq!(sink.lines().count(), 1);
    }
}
