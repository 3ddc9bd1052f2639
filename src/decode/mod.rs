//! Message decoders: bit-level parsers for each implemented RTCM 3.x
//! message type, dispatched by type number (spec.md §4.E).

pub mod antenna;
pub mod biases;
pub mod ephemeris_gal;
pub mod ephemeris_gps;
pub mod glonass_obs;
pub mod msm;
pub mod station;
pub mod sysparam;

use crate::sink::DecodedSink;

/// Emits the shared "payload too short" diagnostic and nothing else.
/// Every decoder calls this the moment a length check fails, then
/// returns without reading further.
pub fn too_short(sink: &mut dyn DecodedSink, message_type: u16, need_bits: usize, have_bits: usize) {
    sink.write_line(&format!(
        "type {}: payload too short ({} bits available, {} required)",
        message_type, have_bits, need_bits
    ));
}

/// A rover position, supplied by configuration, used by decoders that
/// can report a distance/bearing to a station position they decode.
#[derive(Debug, Clone, Copy)]
pub struct RoverPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// Dispatches one verified frame's payload to its decoder by message
/// type. Unrecognised types produce a single passthrough line rather
/// than being silently dropped.
pub fn dispatch(
    message_type: u16,
    payload: &[u8],
    sink: &mut dyn DecodedSink,
    rover: Option<RoverPosition>,
) {
    match message_type {
        1005 => station::decode_1005(payload, sink, rover),
        1006 => station::decode_1006(payload, sink, rover),
        1007 => antenna::decode_1007(payload, sink),
        1008 => antenna::decode_1008(payload, sink),
        1012 => glonass_obs::decode_1012(payload, sink),
        1013 => sysparam::decode_1013(payload, sink),
        1019 => ephemeris_gps::decode_1019(payload, sink),
        1033 => antenna::decode_1033(payload, sink),
        1045 => ephemeris_gal::decode_1045(payload, sink),
        1230 => biases::decode_1230(payload, sink),
        1074 | 1084 | 1094 | 1124 => msm::decode_msm4(message_type, payload, sink),
        1077 | 1087 | 1097 | 1117 | 1127 | 1137 => msm::decode_msm7(message_type, payload, sink),
        other => sink.write_line(&format!("type {}: no decoder registered", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    #[test]
    fn unknown_type_reports_passthrough() {
        let mut sink = StringSink::new();
        dispatch(4095, &[0xFF; 8], &mut sink, None);
        assert!(sink.as_str().contains("no decoder registered"));
    }
}
