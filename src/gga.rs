//! NMEA-0183 GGA sentence generation for the once-per-second rover
//! uplink during an NTRIP streaming session (spec.md §6).

/// Formats one field as `ddmm.mmmm`/`dddmm.mmmm` with a hemisphere
/// letter, per the NMEA degrees-minutes convention.
fn lat_field(lat_deg: f64) -> (String, char) {
    let hemi = if lat_deg >= 0.0 { 'N' } else { 'S' };
    let lat = lat_deg.abs();
    let deg = lat.trunc() as u32;
    let minutes = (lat - deg as f64) * 60.0;
    (format!("{:02}{:07.4}", deg, minutes), hemi)
}

fn lon_field(lon_deg: f64) -> (String, char) {
    let hemi = if lon_deg >= 0.0 { 'E' } else { 'W' };
    let lon = lon_deg.abs();
    let deg = lon.trunc() as u32;
    let minutes = (lon - deg as f64) * 60.0;
    (format!("{:03}{:07.4}", deg, minutes), hemi)
}

/// XOR of every byte between (but excluding) `$` and `*`.
fn xor_checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Builds one `$GNGGA,...*CS\r\n` sentence for `lat_deg`/`lon_deg` at
/// `(hh, mm, ss)` UTC. Fix quality, satellite count, HDOP, antenna
/// height and geoid separation are fixed per spec.md §6 — this rover
/// uplink reports a canned, always-valid fix rather than a real one.
pub fn build_gga(lat_deg: f64, lon_deg: f64, hh: u32, mm: u32, ss: f64) -> String {
    let (lat_str, lat_hemi) = lat_field(lat_deg);
    let (lon_str, lon_hemi) = lon_field(lon_deg);
    let body = format!(
        "GNGGA,{:02}{:02}{:05.2},{},{},{},{},1,08,1.0,1.5,M,0.0,M,,",
        hh, mm, ss, lat_str, lat_hemi, lon_str, lon_hemi
    );
    let checksum = xor_checksum(&body);
    format!("${}*{:02X}\r\n", body, checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_5_gga_format() {
        let sentence = build_gga(52.5, 4.75, 12, 34, 56.0);
        assert!(sentence.starts_with(
            "$GNGGA,123456.00,5230.0000,N,00445.0000,E,1,08,1.0,1.5,M,0.0,M,,*"
        ));
        assert!(sentence.ends_with("*49\r\n"));
    }

    #[test]
    fn checksum_covers_only_bytes_between_delimiters() {
        let sentence = build_gga(0.0, 0.0, 0, 0, 0.0);
        let inner = &sentence[1..sentence.len() - 5];
        let stated: u8 = u8::from_str_radix(&sentence[sentence.len() - 4..sentence.len() - 2], 16).unwrap();
        assert_eq!(xor_checksum(inner), stated);
    }

    #[test]
    fn negative_coordinates_use_south_and_west() {
        let sentence = build_gga(-33.8, -70.6, 1, 2, 3.0);
        assert!(sentence.contains(",S,"));
        assert!(sentence.contains(",W,"));
    }

    #[test]
    fn ends_with_crlf() {
        let sentence = build_gga(10.0, 10.0, 0, 0, 0.0);
        assert!(sentence.ends_with("\r\n"));
    }
}
