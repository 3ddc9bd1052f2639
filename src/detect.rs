//! Stream format detector: sourcetable hints first, then byte-pattern
//! signatures over the first bytes of the body.

/// Wire format classification for the body stream, per spec.md §4.D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    None,
    Rtcm3,
    Ubx,
    Sbf,
    Rt27,
    Lb2,
    Unknown,
}

impl DetectedFormat {
    /// Whether frames of this format should be handed to the RTCM
    /// framer/decoder pipeline (spec.md §4.D: "decoding is activated
    /// only for RTCM3, RT27, LB2").
    pub fn decoding_active(self) -> bool {
        matches!(self, DetectedFormat::Rtcm3 | DetectedFormat::Rt27 | DetectedFormat::Lb2)
    }
}

/// Optional sourcetable `Format`/`Details` strings used as detection
/// hints before falling back to byte-pattern scanning.
#[derive(Debug, Clone, Default)]
pub struct FormatHint<'a> {
    pub format: Option<&'a str>,
    pub details: Option<&'a str>,
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|s| s.to_ascii_uppercase().contains(&needle.to_ascii_uppercase()))
        .unwrap_or(false)
}

/// Applies the sourcetable-hint rules (spec.md §4.D, rules 1-4). Returns
/// `None` if neither `format` nor `details` match a known hint.
pub fn detect_from_hint(hint: &FormatHint) -> Option<DetectedFormat> {
    let haystacks = [hint.format, hint.details];
    for &h in &haystacks {
        if contains_ci(h, "RT27") {
            return Some(DetectedFormat::Rt27);
        }
    }
    for &h in &haystacks {
        if contains_ci(h, "LB2") {
            return Some(DetectedFormat::Lb2);
        }
    }
    for &h in &haystacks {
        if contains_ci(h, "SBF") || contains_ci(h, "SEPTENTRIO") {
            return Some(DetectedFormat::Sbf);
        }
    }
    for &h in &haystacks {
        if contains_ci(h, "UBX") || contains_ci(h, "BINEX") {
            return Some(DetectedFormat::Ubx);
        }
    }
    None
}

/// Scans `prefix` (the first bytes of body data) for byte-pattern
/// signatures (spec.md §4.D, rules 5-6). `first_data_check` tracks
/// whether this is the very first data byte seen this session; the
/// weak single-byte-pair heuristics in rule 6 apply only then.
pub fn detect_from_bytes(prefix: &[u8], first_data_check: &mut bool) -> DetectedFormat {
    for pair in prefix.windows(2) {
        if pair == [0x24, 0x40] {
            return DetectedFormat::Sbf;
        }
        if pair == [0xB5, 0x62] {
            return DetectedFormat::Ubx;
        }
    }

    if *first_data_check {
        *first_data_check = false;
        if let Some(&first) = prefix.first() {
            if first == 0xD3 {
                // A leading 0xD3 suppresses all weak-pattern detection;
                // defer to the framer's own first successful decode.
                return DetectedFormat::None;
            }
            if let Some(&second) = prefix.get(1) {
                if first == 0x10 && second != 0x10 && second != 0x03 {
                    return DetectedFormat::Rt27;
                }
                if first == 0x01 {
                    if let (Some(&len), Some(&third)) = (prefix.get(1), prefix.get(2)) {
                        if len > 0 && len <= 0x80 && third < 0x40 {
                            return DetectedFormat::Lb2;
                        }
                    }
                }
            }
        }
    }

    DetectedFormat::None
}

/// Full detection pipeline: hint first, then byte scan. Callers own the
/// `confirmed` transition, which only ever happens on the framer's first
/// successful CRC-verified decode (spec.md §4.D rule 7), not here.
pub fn detect(hint: &FormatHint, prefix: &[u8], first_data_check: &mut bool) -> DetectedFormat {
    if let Some(format) = detect_from_hint(hint) {
        return format;
    }
    detect_from_bytes(prefix, first_data_check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_rt27_wins_case_insensitive() {
        let hint = FormatHint {
            format: Some("rt27 binary"),
            details: None,
        };
        assert_eq!(detect_from_hint(&hint), Some(DetectedFormat::Rt27));
    }

    #[test]
    fn hint_sbf_from_septentrio() {
        let hint = FormatHint {
            format: Some("Septentrio SBF"),
            details: None,
        };
        assert_eq!(detect_from_hint(&hint), Some(DetectedFormat::Sbf));
    }

    #[test]
    fn hint_absent_falls_through_to_none() {
        let hint = FormatHint {
            format: Some("RTCM 3.2"),
            details: None,
        };
        assert_eq!(detect_from_hint(&hint), None);
    }

    #[test]
    fn byte_scan_finds_sbf_pair() {
        let mut first = true;
        let prefix = [0x00, 0x24, 0x40, 0x01];
        assert_eq!(detect_from_bytes(&prefix, &mut first), DetectedFormat::Sbf);
    }

    #[test]
    fn byte_scan_finds_ubx_pair() {
        let mut first = true;
        let prefix = [0xB5, 0x62, 0x01, 0x02];
        assert_eq!(detect_from_bytes(&prefix, &mut first), DetectedFormat::Ubx);
    }

    #[test]
    fn leading_0xd3_suppresses_weak_detection() {
        let mut first = true;
        let prefix = [0xD3, 0x00, 0x04];
        assert_eq!(detect_from_bytes(&prefix, &mut first), DetectedFormat::None);
        assert!(!first);
    }

    #[test]
    fn weak_rt27_first_byte_pattern() {
        let mut first = true;
        let prefix = [0x10, 0x20, 0x30];
        assert_eq!(detect_from_bytes(&prefix, &mut first), DetectedFormat::Rt27);
    }

    #[test]
    fn weak_pattern_only_applies_on_first_data_check() {
        let mut first = false;
        let prefix = [0x10, 0x20, 0x30];
        assert_eq!(detect_from_bytes(&prefix, &mut first), DetectedFormat::None);
    }

    #[test]
    fn decoding_active_matches_spec() {
        assert!(DetectedFormat::Rtcm3.decoding_active());
        assert!(DetectedFormat::Rt27.decoding_active());
        assert!(DetectedFormat::Lb2.decoding_active());
        assert!(!DetectedFormat::Sbf.decoding_active());
        assert!(!DetectedFormat::Ubx.decoding_active());
        assert!(!DetectedFormat::Unknown.decoding_active());
    }
}
