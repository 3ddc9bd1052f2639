//! Command-line surface (spec.md §6). Flags are parsed into one
//! immutable `Options` record up front, replacing the module-global
//! flag variables the source used (spec.md §9).

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "ntrip-analyzer", version, about = "Interactive NTRIP client and RTCM 3.x stream analyzer.")]
pub struct Options {
    /// Config file path.
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    pub config: PathBuf,

    /// Request the sourcetable and render it formatted.
    #[arg(short = 'm', long = "mounts")]
    pub mounts: bool,

    /// With `-m`, render the sourcetable raw instead of formatted.
    #[arg(short = 'r', long = "raw")]
    pub raw: bool,

    /// Enter streaming mode; optional comma-separated message-type filter.
    #[arg(short = 'd', long = "decode", num_args = 0..=1, default_missing_value = "", value_name = "TYPES")]
    pub decode: Option<String>,

    /// Bounded analysis mode, in seconds.
    #[arg(short = 't', long = "time", num_args = 0..=1, default_missing_value = "60", value_name = "SECONDS")]
    pub analysis_seconds: Option<u64>,

    /// Bounded satellite-visibility mode, in seconds.
    #[arg(short = 's', long = "sats", num_args = 0..=1, default_missing_value = "60", value_name = "SECONDS")]
    pub satellite_seconds: Option<u64>,

    /// Verbose logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Emit a template config file at the configured path and exit.
    #[arg(short = 'g', long = "generate")]
    pub generate_config: bool,

    /// Print program info and exit.
    #[arg(short = 'i', long = "info")]
    pub info: bool,
}

/// Parses the configured message-type filter, if any; an empty string
/// (bare `-d` with no value) means "decode everything".
pub fn parse_type_filter(raw: &str) -> Option<Vec<u16>> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.split(',').filter_map(|s| s.trim().parse().ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_filter() {
        let filter = parse_type_filter("1005,1077,1230").unwrap();
        assert_eq!(filter, vec![1005, 1077, 1230]);
    }

    #[test]
    fn empty_filter_means_everything() {
        assert_eq!(parse_type_filter(""), None);
    }

    #[test]
    fn non_numeric_tokens_are_skipped() {
        let filter = parse_type_filter("1005,garbage,1077").unwrap();
        assert_eq!(filter, vec![1005, 1077]);
    }
}
