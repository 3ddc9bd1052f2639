//! `ntrip-analyzer` binary entry point: wires CLI options, the on-disk
//! config, an NTRIP session (or sourcetable fetch), and the event bus
//! together for a terminal/CLI consumer.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info, LevelFilter};

use ntrip_analyzer::cli::{parse_type_filter, Options};
use ntrip_analyzer::config::ConfigFile;
use ntrip_analyzer::events::{self, Event};
use ntrip_analyzer::ntrip::session::{self, SessionMode};
use ntrip_analyzer::ntrip::sourcetable::{fetch_sourcetable, parse_sourcetable};
use ntrip_analyzer::sink::StdoutSink;

fn main() -> ExitCode {
    let options = Options::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if options.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> ntrip_analyzer::error::Result<()> {
    if options.info {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("{}", env!("CARGO_PKG_DESCRIPTION"));
        return Ok(());
    }

    if options.generate_config {
        ConfigFile::write_template(&options.config)?;
        println!("wrote template config to {}", options.config.display());
        return Ok(());
    }

    let no_mode_selected =
        !options.mounts && options.decode.is_none() && options.analysis_seconds.is_none() && options.satellite_seconds.is_none();
    if no_mode_selected {
        // Open question from the design notes: absence of a mode flag
        // prints help and exits cleanly rather than defaulting to a
        // 60-second analysis run.
        print_help();
        return Ok(());
    }

    let config_file = ConfigFile::load(&options.config)?;
    let session_config = config_file.to_session_config();

    if options.mounts {
        let body = fetch_sourcetable(&session_config.caster_host, session_config.caster_port)?;
        if options.raw {
            println!("{}", body);
        } else {
            let rover = Some((session_config.rover_lat_deg, session_config.rover_lon_deg));
            let entries = parse_sourcetable(&body, rover);
            for entry in &entries {
                let distance = entry
                    .distance_km
                    .map(|d| format!("{:.1}", d))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<16} {:<12} {:<10} {:<8} {:<4} distance={} km",
                    entry.mountpoint, entry.format, entry.nav_system, entry.network, entry.country, distance
                );
            }
        }
        return Ok(());
    }

    let mode = if let Some(seconds) = options.analysis_seconds {
        SessionMode::AnalysisTypes(Duration::from_secs(seconds))
    } else if let Some(seconds) = options.satellite_seconds {
        SessionMode::AnalysisSatellites(Duration::from_secs(seconds))
    } else {
        SessionMode::Streaming
    };

    let type_filter = options.decode.as_deref().and_then(parse_type_filter);

    let (bus, event_sink) = events::channel();
    let shared = bus.shared().clone();

    let worker_config = session_config.clone();
    let worker_filter = type_filter.clone();
    let handle = std::thread::spawn(move || {
        let mut sink = StdoutSink;
        session::run(worker_config, mode, worker_filter, shared, bus, &mut sink);
    });

    for event in event_sink.iter() {
        match event {
            Event::StreamInfo(msg) => info!("{}", msg),
            Event::StatUpdate { message_type, stats } => {
                let matches_filter = match &type_filter {
                    Some(types) => types.contains(&message_type),
                    None => true,
                };
                if matches_filter {
                    info!("type {}: count {} avg {:?}", message_type, stats.count, stats.avg_dt());
                }
            }
            Event::SatUpdate { gnss, set } => {
                info!("{:?}: {} satellites visible", gnss, set.count());
            }
            Event::MsgRaw { .. } => {}
            Event::MountResult { success, detail } => {
                info!("mount result success={} detail={}", success, detail);
            }
            Event::AnalysisSummary { type_stats, satellite_stats } => {
                print_analysis_summary(mode, &type_stats, &satellite_stats);
            }
            Event::StreamDone { reason } => {
                info!("session ended: {}", reason);
                break;
            }
        }
    }

    let _ = handle.join();
    Ok(())
}

/// Renders the table spec.md §6 requires at the end of a bounded run:
/// per-type statistics for `-t`, per-GNSS satellite visibility for `-s`.
fn print_analysis_summary(
    mode: SessionMode,
    type_stats: &[(u16, ntrip_analyzer::stats::MessageTypeStats)],
    satellite_stats: &[(ntrip_analyzer::stats::GnssId, ntrip_analyzer::stats::SatelliteSet)],
) {
    match mode {
        SessionMode::AnalysisSatellites(_) => {
            println!("--- satellite visibility summary ---");
            for (gnss, set) in satellite_stats {
                println!("{:<10} {} satellites", format!("{:?}", gnss), set.count());
            }
        }
        _ => {
            println!("--- message-type statistics summary ---");
            for (message_type, stats) in type_stats {
                println!(
                    "type {:<6} count {:<8} avg-dt {:?} min-dt {:?} max-dt {:?}",
                    message_type, stats.count, stats.avg_dt(), stats.min_dt, stats.max_dt
                );
            }
        }
    }
}

fn print_help() {
    use clap::CommandFactory;
    Options::command().print_help().ok();
    println!();
}
