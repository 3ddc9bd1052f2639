//! Library crate backing the `ntrip-analyzer` binary: an NTRIP client
//! and RTCM 3.x stream analyzer.
//!
//! The worker/consumer split described in [`events`] is deliberate —
//! one thread owns the socket and every mutable decode-time structure,
//! the other only ever reads atomics or drains posted [`events::Event`]
//! values, so no lock is needed on the hot path.

pub mod bitreader;
pub mod cli;
pub mod config;
pub mod constants;
pub mod crc24q;
pub mod decode;
pub mod detect;
pub mod error;
pub mod events;
pub mod frame;
pub mod geo;
pub mod gga;
pub mod ntrip;
pub mod sink;
pub mod stats;
