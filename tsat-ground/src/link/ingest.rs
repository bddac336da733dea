//! Ingestion thread for the ground link
//!
//! The single producer: pulls raw bytes from the transport, synchronizes and decodes
//! frames, and appends telemetry samples to the stream.
//!
//! # Packet Handling
//!
//! - **Telemetry (type 2)**: appended to the telemetry stream
//! - **Ping (type 1)**: counted and logged, never appended
//! - **Unknown type / truncated / no marker**: recoverable; the frame reader skips
//!   or waits and ingestion carries on

use super::stats::LinkStats;
use super::ShutdownSignal;
use crate::error::Result;
use crate::protocol::{FrameReader, Packet, Payload};
use crate::telemetry::StreamWriter;
use crate::transport::Transport;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Bytes requested from the transport per read
const READ_CHUNK_SIZE: usize = 256;

/// Sleep after an empty read, for transports that return immediately
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Log link statistics every this many telemetry samples
const STATS_LOG_INTERVAL: u64 = 100;

/// Ingest loop - reads frames until shutdown or transport failure
///
/// Checks the shutdown signal between reads, so it exits within one transport poll
/// interval. A transport error ends the loop, triggers `shutdown` so companion
/// threads stop as well, and is returned to whoever joins this thread.
///
/// The transport lock is held only for the duration of a single read.
pub(super) fn ingest_loop(
    transport: Arc<Mutex<Box<dyn Transport>>>,
    shutdown: ShutdownSignal,
    mut writer: StreamWriter,
    stats: Arc<LinkStats>,
) -> Result<()> {
    let mut reader = FrameReader::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    let result = loop {
        if shutdown.is_triggered() {
            break Ok(());
        }

        let read = transport.lock().read(&mut chunk);
        match read {
            Ok(0) => thread::sleep(IDLE_SLEEP),
            Ok(n) => {
                LinkStats::bump(&stats.bytes_received, n as u64);
                reader.push(&chunk[..n]);
                drain_packets(&mut reader, &mut writer, &stats);
            }
            Err(e) => {
                log::error!("Transport read failed: {}", e);
                break Err(e);
            }
        }
    };

    shutdown.trigger();
    log::info!(
        "Ingest thread exiting after {} telemetry samples",
        writer.len()
    );
    result
}

/// Decode every complete frame currently buffered
fn drain_packets(reader: &mut FrameReader, writer: &mut StreamWriter, stats: &LinkStats) {
    loop {
        match reader.next_packet() {
            Ok(Some(packet)) => handle_packet(packet, writer, stats),
            Ok(None) => break,
            Err(e) => {
                LinkStats::bump(&stats.frames_rejected, 1);
                log::warn!("Skipping frame: {}", e);
            }
        }
    }

    let discarded = reader.take_discarded();
    if discarded > 0 {
        LinkStats::bump(&stats.bytes_discarded, discarded as u64);
        log::debug!("Discarded {} bytes while synchronizing", discarded);
    }
}

fn handle_packet(packet: Packet, writer: &mut StreamWriter, stats: &LinkStats) {
    LinkStats::bump(&stats.frames_decoded, 1);
    let satellite_id = packet.meta().satellite_id();

    match packet.into_payload() {
        Payload::Telemetry(sample) => {
            writer.append(sample);
            let count = LinkStats::bump(&stats.telemetry_samples, 1);
            log::trace!(
                "Telemetry from satellite {}: frame {}",
                satellite_id,
                sample.frame_count
            );
            if count % STATS_LOG_INTERVAL == 0 {
                log::info!("Link stats: {}", stats.snapshot());
            }
        }
        Payload::Ping(ping) => {
            LinkStats::bump(&stats.pings_received, 1);
            log::debug!(
                "Ping from satellite {}: counter={}",
                satellite_id,
                ping.counter
            );
        }
    }
}
