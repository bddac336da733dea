//! Outbound ping thread
//!
//! Periodically transmits a Ping frame with an incrementing counter so the flight
//! side can tell the ground station is listening. Shares the transport with the
//! ingestion thread; each send waits at most one read poll interval for the lock.

use super::stats::LinkStats;
use super::ShutdownSignal;
use crate::protocol::{PingFrame, PingPacket};
use crate::transport::Transport;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Ping loop - sends one frame per `interval` until shutdown
///
/// Send failures are logged and retried on the next tick; a dead transport is
/// detected by the ingestion thread, which then triggers `shutdown`.
pub(super) fn ping_loop(
    transport: Arc<Mutex<Box<dyn Transport>>>,
    shutdown: ShutdownSignal,
    satellite_id: u8,
    interval: Duration,
    stats: Arc<LinkStats>,
) {
    let mut frame = PingFrame::new(satellite_id, PingPacket::default());
    let mut counter: u32 = 0;

    while !shutdown.wait_timeout(interval) {
        frame.set_counter(counter);

        let sent = frame.send_to(&mut **transport.lock());
        match sent {
            Ok(()) => {
                LinkStats::bump(&stats.pings_sent, 1);
                log::trace!("Sent ping {} to satellite {}", counter, satellite_id);
                counter = counter.wrapping_add(1);
            }
            Err(e) => log::warn!("Failed to send ping {}: {}", counter, e),
        }
    }

    log::info!("Ping thread exiting");
}
