//! Ground link: background ingestion of frames from a transport
//!
//! # Threading Model
//!
//! ```text
//! ┌──────────────────┐  bytes   ┌────────────────┐ append  ┌─────────────────┐
//! │ Transport        │─────────►│ tsat-ingest    │────────►│ TelemetryStream │
//! │ (Arc<Mutex<..>>) │◄─────────│ tsat-ping (opt)│         └─────────────────┘
//! └──────────────────┘  pings   └────────────────┘                 │ read_at
//!                                                            consumers (any thread)
//! ```
//!
//! - **Ingest thread**: sole producer of the telemetry stream
//! - **Ping thread**: only spawned when a ping interval is configured
//!
//! Both threads poll a shared [`ShutdownSignal`]. The ingest thread checks it once
//! per transport read, so shutdown latency is bounded by the poll interval.
//!
//! # Shutdown Behavior
//!
//! - [`GroundLink::shutdown`] triggers the signal and joins both threads before the
//!   transport is released
//! - A transport failure ends ingestion, triggers the signal so the ping thread
//!   stops too, and is returned from `shutdown`/`join`
//! - Samples already appended stay readable after shutdown

mod ingest;
mod ping;
mod stats;

pub use stats::{LinkStats, StatsSnapshot};

use crate::error::{Error, Result};
use crate::telemetry::StreamWriter;
use crate::transport::Transport;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Granularity of interruptible sleeps
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Cooperative stop flag shared by the link threads and their owner
///
/// Once triggered it stays triggered.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown; safe to call from any thread, any number of times
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Sleep for up to `timeout`, waking early on shutdown
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_triggered() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep((deadline - now).min(SHUTDOWN_POLL_INTERVAL));
        }
    }
}

/// Runtime parameters for a [`GroundLink`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSettings {
    /// Satellite id written into outbound Ping frames
    pub satellite_id: u8,
    /// Outbound Ping period, `None` disables the ping thread
    pub ping_interval: Option<Duration>,
}

/// Owns the transport and the background threads feeding a telemetry stream
pub struct GroundLink {
    transport: Arc<Mutex<Box<dyn Transport>>>,
    settings: LinkSettings,
    shutdown: ShutdownSignal,
    stats: Arc<LinkStats>,
    /// Ingest thread handle, carries the transport error if one ended the session
    ingest_handle: Option<JoinHandle<Result<()>>>,
    /// Ping thread handle - joined after the ingest thread
    ping_handle: Option<JoinHandle<()>>,
    started: bool,
}

impl GroundLink {
    /// Wrap a transport; no threads run until [`start`](Self::start)
    pub fn new<T: Transport + 'static>(transport: T, settings: LinkSettings) -> Self {
        Self {
            transport: Arc::new(Mutex::new(Box::new(transport))),
            settings,
            shutdown: ShutdownSignal::new(),
            stats: Arc::new(LinkStats::default()),
            ingest_handle: None,
            ping_handle: None,
            started: false,
        }
    }

    /// Start the ingest thread (and the ping thread if configured)
    ///
    /// `writer` becomes owned by the ingest thread. A link can only be started once.
    pub fn start(&mut self, writer: StreamWriter) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.started = true;

        let ingest_transport = Arc::clone(&self.transport);
        let ingest_shutdown = self.shutdown.clone();
        let ingest_stats = Arc::clone(&self.stats);
        self.ingest_handle = Some(
            thread::Builder::new()
                .name("tsat-ingest".to_string())
                .spawn(move || {
                    ingest::ingest_loop(ingest_transport, ingest_shutdown, writer, ingest_stats)
                })
                .map_err(|e| Error::Other(format!("Failed to spawn ingest thread: {}", e)))?,
        );

        if let Some(interval) = self.settings.ping_interval {
            let ping_transport = Arc::clone(&self.transport);
            let ping_shutdown = self.shutdown.clone();
            let ping_stats = Arc::clone(&self.stats);
            let satellite_id = self.settings.satellite_id;
            self.ping_handle = Some(
                thread::Builder::new()
                    .name("tsat-ping".to_string())
                    .spawn(move || {
                        ping::ping_loop(
                            ping_transport,
                            ping_shutdown,
                            satellite_id,
                            interval,
                            ping_stats,
                        );
                    })
                    .map_err(|e| Error::Other(format!("Failed to spawn ping thread: {}", e)))?,
            );
        }

        log::info!(
            "Ground link started (satellite {}, ping {:?})",
            self.settings.satellite_id,
            self.settings.ping_interval
        );
        Ok(())
    }

    /// Handle for requesting shutdown from elsewhere, e.g. a signal handler
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// True while the ingest thread is alive
    pub fn is_running(&self) -> bool {
        self.ingest_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Snapshot of the link counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop both threads and wait for them
    ///
    /// Returns the transport error that ended ingestion, if any. Calling it again
    /// after the threads are joined is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.ingest_handle.is_some() || self.ping_handle.is_some() {
            log::info!("Shutting down ground link...");
        }
        self.shutdown.trigger();
        self.join()
    }

    /// Wait for the threads to exit without requesting shutdown
    ///
    /// Returns once shutdown is triggered elsewhere or the transport fails. If the
    /// ingest thread panicked, shutdown is triggered here and the ping thread is
    /// joined before `Error::ThreadPanic` is returned.
    pub fn join(&mut self) -> Result<()> {
        let ingest_result = match self.ingest_handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                log::error!("Ingest thread panicked");
                // A panicking ingest thread never triggers shutdown itself
                self.shutdown.trigger();
                Err(Error::ThreadPanic)
            }),
            None => Ok(()),
        };

        // Shutdown is triggered by now, so this cannot block for long
        let ping_result = match self.ping_handle.take() {
            Some(handle) => handle.join().map_err(|_| Error::ThreadPanic),
            None => Ok(()),
        };

        if self.started {
            log::info!("Ground link stopped: {}", self.stats.snapshot());
        }
        ingest_result.and(ping_result)
    }
}

impl Drop for GroundLink {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_signal_is_shared() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        assert!(!signal.is_triggered());
        other.trigger();
        assert!(signal.is_triggered());
        other.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_wait_timeout_elapses() {
        let signal = ShutdownSignal::new();
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_timeout_wakes_on_trigger() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            trigger.trigger();
        });

        let start = Instant::now();
        assert!(signal.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }

    /// Transport whose reads panic; writes are recorded
    struct PanickingTransport {
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl Transport for PanickingTransport {
        fn read(&mut self, _buffer: &mut [u8]) -> Result<usize> {
            panic!("receiver fault");
        }

        fn write(&mut self, data: &[u8]) -> Result<usize> {
            self.written.lock().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ingest_panic_stops_ping_thread() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let transport = PanickingTransport {
            written: Arc::clone(&written),
        };
        let settings = LinkSettings {
            satellite_id: 2,
            ping_interval: Some(Duration::from_millis(5)),
        };
        let mut link = GroundLink::new(transport, settings);
        let signal = link.shutdown_signal();
        let (writer, _reader) = crate::telemetry::telemetry_stream();

        link.start(writer).unwrap();
        assert!(matches!(link.join(), Err(Error::ThreadPanic)));
        assert!(signal.is_triggered());
        assert!(!link.is_running());

        // Both threads are gone, so nothing writes after join returns
        let sent = written.lock().len();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(written.lock().len(), sent);

        assert!(link.shutdown().is_ok());
    }

    #[test]
    fn test_shutdown_before_start_is_noop() {
        let mut link = GroundLink::new(
            crate::transport::MockTransport::new(),
            LinkSettings::default(),
        );
        assert!(!link.is_running());
        assert!(link.shutdown().is_ok());
    }
}
