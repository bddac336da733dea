//! TSAT ground station - telemetry link library
//!
//! Receives the TSAT satellite downlink over a serial byte stream, recovers frame
//! boundaries from the `TSAT` magic marker, decodes Ping and Telemetry packets and
//! publishes telemetry samples to an append-only stream that display consumers read
//! from their own threads.
//!
//! ## Layout
//!
//! - [`protocol`]: fixed-point codec, packet model, frame sync, decoder and encoder
//! - [`telemetry`]: single-writer, multi-reader telemetry stream
//! - [`transport`]: byte sources (serial port, in-memory mock)
//! - [`link`]: background ingestion and ping threads with cooperative shutdown

pub mod config;
pub mod error;
pub mod link;
pub mod protocol;
pub mod telemetry;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, FrameError, Result};
pub use link::{GroundLink, LinkSettings, ShutdownSignal};
pub use protocol::{Packet, TelemetryPacket};
pub use telemetry::telemetry_stream;
