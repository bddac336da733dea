//! Error types for the TSAT ground link

use crate::protocol::PacketType;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Ground link error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Per-frame decode condition surfaced outside the reader
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Byte source reached end of stream
    #[error("Transport disconnected")]
    Disconnected,

    /// Link threads were already started
    #[error("Link already started")]
    AlreadyStarted,

    /// A link thread panicked
    #[error("Thread panicked")]
    ThreadPanic,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Recoverable per-frame conditions.
///
/// None of these abort ingestion: the reader waits for more bytes or skips to the
/// next magic marker. Each variant carries enough detail to be logged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// No complete magic marker in the scanned bytes
    #[error("Magic marker not found in {scanned} bytes")]
    MagicNotFound {
        /// Number of bytes searched
        scanned: usize,
    },

    /// Header carried a type tag with no known packet variant
    #[error("Unknown packet type: {tag}")]
    UnknownPacketType {
        /// Offending tag value
        tag: u8,
    },

    /// Frame body shorter than its packet type requires
    #[error("Truncated {packet_type:?} frame: need {needed} bytes, have {available}")]
    Truncated {
        /// Packet type from the header, `None` if the header itself is incomplete
        packet_type: Option<PacketType>,
        /// Bytes required after the magic marker
        needed: usize,
        /// Bytes available after the magic marker
        available: usize,
    },
}

impl FrameError {
    /// True when the condition clears once more bytes arrive
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            FrameError::MagicNotFound { .. } | FrameError::Truncated { .. }
        )
    }
}
