//! TSAT downlink protocol
//!
//! Frame format (all integers little-endian):
//!
//! ```text
//! ┌──────────────┬────────┬──────┬──────────────────────────────┐
//! │ MAGIC "TSAT" │ SAT_ID │ TYPE │ PAYLOAD                      │
//! │ 4 bytes      │ u8     │ u8   │ Ping: 4 bytes, Telemetry: 28 │
//! └──────────────┴────────┴──────┴──────────────────────────────┘
//! ```
//!
//! Decoding runs marker search ([`find_magic`]) then [`decode_packet`]; the
//! [`FrameReader`] composes both over a stream of arbitrary chunks.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod fixed_point;
pub mod packet;
pub mod sync;

pub use decoder::{decode_frame, decode_packet, FrameReader};
pub use encoder::{encode_ping, PingFrame};
pub use fixed_point::{decode_scaled, encode_scaled};
pub use packet::{Packet, PacketMeta, PacketType, Payload, PingPacket, TelemetryPacket};
pub use sync::find_magic;
