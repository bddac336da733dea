//! TSAT Packet Decoder
//!
//! Frame format: [MAGIC 'TSAT'] [SAT_ID] [TYPE] [PAYLOAD]
//!
//! This module provides:
//! - `decode_packet`: Decode one packet from bytes that follow a magic marker
//! - `FrameReader`: Buffered reader that synchronizes on the marker across
//!   arbitrary chunk boundaries
//!
//! All multi-byte fields are little-endian regardless of host byte order.

use super::constants::{HEADER_LEN, MAGIC_LEN, READER_BUFFER_CAPACITY, TELEMETRY_FIELD_COUNT};
use super::fixed_point::decode_scaled;
use super::packet::{Packet, PacketType, PingPacket, TelemetryPacket};
use super::sync::{find_magic, partial_magic_suffix};
use crate::error::FrameError;

/// Decode one packet from a buffer aligned immediately after a magic marker
///
/// Trailing bytes past the packet are ignored; use [`Packet::body_len`] to find
/// where the next frame may start.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet, FrameError> {
    if bytes.len() < HEADER_LEN {
        return Err(FrameError::Truncated {
            packet_type: None,
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }

    let satellite_id = bytes[0];
    let packet_type = PacketType::try_from(bytes[1])?;

    let needed = HEADER_LEN + packet_type.payload_len();
    if bytes.len() < needed {
        return Err(FrameError::Truncated {
            packet_type: Some(packet_type),
            needed,
            available: bytes.len(),
        });
    }

    let payload = &bytes[HEADER_LEN..needed];
    let packet = match packet_type {
        PacketType::Ping => Packet::ping(
            satellite_id,
            PingPacket {
                counter: read_u32_le(payload, 0),
            },
        ),
        PacketType::Telemetry => Packet::telemetry(satellite_id, decode_telemetry(payload)),
    };

    Ok(packet)
}

/// Decode the first complete frame in `bytes`, marker included
///
/// One-shot counterpart of [`FrameReader`] for a buffer believed to hold a whole
/// frame: garbage before the marker is skipped, but a missing marker or truncated
/// frame is an error rather than a wait.
pub fn decode_frame(bytes: &[u8]) -> crate::Result<Packet> {
    let body_start = find_magic(bytes, 0)?;
    Ok(decode_packet(&bytes[body_start..])?)
}

/// Decode the 7-field telemetry payload; fields 1-6 are fixed-point
fn decode_telemetry(payload: &[u8]) -> TelemetryPacket {
    let mut raw = [0u32; TELEMETRY_FIELD_COUNT];
    for (i, field) in raw.iter_mut().enumerate() {
        *field = read_u32_le(payload, i * 4);
    }

    TelemetryPacket {
        frame_count: raw[0],
        time: decode_scaled(raw[1]),
        altitude: decode_scaled(raw[2]),
        pressure: decode_scaled(raw[3]),
        temperature: decode_scaled(raw[4]),
        acceleration_magnitude: decode_scaled(raw[5]),
        velocity: decode_scaled(raw[6]),
    }
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Buffered frame reader
///
/// Feed it arbitrary chunks with [`push`](Self::push) and drain packets with
/// [`next_packet`](Self::next_packet). Garbage before a marker is discarded, a
/// truncated frame is kept until its remaining bytes arrive, and a frame with an
/// unknown type tag is skipped by advancing past its marker only.
pub struct FrameReader {
    buffer: Vec<u8>,
    /// Bytes dropped since the last `take_discarded`
    discarded: usize,
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(READER_BUFFER_CAPACITY),
            discarded: 0,
        }
    }

    /// Append received bytes
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes buffered and not yet consumed
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Return and reset the count of garbage bytes dropped while synchronizing
    pub fn take_discarded(&mut self) -> usize {
        std::mem::take(&mut self.discarded)
    }

    /// Try to extract the next packet from buffered bytes
    ///
    /// - `Ok(Some(packet))`: a complete frame was decoded and consumed
    /// - `Ok(None)`: more bytes are needed (no marker yet, or frame truncated)
    /// - `Err(_)`: the frame at the marker was rejected and skipped; call again to
    ///   continue with the next marker
    pub fn next_packet(&mut self) -> Result<Option<Packet>, FrameError> {
        let body_start = match find_magic(&self.buffer, 0) {
            Ok(offset) => offset,
            Err(_) => {
                // Keep a possible partial marker at the tail
                let keep = partial_magic_suffix(&self.buffer);
                self.discard(self.buffer.len() - keep);
                return Ok(None);
            }
        };

        // Drop garbage before the marker
        let frame_start = body_start - MAGIC_LEN;
        if frame_start > 0 {
            self.discard(frame_start);
        }

        match decode_packet(&self.buffer[MAGIC_LEN..]) {
            Ok(packet) => {
                self.buffer.drain(..MAGIC_LEN + packet.body_len());
                Ok(Some(packet))
            }
            Err(e) if e.is_incomplete() => Ok(None),
            Err(e) => {
                // Skip only the marker so a marker inside this frame is still found
                self.discard(MAGIC_LEN);
                Err(e)
            }
        }
    }

    fn discard(&mut self, n: usize) {
        if n > 0 {
            self.buffer.drain(..n);
            self.discarded += n;
        }
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
