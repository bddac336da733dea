//! Packet model for the TSAT downlink
//!
//! A [`Packet`] pairs [`PacketMeta`] with a typed [`Payload`]. Packets are only built
//! through [`Packet::ping`] and [`Packet::telemetry`], so the type recorded in the
//! metadata always matches the payload variant.

use super::constants::{
    HEADER_LEN, PING_PAYLOAD_LEN, TAG_PING, TAG_TELEMETRY, TELEMETRY_PAYLOAD_LEN,
};
use crate::error::FrameError;

/// Packet type tag carried in every frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Ping = TAG_PING,
    Telemetry = TAG_TELEMETRY,
}

impl PacketType {
    /// Wire tag value
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Payload length in bytes following the header
    #[inline]
    pub fn payload_len(self) -> usize {
        match self {
            PacketType::Ping => PING_PAYLOAD_LEN,
            PacketType::Telemetry => TELEMETRY_PAYLOAD_LEN,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            TAG_PING => Ok(PacketType::Ping),
            TAG_TELEMETRY => Ok(PacketType::Telemetry),
            _ => Err(FrameError::UnknownPacketType { tag }),
        }
    }
}

/// Packet metadata: who sent it and what it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketMeta {
    satellite_id: u8,
    packet_type: PacketType,
}

impl PacketMeta {
    #[inline]
    pub fn satellite_id(&self) -> u8 {
        self.satellite_id
    }

    #[inline]
    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }
}

/// Liveness probe, the only packet the ground station transmits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingPacket {
    pub counter: u32,
}

/// One telemetry sample
///
/// Every real-valued field is recovered from a fixed-point wire value with three
/// decimal digits. `frame_count` is transmitted unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetryPacket {
    pub frame_count: u32,
    /// Seconds since the flight computer started
    pub time: f64,
    /// Meters
    pub altitude: f64,
    /// Pascals
    pub pressure: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// m/s²
    pub acceleration_magnitude: f64,
    /// Ascent velocity, m/s
    pub velocity: f64,
}

/// Typed packet body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Ping(PingPacket),
    Telemetry(TelemetryPacket),
}

impl Payload {
    #[inline]
    pub fn packet_type(&self) -> PacketType {
        match self {
            Payload::Ping(_) => PacketType::Ping,
            Payload::Telemetry(_) => PacketType::Telemetry,
        }
    }
}

/// A decoded packet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packet {
    meta: PacketMeta,
    payload: Payload,
}

impl Packet {
    /// Build a Ping packet from `satellite_id`
    pub fn ping(satellite_id: u8, ping: PingPacket) -> Self {
        Self::with_payload(satellite_id, Payload::Ping(ping))
    }

    /// Build a Telemetry packet from `satellite_id`
    pub fn telemetry(satellite_id: u8, sample: TelemetryPacket) -> Self {
        Self::with_payload(satellite_id, Payload::Telemetry(sample))
    }

    fn with_payload(satellite_id: u8, payload: Payload) -> Self {
        Self {
            meta: PacketMeta {
                satellite_id,
                packet_type: payload.packet_type(),
            },
            payload,
        }
    }

    #[inline]
    pub fn meta(&self) -> &PacketMeta {
        &self.meta
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consume the packet, keeping only the payload
    #[inline]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Bytes this packet occupies after the magic marker
    #[inline]
    pub fn body_len(&self) -> usize {
        HEADER_LEN + self.meta.packet_type.payload_len()
    }
}
