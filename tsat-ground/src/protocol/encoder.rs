//! Outbound frame encoding
//!
//! The ground station only ever transmits Ping packets, so [`PingFrame`] is the sole
//! encoder. Telemetry has no encoder at all rather than a runtime rejection.
//!
//! # Layout
//!
//! ```text
//! [84 83 65 84] [SAT_ID] [0x01] [COUNTER u32 LE]
//! ```

use super::constants::{MAGIC, MAGIC_LEN, PING_FRAME_LEN};
use super::packet::{PacketType, PingPacket};
use crate::error::Result;
use crate::transport::Transport;

/// Encoded Ping frame, ready to write to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFrame {
    data: [u8; PING_FRAME_LEN],
}

impl PingFrame {
    /// Encode `ping` addressed from `satellite_id`
    pub fn new(satellite_id: u8, ping: PingPacket) -> Self {
        let mut data = [0u8; PING_FRAME_LEN];
        data[..MAGIC_LEN].copy_from_slice(&MAGIC);
        data[MAGIC_LEN] = satellite_id;
        data[MAGIC_LEN + 1] = PacketType::Ping.tag();
        data[MAGIC_LEN + 2..].copy_from_slice(&ping.counter.to_le_bytes());
        Self { data }
    }

    /// Frame bytes including the magic marker
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Rewrite the counter in place, keeping marker and header
    #[inline]
    pub fn set_counter(&mut self, counter: u32) {
        self.data[MAGIC_LEN + 2..].copy_from_slice(&counter.to_le_bytes());
    }

    /// Write the whole frame to `transport` and flush it
    pub fn send_to(&self, transport: &mut dyn Transport) -> Result<()> {
        transport.write_all(self.as_bytes())?;
        transport.flush()
    }
}

/// Encode a Ping frame as raw bytes
pub fn encode_ping(satellite_id: u8, ping: PingPacket) -> [u8; PING_FRAME_LEN] {
    PingFrame::new(satellite_id, ping).data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_packet, find_magic, Packet};
    use crate::transport::MockTransport;
    use proptest::prelude::*;

    #[test]
    fn test_encode_ping_layout() {
        let bytes = encode_ping(3, PingPacket { counter: 42 });
        assert_eq!(bytes, [84, 83, 65, 84, 3, 1, 42, 0, 0, 0]);
    }

    #[test]
    fn test_counter_little_endian() {
        let frame = PingFrame::new(0, PingPacket { counter: 0x0403_0201 });
        assert_eq!(&frame.as_bytes()[6..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_frame_reuse() {
        let mut frame = PingFrame::new(9, PingPacket { counter: 1 });
        frame.set_counter(2);
        assert_eq!(frame, PingFrame::new(9, PingPacket { counter: 2 }));
    }

    #[test]
    fn test_send_to_transport() {
        let mut transport = MockTransport::new();
        PingFrame::new(3, PingPacket { counter: 42 })
            .send_to(&mut transport)
            .unwrap();
        assert_eq!(
            transport.get_written(),
            encode_ping(3, PingPacket { counter: 42 })
        );
    }

    proptest! {
        #[test]
        fn prop_ping_round_trip(satellite_id in any::<u8>(), counter in any::<u32>()) {
            let ping = PingPacket { counter };
            let bytes = encode_ping(satellite_id, ping);

            let body_start = find_magic(&bytes, 0).unwrap();
            let packet = decode_packet(&bytes[body_start..]).unwrap();

            prop_assert_eq!(packet, Packet::ping(satellite_id, ping));
        }
    }
}
