//! Constants for the TSAT downlink wire format

// Frame marker ("TSAT" in ASCII)
pub const MAGIC: [u8; 4] = [84, 83, 65, 84];
pub const MAGIC_LEN: usize = MAGIC.len();

// Packet type tags
pub const TAG_PING: u8 = 1;
pub const TAG_TELEMETRY: u8 = 2;

// Packet sizes (bytes after the magic marker)
pub const HEADER_LEN: usize = 2; // satellite_id(1) + type_tag(1)
pub const PING_PAYLOAD_LEN: usize = 4; // counter(u32)
pub const TELEMETRY_FIELD_COUNT: usize = 7;
pub const TELEMETRY_PAYLOAD_LEN: usize = TELEMETRY_FIELD_COUNT * 4;

// Full frame sizes including the magic marker
pub const PING_FRAME_LEN: usize = MAGIC_LEN + HEADER_LEN + PING_PAYLOAD_LEN;
pub const TELEMETRY_FRAME_LEN: usize = MAGIC_LEN + HEADER_LEN + TELEMETRY_PAYLOAD_LEN;

// Fixed-point fields carry three decimal digits
pub const FIXED_POINT_SCALE: f64 = 1000.0;

// Initial reader buffer capacity
pub const READER_BUFFER_CAPACITY: usize = 4096;
