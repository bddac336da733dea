//! Fixed-point codec for scaled telemetry fields
//!
//! Real-valued telemetry is transmitted as an unsigned 32-bit integer holding the
//! value in thousandths. The raw integers never leave the decoder.

use super::constants::FIXED_POINT_SCALE;

/// Convert a raw wire value to its real value (`raw / 1000`)
#[inline]
pub fn decode_scaled(raw: u32) -> f64 {
    raw as f64 / FIXED_POINT_SCALE
}

/// Convert a real value to the nearest raw wire value
///
/// Saturates into the `u32` range: negative values and NaN encode as 0, values past
/// the top of the range encode as `u32::MAX`.
#[inline]
pub fn encode_scaled(value: f64) -> u32 {
    // `as` casts from float saturate and map NaN to 0
    (value * FIXED_POINT_SCALE).round() as u32
}
