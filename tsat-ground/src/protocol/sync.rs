//! Frame synchronization
//!
//! Locates the `TSAT` magic marker so decoding can resume after dropped or
//! corrupted bytes. A miss is not fatal: the buffer may simply be short of a frame.

use super::constants::{MAGIC, MAGIC_LEN};
use crate::error::FrameError;

/// Find the first complete magic marker at or after `start`
///
/// Returns the offset immediately following the marker, ready for header decoding.
pub fn find_magic(bytes: &[u8], start: usize) -> Result<usize, FrameError> {
    let window = bytes.get(start..).unwrap_or(&[]);
    window
        .windows(MAGIC_LEN)
        .position(|w| w == MAGIC)
        .map(|idx| start + idx + MAGIC_LEN)
        .ok_or(FrameError::MagicNotFound {
            scanned: window.len(),
        })
}

/// Length of the longest suffix of `bytes` that is a proper prefix of the marker
///
/// Bytes in that suffix must be kept when discarding garbage, since the rest of the
/// marker may arrive in the next chunk.
pub fn partial_magic_suffix(bytes: &[u8]) -> usize {
    (1..MAGIC_LEN)
        .rev()
        .find(|&n| bytes.len() >= n && bytes[bytes.len() - n..] == MAGIC[..n])
        .unwrap_or(0)
}
