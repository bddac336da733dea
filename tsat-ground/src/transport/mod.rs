//! Transport layer for I/O abstraction

use crate::error::{Error, Result};

mod mock;
mod serial;
pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Byte source/sink connecting the ground link to the receiver
///
/// Reads are pull-based and carry no frame alignment: a chunk may hold part of a
/// frame, several frames, or noise.
pub trait Transport: Send {
    /// Read available bytes into buffer
    ///
    /// Returns `Ok(0)` when no bytes arrived within the transport's poll interval and
    /// `Err(Error::Disconnected)` once the stream has ended.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Write data from buffer, returns number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Flush any pending writes (blocking until complete)
    fn flush(&mut self) -> Result<()>;

    /// Write the whole buffer, retrying short writes
    fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.write(data)? {
                0 => return Err(Error::Disconnected),
                n => data = &data[n..],
            }
        }
        Ok(())
    }
}
