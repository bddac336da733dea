//! Mock transport for testing

use super::Transport;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory transport; clones share the same buffers
///
/// Bytes injected with [`inject_read`](Self::inject_read) are handed out in
/// chunks of at most `chunk_size`, so tests can exercise frames split across reads.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    write_buffer: Vec<u8>,
    chunk_size: usize,
    closed: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::with_chunk_size(usize::MAX)
    }

    /// Create a mock transport returning at most `chunk_size` bytes per read
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                read_buffer: VecDeque::new(),
                write_buffer: Vec::new(),
                chunk_size: chunk_size.max(1),
                closed: false,
            })),
        }
    }

    /// Inject data to be read
    pub fn inject_read(&self, data: &[u8]) {
        self.inner.lock().read_buffer.extend(data);
    }

    /// End the stream once injected data has been read
    pub fn close(&self) {
        self.inner.lock().closed = true;
    }

    /// Bytes injected but not read yet
    pub fn pending_read(&self) -> usize {
        self.inner.lock().read_buffer.len()
    }

    /// Get all written data
    pub fn get_written(&self) -> Vec<u8> {
        self.inner.lock().write_buffer.clone()
    }

    /// Clear written data
    pub fn clear_written(&self) {
        self.inner.lock().write_buffer.clear();
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.read_buffer.is_empty() && inner.closed {
            return Err(Error::Disconnected);
        }

        let available = inner.read_buffer.len().min(buffer.len()).min(inner.chunk_size);
        for (slot, byte) in buffer.iter_mut().zip(inner.read_buffer.drain(..available)) {
            *slot = byte;
        }

        Ok(available)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Disconnected);
        }
        inner.write_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunked_reads() {
        let mut transport = MockTransport::with_chunk_size(3);
        transport.inject_read(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 16];
        assert_eq!(transport.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(transport.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_close_after_drain() {
        let mut transport = MockTransport::new();
        transport.inject_read(&[9]);
        transport.close();

        let mut buf = [0u8; 4];
        assert_eq!(transport.read(&mut buf).unwrap(), 1);
        assert!(matches!(transport.read(&mut buf), Err(Error::Disconnected)));
    }

    #[test]
    fn test_write_all_shared_between_clones() {
        let transport = MockTransport::new();
        let mut writer = transport.clone();
        writer.write_all(&[84, 83, 65, 84]).unwrap();
        assert_eq!(transport.get_written(), vec![84, 83, 65, 84]);

        transport.clear_written();
        assert!(transport.get_written().is_empty());
    }
}
