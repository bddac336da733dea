//! Append-only telemetry stream
//!
//! Single writer, any number of readers. The writer half is owned by the ingestion
//! thread; readers hold their own cursor (a plain index) and poll without waiting.
//!
//! # Guarantees
//!
//! - Samples are never removed or modified after `append`, so the value at an index
//!   is stable once visible
//! - `len()` never decreases
//! - Readers see samples in append order, one per index
//!
//! The sample list sits behind a `parking_lot::RwLock`; the write lock is held only
//! for a `Vec::push`, so readers are never held up for long.

use crate::protocol::TelemetryPacket;
use parking_lot::RwLock;
use std::sync::Arc;

/// Result of reading one index
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadAt {
    /// Sample at the requested index, and the index to read next
    Ready {
        sample: TelemetryPacket,
        next: usize,
    },
    /// Nothing appended at that index yet
    Pending,
}

/// Create an empty stream, returning its single writer and a reader
pub fn telemetry_stream() -> (StreamWriter, StreamReader) {
    let samples = Arc::new(RwLock::new(Vec::new()));
    (
        StreamWriter {
            samples: Arc::clone(&samples),
        },
        StreamReader { samples },
    )
}

/// Write half of the stream
///
/// Not `Clone`: only one writer exists per stream.
pub struct StreamWriter {
    samples: Arc<RwLock<Vec<TelemetryPacket>>>,
}

impl StreamWriter {
    /// Append one sample at the end
    pub fn append(&mut self, sample: TelemetryPacket) {
        self.samples.write().push(sample);
    }

    /// Number of samples appended so far
    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New reader onto this stream
    pub fn reader(&self) -> StreamReader {
        StreamReader {
            samples: Arc::clone(&self.samples),
        }
    }
}

/// Read half of the stream, cheap to clone
#[derive(Clone)]
pub struct StreamReader {
    samples: Arc<RwLock<Vec<TelemetryPacket>>>,
}

impl StreamReader {
    /// Read the sample at `cursor`, or `Pending` if it has not been appended
    pub fn read_at(&self, cursor: usize) -> ReadAt {
        match self.samples.read().get(cursor) {
            Some(&sample) => ReadAt::Ready {
                sample,
                next: cursor + 1,
            },
            None => ReadAt::Pending,
        }
    }

    /// Number of samples appended so far
    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor starting at index 0
    pub fn cursor(&self) -> StreamCursor {
        self.cursor_at(0)
    }

    /// Cursor starting at `position`
    pub fn cursor_at(&self, position: usize) -> StreamCursor {
        StreamCursor {
            reader: self.clone(),
            position,
        }
    }
}

/// A reader paired with its own position
///
/// Yields each sample once, in order, then `None` until more are appended.
#[derive(Clone)]
pub struct StreamCursor {
    reader: StreamReader,
    position: usize,
}

impl StreamCursor {
    /// Next unread sample, advancing the cursor
    pub fn next_sample(&mut self) -> Option<TelemetryPacket> {
        match self.reader.read_at(self.position) {
            ReadAt::Ready { sample, next } => {
                self.position = next;
                Some(sample)
            }
            ReadAt::Pending => None,
        }
    }

    /// Index of the next unread sample
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Samples appended but not yet read through this cursor
    pub fn backlog(&self) -> usize {
        self.reader.len().saturating_sub(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn sample(frame_count: u32) -> TelemetryPacket {
        TelemetryPacket {
            frame_count,
            time: frame_count as f64 * 0.1,
            ..TelemetryPacket::default()
        }
    }

    #[test]
    fn test_pending_before_append() {
        let (_writer, reader) = telemetry_stream();
        assert_eq!(reader.read_at(0), ReadAt::Pending);
        assert_eq!(reader.len(), 0);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_in_append_order() {
        let (mut writer, reader) = telemetry_stream();
        let mut cursor = 0;

        assert_eq!(reader.read_at(cursor), ReadAt::Pending);

        for i in 0..3 {
            writer.append(sample(i));
        }

        for i in 0..3 {
            match reader.read_at(cursor) {
                ReadAt::Ready { sample: s, next } => {
                    assert_eq!(s, sample(i));
                    assert_eq!(next, cursor + 1);
                    cursor = next;
                }
                ReadAt::Pending => panic!("sample {} missing", i),
            }
        }
        assert_eq!(reader.read_at(cursor), ReadAt::Pending);
    }

    #[test]
    fn test_len_tracks_appends() {
        let (mut writer, reader) = telemetry_stream();
        let mut last = 0;
        for i in 0..10 {
            writer.append(sample(i));
            let len = reader.len();
            assert!(len >= last);
            last = len;
        }
        assert_eq!(writer.len(), 10);
        assert_eq!(reader.len(), 10);
    }

    #[test]
    fn test_values_stable_after_append() {
        let (mut writer, reader) = telemetry_stream();
        writer.append(sample(7));
        let first = reader.read_at(0);
        writer.append(sample(8));
        writer.append(sample(9));
        assert_eq!(reader.read_at(0), first);
    }

    #[test]
    fn test_independent_cursors() {
        let (mut writer, reader) = telemetry_stream();
        let mut a = reader.cursor();
        let mut b = writer.reader().cursor();

        writer.append(sample(0));
        writer.append(sample(1));

        assert_eq!(a.next_sample(), Some(sample(0)));
        assert_eq!(a.backlog(), 1);
        assert_eq!(b.backlog(), 2);
        assert_eq!(b.next_sample(), Some(sample(0)));
        assert_eq!(b.next_sample(), Some(sample(1)));
        assert_eq!(b.next_sample(), None);
        assert_eq!(a.next_sample(), Some(sample(1)));
        assert_eq!(a.position(), 2);
    }

    #[test]
    fn test_cursor_at_offset() {
        let (mut writer, reader) = telemetry_stream();
        for i in 0..5 {
            writer.append(sample(i));
        }
        let mut cursor = reader.cursor_at(3);
        assert_eq!(cursor.next_sample(), Some(sample(3)));
        assert_eq!(cursor.next_sample(), Some(sample(4)));
        assert_eq!(cursor.next_sample(), None);
    }

    #[test]
    fn test_concurrent_reader_sees_ordered_samples() {
        let (mut writer, reader) = telemetry_stream();
        const COUNT: u32 = 2000;

        let consumer = thread::spawn(move || {
            let mut cursor = reader.cursor();
            let mut seen = Vec::with_capacity(COUNT as usize);
            while seen.len() < COUNT as usize {
                match cursor.next_sample() {
                    Some(s) => seen.push(s.frame_count),
                    None => thread::yield_now(),
                }
            }
            seen
        });

        for i in 0..COUNT {
            writer.append(sample(i));
        }

        let seen = consumer.join().unwrap();
        assert_eq!(seen, (0..COUNT).collect::<Vec<_>>());
    }
}
