//! Decoded telemetry shared between the ingestion thread and display consumers

pub mod stream;

pub use stream::{telemetry_stream, ReadAt, StreamCursor, StreamReader, StreamWriter};
