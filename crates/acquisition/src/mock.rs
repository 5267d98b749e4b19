//! Scripted byte sources for hardware-free testing.
//!
//! `MockByteSource` replays a chunk schedule against the capture clock, so
//! paused-runtime tests can exercise every timeout path deterministically.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use contracts::{ByteSource, CaptureError};
use tokio::time::Instant;

/// One scheduled burst of bytes
#[derive(Debug, Clone)]
pub struct ScriptedChunk {
    /// Arrival offset relative to the first poll
    pub offset: Duration,

    /// Burst payload
    pub data: Bytes,
}

impl ScriptedChunk {
    /// Convenience constructor with a millisecond offset
    pub fn at_ms(offset_ms: u64, data: &[u8]) -> Self {
        Self {
            offset: Duration::from_millis(offset_ms),
            data: Bytes::copy_from_slice(data),
        }
    }
}

/// Byte source replaying a scripted chunk schedule
///
/// The clock starts at the first poll; chunks become readable once their
/// offset has elapsed. Reads drain due bytes in order, up to the caller's
/// `max`.
#[derive(Debug)]
pub struct MockByteSource {
    schedule: VecDeque<ScriptedChunk>,
    ready: BytesMut,
    started: Option<Instant>,
}

impl MockByteSource {
    pub fn new(mut chunks: Vec<ScriptedChunk>) -> Self {
        chunks.sort_by_key(|c| c.offset);
        Self {
            schedule: chunks.into(),
            ready: BytesMut::new(),
            started: None,
        }
    }

    /// A source that never produces a byte
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Replay a binary blob in fixed-size chunks at a fixed cadence
    ///
    /// Chunk `i` becomes available at `i * interval`.
    pub fn from_blob(data: &[u8], chunk_size: usize, interval: Duration) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunks = data
            .chunks(chunk_size)
            .enumerate()
            .map(|(i, chunk)| ScriptedChunk {
                offset: interval * i as u32,
                data: Bytes::copy_from_slice(chunk),
            })
            .collect();
        Self::new(chunks)
    }

    fn elapsed(&self) -> Duration {
        self.started
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    fn promote_due(&mut self) {
        let elapsed = self.elapsed();
        while let Some(front) = self.schedule.front() {
            if front.offset <= elapsed {
                let chunk = self.schedule.pop_front().expect("front just observed");
                self.ready.extend_from_slice(&chunk.data);
            } else {
                break;
            }
        }
    }
}

impl ByteSource for MockByteSource {
    async fn read_some(&mut self, max: usize) -> Result<Bytes, CaptureError> {
        self.started.get_or_insert_with(Instant::now);
        self.promote_due();

        if self.ready.is_empty() || max == 0 {
            return Ok(Bytes::new());
        }
        let take = self.ready.len().min(max);
        Ok(self.ready.split_to(take).freeze())
    }

    fn bytes_available(&self) -> usize {
        let elapsed = self.elapsed();
        let due: usize = self
            .schedule
            .iter()
            .take_while(|c| c.offset <= elapsed)
            .map(|c| c.data.len())
            .sum();
        self.ready.len() + due
    }
}

/// Byte source that fails every read with a transport error
///
/// Models a device disconnect for error-propagation tests.
#[derive(Debug)]
pub struct FailingByteSource {
    message: String,
}

impl FailingByteSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ByteSource for FailingByteSource {
    async fn read_some(&mut self, _max: usize) -> Result<Bytes, CaptureError> {
        Err(CaptureError::transport(self.message.clone()))
    }

    fn bytes_available(&self) -> usize {
        0
    }
}
