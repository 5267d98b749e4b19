//! Header pattern synchronization.

use std::collections::VecDeque;
use std::time::Duration;

use contracts::{ByteSource, CaptureError, HeaderPattern};
use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::reader::TimedReader;

/// Scans an incoming byte stream for a fixed pattern
///
/// Maintains a sliding window capped at the pattern length and succeeds the
/// instant the trailing window equals the pattern byte-for-byte. Headers are
/// short, so a linear trailing-slice comparison per byte is the contract;
/// there is no partial-match table.
pub struct HeaderSynchronizer<'a, S: ByteSource> {
    reader: &'a mut TimedReader<S>,
}

impl<'a, S: ByteSource> HeaderSynchronizer<'a, S> {
    pub fn new(reader: &'a mut TimedReader<S>) -> Self {
        Self { reader }
    }

    /// Block until the pattern appears or the wait budget expires
    ///
    /// Returns `true` on a match (the pattern bytes have been consumed from
    /// the source), `false` on timeout. An empty pattern succeeds immediately
    /// without consuming input. `timeout = None` blocks indefinitely.
    pub async fn wait_for_header(
        &mut self,
        header: &HeaderPattern,
        timeout: Option<Duration>,
    ) -> Result<bool, CaptureError> {
        if header.is_empty() {
            return Ok(true);
        }

        let deadline = timeout.map(|t| Instant::now() + t);
        let mut window: VecDeque<u8> = VecDeque::with_capacity(header.len());

        loop {
            let chunk = self.reader.source_mut().read_some(1).await?;
            match chunk.first() {
                Some(&byte) => {
                    if window.len() == header.len() {
                        window.pop_front();
                    }
                    window.push_back(byte);
                    if window.len() == header.len()
                        && window.iter().eq(header.as_slice().iter())
                    {
                        debug!(pattern = %header.to_hex(), "header matched");
                        return Ok(true);
                    }
                }
                None => {
                    if let Some(deadline) = deadline {
                        if Instant::now() > deadline {
                            trace!(pattern = %header.to_hex(), "header wait expired");
                            return Ok(false);
                        }
                    }
                    sleep(self.reader.poll_interval()).await;
                }
            }
        }
    }
}
