//! Deadline-bounded polling reads.
//!
//! Every stopping rule is expressed as a deadline computed once at operation
//! start and compared on each poll, so repeated `now()`-relative arithmetic
//! cannot drift.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use contracts::{ByteSource, CaptureError, CaptureWindow, TimingConfig};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::trace;

/// Bytes collected by one read operation plus arrival provenance
#[derive(Debug, Clone, Default)]
pub struct TimedRead {
    /// Collected bytes, possibly empty
    pub bytes: Bytes,

    /// First/last arrival timestamps of this read
    pub window: CaptureWindow,
}

impl TimedRead {
    fn empty() -> Self {
        Self::default()
    }
}

/// Wraps a [`ByteSource`] with elapsed-time accounting
///
/// A short read is a valid, non-error outcome: callers inspect the returned
/// length, they never get an error for "not enough bytes".
#[derive(Debug)]
pub struct TimedReader<S> {
    source: S,
    poll_interval: Duration,
    poll_chunk: usize,
}

impl<S: ByteSource> TimedReader<S> {
    /// Create a reader with polling parameters taken from the profile
    pub fn new(source: S, timing: &TimingConfig) -> Self {
        Self::with_polling(source, timing.poll_interval(), timing.poll_chunk)
    }

    /// Create a reader with explicit polling parameters
    pub fn with_polling(source: S, poll_interval: Duration, poll_chunk: usize) -> Self {
        Self {
            source,
            poll_interval,
            poll_chunk: poll_chunk.max(1),
        }
    }

    /// Sleep applied between empty polls
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Read up to `n` bytes, stopping early on a timeout
    ///
    /// - `start_timeout`: budget for the first byte; `None` waits indefinitely
    /// - `interbyte_timeout`: once bytes flow, the maximum tolerated gap
    pub async fn read_exact(
        &mut self,
        n: usize,
        start_timeout: Option<Duration>,
        interbyte_timeout: Option<Duration>,
    ) -> Result<TimedRead, CaptureError> {
        self.collect(Some(n), start_timeout, interbyte_timeout, None)
            .await
    }

    /// Like [`read_exact`](Self::read_exact), but the idle clock starts at
    /// `resumed_at` instead of at the first byte
    ///
    /// Used after header synchronization: the header bytes already arrived,
    /// so the capture is one continuous idle window anchored at the match.
    pub async fn resume_exact(
        &mut self,
        n: usize,
        interbyte_timeout: Option<Duration>,
        resumed_at: Instant,
    ) -> Result<TimedRead, CaptureError> {
        self.collect(Some(n), None, interbyte_timeout, Some(resumed_at))
            .await
    }

    /// Drain whatever arrives until the line goes idle
    ///
    /// No upper bound on byte count; each poll requests everything the
    /// transport reports as buffered (at least one byte).
    pub async fn read_until_idle(
        &mut self,
        start_timeout: Option<Duration>,
        interbyte_timeout: Option<Duration>,
    ) -> Result<TimedRead, CaptureError> {
        self.collect(None, start_timeout, interbyte_timeout, None)
            .await
    }

    /// Like [`read_until_idle`](Self::read_until_idle), with the idle clock
    /// seeded at `resumed_at`
    pub async fn resume_until_idle(
        &mut self,
        interbyte_timeout: Option<Duration>,
        resumed_at: Instant,
    ) -> Result<TimedRead, CaptureError> {
        self.collect(None, None, interbyte_timeout, Some(resumed_at))
            .await
    }

    /// Drain unconditionally for a fixed wall-clock span
    ///
    /// Idle gaps do not terminate this read; it is the fallback capture
    /// primitive for streams that never presented a header.
    pub async fn read_for_duration(
        &mut self,
        duration: Duration,
    ) -> Result<TimedRead, CaptureError> {
        let deadline = Instant::now() + duration;
        let mut buf = BytesMut::new();
        let mut window = CaptureWindow::default();

        while Instant::now() < deadline {
            let want = self.source.bytes_available().clamp(1, self.poll_chunk);
            let chunk = self.source.read_some(want).await?;
            if chunk.is_empty() {
                let next_poll = Instant::now() + self.poll_interval;
                sleep_until(next_poll.min(deadline)).await;
            } else {
                window.record(Instant::now());
                buf.extend_from_slice(&chunk);
            }
        }

        trace!(bytes = buf.len(), "fixed-duration drain complete");
        Ok(TimedRead {
            bytes: buf.freeze(),
            window,
        })
    }

    /// Shared polling loop behind all bounded reads
    async fn collect(
        &mut self,
        limit: Option<usize>,
        start_timeout: Option<Duration>,
        interbyte_timeout: Option<Duration>,
        seed: Option<Instant>,
    ) -> Result<TimedRead, CaptureError> {
        if limit == Some(0) {
            return Ok(TimedRead::empty());
        }

        let start_deadline = start_timeout.map(|t| Instant::now() + t);
        let mut buf = BytesMut::new();
        let mut window = CaptureWindow::default();
        let mut last_activity = seed;

        loop {
            if let Some(n) = limit {
                if buf.len() >= n {
                    break;
                }
            }

            let want = match limit {
                Some(n) => (n - buf.len()).min(self.poll_chunk),
                None => self.source.bytes_available().clamp(1, self.poll_chunk),
            };

            let chunk = self.source.read_some(want).await?;
            if chunk.is_empty() {
                let now = Instant::now();
                match last_activity {
                    None => {
                        if let Some(deadline) = start_deadline {
                            if now > deadline {
                                trace!("start timeout expired before first byte");
                                break;
                            }
                        }
                    }
                    Some(last) => {
                        if let Some(gap) = interbyte_timeout {
                            if now.saturating_duration_since(last) > gap {
                                trace!(bytes = buf.len(), "interbyte gap exceeded, read complete");
                                break;
                            }
                        }
                    }
                }
                sleep(self.poll_interval).await;
                continue;
            }

            let now = Instant::now();
            window.record(now);
            last_activity = Some(now);
            buf.extend_from_slice(&chunk);
        }

        Ok(TimedRead {
            bytes: buf.freeze(),
            window,
        })
    }
}
