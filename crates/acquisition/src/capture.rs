//! Idle-delimited capture engine.
//!
//! Sequences header synchronization and accumulation into one capture
//! attempt. The capture is a single continuous idle-timeout window: header
//! consumption anchors the clock at the match instant, it never resets or
//! extends the interbyte budget.

use bytes::BytesMut;
use contracts::{
    ByteSource, CaptureError, CaptureMode, CaptureWindow, FrameSpec, TimingConfig,
};
use metrics::{counter, histogram};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::reader::{TimedRead, TimedReader};
use crate::sync::HeaderSynchronizer;

/// Raw stream captured by one attempt, before frame extraction
#[derive(Debug, Clone)]
pub struct RawCapture {
    /// Accumulated bytes, header included when one was configured
    pub stream: bytes::Bytes,

    /// Arrival provenance; anchored at the header match when synchronized
    pub window: CaptureWindow,
}

/// Accumulates bytes until the stream goes idle or the frame is complete
pub struct IdleCapture<'a, S: ByteSource> {
    reader: &'a mut TimedReader<S>,
}

impl<'a, S: ByteSource> IdleCapture<'a, S> {
    pub fn new(reader: &'a mut TimedReader<S>) -> Self {
        Self { reader }
    }

    /// Run one capture attempt
    ///
    /// With a non-empty header, synchronizes first and seeds the output with
    /// the already-consumed header bytes. A silent stream after a successful
    /// match still succeeds, with `first_byte_time == last_byte_time` at the
    /// match instant.
    ///
    /// # Errors
    /// - [`CaptureError::SyncTimeout`] when the header wait budget expires;
    ///   the orchestrator's fallback policy decides what happens next
    /// - [`CaptureError::Transport`] from the underlying source, unchanged
    #[instrument(level = "debug", name = "idle_capture", skip(self, spec, timing), fields(header = %spec.header.to_hex(), total_length = spec.total_length))]
    pub async fn capture(
        &mut self,
        spec: &FrameSpec,
        timing: &TimingConfig,
    ) -> Result<RawCapture, CaptureError> {
        if spec.header.is_empty() {
            return self.free_running(spec, timing).await;
        }

        let wait_started = Instant::now();
        let synced = HeaderSynchronizer::new(self.reader)
            .wait_for_header(&spec.header, timing.header_wait_timeout())
            .await?;

        if !synced {
            counter!("framegrab_sync_timeouts_total").increment(1);
            return Err(CaptureError::sync_timeout(
                wait_started.elapsed().as_millis() as u64,
                spec.header.to_hex(),
            ));
        }

        let matched_at = Instant::now();
        histogram!("framegrab_header_wait_ms")
            .record(wait_started.elapsed().as_secs_f64() * 1000.0);
        debug!("synchronized, accumulating remainder");

        let mut window = CaptureWindow::default();
        window.record(matched_at);

        let mut buf = BytesMut::from(spec.header.as_slice());
        let rest = match timing.mode {
            CaptureMode::UntilIdle => {
                self.reader
                    .resume_until_idle(timing.interbyte_timeout(), matched_at)
                    .await?
            }
            CaptureMode::ExactLength => {
                let remain = spec.remainder_len();
                if remain == 0 {
                    TimedRead::default()
                } else {
                    self.reader
                        .resume_exact(remain, timing.interbyte_timeout(), matched_at)
                        .await?
                }
            }
        };

        buf.extend_from_slice(&rest.bytes);
        window.absorb(&rest.window);

        counter!("framegrab_bytes_captured_total").increment(buf.len() as u64);
        Ok(RawCapture {
            stream: buf.freeze(),
            window,
        })
    }

    /// Capture without synchronization, starting on the first byte
    async fn free_running(
        &mut self,
        spec: &FrameSpec,
        timing: &TimingConfig,
    ) -> Result<RawCapture, CaptureError> {
        let read = match timing.mode {
            CaptureMode::UntilIdle => {
                self.reader
                    .read_until_idle(timing.start_timeout(), timing.interbyte_timeout())
                    .await?
            }
            CaptureMode::ExactLength => {
                self.reader
                    .read_exact(
                        spec.total_length,
                        timing.start_timeout(),
                        timing.interbyte_timeout(),
                    )
                    .await?
            }
        };

        counter!("framegrab_bytes_captured_total").increment(read.bytes.len() as u64);
        Ok(RawCapture {
            stream: read.bytes,
            window: read.window,
        })
    }
}
