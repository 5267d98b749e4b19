//! Capture orchestrator - coordinates synchronizer, capture and extractor.
//!
//! Degradation is never fatal: synchronization timeouts turn into a fallback
//! drain or an empty result, and only transport failures surface as errors.

use acquisition::{IdleCapture, RawCapture, TimedReader};
use contracts::{
    ByteSource, CaptureError, CaptureOutcome, CaptureProfile, CaptureResult, FallbackConfig,
    FrameSpec, TimingConfig,
};
use framing::extract_frames;
use observability::record_capture_metrics;
use tracing::{debug, info, instrument, warn};

/// Orchestrator phases, in transition order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Idle,
    SeekingHeader,
    Accumulating,
    Extracted,
    FallbackCapture,
    Done,
}

/// Sequences one capture attempt end to end
///
/// All state is created fresh per attempt and dropped when [`run`] returns;
/// nothing persists across attempts.
///
/// [`run`]: CaptureOrchestrator::run
pub struct CaptureOrchestrator {
    spec: FrameSpec,
    timing: TimingConfig,
    fallback: FallbackConfig,
    state: CaptureState,
}

impl CaptureOrchestrator {
    pub fn new(spec: FrameSpec, timing: TimingConfig, fallback: FallbackConfig) -> Self {
        Self {
            spec,
            timing,
            fallback,
            state: CaptureState::Idle,
        }
    }

    /// Build an orchestrator from a validated profile
    pub fn from_profile(profile: &CaptureProfile) -> Result<Self, CaptureError> {
        Ok(Self::new(
            profile.frame_spec()?,
            profile.timing.clone(),
            profile.fallback.clone(),
        ))
    }

    /// Expected frame length, for shortfall reporting
    pub fn expected_len(&self) -> usize {
        self.spec.total_length
    }

    /// Run one capture attempt to completion
    ///
    /// Every terminal state yields a [`CaptureResult`]; "not enough bytes" is
    /// reported through `selected.len()`, never raised.
    ///
    /// # Errors
    /// Only [`CaptureError::Transport`] and [`CaptureError::Io`] propagate;
    /// synchronization timeouts are absorbed by the fallback policy.
    #[instrument(level = "info", name = "capture", skip(self, source), fields(header = %self.spec.header.to_hex(), total_length = self.spec.total_length))]
    pub async fn run<S: ByteSource>(mut self, source: S) -> Result<CaptureResult, CaptureError> {
        let mut reader = TimedReader::new(source, &self.timing);

        let (raw, outcome) = if self.spec.header.is_empty() {
            self.transition(CaptureState::Accumulating);
            let raw = IdleCapture::new(&mut reader)
                .capture(&self.spec, &self.timing)
                .await?;
            (raw, CaptureOutcome::FreeRunning)
        } else {
            self.transition(CaptureState::SeekingHeader);
            let attempt = IdleCapture::new(&mut reader)
                .capture(&self.spec, &self.timing)
                .await;
            match attempt {
                Ok(raw) => {
                    self.transition(CaptureState::Accumulating);
                    (raw, CaptureOutcome::Synchronized)
                }
                Err(e) if e.is_sync_timeout() && self.fallback.enabled => {
                    warn!(error = %e, drain_ms = self.fallback.duration_ms, "falling back to fixed-duration drain");
                    self.transition(CaptureState::FallbackCapture);
                    let drained = reader.read_for_duration(self.fallback.duration()).await?;
                    let raw = RawCapture {
                        stream: drained.bytes,
                        window: drained.window,
                    };
                    (raw, CaptureOutcome::Fallback)
                }
                Err(e) if e.is_sync_timeout() => {
                    warn!(error = %e, "fallback disabled, reporting an empty capture");
                    self.transition(CaptureState::Done);
                    let result = CaptureResult::empty(CaptureOutcome::SyncTimedOut);
                    record_capture_metrics(&result);
                    return Ok(result);
                }
                Err(e) => return Err(e),
            }
        };

        // A fallback drain is a best-effort raw capture; header-anchored
        // extraction applies only to synchronized and free-running streams.
        let frames = match outcome {
            CaptureOutcome::Fallback => Vec::new(),
            _ => {
                let frames =
                    extract_frames(&raw.stream, Some(&self.spec.header), self.spec.total_length);
                self.transition(CaptureState::Extracted);
                frames
            }
        };

        let result = CaptureResult::assemble(raw.stream, frames, raw.window, outcome);
        self.transition(CaptureState::Done);

        info!(
            outcome = ?result.outcome,
            raw_bytes = result.raw_stream.len(),
            frames = result.frame_count(),
            selected_bytes = result.selected.len(),
            "capture complete"
        );
        record_capture_metrics(&result);
        Ok(result)
    }

    fn transition(&mut self, next: CaptureState) {
        debug!(from = ?self.state, to = ?next, "capture state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use acquisition::{FailingByteSource, MockByteSource, ScriptedChunk};
    use contracts::{CaptureMode, HeaderPattern};

    use super::*;

    const HEADER: &[u8] = &[0x00, 0x11, 0x22, 0x33];

    fn spec(total_length: usize) -> FrameSpec {
        FrameSpec::new(HeaderPattern::from(HEADER), total_length).unwrap()
    }

    fn timing() -> TimingConfig {
        TimingConfig {
            mode: CaptureMode::UntilIdle,
            start_timeout_ms: Some(500),
            interbyte_timeout_ms: Some(300),
            header_wait_timeout_ms: Some(1_000),
            poll_interval_ms: 10,
            poll_chunk: 4096,
        }
    }

    fn fallback(enabled: bool) -> FallbackConfig {
        FallbackConfig {
            enabled,
            duration_ms: 400,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_synchronized_capture_selects_last_candidate() {
        // Two header occurrences; the second frame fits and wins.
        let stream: &[u8] = &[
            0xff, 0xff, 0x00, 0x11, 0x22, 0x33, 0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22, 0x33, 0xdd,
            0xee, 0x01, 0x02,
        ];
        let source = MockByteSource::new(vec![ScriptedChunk::at_ms(0, stream)]);

        let result = CaptureOrchestrator::new(spec(8), timing(), fallback(true))
            .run(source)
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Synchronized);
        assert_eq!(result.frame_count(), 2);
        // Leading noise was consumed during synchronization, so the captured
        // stream starts at the first header byte.
        assert_eq!(&result.selected[..], &stream[9..17]);
        assert!(!result.is_short(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_drain_yields_raw_stream() {
        // Header never appears; the drain collects whatever flows.
        let source = MockByteSource::new(vec![
            ScriptedChunk::at_ms(0, &[0xde, 0xad]),
            ScriptedChunk::at_ms(1_100, &[0xbe, 0xef]),
        ]);

        let result = CaptureOrchestrator::new(spec(8), timing(), fallback(true))
            .run(source)
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Fallback);
        assert!(result.frames.is_empty());
        assert_eq!(result.selected, result.raw_stream);
        assert_eq!(&result.raw_stream[..], &[0xbe, 0xef]);
        assert!(result.is_short(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_timeout_without_fallback_is_empty_result() {
        let source = MockByteSource::silent();
        let result = CaptureOrchestrator::new(spec(8), timing(), fallback(false))
            .run(source)
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::SyncTimedOut);
        assert!(result.raw_stream.is_empty());
        assert!(result.selected.is_empty());
        assert_eq!(result.shortfall(8), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_headerless_capture_is_free_running() {
        let free_spec = FrameSpec::new(HeaderPattern::default(), 4).unwrap();
        let source = MockByteSource::new(vec![ScriptedChunk::at_ms(0, b"abcdefgh")]);

        let result = CaptureOrchestrator::new(free_spec, timing(), fallback(true))
            .run(source)
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::FreeRunning);
        assert_eq!(result.frame_count(), 1);
        assert_eq!(&result.selected[..], b"abcd");
        assert_eq!(&result.raw_stream[..], b"abcdefgh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_propagate() {
        let err = CaptureOrchestrator::new(spec(8), timing(), fallback(true))
            .run(FailingByteSource::new("device unplugged"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Transport { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_capture_degrades_to_raw_stream() {
        // Header present but the stream ends before a full frame: no
        // candidate fits, selection degrades to the raw stream.
        let source = MockByteSource::new(vec![ScriptedChunk::at_ms(
            0,
            &[0x00, 0x11, 0x22, 0x33, 0xaa],
        )]);

        let result = CaptureOrchestrator::new(spec(8), timing(), fallback(true))
            .run(source)
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Synchronized);
        assert!(result.frames.is_empty());
        assert_eq!(result.selected, result.raw_stream);
        assert_eq!(result.shortfall(8), 3);
    }
}
