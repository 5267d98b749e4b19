//! CaptureResult - pipeline output
//!
//! Owned by the caller once the orchestrator returns; candidate frames are
//! zero-copy slices of the raw stream.

use bytes::Bytes;

use crate::{CaptureOutcome, CaptureWindow};

/// Serial framing overhead per byte: 8 data bits plus implied start/stop bits.
const BITS_PER_BYTE_ON_WIRE: f64 = 10.0;

/// Result of one capture attempt
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Everything captured, header included when synchronized
    pub raw_stream: Bytes,

    /// Header-anchored candidate frames in ascending position order
    pub frames: Vec<Bytes>,

    /// The authoritative frame: last candidate, or the raw stream as a
    /// degraded-but-useful fallback when no candidate exists
    pub selected: Bytes,

    /// First/last byte arrival timestamps
    pub window: CaptureWindow,

    /// How this capture terminated
    pub outcome: CaptureOutcome,
}

impl CaptureResult {
    /// Assemble a result, applying the "most recent frame wins" selection rule
    pub fn assemble(
        raw_stream: Bytes,
        frames: Vec<Bytes>,
        window: CaptureWindow,
        outcome: CaptureOutcome,
    ) -> Self {
        let selected = frames.last().cloned().unwrap_or_else(|| raw_stream.clone());
        Self {
            raw_stream,
            frames,
            selected,
            window,
            outcome,
        }
    }

    /// An empty result for attempts that never captured a byte
    pub fn empty(outcome: CaptureOutcome) -> Self {
        Self::assemble(Bytes::new(), Vec::new(), CaptureWindow::default(), outcome)
    }

    /// Number of candidate frames found
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether the selected frame is shorter than the expected length
    pub fn is_short(&self, expected: usize) -> bool {
        self.selected.len() < expected
    }

    /// Missing byte count relative to the expected length
    pub fn shortfall(&self, expected: usize) -> usize {
        expected.saturating_sub(self.selected.len())
    }

    /// Post-hoc line-rate estimate in bits per second
    ///
    /// Defined only when both window timestamps are set, the span is
    /// non-zero, and more than one byte was selected.
    pub fn estimated_bits_per_second(&self) -> Option<f64> {
        let span = self.window.span()?;
        if span.is_zero() || self.selected.len() <= 1 {
            return None;
        }
        Some(self.selected.len() as f64 * BITS_PER_BYTE_ON_WIRE / span.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    #[test]
    fn test_selection_prefers_last_frame() {
        let raw = Bytes::from_static(b"xxABCyyABCzz");
        let frames = vec![raw.slice(2..5), raw.slice(7..10)];
        let result = CaptureResult::assemble(
            raw.clone(),
            frames,
            CaptureWindow::default(),
            CaptureOutcome::Synchronized,
        );
        assert_eq!(result.selected, raw.slice(7..10));
        assert_eq!(result.frame_count(), 2);
    }

    #[test]
    fn test_selection_degrades_to_raw_stream() {
        let raw = Bytes::from_static(b"partial");
        let result = CaptureResult::assemble(
            raw.clone(),
            Vec::new(),
            CaptureWindow::default(),
            CaptureOutcome::Fallback,
        );
        assert_eq!(result.selected, raw);
        assert!(result.is_short(16));
        assert_eq!(result.shortfall(16), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_estimate() {
        let mut window = CaptureWindow::default();
        window.record(Instant::now());
        tokio::time::advance(Duration::from_secs(1)).await;
        window.record(Instant::now());

        let result = CaptureResult::assemble(
            Bytes::from(vec![0u8; 100]),
            Vec::new(),
            window,
            CaptureOutcome::FreeRunning,
        );
        // 100 bytes * 10 bits over one second
        let bps = result.estimated_bits_per_second().unwrap();
        assert!((bps - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_estimate_undefined_without_span() {
        let result = CaptureResult::empty(CaptureOutcome::SyncTimedOut);
        assert_eq!(result.estimated_bits_per_second(), None);
    }
}
