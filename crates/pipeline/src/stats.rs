//! Capture run statistics.

use std::time::Duration;

use contracts::{CaptureOutcome, CaptureResult};
use serde::Serialize;

/// Statistics derived from one capture run
#[derive(Debug, Clone, Serialize)]
pub struct CaptureStats {
    /// How the capture terminated
    pub outcome: CaptureOutcome,

    /// Total bytes in the raw stream
    pub raw_bytes: usize,

    /// Number of header-anchored candidate frames
    pub frame_count: usize,

    /// Length of the selected frame
    pub selected_bytes: usize,

    /// Configured frame length
    pub expected_bytes: usize,

    /// Wall-clock duration of the whole run
    pub duration_ms: u64,

    /// First-to-last byte span, when at least one byte arrived
    pub active_span_ms: Option<u64>,

    /// Post-hoc line-rate estimate in bits per second
    pub estimated_bps: Option<f64>,
}

impl CaptureStats {
    /// Derive statistics from a finished capture
    pub fn from_result(result: &CaptureResult, expected: usize, duration: Duration) -> Self {
        Self {
            outcome: result.outcome,
            raw_bytes: result.raw_stream.len(),
            frame_count: result.frame_count(),
            selected_bytes: result.selected.len(),
            expected_bytes: expected,
            duration_ms: duration.as_millis() as u64,
            active_span_ms: result.window.span().map(|s| s.as_millis() as u64),
            estimated_bps: result.estimated_bits_per_second(),
        }
    }

    /// Whether the selected frame came up short of the expected length
    pub fn is_short(&self) -> bool {
        self.selected_bytes < self.expected_bytes
    }

    /// Missing byte count relative to the expected length
    pub fn shortfall(&self) -> usize {
        self.expected_bytes.saturating_sub(self.selected_bytes)
    }

    /// Selected-frame completeness as a percentage
    pub fn completion_pct(&self) -> f64 {
        if self.expected_bytes > 0 {
            (self.selected_bytes as f64 / self.expected_bytes as f64) * 100.0
        } else {
            100.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Capture Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Outcome: {:?}", self.outcome);
        println!("   ├─ Duration: {:.2}s", self.duration_ms as f64 / 1000.0);
        println!("   ├─ Raw bytes: {}", self.raw_bytes);
        println!("   ├─ Candidate frames: {}", self.frame_count);
        println!(
            "   └─ Selected frame: {} / {} bytes ({:.1}%)",
            self.selected_bytes,
            self.expected_bytes,
            self.completion_pct()
        );

        println!("\n📈 Line Timing");
        match self.active_span_ms {
            Some(span) => println!("   ├─ Active span: {} ms", span),
            None => println!("   ├─ Active span: n/a (no bytes captured)"),
        }
        match self.estimated_bps {
            Some(bps) => println!("   └─ Estimated rate: {:.0} bps", bps),
            None => println!("   └─ Estimated rate: n/a"),
        }

        if self.is_short() {
            println!("\n⚠️  Short capture: {} bytes missing", self.shortfall());
        }

        println!();
    }
}
