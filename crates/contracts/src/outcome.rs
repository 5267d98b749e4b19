//! Capture provenance marker.

use serde::{Deserialize, Serialize};

/// How a capture attempt terminated
///
/// Degradation is never fatal: every outcome carries a
/// [`crate::CaptureResult`], possibly with an empty `selected` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// Header observed, capture anchored at the match instant
    Synchronized,

    /// No header configured, capture started on the first byte
    FreeRunning,

    /// Header wait expired; fixed-duration best-effort drain was used instead
    Fallback,

    /// Header wait expired with fallback disabled; nothing captured
    SyncTimedOut,
}

impl CaptureOutcome {
    /// Whether the raw stream is anchored on a header match
    pub fn is_synchronized(&self) -> bool {
        matches!(self, Self::Synchronized)
    }
}
