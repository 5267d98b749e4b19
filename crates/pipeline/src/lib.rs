//! # Pipeline
//!
//! Capture orchestration: sequences synchronization, accumulation and
//! extraction, applies the fallback policy, and derives run statistics.

mod orchestrator;
mod stats;

pub use orchestrator::CaptureOrchestrator;
pub use stats::CaptureStats;
