//! # Framing
//!
//! Candidate frame extraction from a captured raw stream.
//!
//! Responsibilities:
//! - Locate every header occurrence in the captured buffer
//! - Slice fixed-length candidate frames (zero-copy)
//! - Leave selection to the orchestrator ("most recent frame wins")

mod extractor;

pub use extractor::extract_frames;
