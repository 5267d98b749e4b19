//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses `tokio::time::Instant` as the capture clock so that timing tests can
//!   run under a paused runtime
//! - Wall-clock gaps between bytes are the only framing signal on the wire

mod error;
mod frame;
mod outcome;
mod profile;
mod result;
mod source;
mod window;

pub use error::*;
pub use frame::{FrameSpec, HeaderPattern};
pub use outcome::CaptureOutcome;
pub use profile::*;
pub use result::CaptureResult;
pub use source::{ByteSource, LocalByteSource};
pub use window::CaptureWindow;
