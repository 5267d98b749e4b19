//! # Acquisition
//!
//! Byte stream acquisition module.
//!
//! Responsibilities:
//! - Deadline-bounded polling reads over any [`contracts::ByteSource`]
//! - Header pattern synchronization (trailing-window equality)
//! - Idle-delimited and exact-length accumulation
//! - Scripted mock source for hardware-free testing
//!
//! ## Usage Example
//!
//! ```ignore
//! use acquisition::{IdleCapture, TimedReader};
//!
//! let mut reader = TimedReader::new(source, &profile.timing);
//! let raw = IdleCapture::new(&mut reader)
//!     .capture(&spec, &profile.timing)
//!     .await?;
//! println!("captured {} bytes", raw.stream.len());
//! ```

mod capture;
mod mock;
mod reader;
mod sync;

pub use capture::{IdleCapture, RawCapture};
pub use mock::{FailingByteSource, MockByteSource, ScriptedChunk};
pub use reader::{TimedRead, TimedReader};
pub use sync::HeaderSynchronizer;
