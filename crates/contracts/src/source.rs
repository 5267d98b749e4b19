//! ByteSource trait - byte stream input abstraction
//!
//! Defines a unified interface for byte producers, decoupling the acquisition
//! engine from concrete transports. A real serial port and the scripted mock
//! source implement the same trait.

use bytes::Bytes;

use crate::CaptureError;

/// Byte stream source trait
///
/// A single poll may block up to the transport's own per-call read timeout,
/// configured out-of-band, but must never block indefinitely. An empty result
/// is a normal outcome meaning "nothing arrived during this poll".
///
/// # Example
///
/// ```ignore
/// let mut source: SerialByteSource = open_port(&profile.transport)?;
/// let chunk = source.read_some(4096).await?;
/// if chunk.is_empty() {
///     // idle poll, caller decides whether the gap ends the capture
/// }
/// ```
#[trait_variant::make(ByteSource: Send)]
pub trait LocalByteSource {
    /// Read up to `max` bytes, returning whatever arrived within one poll
    ///
    /// # Errors
    /// Returns [`CaptureError::Transport`] on device failure; transport errors
    /// abort the capture in progress and surface to the caller unchanged.
    async fn read_some(&mut self, max: usize) -> Result<Bytes, CaptureError>;

    /// Best-effort hint of bytes already buffered by the transport
    ///
    /// May report 0 even if bytes are about to arrive; used only to size the
    /// next poll, never for control flow.
    fn bytes_available(&self) -> usize;
}
