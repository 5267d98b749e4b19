//! Byte sources backing the capture engine.
//!
//! The physical serial transport lives behind the `real-serial` feature;
//! replay mode reuses the scripted source and needs no hardware.

use std::path::Path;
use std::time::Duration;

use acquisition::MockByteSource;
use anyhow::{Context, Result};

#[cfg(feature = "real-serial")]
pub use serial::SerialByteSource;

/// Build a replay source from a recorded byte blob
///
/// The blob is fed back in fixed-size chunks at a fixed cadence, so the
/// capture engine sees it as a live line.
pub fn replay_source(
    path: &Path,
    chunk_size: usize,
    interval: Duration,
) -> Result<MockByteSource> {
    let blob = std::fs::read(path)
        .with_context(|| format!("Failed to read replay blob {}", path.display()))?;
    Ok(MockByteSource::from_blob(&blob, chunk_size, interval))
}

#[cfg(feature = "real-serial")]
mod serial {
    use std::io::Read;

    use bytes::Bytes;
    use contracts::{ByteSource, CaptureError, TransportConfig};
    use serialport::{ClearBuffer, SerialPort};
    use tracing::{debug, warn};

    use crate::error::CliError;

    /// Physical serial port behind the [`ByteSource`] contract
    ///
    /// Reads block for at most the configured read timeout; a timeout is
    /// reported as an empty read, not an error, so the polling loops above
    /// keep their own deadline accounting.
    pub struct SerialByteSource {
        port: Box<dyn SerialPort>,
        device: String,
    }

    impl SerialByteSource {
        /// Open and condition the configured port
        pub fn open(config: &TransportConfig) -> Result<Self, CliError> {
            let mut port = serialport::new(&config.port, config.baud)
                .timeout(config.read_timeout())
                .open()
                .map_err(|e| CliError::port_open(&config.port, e.to_string()))?;

            if config.disable_dtr_rts {
                // Boards wiring DTR/RTS to reset lines must not be touched
                if let Err(e) = port.write_data_terminal_ready(false) {
                    warn!(error = %e, "Could not de-assert DTR");
                }
                if let Err(e) = port.write_request_to_send(false) {
                    warn!(error = %e, "Could not de-assert RTS");
                }
            }

            if config.reset_input {
                port.clear(ClearBuffer::Input)
                    .map_err(|e| CliError::port_open(&config.port, e.to_string()))?;
            }

            debug!(port = %config.port, baud = config.baud, "Serial port opened");
            Ok(Self {
                port,
                device: config.port.clone(),
            })
        }
    }

    impl ByteSource for SerialByteSource {
        async fn read_some(&mut self, max: usize) -> Result<Bytes, CaptureError> {
            if max == 0 {
                return Ok(Bytes::new());
            }
            let mut buf = vec![0u8; max];
            match self.port.read(&mut buf) {
                Ok(n) => Ok(Bytes::copy_from_slice(&buf[..n])),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Bytes::new()),
                Err(e) => Err(CaptureError::transport_io(
                    format!("read from {} failed", self.device),
                    e,
                )),
            }
        }

        fn bytes_available(&self) -> usize {
            self.port.bytes_to_read().map(|n| n as usize).unwrap_or(0)
        }
    }
}
