//! Capture profile contracts that can be shared across crates.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CaptureError, FrameSpec, HeaderPattern};

/// Complete capture profile
///
/// The `[frame]`, `[timing]` and `[fallback]` tables drive the core engine;
/// `[transport]` and `[output]` are consumed only by the CLI collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureProfile {
    /// Frame geometry
    pub frame: FrameConfig,

    /// Timeout and polling configuration
    #[serde(default)]
    pub timing: TimingConfig,

    /// Fallback policy when header sync fails
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Serial line configuration (CLI transport only)
    #[serde(default)]
    pub transport: TransportConfig,

    /// Artifact and presentation configuration (CLI only)
    #[serde(default)]
    pub output: OutputConfig,
}

impl CaptureProfile {
    /// Parse the configured header and build a validated [`FrameSpec`]
    pub fn frame_spec(&self) -> Result<FrameSpec, CaptureError> {
        let header = match &self.frame.header {
            Some(hex) => HeaderPattern::from_hex(hex)?,
            None => HeaderPattern::default(),
        };
        FrameSpec::new(header, self.frame.total_length)
    }
}

/// Frame geometry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Header pattern as a hex string, e.g. `"00112233"`; omit to capture
    /// without synchronization
    #[serde(default)]
    pub header: Option<String>,

    /// Total frame length in bytes, header included
    pub total_length: usize,
}

/// Capture termination mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Accumulate until the line goes idle for longer than the interbyte
    /// timeout
    #[default]
    UntilIdle,

    /// Stop as soon as `total_length` bytes have been collected
    ExactLength,
}

/// Timeout and polling configuration
///
/// The table deserializes field-by-field against [`Default`], so a profile
/// may override a single knob without restating the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Capture termination mode
    pub mode: CaptureMode,

    /// Wait budget for the very first byte; `None` waits indefinitely
    pub start_timeout_ms: Option<u64>,

    /// Maximum gap between consecutive bytes before the capture completes
    pub interbyte_timeout_ms: Option<u64>,

    /// Wait budget for the header pattern; `None` waits indefinitely
    pub header_wait_timeout_ms: Option<u64>,

    /// Sleep between empty polls
    pub poll_interval_ms: u64,

    /// Upper bound on bytes requested per poll
    pub poll_chunk: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            mode: CaptureMode::UntilIdle,
            start_timeout_ms: None,
            interbyte_timeout_ms: Some(1_000),
            header_wait_timeout_ms: Some(10_000),
            poll_interval_ms: 10,
            poll_chunk: 4096,
        }
    }
}

impl TimingConfig {
    pub fn start_timeout(&self) -> Option<Duration> {
        self.start_timeout_ms.map(Duration::from_millis)
    }

    pub fn interbyte_timeout(&self) -> Option<Duration> {
        self.interbyte_timeout_ms.map(Duration::from_millis)
    }

    pub fn header_wait_timeout(&self) -> Option<Duration> {
        self.header_wait_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Fallback policy when the header never appears
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Run a fixed-duration drain instead of giving up
    pub enabled: bool,

    /// Drain duration
    pub duration_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 2_000,
        }
    }
}

impl FallbackConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Serial line configuration, consumed by the CLI transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM4`
    pub port: String,

    /// Line rate in bits per second
    pub baud: u32,

    /// De-assert DTR/RTS after opening, so boards that tie them to reset
    /// lines are left alone
    pub disable_dtr_rts: bool,

    /// Discard any bytes already buffered by the driver before capturing
    pub reset_input: bool,

    /// Per-call blocking read budget of the port itself
    pub read_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud: 115_200,
            disable_dtr_rts: true,
            reset_input: true,
            read_timeout_ms: 100,
        }
    }
}

impl TransportConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Artifact and presentation configuration, consumed by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print a hex preview of the selected frame
    pub print_hex: bool,

    /// Preview length in bytes
    pub hex_dump_bytes: usize,

    /// Write the full raw stream to this path
    pub raw_dump: Option<PathBuf>,

    /// Write the selected frame to this path
    pub frame_dump: Option<PathBuf>,

    /// Export the selected frame as a grayscale image
    pub image: Option<ImageExport>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            print_hex: true,
            hex_dump_bytes: 32,
            raw_dump: None,
            frame_dump: None,
            image: None,
        }
    }
}

/// Grayscale PGM export of the selected frame payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageExport {
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults_match_reference_line_behavior() {
        let timing = TimingConfig::default();
        assert_eq!(timing.start_timeout(), None);
        assert_eq!(
            timing.interbyte_timeout(),
            Some(Duration::from_millis(1_000))
        );
        assert_eq!(
            timing.header_wait_timeout(),
            Some(Duration::from_millis(10_000))
        );
        assert_eq!(timing.mode, CaptureMode::UntilIdle);
    }

    #[test]
    fn test_partial_tables_fill_field_defaults() {
        let profile: CaptureProfile = serde_json::from_str(
            r#"{
                "frame": { "total_length": 8 },
                "timing": { "mode": "exact_length" },
                "fallback": { "enabled": false },
                "output": { "image": { "width": 4, "height": 4, "path": "frame.pgm" } }
            }"#,
        )
        .unwrap();

        assert_eq!(profile.timing.mode, CaptureMode::ExactLength);
        assert_eq!(profile.timing.interbyte_timeout_ms, Some(1_000));
        assert_eq!(profile.timing.poll_interval_ms, 10);
        assert!(!profile.fallback.enabled);
        assert_eq!(profile.fallback.duration_ms, 2_000);
        assert_eq!(profile.transport.baud, 115_200);
        assert_eq!(profile.output.hex_dump_bytes, 32);
        assert!(profile.output.image.is_some());
    }

    #[test]
    fn test_frame_spec_from_profile() {
        let profile = CaptureProfile {
            frame: FrameConfig {
                header: Some("00112233".to_string()),
                total_length: 16,
            },
            timing: TimingConfig::default(),
            fallback: FallbackConfig::default(),
            transport: TransportConfig::default(),
            output: OutputConfig::default(),
        };
        let spec = profile.frame_spec().unwrap();
        assert_eq!(spec.header.len(), 4);
        assert_eq!(spec.total_length, 16);
    }

    #[test]
    fn test_frame_spec_rejects_short_total() {
        let profile = CaptureProfile {
            frame: FrameConfig {
                header: Some("00112233".to_string()),
                total_length: 2,
            },
            timing: TimingConfig::default(),
            fallback: FallbackConfig::default(),
            transport: TransportConfig::default(),
            output: OutputConfig::default(),
        };
        assert!(profile.frame_spec().is_err());
    }
}
