//! Layered error definitions
//!
//! Categorized by source: config / transport / sync

use thiserror::Error;

/// Unified error type
///
/// Only `Transport` and `Io` cross the pipeline boundary as hard failures.
/// `SyncTimeout` is recoverable and consumed by the orchestrator's fallback
/// policy; short captures and missing candidate frames are modeled as data
/// on [`crate::CaptureResult`], never as errors.
#[derive(Debug, Error)]
pub enum CaptureError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Transport Errors =====
    /// Byte-source transport failure (device disconnect, permission, ...)
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ===== Synchronization Errors =====
    /// Header pattern never observed within the configured wait budget
    #[error("header sync timeout after {waited_ms}ms waiting for pattern {pattern}")]
    SyncTimeout { waited_ms: u64, pattern: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl CaptureError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create transport error without an underlying IO cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create transport error wrapping an IO cause
    pub fn transport_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create header sync timeout error
    pub fn sync_timeout(waited_ms: u64, pattern: impl Into<String>) -> Self {
        Self::SyncTimeout {
            waited_ms,
            pattern: pattern.into(),
        }
    }

    /// Whether this error is the recoverable header-wait expiry
    pub fn is_sync_timeout(&self) -> bool {
        matches!(self, Self::SyncTimeout { .. })
    }
}
