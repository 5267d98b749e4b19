//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parsing error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Serial port open error
    #[error("Failed to open serial port {port}: {message}")]
    PortOpen { port: String, message: String },

    /// Capture execution error
    #[error("Capture failed: {message}")]
    CaptureExecution { message: String },

    /// Image export error
    #[error("Image export failed: {message}")]
    ImageExport { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

#[allow(dead_code)]
impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    pub fn port_open(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PortOpen {
            port: port.into(),
            message: message.into(),
        }
    }

    pub fn capture_execution(message: impl Into<String>) -> Self {
        Self::CaptureExecution {
            message: message.into(),
        }
    }

    pub fn image_export(message: impl Into<String>) -> Self {
        Self::ImageExport {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, CliError>;
