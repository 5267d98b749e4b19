//! # Config Loader
//!
//! Capture profile loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON profile files
//! - Validate profile legality
//! - Produce a [`CaptureProfile`]
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let profile = ConfigLoader::load_from_path(Path::new("capture.toml")).unwrap();
//! println!("Expecting {} byte frames", profile.frame.total_length);
//! ```

mod parser;
mod validator;

pub use contracts::CaptureProfile;
pub use parser::ConfigFormat;

use contracts::CaptureError;
use std::path::Path;

/// Profile loader
///
/// Provides static methods to load a capture profile from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a profile from a file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CaptureProfile, CaptureError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a profile from a string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CaptureProfile, CaptureError> {
        let profile = parser::parse(content, format)?;
        validator::validate(&profile)?;
        Ok(profile)
    }

    /// Serialize a profile to a TOML string
    pub fn to_toml(profile: &CaptureProfile) -> Result<String, CaptureError> {
        toml::to_string_pretty(profile)
            .map_err(|e| CaptureError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a profile to a JSON string
    pub fn to_json(profile: &CaptureProfile) -> Result<String, CaptureError> {
        serde_json::to_string_pretty(profile)
            .map_err(|e| CaptureError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer profile format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, CaptureError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            CaptureError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| CaptureError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read profile file content
    fn read_file(path: &Path) -> Result<String, CaptureError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
