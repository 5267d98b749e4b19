//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{CaptureMode, CaptureProfile};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    header: Option<String>,
    total_length: usize,
    mode: String,
    port: String,
    baud: u32,
    fallback_enabled: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(profile) => {
            let warnings = collect_warnings(&profile);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    header: profile.frame.header.clone(),
                    total_length: profile.frame.total_length,
                    mode: format!("{:?}", profile.timing.mode),
                    port: profile.transport.port.clone(),
                    baud: profile.transport.baud,
                    fallback_enabled: profile.fallback.enabled,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(profile: &CaptureProfile) -> Vec<String> {
    let mut warnings = Vec::new();

    if profile.frame.header.is_none() {
        warnings.push("No header configured - capture starts on the first byte".to_string());
    }

    if profile.transport.port.is_empty() {
        warnings.push(
            "transport.port is empty - supply --port or capture via --replay".to_string(),
        );
    }

    if profile.frame.header.is_some() && !profile.fallback.enabled {
        warnings.push(
            "Fallback disabled - a missing header yields an empty capture".to_string(),
        );
    }

    if profile.timing.mode == CaptureMode::UntilIdle
        && profile.timing.interbyte_timeout_ms.is_none()
    {
        warnings.push(
            "timing.interbyte_timeout_ms is unset - an until_idle capture never ends on silence"
                .to_string(),
        );
    }

    if profile.frame.header.is_some() && profile.timing.header_wait_timeout_ms.is_none() {
        warnings.push(
            "timing.header_wait_timeout_ms is unset - the header wait is unbounded".to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!(
                "\n  Header: {}",
                summary.header.as_deref().unwrap_or("(none)")
            );
            println!("  Total length: {} bytes", summary.total_length);
            println!("  Mode: {}", summary.mode);
            let port = if summary.port.is_empty() {
                "(unset)"
            } else {
                &summary.port
            };
            println!("  Port: {} @ {} baud", port, summary.baud);
            println!("  Fallback: {}", summary.fallback_enabled);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
