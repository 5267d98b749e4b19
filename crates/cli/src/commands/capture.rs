//! `capture` command implementation.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{CaptureProfile, CaptureResult};
use pipeline::{CaptureOrchestrator, CaptureStats};
use tracing::{info, warn};

use crate::cli::CaptureArgs;
use crate::output;
use crate::transport;

/// Execute the `capture` command
pub async fn run_capture(args: &CaptureArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let mut profile = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref port) = args.port {
        info!(port = %port, "Overriding serial port from CLI");
        profile.transport.port = port.clone();
    }
    if let Some(baud) = args.baud {
        info!(baud, "Overriding baud rate from CLI");
        profile.transport.baud = baud;
    }

    info!(
        header = profile.frame.header.as_deref().unwrap_or("(none)"),
        total_length = profile.frame.total_length,
        mode = ?profile.timing.mode,
        port = %profile.transport.port,
        baud = profile.transport.baud,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_profile_summary(&profile);
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let orchestrator = CaptureOrchestrator::from_profile(&profile)?;
    let expected = orchestrator.expected_len();
    let started = Instant::now();

    let capture = run_with_source(orchestrator, &profile, args);

    // Run with interrupt handling
    let result = tokio::select! {
        result = capture => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Received interrupt, aborting capture");
            return Ok(());
        }
    };

    let stats = CaptureStats::from_result(&result, expected, started.elapsed());
    stats.print_summary();
    output::write_artifacts(&profile.output, &result)?;

    info!("Framegrab finished");
    Ok(())
}

/// Pick the byte source and run the orchestrator on it
async fn run_with_source(
    orchestrator: CaptureOrchestrator,
    profile: &CaptureProfile,
    args: &CaptureArgs,
) -> Result<CaptureResult> {
    if let Some(ref replay) = args.replay {
        info!(path = %replay.display(), "Running in REPLAY mode");
        let source = transport::replay_source(
            replay,
            args.replay_chunk,
            Duration::from_millis(args.replay_interval_ms),
        )?;
        return Ok(orchestrator.run(source).await?);
    }

    run_on_port(orchestrator, profile).await
}

#[cfg(feature = "real-serial")]
async fn run_on_port(
    orchestrator: CaptureOrchestrator,
    profile: &CaptureProfile,
) -> Result<CaptureResult> {
    use crate::transport::SerialByteSource;

    if profile.transport.port.is_empty() {
        anyhow::bail!("No serial port configured; set transport.port, pass --port, or use --replay");
    }

    info!(port = %profile.transport.port, "Opening serial port");
    let source = SerialByteSource::open(&profile.transport)?;
    Ok(orchestrator.run(source).await?)
}

#[cfg(not(feature = "real-serial"))]
async fn run_on_port(
    _orchestrator: CaptureOrchestrator,
    _profile: &CaptureProfile,
) -> Result<CaptureResult> {
    anyhow::bail!("Built without serial support; use --replay or enable the `real-serial` feature")
}

/// Print configuration summary for dry-run mode
fn print_profile_summary(profile: &CaptureProfile) {
    println!("\n=== Configuration Summary ===\n");
    println!("Frame:");
    println!(
        "  Header: {}",
        profile.frame.header.as_deref().unwrap_or("(none)")
    );
    println!("  Total length: {} bytes", profile.frame.total_length);

    println!("\nTiming:");
    println!("  Mode: {:?}", profile.timing.mode);
    println!(
        "  Interbyte timeout: {}",
        fmt_ms(profile.timing.interbyte_timeout_ms)
    );
    println!(
        "  Header wait: {}",
        fmt_ms(profile.timing.header_wait_timeout_ms)
    );

    println!("\nFallback:");
    if profile.fallback.enabled {
        println!("  Enabled, {} ms drain", profile.fallback.duration_ms);
    } else {
        println!("  Disabled");
    }

    println!("\nTransport:");
    let port = if profile.transport.port.is_empty() {
        "(unset)"
    } else {
        &profile.transport.port
    };
    println!("  Port: {}", port);
    println!("  Baud: {}", profile.transport.baud);

    println!();
}

fn fmt_ms(value: Option<u64>) -> String {
    match value {
        Some(ms) => format!("{} ms", ms),
        None => "unbounded".to_string(),
    }
}
