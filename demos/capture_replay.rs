//! Replay Capture Demo
//!
//! Runs one capture attempt against a scripted byte source. No hardware
//! required.
//!
//! Run with: cargo run --bin capture_replay [profile.toml]

use acquisition::{MockByteSource, ScriptedChunk};
use config_loader::ConfigLoader;
use contracts::{CaptureError, CaptureProfile};
use pipeline::{CaptureOrchestrator, CaptureStats};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting replay capture demo");

    // ==== Stage 1: Use default profile or load from file ====
    let profile = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading capture profile");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        create_test_profile()?
    };

    // ==== Stage 2: Script a byte source ====
    // Leading noise, then two header-anchored frames; the second wins.
    let source = MockByteSource::new(vec![
        ScriptedChunk::at_ms(0, &[0xff, 0xff]),
        ScriptedChunk::at_ms(20, &[0x00, 0x11, 0x22, 0x33, 0xaa, 0xbb, 0xcc]),
        ScriptedChunk::at_ms(60, &[0x00, 0x11, 0x22, 0x33, 0xdd, 0xee, 0x01, 0x02]),
    ]);

    // ==== Stage 3: Run the capture ====
    let started = std::time::Instant::now();
    let orchestrator = CaptureOrchestrator::from_profile(&profile)?;
    let expected = orchestrator.expected_len();
    let result = orchestrator.run(source).await?;

    tracing::info!(
        outcome = ?result.outcome,
        frames = result.frame_count(),
        selected_bytes = result.selected.len(),
        "Capture finished"
    );

    let stats = CaptureStats::from_result(&result, expected, started.elapsed());
    stats.print_summary();

    Ok(())
}

/// Build a minimal in-memory profile matching the scripted stream
fn create_test_profile() -> Result<CaptureProfile, CaptureError> {
    ConfigLoader::load_from_str(
        "[frame]\nheader = \"00112233\"\ntotal_length = 8\n\
         [timing]\ninterbyte_timeout_ms = 300\nheader_wait_timeout_ms = 2000\n\
         poll_interval_ms = 10\npoll_chunk = 4096\n",
        config_loader::ConfigFormat::Toml,
    )
}
