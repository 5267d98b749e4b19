//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::CaptureProfile;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    frame: FrameInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    timing: Option<TimingInfo>,
    fallback: FallbackInfo,
    transport: TransportInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputInfo>,
}

#[derive(Serialize)]
struct FrameInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<String>,
    total_length: usize,
}

#[derive(Serialize)]
struct TimingInfo {
    mode: String,
    start_timeout_ms: Option<u64>,
    interbyte_timeout_ms: Option<u64>,
    header_wait_timeout_ms: Option<u64>,
    poll_interval_ms: u64,
    poll_chunk: usize,
}

#[derive(Serialize)]
struct FallbackInfo {
    enabled: bool,
    duration_ms: u64,
}

#[derive(Serialize)]
struct TransportInfo {
    port: String,
    baud: u32,
    disable_dtr_rts: bool,
    reset_input: bool,
}

#[derive(Serialize)]
struct OutputInfo {
    print_hex: bool,
    hex_dump_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_dump: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_dump: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let profile = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&profile, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&profile, args);
    }

    Ok(())
}

fn build_config_info(profile: &CaptureProfile, args: &InfoArgs) -> ConfigInfo {
    let timing = if args.timing {
        Some(TimingInfo {
            mode: format!("{:?}", profile.timing.mode),
            start_timeout_ms: profile.timing.start_timeout_ms,
            interbyte_timeout_ms: profile.timing.interbyte_timeout_ms,
            header_wait_timeout_ms: profile.timing.header_wait_timeout_ms,
            poll_interval_ms: profile.timing.poll_interval_ms,
            poll_chunk: profile.timing.poll_chunk,
        })
    } else {
        None
    };

    let output = if args.output {
        Some(OutputInfo {
            print_hex: profile.output.print_hex,
            hex_dump_bytes: profile.output.hex_dump_bytes,
            raw_dump: profile
                .output
                .raw_dump
                .as_ref()
                .map(|p| p.display().to_string()),
            frame_dump: profile
                .output
                .frame_dump
                .as_ref()
                .map(|p| p.display().to_string()),
            image: profile
                .output
                .image
                .as_ref()
                .map(|i| format!("{}x{} -> {}", i.width, i.height, i.path.display())),
        })
    } else {
        None
    };

    ConfigInfo {
        frame: FrameInfo {
            header: profile.frame.header.clone(),
            total_length: profile.frame.total_length,
        },
        timing,
        fallback: FallbackInfo {
            enabled: profile.fallback.enabled,
            duration_ms: profile.fallback.duration_ms,
        },
        transport: TransportInfo {
            port: profile.transport.port.clone(),
            baud: profile.transport.baud,
            disable_dtr_rts: profile.transport.disable_dtr_rts,
            reset_input: profile.transport.reset_input,
        },
        output,
    }
}

fn print_config_info(profile: &CaptureProfile, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Framegrab Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Frame geometry
    println!("📡 Frame");
    println!(
        "   ├─ Header: {}",
        profile.frame.header.as_deref().unwrap_or("(none)")
    );
    println!("   └─ Total length: {} bytes", profile.frame.total_length);

    // Timing
    println!("\n⏱️  Timing");
    println!("   ├─ Mode: {:?}", profile.timing.mode);
    if args.timing {
        println!(
            "   ├─ Start timeout: {}",
            fmt_ms(profile.timing.start_timeout_ms)
        );
        println!(
            "   ├─ Interbyte timeout: {}",
            fmt_ms(profile.timing.interbyte_timeout_ms)
        );
        println!(
            "   ├─ Header wait: {}",
            fmt_ms(profile.timing.header_wait_timeout_ms)
        );
        println!("   ├─ Poll interval: {} ms", profile.timing.poll_interval_ms);
        println!("   └─ Poll chunk: {} bytes", profile.timing.poll_chunk);
    } else {
        println!(
            "   └─ Interbyte timeout: {}",
            fmt_ms(profile.timing.interbyte_timeout_ms)
        );
    }

    // Fallback
    println!("\n🔁 Fallback");
    if profile.fallback.enabled {
        println!("   └─ Enabled: {} ms drain", profile.fallback.duration_ms);
    } else {
        println!("   └─ Disabled");
    }

    // Transport
    println!("\n🔌 Transport");
    let port = if profile.transport.port.is_empty() {
        "(unset)"
    } else {
        &profile.transport.port
    };
    println!("   ├─ Port: {}", port);
    println!("   ├─ Baud: {}", profile.transport.baud);
    println!("   ├─ DTR/RTS disabled: {}", profile.transport.disable_dtr_rts);
    println!("   └─ Reset input: {}", profile.transport.reset_input);

    // Output artifacts
    if args.output {
        println!("\n📤 Output");
        println!("   ├─ Hex preview: {}", profile.output.print_hex);
        match profile.output.raw_dump {
            Some(ref path) => println!("   ├─ Raw dump: {}", path.display()),
            None => println!("   ├─ Raw dump: (off)"),
        }
        match profile.output.frame_dump {
            Some(ref path) => println!("   ├─ Frame dump: {}", path.display()),
            None => println!("   ├─ Frame dump: (off)"),
        }
        match profile.output.image {
            Some(ref image) => println!(
                "   └─ Image: {}x{} -> {}",
                image.width,
                image.height,
                image.path.display()
            ),
            None => println!("   └─ Image: (off)"),
        }
    }

    println!();
}

fn fmt_ms(value: Option<u64>) -> String {
    match value {
        Some(ms) => format!("{} ms", ms),
        None => "unbounded".to_string(),
    }
}
