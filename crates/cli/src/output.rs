//! Output artifact writers.
//!
//! Everything here consumes a finished capture; nothing feeds back into the
//! engine.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use contracts::{CaptureResult, ImageExport, OutputConfig};
use observability::record_artifact_written;
use tracing::info;

/// Write all configured artifacts for a finished capture
pub fn write_artifacts(config: &OutputConfig, result: &CaptureResult) -> Result<()> {
    if config.print_hex && !result.selected.is_empty() {
        println!(
            "Selected frame ({} bytes): {}",
            result.selected.len(),
            hex_preview(&result.selected, config.hex_dump_bytes)
        );
    }

    if let Some(ref path) = config.raw_dump {
        write_dump(path, &result.raw_stream, "raw")?;
    }
    if let Some(ref path) = config.frame_dump {
        write_dump(path, &result.selected, "frame")?;
    }
    if let Some(ref image) = config.image {
        write_pgm(image, &result.selected)?;
    }

    Ok(())
}

fn write_dump(path: &Path, data: &Bytes, kind: &str) -> Result<()> {
    fs::write(path, data)
        .with_context(|| format!("Failed to write {} dump to {}", kind, path.display()))?;
    record_artifact_written(kind, data.len());
    info!(path = %path.display(), bytes = data.len(), kind, "Artifact written");
    Ok(())
}

/// Hex preview of at most `limit` bytes, with a trailing marker when cut
pub fn hex_preview(data: &[u8], limit: usize) -> String {
    let shown = data.len().min(limit);
    let mut out = String::with_capacity(shown * 3 + 3);
    for (i, byte) in data[..shown].iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if data.len() > shown {
        out.push_str(" ..");
    }
    out
}

/// Export a frame as a binary PGM (P5) grayscale image
///
/// The first `width * height` bytes of the frame are interpreted row-major,
/// one byte per pixel.
pub fn write_pgm(image: &ImageExport, frame: &Bytes) -> Result<()> {
    let pixels = image.width as usize * image.height as usize;
    if frame.len() < pixels {
        anyhow::bail!(
            "insufficient data for {}x{} image: have {} bytes, need {}",
            image.width,
            image.height,
            frame.len(),
            pixels
        );
    }

    let mut out = Vec::with_capacity(pixels + 32);
    out.extend_from_slice(format!("P5\n{} {}\n255\n", image.width, image.height).as_bytes());
    out.extend_from_slice(&frame[..pixels]);

    fs::write(&image.path, &out)
        .with_context(|| format!("Failed to write image to {}", image.path.display()))?;
    record_artifact_written("pgm", out.len());
    info!(path = %image.path.display(), width = image.width, height = image.height, "Image written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_preview_truncates() {
        assert_eq!(hex_preview(&[0x00, 0x11, 0x22], 8), "00 11 22");
        assert_eq!(hex_preview(&[0x00, 0x11, 0x22], 2), "00 11 ..");
        assert_eq!(hex_preview(&[], 8), "");
    }

    #[test]
    fn test_write_pgm_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.pgm");
        let image = ImageExport {
            width: 2,
            height: 2,
            path: path.clone(),
        };

        write_pgm(&image, &Bytes::from_static(&[10, 20, 30, 40, 99])).unwrap();

        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"P5\n2 2\n255\n"));
        // Extra trailing bytes beyond the pixel count are not exported
        assert_eq!(&written[written.len() - 4..], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_write_pgm_rejects_short_frame() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageExport {
            width: 4,
            height: 4,
            path: dir.path().join("frame.pgm"),
        };
        let err = write_pgm(&image, &Bytes::from_static(&[0u8; 3])).unwrap_err();
        assert!(err.to_string().contains("insufficient data"));
    }

    #[test]
    fn test_write_dump_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.bin");
        write_dump(&path, &Bytes::from_static(b"\x00\x11\x22"), "raw").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\x00\x11\x22");
    }
}
