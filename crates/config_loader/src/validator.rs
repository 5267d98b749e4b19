//! 配置校验模块
//!
//! 校验规则：
//! - header 为合法 hex 且 total_length >= header 长度
//! - total_length > 0
//! - poll_interval_ms > 0, poll_chunk > 0
//! - fallback 启用时 duration_ms > 0
//! - baud > 0, read_timeout_ms > 0
//! - 图像导出尺寸不超过 total_length

use contracts::{CaptureError, CaptureProfile};

/// 校验 CaptureProfile 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(profile: &CaptureProfile) -> Result<(), CaptureError> {
    validate_frame(profile)?;
    validate_timing(profile)?;
    validate_fallback(profile)?;
    validate_transport(profile)?;
    validate_output(profile)?;
    Ok(())
}

/// 校验帧几何
fn validate_frame(profile: &CaptureProfile) -> Result<(), CaptureError> {
    if profile.frame.total_length == 0 {
        return Err(CaptureError::config_validation(
            "frame.total_length",
            "total_length must be > 0",
        ));
    }

    // Parses the hex header and enforces total_length >= header.len()
    profile.frame.frame_spec_check()
}

/// 校验轮询与超时参数
fn validate_timing(profile: &CaptureProfile) -> Result<(), CaptureError> {
    let timing = &profile.timing;

    if timing.poll_interval_ms == 0 {
        return Err(CaptureError::config_validation(
            "timing.poll_interval_ms",
            "poll interval must be > 0 to avoid saturating a core",
        ));
    }

    if timing.poll_chunk == 0 {
        return Err(CaptureError::config_validation(
            "timing.poll_chunk",
            "poll chunk must be > 0",
        ));
    }

    if timing.interbyte_timeout_ms == Some(0) {
        return Err(CaptureError::config_validation(
            "timing.interbyte_timeout_ms",
            "an interbyte timeout of 0 would terminate every capture immediately",
        ));
    }

    Ok(())
}

/// 校验兜底策略
fn validate_fallback(profile: &CaptureProfile) -> Result<(), CaptureError> {
    if profile.fallback.enabled && profile.fallback.duration_ms == 0 {
        return Err(CaptureError::config_validation(
            "fallback.duration_ms",
            "fallback drain duration must be > 0 when fallback is enabled",
        ));
    }
    Ok(())
}

/// 校验串口参数
fn validate_transport(profile: &CaptureProfile) -> Result<(), CaptureError> {
    let transport = &profile.transport;

    if transport.baud == 0 {
        return Err(CaptureError::config_validation(
            "transport.baud",
            "baud rate must be > 0",
        ));
    }

    if transport.read_timeout_ms == 0 {
        return Err(CaptureError::config_validation(
            "transport.read_timeout_ms",
            "per-call read timeout must be > 0",
        ));
    }

    Ok(())
}

/// 校验输出配置
fn validate_output(profile: &CaptureProfile) -> Result<(), CaptureError> {
    if let Some(image) = &profile.output.image {
        let pixels = image.width as usize * image.height as usize;
        if pixels == 0 {
            return Err(CaptureError::config_validation(
                "output.image",
                "image width and height must both be > 0",
            ));
        }
        if pixels > profile.frame.total_length {
            return Err(CaptureError::config_validation(
                "output.image",
                format!(
                    "image needs {} bytes but frames carry only {}",
                    pixels, profile.frame.total_length
                ),
            ));
        }
    }
    Ok(())
}

/// Helper trait so the frame table can self-check without exposing parsing
/// details here.
trait FrameSpecCheck {
    fn frame_spec_check(&self) -> Result<(), CaptureError>;
}

impl FrameSpecCheck for contracts::FrameConfig {
    fn frame_spec_check(&self) -> Result<(), CaptureError> {
        use contracts::{FrameSpec, HeaderPattern};

        let header = match &self.header {
            Some(hex) => HeaderPattern::from_hex(hex)?,
            None => HeaderPattern::default(),
        };
        FrameSpec::new(header, self.total_length).map(|_| ())
    }
}
