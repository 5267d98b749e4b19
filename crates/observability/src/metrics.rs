//! 采集指标收集模块
//!
//! 基于 CaptureResult 记录单次采集的运行指标。

use contracts::{CaptureOutcome, CaptureResult};
use metrics::{counter, gauge, histogram};

/// 从 CaptureResult 记录指标
///
/// 每次采集结束时调用此函数来记录指标。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_capture_metrics;
///
/// let result = orchestrator.run(source).await?;
/// record_capture_metrics(&result);
/// ```
pub fn record_capture_metrics(result: &CaptureResult) {
    // 采集计数器，按终止方式分类
    counter!("framegrab_captures_total", "outcome" => outcome_label(result.outcome)).increment(1);

    // 原始流大小
    histogram!("framegrab_raw_stream_bytes").record(result.raw_stream.len() as f64);
    gauge!("framegrab_last_raw_stream_bytes").set(result.raw_stream.len() as f64);

    // 候选帧数量
    gauge!("framegrab_last_candidate_frames").set(result.frame_count() as f64);

    // 选定帧大小
    gauge!("framegrab_last_selected_bytes").set(result.selected.len() as f64);

    // 首末字节跨度
    if let Some(span) = result.window.span() {
        histogram!("framegrab_active_span_ms").record(span.as_secs_f64() * 1000.0);
    }

    // 线速估计
    if let Some(bps) = result.estimated_bits_per_second() {
        gauge!("framegrab_estimated_bps").set(bps);
    }
}

/// 记录输出产物写入
pub fn record_artifact_written(kind: &str, bytes: usize) {
    counter!(
        "framegrab_artifacts_written_total",
        "kind" => kind.to_string()
    )
    .increment(1);
    counter!(
        "framegrab_artifact_bytes_total",
        "kind" => kind.to_string()
    )
    .increment(bytes as u64);
}

fn outcome_label(outcome: CaptureOutcome) -> &'static str {
    match outcome {
        CaptureOutcome::Synchronized => "synchronized",
        CaptureOutcome::FreeRunning => "free_running",
        CaptureOutcome::Fallback => "fallback",
        CaptureOutcome::SyncTimedOut => "sync_timed_out",
    }
}
