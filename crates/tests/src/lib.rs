//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（无需硬件）
//! - 退化场景回归

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::CaptureOutcome::Synchronized;
    }

    #[test]
    fn test_profile_loads_from_toml() {
        let profile = config_loader::ConfigLoader::load_from_str(
            "[frame]\nheader = \"00112233\"\ntotal_length = 8\n",
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let spec = profile.frame_spec().unwrap();
        assert_eq!(spec.header.as_slice(), &[0x00, 0x11, 0x22, 0x33]);
        assert_eq!(spec.total_length, 8);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use acquisition::{MockByteSource, ScriptedChunk};
    use contracts::{CaptureOutcome, CaptureProfile};
    use pipeline::{CaptureOrchestrator, CaptureStats};

    const HEADER_HEX: &str = "00112233";

    fn profile(toml: &str) -> CaptureProfile {
        config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
            .unwrap()
    }

    fn orchestrator(toml: &str) -> CaptureOrchestrator {
        CaptureOrchestrator::from_profile(&profile(toml)).unwrap()
    }

    /// End-to-end test: MockByteSource -> CaptureOrchestrator -> frames
    ///
    /// 验证完整的数据流：
    /// 1. 同步头部模式
    /// 2. 空闲超时结束累积
    /// 3. 提取候选帧并选择最后一帧
    #[tokio::test(start_paused = true)]
    async fn test_e2e_synchronized_capture() {
        let toml = format!(
            "[frame]\nheader = \"{HEADER_HEX}\"\ntotal_length = 8\n\
             [timing]\ninterbyte_timeout_ms = 300\nheader_wait_timeout_ms = 2000\n\
             poll_interval_ms = 10\npoll_chunk = 4096\n"
        );

        // Noise, then two header-anchored frames in one burst
        let stream: &[u8] = &[
            0xff, 0xff, 0x00, 0x11, 0x22, 0x33, 0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22, 0x33, 0xdd,
            0xee, 0x01, 0x02,
        ];
        let source = MockByteSource::new(vec![ScriptedChunk::at_ms(0, stream)]);

        let result = orchestrator(&toml).run(source).await.unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Synchronized);
        assert_eq!(result.frame_count(), 2);
        assert_eq!(&result.selected[..], &stream[9..17]);
        assert!(!result.is_short(8));

        let stats = CaptureStats::from_result(&result, 8, Duration::from_millis(500));
        assert_eq!(stats.frame_count, 2);
        assert!(!stats.is_short());
    }

    /// 退化场景：头部从未出现，兜底定时抽取
    #[tokio::test(start_paused = true)]
    async fn test_e2e_fallback_degraded_capture() {
        let toml = format!(
            "[frame]\nheader = \"{HEADER_HEX}\"\ntotal_length = 8\n\
             [timing]\ninterbyte_timeout_ms = 300\nheader_wait_timeout_ms = 500\n\
             poll_interval_ms = 10\npoll_chunk = 4096\n\
             [fallback]\nenabled = true\nduration_ms = 1000\n"
        );

        let source = MockByteSource::new(vec![
            ScriptedChunk::at_ms(0, &[0x01, 0x02]),
            // Arrives during the fallback drain
            ScriptedChunk::at_ms(700, &[0x03, 0x04, 0x05]),
        ]);

        let result = orchestrator(&toml).run(source).await.unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Fallback);
        assert!(result.frames.is_empty());
        assert_eq!(result.selected, result.raw_stream);
        assert_eq!(&result.raw_stream[..], &[0x03, 0x04, 0x05]);
        assert!(result.is_short(8));
        assert_eq!(result.shortfall(8), 5);
    }

    /// 兜底禁用时返回空结果而非错误
    #[tokio::test(start_paused = true)]
    async fn test_e2e_sync_timeout_yields_empty_result() {
        let toml = format!(
            "[frame]\nheader = \"{HEADER_HEX}\"\ntotal_length = 8\n\
             [timing]\ninterbyte_timeout_ms = 300\nheader_wait_timeout_ms = 200\n\
             poll_interval_ms = 10\npoll_chunk = 4096\n\
             [fallback]\nenabled = false\nduration_ms = 1000\n"
        );

        let result = orchestrator(&toml)
            .run(MockByteSource::silent())
            .await
            .unwrap();

        assert_eq!(result.outcome, CaptureOutcome::SyncTimedOut);
        assert!(result.raw_stream.is_empty());
        assert!(result.frames.is_empty());
        assert!(result.selected.is_empty());
    }

    /// 无头部配置：从第一个字节开始自由采集
    #[tokio::test(start_paused = true)]
    async fn test_e2e_headerless_capture() {
        let toml = "[frame]\ntotal_length = 4\n\
             [timing]\ninterbyte_timeout_ms = 300\npoll_interval_ms = 10\npoll_chunk = 4096\n";

        let source = MockByteSource::new(vec![
            ScriptedChunk::at_ms(0, b"abcd"),
            ScriptedChunk::at_ms(100, b"ef"),
        ]);

        let result = orchestrator(toml).run(source).await.unwrap();

        assert_eq!(result.outcome, CaptureOutcome::FreeRunning);
        assert_eq!(&result.raw_stream[..], b"abcdef");
        assert_eq!(result.frame_count(), 1);
        assert_eq!(&result.selected[..], b"abcd");
    }

    /// 定长模式：收满即停，不等待空闲
    #[tokio::test(start_paused = true)]
    async fn test_e2e_exact_length_capture() {
        let toml = format!(
            "[frame]\nheader = \"{HEADER_HEX}\"\ntotal_length = 6\n\
             [timing]\nmode = \"exact_length\"\ninterbyte_timeout_ms = 1000\n\
             header_wait_timeout_ms = 2000\npoll_interval_ms = 10\npoll_chunk = 4096\n"
        );

        let source = MockByteSource::new(vec![ScriptedChunk::at_ms(
            0,
            &[0x00, 0x11, 0x22, 0x33, 0x01, 0x02, 0x03],
        )]);

        let started = tokio::time::Instant::now();
        let result = orchestrator(&toml).run(source).await.unwrap();

        assert_eq!(result.outcome, CaptureOutcome::Synchronized);
        assert_eq!(&result.raw_stream[..], &[0x00, 0x11, 0x22, 0x33, 0x01, 0x02]);
        assert_eq!(result.frame_count(), 1);
        // Full frame collected immediately, no idle wait spent
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    /// 速率估计：100 字节跨越一秒 ≈ 1000 bps
    #[tokio::test(start_paused = true)]
    async fn test_e2e_rate_estimate_from_replay_blob() {
        let toml = "[frame]\ntotal_length = 100\n\
             [timing]\ninterbyte_timeout_ms = 500\npoll_interval_ms = 10\npoll_chunk = 4096\n";

        // 100 bytes in ten 10-byte chunks, one every ~111ms, spanning ~1s
        let blob = vec![0x55u8; 100];
        let source = MockByteSource::from_blob(&blob, 10, Duration::from_millis(111));

        let result = orchestrator(toml).run(source).await.unwrap();

        assert_eq!(result.outcome, CaptureOutcome::FreeRunning);
        assert_eq!(result.raw_stream.len(), 100);
        assert_eq!(result.selected.len(), 100);

        let bps = result.estimated_bits_per_second().unwrap();
        // 100 bytes * 10 bits over ~0.999s of active span
        assert!(bps > 900.0 && bps < 1100.0, "unexpected estimate {bps}");
    }
}
