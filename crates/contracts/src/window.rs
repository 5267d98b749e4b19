//! Capture window: first/last byte arrival provenance.

use std::time::Duration;

use tokio::time::Instant;

/// Arrival timestamps of a capture
///
/// `first_byte_time` is set exactly once, at the first non-empty read;
/// `last_byte_time` updates on every non-empty read. When both are set,
/// `last_byte_time >= first_byte_time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureWindow {
    /// Arrival of the first captured byte
    pub first_byte_time: Option<Instant>,

    /// Arrival of the most recent captured byte
    pub last_byte_time: Option<Instant>,
}

impl CaptureWindow {
    /// Record a non-empty read at `at`
    pub fn record(&mut self, at: Instant) {
        self.first_byte_time.get_or_insert(at);
        self.last_byte_time = Some(at);
    }

    /// Merge another window into this one, keeping the widest span
    pub fn absorb(&mut self, other: &CaptureWindow) {
        if let Some(first) = other.first_byte_time {
            match self.first_byte_time {
                Some(existing) if existing <= first => {}
                _ => self.first_byte_time = Some(first),
            }
        }
        if let Some(last) = other.last_byte_time {
            match self.last_byte_time {
                Some(existing) if existing >= last => {}
                _ => self.last_byte_time = Some(last),
            }
        }
    }

    /// Elapsed time between first and last byte, if both were seen
    pub fn span(&self) -> Option<Duration> {
        match (self.first_byte_time, self.last_byte_time) {
            (Some(first), Some(last)) => Some(last.saturating_duration_since(first)),
            _ => None,
        }
    }

    /// Whether no byte was ever recorded
    pub fn is_empty(&self) -> bool {
        self.first_byte_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_record_sets_first_once() {
        let mut window = CaptureWindow::default();
        let t0 = Instant::now();
        window.record(t0);

        tokio::time::advance(Duration::from_millis(50)).await;
        let t1 = Instant::now();
        window.record(t1);

        assert_eq!(window.first_byte_time, Some(t0));
        assert_eq!(window.last_byte_time, Some(t1));
        assert_eq!(window.span(), Some(Duration::from_millis(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absorb_widens_span() {
        let t0 = Instant::now();
        let mut early = CaptureWindow::default();
        early.record(t0);

        tokio::time::advance(Duration::from_millis(100)).await;
        let mut late = CaptureWindow::default();
        late.record(Instant::now());

        early.absorb(&late);
        assert_eq!(early.first_byte_time, Some(t0));
        assert_eq!(early.span(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_empty_window_has_no_span() {
        let window = CaptureWindow::default();
        assert!(window.is_empty());
        assert_eq!(window.span(), None);
    }
}
