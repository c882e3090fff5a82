use std::time::{Duration, Instant};

/// Frame pacing over one logging interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStatsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
}

#[derive(Debug)]
pub(crate) struct FrameStatsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    frame_time_sum: Duration,
    worst_frame: Duration,
}

impl FrameStatsAccumulator {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            frame_time_sum: Duration::ZERO,
            worst_frame: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.worst_frame = self.worst_frame.max(frame_dt);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<FrameStatsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = FrameStatsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            frame_time_ms,
            worst_frame_ms: self.worst_frame.as_secs_f32() * 1000.0,
        };

        self.interval_start = now;
        self.frames = 0;
        self.frame_time_sum = Duration::ZERO;
        self.worst_frame = Duration::ZERO;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_frames_over_interval() {
        let base = Instant::now();
        let mut stats = FrameStatsAccumulator::new(Duration::from_secs(1), base);

        stats.record_frame(Duration::from_millis(16));
        stats.record_frame(Duration::from_millis(24));

        let snapshot = stats
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 20.0).abs() < 0.001);
        assert!((snapshot.worst_frame_ms - 24.0).abs() < 0.001);
    }

    #[test]
    fn snapshot_waits_for_interval() {
        let base = Instant::now();
        let mut stats = FrameStatsAccumulator::new(Duration::from_secs(1), base);
        stats.record_frame(Duration::from_millis(16));

        assert!(stats
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn snapshot_resets_counters() {
        let base = Instant::now();
        let mut stats = FrameStatsAccumulator::new(Duration::from_secs(1), base);
        stats.record_frame(Duration::from_millis(40));
        let _ = stats.maybe_snapshot(base + Duration::from_secs(1));

        let next = stats
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");
        assert_eq!(next.fps, 0.0);
        assert_eq!(next.frame_time_ms, 0.0);
        assert_eq!(next.worst_frame_ms, 0.0);
    }
}
