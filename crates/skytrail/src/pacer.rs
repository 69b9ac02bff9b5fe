//! Fixed-rate frame scheduling, independent of how often input arrives.

use std::time::{Duration, Instant};

/// Tracks when the next frame is due.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Instant,
}

impl FramePacer {
    /// A pacer whose first frame is due at `start`.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_frame: start,
        }
    }

    /// Whether a frame should be drawn at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// How long input polling may wait before the next frame.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    /// Schedule the frame after the one just drawn. A pacer that fell behind
    /// resumes from `now` instead of drawing a burst of catch-up frames.
    pub fn advance(&mut self, now: Instant) {
        self.next_frame += self.interval;
        if self.next_frame <= now {
            self.next_frame = now + self.interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_first_frame_is_due_immediately() {
        let start = Instant::now();
        let pacer = FramePacer::new(FRAME, start);
        assert!(pacer.is_due(start));
        assert_eq!(pacer.timeout(start), Duration::ZERO);
    }

    #[test]
    fn test_timeout_counts_down_to_next_frame() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);
        pacer.advance(start);

        let later = start + Duration::from_millis(5);
        assert!(!pacer.is_due(later));
        assert_eq!(pacer.timeout(later), Duration::from_millis(11));
        assert!(pacer.is_due(start + FRAME));
    }

    #[test]
    fn test_event_burst_draws_one_frame() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);
        let mut frames = 0;
        // One wake-up per millisecond, as a stream of mouse moves would cause.
        for ms in 0..16 {
            let now = start + Duration::from_millis(ms);
            if pacer.is_due(now) {
                frames += 1;
                pacer.advance(now);
            }
        }
        assert_eq!(frames, 1);
    }

    #[test]
    fn test_steady_rate_over_many_wakeups() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);
        let mut frames = 0;
        for ms in 0..160 {
            let now = start + Duration::from_millis(ms);
            if pacer.is_due(now) {
                frames += 1;
                pacer.advance(now);
            }
        }
        assert_eq!(frames, 10);
    }

    #[test]
    fn test_slow_frame_does_not_queue_catch_up() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);
        let late = start + Duration::from_millis(100);
        pacer.advance(late);

        assert!(!pacer.is_due(late));
        assert_eq!(pacer.timeout(late), FRAME);
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(Duration::ZERO, start);
        pacer.advance(start);
        assert!(!pacer.is_due(start));
    }
}
