//! Height animation for the chat bar
//!
//! Pure interpolation; the timer that steps through the frames lives in
//! `system::window::chat_bar`.

use std::time::Duration;

pub const RESIZE_DURATION: Duration = Duration::from_millis(140);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnimation {
    from: f64,
    to: f64,
    duration: Duration,
}

impl ResizeAnimation {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Height after `elapsed`, eased out (cubic).
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    /// Heights to apply, one per frame. The last one is always the target.
    pub fn frames(&self, interval: Duration) -> Vec<f64> {
        if interval.is_zero() || self.duration.is_zero() {
            return vec![self.to];
        }
        let count = self.duration.as_micros().div_ceil(interval.as_micros()).max(1) as u32;
        (1..=count)
            .map(|frame| self.sample(interval * frame))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let animation = ResizeAnimation::new(72.0, 460.0, RESIZE_DURATION);
        assert_eq!(animation.sample(Duration::ZERO), 72.0);
        assert_eq!(animation.sample(RESIZE_DURATION), 460.0);
        assert_eq!(animation.sample(Duration::from_secs(5)), 460.0);
    }

    #[test]
    fn test_frames_end_on_target_and_are_monotonic() {
        let animation = ResizeAnimation::new(460.0, 72.0, RESIZE_DURATION);
        let frames = animation.frames(FRAME_INTERVAL);

        assert_eq!(frames.len(), 9);
        assert_eq!(*frames.last().unwrap(), 72.0);
        assert!(frames.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn test_ease_out_front_loads_movement() {
        let animation = ResizeAnimation::new(0.0, 100.0, Duration::from_millis(100));
        // Halfway through time, well past halfway in distance
        assert!(animation.sample(Duration::from_millis(50)) > 80.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let animation = ResizeAnimation::new(10.0, 20.0, Duration::ZERO);
        assert_eq!(animation.frames(FRAME_INTERVAL), vec![20.0]);
    }
}
