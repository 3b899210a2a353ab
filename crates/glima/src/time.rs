//! Frame timing, delta time, and optional frame-rate limiting.

use std::time::{Duration, Instant};

/// Frame timing. Updated by the frontend at the start of each frame.
#[derive(Clone, Copy)]
pub struct Time {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Call at the start of each frame to update timing.
    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        self.elapsed = now - self.startup;
        self.frame_count += 1;
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time since app start.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total elapsed time in seconds (f32).
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

/// Caps the frame rate by sleeping out the remainder of each frame's budget.
///
/// Useful when vsync is off (uncapped present mode) but the game shouldn't
/// spin a CPU core at thousands of frames per second.
pub struct FpsLimiter {
    target: Option<Duration>,
    frame_start: Instant,
}

impl FpsLimiter {
    /// `max_fps` of `None` disables limiting entirely.
    pub fn new(max_fps: Option<f32>) -> Self {
        let target = max_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            target,
            frame_start: Instant::now(),
        }
    }

    /// Mark the start of a frame.
    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleep out the rest of the frame budget, if any remains.
    pub fn end(&self) {
        let Some(target) = self.target else { return };
        let spent = self.frame_start.elapsed();
        if spent < target {
            std::thread::sleep(target - spent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_advances_with_update() {
        let mut time = Time::new();
        assert_eq!(time.frame_count(), 0);
        std::thread::sleep(Duration::from_millis(2));
        time.update();
        assert!(time.delta() >= Duration::from_millis(2));
        assert_eq!(time.frame_count(), 1);
        assert!(time.elapsed() >= time.delta());
    }

    #[test]
    fn limiter_sleeps_to_target() {
        let mut limiter = FpsLimiter::new(Some(100.0));
        limiter.begin();
        let start = Instant::now();
        limiter.end();
        // Frame did ~nothing, so the limiter should absorb most of the 10ms.
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn disabled_limiter_does_not_sleep() {
        let mut limiter = FpsLimiter::new(None);
        limiter.begin();
        let start = Instant::now();
        limiter.end();
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
