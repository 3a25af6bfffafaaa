//! Fixed frame-rate pacing

use std::thread;
use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame's time budget
#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    frame_start: Instant,
    frames: u64,
}

impl FrameClock {
    /// A clock targeting `fps` frames per second (`fps` must be non-zero)
    pub fn new(fps: u32) -> Self {
        Self {
            budget: Duration::from_secs(1) / fps.max(1),
            frame_start: Instant::now(),
            frames: 0,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time left in the current frame's budget
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.frame_start.elapsed())
    }

    /// Blocks until the frame budget has elapsed, then starts the next frame
    ///
    /// Returns how long the finished frame took, sleep included.
    pub fn tick(&mut self) -> Duration {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        let elapsed = self.frame_start.elapsed();
        self.frame_start = Instant::now();
        self.frames += 1;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_from_fps() {
        assert_eq!(FrameClock::new(50).budget(), Duration::from_millis(20));
        assert_eq!(FrameClock::new(1).budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_tick_waits_out_budget() {
        let mut clock = FrameClock::new(100);
        let elapsed = clock.tick();
        assert!(elapsed >= Duration::from_millis(10));
        assert_eq!(clock.frames(), 1);
    }
}
