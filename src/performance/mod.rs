//! Frame throughput tracking
//!
//! Counts presented frames and reports generations-per-second once a second
//! for diagnostic logging. Plain local state owned by the frame loop.

use std::time::{Duration, Instant};

/// Per-second frame counter
pub struct FrameCounter {
    window_start: Instant,
    frames: u32,
    report_interval: Duration,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            report_interval: Duration::from_secs(1),
        }
    }

    /// Registers one presented frame.
    ///
    /// Returns the frames-per-second over the elapsed window once per
    /// reporting interval, `None` otherwise.
    pub fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < self.report_interval {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = Instant::now();
        Some(fps)
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
