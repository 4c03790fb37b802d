//! Frame clock for the game loop.

use std::time::{Duration, Instant};

/// Delta below which a frame is treated as "no time passed".
const MIN_FPS_DELTA: f32 = 1.0e-6;

/// Monotonic time source. `elapsed` never resets; `delta` measures the gap
/// between successive calls to itself and must be sampled once per frame.
#[derive(Debug)]
pub struct Clock {
    /// Time when the clock started.
    start_time: Instant,
    /// Instant sampled by the previous `delta` call.
    last_sample: Instant,
    /// Duration returned by the previous `delta` call.
    last_delta: Duration,
    /// Number of `delta` samples taken.
    frame_count: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Start a new clock at the current instant.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_sample: now,
            last_delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    /// Seconds since the previous call to `delta` (or since creation on the
    /// first call). Advances the internal sample point.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        self.last_delta = now.saturating_duration_since(self.last_sample);
        self.last_sample = now;
        self.frame_count += 1;
        self.last_delta.as_secs_f32()
    }

    /// Number of frames sampled so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instantaneous FPS from the most recent delta.
    pub fn fps(&self) -> f32 {
        let dt = self.last_delta.as_secs_f32();
        if dt > MIN_FPS_DELTA {
            1.0 / dt
        } else {
            0.0
        }
    }
}
