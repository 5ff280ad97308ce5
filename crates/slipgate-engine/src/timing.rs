//! Frame timing for the demo loop.
//!
//! Wall-clock delta calculation with a spiral-of-death clamp, frame-rate
//! pacing, and an optional fixed-timestep accumulator.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing manager.
#[derive(Debug)]
#[allow(dead_code)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Accumulator for fixed timestep
    accumulator: f32,
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Largest delta handed to the simulation
    max_dt: f32,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

#[allow(dead_code)]
impl FrameTiming {
    /// Create a new frame timing manager targeting `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            accumulator: 0.0,
            fixed_dt: 1.0 / 60.0,
            max_dt: 0.25,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Set the delta clamp.
    #[must_use]
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt.max(0.001);
        self
    }

    /// Set the fixed timestep delta.
    #[must_use]
    pub fn with_fixed_dt(mut self, fixed_dt: f32) -> Self {
        self.fixed_dt = fixed_dt.max(0.001);
        self
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Calculate delta time since the last frame, clamped to `max_dt`.
    /// Also stores the frame time for FPS averaging.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let clamped_dt = dt.min(self.max_dt);

        self.frame_times.push_back(clamped_dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped_dt
    }

    /// Accumulate time for fixed timestep updates.
    /// Returns the number of fixed steps to perform this frame, capped so a
    /// lag spike cannot snowball into ever-longer frames.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        let max_steps = 10;
        while self.accumulator >= self.fixed_dt && count < max_steps {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Sleep out the remainder of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            let sleep_time = self.frame_budget - elapsed;
            // Coarse sleep, then spin for the last millisecond
            if sleep_time > Duration::from_millis(1) {
                std::thread::sleep(sleep_time - Duration::from_millis(1));
            }
            while self.last_frame.elapsed() < self.frame_budget {
                std::hint::spin_loop();
            }
        }
    }

    /// Get the current FPS, averaged over recent frames.
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        (self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32) * 1000.0
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Reset timing (call before the loop starts).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator = 0.0;
        self.frame_times.clear();
    }
}

/// Simple FPS counter with a one second window, for the overlay.
#[derive(Debug)]
pub struct FpsCounter {
    /// Frame count since last update
    frame_count: u32,
    /// Time of last FPS calculation
    last_update: Instant,
    /// Update interval
    update_interval: Duration,
    /// Current FPS value
    current_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    /// Create a new FPS counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_update: Instant::now(),
            update_interval: Duration::from_secs(1),
            current_fps: 0.0,
        }
    }

    /// Count a frame; the published value refreshes once per window.
    pub fn tick(&mut self) -> f32 {
        self.frame_count += 1;

        let elapsed = self.last_update.elapsed();
        if elapsed >= self.update_interval {
            self.current_fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_update = Instant::now();
        }

        self.current_fps
    }

    /// Get current FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.current_fps
    }
}
