use std::time::Duration;

/// Game loop configuration.
///
/// Setters ignore zero values and keep the previous setting, logging a warning.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Simulation ticks per second.
    pub tick_rate_hz: u32,

    /// Ceiling on update ticks per rendered frame.
    pub max_steps_per_frame: u32,

    /// Largest frame delta fed to the scheduler.
    pub max_frame_delta: Duration,

    /// Optional rendered frames per second ceiling.
    pub frame_rate_cap: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_steps_per_frame: 5,
            max_frame_delta: Duration::from_millis(250),
            frame_rate_cap: None,
        }
    }
}

impl LoopConfig {
    pub fn tick_rate(mut self, hz: u32) -> Self {
        if hz == 0 {
            log::warn!("ignoring tick rate of 0 Hz; keeping {} Hz", self.tick_rate_hz);
        } else {
            self.tick_rate_hz = hz;
        }
        self
    }

    pub fn max_steps_per_frame(mut self, steps: u32) -> Self {
        if steps == 0 {
            log::warn!("ignoring step cap of 0; keeping {}", self.max_steps_per_frame);
        } else {
            self.max_steps_per_frame = steps;
        }
        self
    }

    pub fn max_frame_delta(mut self, delta: Duration) -> Self {
        if delta.is_zero() {
            log::warn!("ignoring zero max frame delta; keeping {:?}", self.max_frame_delta);
        } else {
            self.max_frame_delta = delta;
        }
        self
    }

    /// `None` removes the cap; `Some(0)` is ignored.
    pub fn frame_rate_cap(mut self, fps: Option<u32>) -> Self {
        match fps {
            Some(0) => log::warn!("ignoring frame rate cap of 0"),
            other => self.frame_rate_cap = other,
        }
        self
    }

    /// Duration of one simulation tick.
    pub fn fixed_step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }

    /// Minimum wall-clock time per rendered frame, if capped.
    pub fn frame_budget(&self) -> Option<Duration> {
        self.frame_rate_cap
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
    }
}
