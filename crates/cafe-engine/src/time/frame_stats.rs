use std::time::Duration;

/// Frame-rate figures for one measurement window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PeriodicReport {
    /// Frames rendered during the window.
    pub fps: u32,

    /// Mean wall-clock time per frame.
    pub avg_frame_time: Duration,
}

/// Rolling frame counter that reports once per measurement window.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: Duration,
    frames: u32,
    elapsed: Duration,
}

impl FrameStats {
    /// One-second window.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Records a rendered frame that took `frame_delta`.
    ///
    /// Returns a report and starts a new window once the current one is full.
    pub fn record(&mut self, frame_delta: Duration) -> Option<PeriodicReport> {
        self.frames += 1;
        self.elapsed += frame_delta;

        if self.elapsed < self.window {
            return None;
        }

        let report = PeriodicReport {
            fps: self.frames,
            avg_frame_time: self.elapsed / self.frames,
        };
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(report)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
