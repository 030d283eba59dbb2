use std::time::Duration;

use crate::input::InputLatch;
use crate::window::Window;

use super::control::StopHandle;

/// Context passed to the update callback, once per fixed tick.
pub struct TickCtx<'a> {
    /// Fixed simulation step; identical for every tick of a loop.
    pub dt: Duration,

    /// Monotonic tick counter, starting at zero.
    pub tick_index: u64,

    pub window: &'a mut dyn Window,

    pub(crate) stop: &'a StopHandle,
}

impl TickCtx<'_> {
    /// `dt` in seconds.
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    /// Input state with this tick's press/release edges.
    pub fn input(&self) -> &InputLatch {
        self.window.input()
    }

    /// Ends the loop after the current frame renders.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

/// Context passed to the render callback, exactly once per frame.
pub struct FrameCtx<'a> {
    /// Position between the previous and the current tick, in `[0, 1)`.
    pub alpha: f32,

    /// Monotonic frame counter, starting at zero.
    pub frame_index: u64,

    pub window: &'a mut dyn Window,

    pub(crate) stop: &'a StopHandle,
}

impl FrameCtx<'_> {
    pub fn input(&self) -> &InputLatch {
        self.window.input()
    }

    /// Ends the loop once this callback returns.
    pub fn stop(&self) {
        self.stop.stop();
    }
}

/// Context passed to the periodic callback, once per measurement window.
pub struct PeriodicCtx<'a> {
    /// Frames rendered in the last window.
    pub fps: u32,

    pub avg_frame_time: Duration,

    pub window: &'a mut dyn Window,

    pub(crate) stop: &'a StopHandle,
}

impl PeriodicCtx<'_> {
    pub fn stop(&self) {
        self.stop.stop();
    }
}
