use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::time::{FixedStep, FrameStats};
use crate::window::{Platform, Window};

use super::config::LoopConfig;
use super::control::{LoopPhase, StopHandle};
use super::ctx::{FrameCtx, PeriodicCtx, TickCtx};

type UpdateFn<'a> = Box<dyn FnMut(&mut TickCtx<'_>) -> Result<()> + 'a>;
type RenderFn<'a> = Box<dyn FnMut(&mut FrameCtx<'_>) -> Result<()> + 'a>;
type PeriodicFn<'a> = Box<dyn FnMut(&mut PeriodicCtx<'_>) -> Result<()> + 'a>;

/// Fixed-timestep game loop.
///
/// Each iteration polls the platform, converts the elapsed time into zero or
/// more update ticks, renders once with the leftover fraction, and reports
/// frame statistics once per second. The window's input latch is committed
/// after every tick, so edges are seen by exactly one update.
///
/// Callbacks are optional; a missing one is skipped. Errors returned by a
/// callback end the current frame and are handed back to the caller.
pub struct LoopDriver<'a, P: Platform> {
    platform: &'a mut P,
    window: &'a mut P::Window,

    config: LoopConfig,
    scheduler: FixedStep,
    stats: FrameStats,
    control: StopHandle,

    update: Option<UpdateFn<'a>>,
    render: Option<RenderFn<'a>>,
    periodic: Option<PeriodicFn<'a>>,

    previous_frame: Duration,
    frame_index: u64,
    tick_index: u64,
    frame_time: Duration,
    current_fps: u32,
}

impl<'a, P: Platform> LoopDriver<'a, P> {
    pub fn new(platform: &'a mut P, window: &'a mut P::Window, config: LoopConfig) -> Self {
        let scheduler = FixedStep::new(
            config.fixed_step(),
            config.max_steps_per_frame,
            config.max_frame_delta,
        );

        Self {
            platform,
            window,
            config,
            scheduler,
            stats: FrameStats::new(),
            control: StopHandle::new(),
            update: None,
            render: None,
            periodic: None,
            previous_frame: Duration::ZERO,
            frame_index: 0,
            tick_index: 0,
            frame_time: Duration::ZERO,
            current_fps: 0,
        }
    }

    /// Called once per fixed tick with the fixed `dt`.
    pub fn on_update(mut self, f: impl FnMut(&mut TickCtx<'_>) -> Result<()> + 'a) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Called once per frame with the interpolation `alpha`.
    pub fn on_render(mut self, f: impl FnMut(&mut FrameCtx<'_>) -> Result<()> + 'a) -> Self {
        self.render = Some(Box::new(f));
        self
    }

    /// Called once per second with frame-rate figures.
    pub fn on_periodic(mut self, f: impl FnMut(&mut PeriodicCtx<'_>) -> Result<()> + 'a) -> Self {
        self.periodic = Some(Box::new(f));
        self
    }

    /// Runs until the window closes, a callback stops the loop, or a callback fails.
    ///
    /// The loop ends in [`LoopPhase::Stopped`] either way and cannot be restarted.
    pub fn run(&mut self) -> Result<()> {
        self.begin()?;

        let result = loop {
            match self.run_frame() {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.end();
        result
    }

    /// `Idle → Running`, taking the first time reference.
    ///
    /// Hosts that own the outer loop (browser animation frames) call this once,
    /// then [`run_frame`](Self::run_frame) per host callback.
    pub fn begin(&mut self) -> Result<()> {
        ensure!(
            self.control.start(),
            "game loop cannot start from the {} phase",
            self.control.phase()
        );

        self.previous_frame = self.platform.now();
        log::info!(
            "game loop started on {} ({} Hz, at most {} steps per frame)",
            self.platform.name(),
            self.config.tick_rate_hz,
            self.scheduler.max_steps(),
        );
        Ok(())
    }

    /// Moves the loop to [`LoopPhase::Stopped`] for good.
    ///
    /// Host-driven loops call this once `run_frame` reports `false` or fails.
    pub fn end(&mut self) {
        self.control.finish();
        log::info!(
            "game loop stopped after {} frames / {} ticks",
            self.frame_index,
            self.tick_index
        );
    }

    /// Executes one iteration. Returns whether the loop is still running.
    ///
    /// A callback error aborts the rest of the frame and is returned with the
    /// failing callback named in its context. A failed update still counts as a
    /// tick and commits the input latch; the frame's remaining ticks are dropped.
    /// The loop stays running so the host can decide whether to continue.
    pub fn run_frame(&mut self) -> Result<bool> {
        if !self.control.is_running() {
            return Ok(false);
        }

        self.platform.poll_events(self.window);
        if !self.window.is_open() {
            if self.control.stop() {
                log::info!("window closed; stopping game loop");
            }
            return Ok(false);
        }

        let frame_start = self.platform.now();
        let raw_delta = frame_start.saturating_sub(self.previous_frame);
        self.previous_frame = frame_start;

        let plan = self.scheduler.accumulate(raw_delta);
        if !plan.dropped.is_zero() {
            log::debug!("step cap reached; dropped {:?} of simulation backlog", plan.dropped);
        }
        self.frame_time = plan.delta;

        let dt = self.scheduler.step();
        for _ in 0..plan.ticks {
            let outcome = match self.update.as_mut() {
                Some(update) => {
                    let mut ctx = TickCtx {
                        dt,
                        tick_index: self.tick_index,
                        window: &mut *self.window,
                        stop: &self.control,
                    };
                    update(&mut ctx)
                }
                None => Ok(()),
            };

            // Edges seen by this tick are retired before the next one, failed or not.
            self.window.input_mut().commit_frame();
            self.tick_index += 1;
            outcome.context("update callback failed")?;
        }

        if let Some(render) = self.render.as_mut() {
            let mut ctx = FrameCtx {
                alpha: plan.alpha,
                frame_index: self.frame_index,
                window: &mut *self.window,
                stop: &self.control,
            };
            render(&mut ctx).context("render callback failed")?;
        }
        self.frame_index += 1;

        if let Some(report) = self.stats.record(raw_delta) {
            self.current_fps = report.fps;
            log::debug!(
                "{} fps, {:.2} ms/frame",
                report.fps,
                report.avg_frame_time.as_secs_f64() * 1000.0
            );

            if let Some(periodic) = self.periodic.as_mut() {
                let mut ctx = PeriodicCtx {
                    fps: report.fps,
                    avg_frame_time: report.avg_frame_time,
                    window: &mut *self.window,
                    stop: &self.control,
                };
                periodic(&mut ctx).context("periodic callback failed")?;
            }
        }

        self.throttle(frame_start);

        Ok(self.control.is_running())
    }

    /// Sleeps out the rest of the frame budget, never past the next tick deadline.
    fn throttle(&mut self, frame_start: Duration) {
        let Some(budget) = self.config.frame_budget() else {
            return;
        };

        let spent = self.platform.now().saturating_sub(frame_start);
        let nap = budget
            .saturating_sub(spent)
            .min(self.scheduler.until_next_tick().saturating_sub(spent));

        if !nap.is_zero() {
            self.platform.sleep(nap);
        }
    }

    /// Requests a stop. Idempotent; a no-op unless running.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Handle for code that must end the loop from outside a callback.
    pub fn stop_handle(&self) -> StopHandle {
        self.control.clone()
    }

    pub fn phase(&self) -> LoopPhase {
        self.control.phase()
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Fixed simulation step.
    pub fn fixed_delta_time(&self) -> Duration {
        self.scheduler.step()
    }

    /// Clamped delta of the last frame.
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Frames counted in the last complete one-second window.
    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame_index
    }

    pub fn ticks_run(&self) -> u64 {
        self.tick_index
    }

    pub fn window(&self) -> &P::Window {
        &*self.window
    }
}
