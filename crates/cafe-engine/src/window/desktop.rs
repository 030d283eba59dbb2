use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as OsWindow, WindowId};

use crate::input::InputLatch;
use crate::time::MonotonicClock;

use super::translate::translate_window_event;
use super::{Platform, Window, WindowConfig};

/// Pumps allowed before giving up on the first `resumed` callback.
const MAX_RESUME_PUMPS: usize = 64;

/// Desktop platform backed by a winit event loop.
///
/// The event loop is pumped without blocking from `poll_events`, so the game
/// loop keeps control of the thread.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    clock: MonotonicClock,
}

impl WinitPlatform {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            clock: MonotonicClock::new(),
        })
    }
}

impl Platform for WinitPlatform {
    type Window = WinitWindow;
    type Clock = MonotonicClock;

    fn name(&self) -> &'static str {
        "winit"
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<WinitWindow> {
        let mut creator = WindowCreator {
            config,
            created: None,
        };

        for _ in 0..MAX_RESUME_PUMPS {
            if let PumpStatus::Exit(code) =
                self.event_loop.pump_app_events(Some(Duration::ZERO), &mut creator)
            {
                bail!("event loop exited with code {code} before the window was created");
            }

            if let Some(created) = creator.created.take() {
                let os_window = Arc::new(created?);
                log::info!(
                    "window \"{}\" created ({}x{} @ {:.2}x)",
                    config.title,
                    os_window.inner_size().width,
                    os_window.inner_size().height,
                    os_window.scale_factor(),
                );
                return Ok(WinitWindow {
                    id: os_window.id(),
                    os_window,
                    open: true,
                    input: InputLatch::default(),
                });
            }
        }

        bail!("platform never resumed; cannot create window")
    }

    fn poll_events(&mut self, window: &mut WinitWindow) {
        let mut pump = EventPump { window };
        if let PumpStatus::Exit(code) =
            self.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump)
        {
            log::debug!("event loop exited with code {code}");
            pump.window.open = false;
        }
    }

    fn clock(&self) -> &MonotonicClock {
        &self.clock
    }
}

/// Creates the window from inside `resumed`, where winit allows it.
struct WindowCreator<'c> {
    config: &'c WindowConfig,
    created: Option<Result<OsWindow>>,
}

impl ApplicationHandler for WindowCreator<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.created.is_some() {
            return;
        }

        self.created = Some(
            event_loop
                .create_window(self.config.os_attributes())
                .context("failed to create window"),
        );
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Routes one pump's worth of events into a single window.
///
/// Holds the window by exclusive borrow; close requests flip its open flag
/// rather than going through any shared state.
struct EventPump<'w> {
    window: &'w mut WinitWindow,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id {
            return;
        }

        match &event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::debug!("close requested for {window_id:?}");
                self.window.open = false;
                return;
            }
            _ => {}
        }

        let scale = self.window.os_window.scale_factor();
        let input = &mut self.window.input;
        translate_window_event(scale, &event, |ev| input.apply_event(ev));
    }
}

/// OS window plus the input latch fed by [`WinitPlatform::poll_events`].
pub struct WinitWindow {
    id: WindowId,
    os_window: Arc<OsWindow>,
    open: bool,
    input: InputLatch,
}

impl WinitWindow {
    /// Shared handle for surface creation.
    pub fn handle(&self) -> Arc<OsWindow> {
        Arc::clone(&self.os_window)
    }
}

impl Window for WinitWindow {
    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn size(&self) -> (u32, u32) {
        let size = self.os_window.inner_size();
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.os_window.scale_factor()
    }

    fn set_title(&mut self, title: &str) {
        self.os_window.set_title(title);
    }

    fn input(&self) -> &InputLatch {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputLatch {
        &mut self.input
    }
}
