use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys};
use winit::window::{Window as OsWindow, WindowId};

use crate::core::LoopDriver;
use crate::input::InputLatch;
use crate::time::PerformanceClock;

use super::inbox::EventInbox;
use super::translate::translate_window_event;
use super::{Platform, Window, WindowConfig};

/// Browser platform.
///
/// The browser owns the event loop: winit handlers push into an
/// [`EventInbox`] and `poll_events` drains it. Windows are canvases created
/// by [`run_web`]; `create_window` adopts the canvas staged for it.
pub struct WebPlatform {
    clock: PerformanceClock,
    inbox: EventInbox,
    staged: Option<Arc<OsWindow>>,
}

impl WebPlatform {
    pub fn new() -> Result<Self> {
        Ok(Self {
            clock: PerformanceClock::new()?,
            inbox: EventInbox::new(),
            staged: None,
        })
    }

    /// Shared handle to the queue `poll_events` drains.
    pub fn inbox(&self) -> EventInbox {
        self.inbox.clone()
    }
}

impl Platform for WebPlatform {
    type Window = WebWindow;
    type Clock = PerformanceClock;

    fn name(&self) -> &'static str {
        "web"
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<WebWindow> {
        let os_window = self
            .staged
            .take()
            .context("web canvases are created by run_web")?;
        os_window.set_title(&config.title);
        log::info!(
            "canvas \"{}\" attached ({}x{} @ {:.2}x)",
            config.title,
            os_window.inner_size().width,
            os_window.inner_size().height,
            os_window.scale_factor(),
        );

        Ok(WebWindow {
            os_window,
            open: true,
            input: InputLatch::default(),
        })
    }

    fn poll_events(&mut self, window: &mut WebWindow) {
        self.inbox.drain_into(window);
    }

    fn clock(&self) -> &PerformanceClock {
        &self.clock
    }

    /// The browser paces frames; there is nothing to wait on.
    fn sleep(&mut self, _duration: Duration) {}
}

/// Canvas-backed window.
pub struct WebWindow {
    os_window: Arc<OsWindow>,
    open: bool,
    input: InputLatch,
}

impl WebWindow {
    /// Shared handle for surface creation.
    pub fn handle(&self) -> Arc<OsWindow> {
        Arc::clone(&self.os_window)
    }
}

impl Window for WebWindow {
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

/// What the start function of [`run_web`] builds its game from.
///
/// Both live for the rest of the page.
pub struct WebStart {
    pub platform: &'static mut WebPlatform,
    pub window: &'static mut WebWindow,
}

type DriverSlot = Rc<RefCell<Option<LoopDriver<'static, WebPlatform>>>>;

/// Runs a game in the browser and returns immediately.
///
/// Once the canvas exists, `start` builds the loop (GPU setup is async on the
/// web). The loop then runs one [`LoopDriver::run_frame`] per animation frame
/// until the window closes, a callback stops it, or a callback fails.
pub fn run_web<F, Fut>(config: WindowConfig, start: F) -> Result<()>
where
    F: FnOnce(WebStart) -> Fut + 'static,
    Fut: Future<Output = Result<LoopDriver<'static, WebPlatform>>> + 'static,
{
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let platform = WebPlatform::new()?;

    event_loop.spawn_app(WebApp {
        config,
        inbox: platform.inbox(),
        platform: Some(platform),
        start: Some(start),
        os_window: None,
        driver: DriverSlot::default(),
    });
    Ok(())
}

struct WebApp<F> {
    config: WindowConfig,
    inbox: EventInbox,
    platform: Option<WebPlatform>,
    start: Option<F>,
    os_window: Option<Arc<OsWindow>>,
    driver: DriverSlot,
}

impl<F, Fut> WebApp<F>
where
    F: FnOnce(WebStart) -> Fut + 'static,
    Fut: Future<Output = Result<LoopDriver<'static, WebPlatform>>> + 'static,
{
    fn launch(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (Some(mut platform), Some(start)) = (self.platform.take(), self.start.take()) else {
            return Ok(());
        };

        let attrs = self.config.os_attributes().with_append(true);
        let os_window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create canvas")?,
        );
        self.os_window = Some(Arc::clone(&os_window));

        platform.staged = Some(Arc::clone(&os_window));
        let window = platform.create_window(&self.config)?;

        // The page never tears these down; the loop borrows them for good.
        let game = start(WebStart {
            platform: Box::leak(Box::new(platform)),
            window: Box::leak(Box::new(window)),
        });

        let slot = Rc::clone(&self.driver);
        wasm_bindgen_futures::spawn_local(async move {
            let started = match game.await {
                Ok(mut driver) => driver.begin().map(|()| driver),
                Err(e) => Err(e),
            };
            match started {
                Ok(driver) => {
                    *slot.borrow_mut() = Some(driver);
                    os_window.request_redraw();
                }
                Err(e) => log::error!("game failed to start: {e:#}"),
            }
        });
        Ok(())
    }

    fn animation_frame(&mut self, event_loop: &ActiveEventLoop) {
        let mut slot = self.driver.borrow_mut();
        let Some(driver) = slot.as_mut() else {
            return;
        };

        let keep_going = match driver.run_frame() {
            Ok(running) => running,
            Err(e) => {
                log::error!("game loop failed: {e:#}");
                false
            }
        };

        if keep_going {
            if let Some(os_window) = &self.os_window {
                os_window.request_redraw();
            }
        } else {
            driver.end();
            *slot = None;
            event_loop.exit();
        }
    }
}

impl<F, Fut> ApplicationHandler for WebApp<F>
where
    F: FnOnce(WebStart) -> Fut + 'static,
    Fut: Future<Output = Result<LoopDriver<'static, WebPlatform>>> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.launch(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(os_window) = &self.os_window else {
            return;
        };
        if window_id != os_window.id() {
            return;
        }

        match &event {
            WindowEvent::RedrawRequested => {
                self.animation_frame(event_loop);
                return;
            }
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::debug!("close requested for {window_id:?}");
                self.inbox.request_close();
                os_window.request_redraw();
                return;
            }
            _ => {}
        }

        let scale = os_window.scale_factor();
        let inbox = &self.inbox;
        translate_window_event(scale, &event, |ev| inbox.push(ev));
    }
}
