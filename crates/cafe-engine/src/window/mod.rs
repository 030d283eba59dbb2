//! Platform + window collaborators.
//!
//! `Platform` owns the native event source and the clock; `Window` owns the
//! per-window input latch and open flag. The game loop only talks to these traits.
//! Backends:
//! - `headless`: scripted events and a manual clock (tests, servers)
//! - `desktop`: winit event loop pumped without blocking
//! - `web` (wasm32): browser-driven winit loop feeding an [`EventInbox`]

mod config;
mod headless;
mod inbox;

#[cfg(any(windows, target_os = "macos", target_os = "linux"))]
mod desktop;
#[cfg(any(windows, target_os = "macos", target_os = "linux", target_arch = "wasm32"))]
mod translate;
#[cfg(target_arch = "wasm32")]
mod web;

use std::time::Duration;

use anyhow::Result;

use crate::coords::Vec2;
use crate::input::{InputLatch, Key, MouseButton};
use crate::time::Clock;

pub use config::WindowConfig;
pub use headless::{HeadlessEvent, HeadlessPlatform, HeadlessWindow};
pub use inbox::EventInbox;

#[cfg(any(windows, target_os = "macos", target_os = "linux"))]
pub use desktop::{WinitPlatform, WinitWindow};
#[cfg(target_arch = "wasm32")]
pub use web::{run_web, WebPlatform, WebStart, WebWindow};

/// Native event source, window factory and time base.
pub trait Platform {
    type Window: Window + 'static;
    type Clock: Clock;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Opens a window. Failure is fatal for the caller.
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window>;

    /// Delivers every queued native event to `window` and returns.
    ///
    /// Input lands in the window's latch; close requests clear its open flag.
    fn poll_events(&mut self, window: &mut Self::Window);

    fn clock(&self) -> &Self::Clock;

    /// Time since the platform clock started.
    fn now(&self) -> Duration {
        self.clock().now()
    }

    /// Yields the thread for `duration`.
    ///
    /// A browser tab cannot block; on wasm32 this returns at once and the
    /// animation-frame cadence paces the loop instead.
    fn sleep(&mut self, duration: Duration) {
        #[cfg(not(target_arch = "wasm32"))]
        std::thread::sleep(duration);
        #[cfg(target_arch = "wasm32")]
        let _ = duration;
    }
}

/// A native window and the input state routed to it.
pub trait Window {
    fn is_open(&self) -> bool;

    /// Marks the window closed; the loop stops on its next iteration.
    fn close(&mut self);

    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    fn scale_factor(&self) -> f64;

    fn set_title(&mut self, title: &str);

    fn input(&self) -> &InputLatch;

    fn input_mut(&mut self) -> &mut InputLatch;

    fn is_key_down(&self, key: Key) -> bool {
        self.input().is_down(key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.input().is_pressed(key)
    }

    fn is_key_released(&self, key: Key) -> bool {
        self.input().is_released(key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.input().is_button_down(button)
    }

    /// Pointer position in logical pixels, if over the window.
    fn mouse_position(&self) -> Option<Vec2> {
        self.input().pointer_pos
    }
}
