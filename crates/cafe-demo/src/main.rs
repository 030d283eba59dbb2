//! Moves a quad with WASD at a fixed simulation rate and draws it interpolated
//! over an isometric floor.
//!
//! Enter/Space plays a blip on the null audio backend, P pauses, Escape quits.
//! Builds for the desktop and, through `run_web`, for wasm32 browsers.

mod game;

use anyhow::Result;

use cafe_engine::device::GpuInit;
use cafe_engine::logging::{init_logging, LoggingConfig};
use cafe_engine::render::WgpuRenderer;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    use anyhow::Context;
    use cafe_engine::window::{Platform, WinitPlatform};

    init_logging(LoggingConfig::default());

    let mut platform = WinitPlatform::new()?;
    let mut window = platform
        .create_window(&game::window_config())
        .context("failed to open demo window")?;

    let renderer = WgpuRenderer::new_blocking(window.handle(), GpuInit::default())?;
    let mut driver = game::build(&mut platform, &mut window, renderer)?;
    driver.run()
}

#[cfg(target_arch = "wasm32")]
fn main() -> Result<()> {
    use cafe_engine::window::run_web;

    init_logging(LoggingConfig::default());

    run_web(game::window_config(), |start| async move {
        let renderer = WgpuRenderer::new(start.window.handle(), GpuInit::default()).await?;
        game::build(start.platform, start.window, renderer)
    })
}
