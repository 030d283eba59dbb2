#[cfg(any(windows, target_os = "macos", target_os = "linux", target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
#[cfg(any(windows, target_os = "macos", target_os = "linux", target_arch = "wasm32"))]
use winit::window::{Fullscreen, Window as OsWindow, WindowAttributes};

/// Platform-agnostic window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    pub resizable: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cafe Engine".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// winit attributes shared by the desktop and browser backends.
    #[cfg(any(windows, target_os = "macos", target_os = "linux", target_arch = "wasm32"))]
    pub(super) fn os_attributes(&self) -> WindowAttributes {
        OsWindow::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width as f64, self.height as f64))
            .with_resizable(self.resizable)
            .with_fullscreen(self.fullscreen.then_some(Fullscreen::Borderless(None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_never_drops_to_zero() {
        let config = WindowConfig::default().size(0, 480);
        assert_eq!((config.width, config.height), (1, 480));
    }

    #[cfg(any(windows, target_os = "macos", target_os = "linux", target_arch = "wasm32"))]
    #[test]
    fn os_attributes_carry_the_config() {
        let attrs = WindowConfig::default()
            .title("cafe")
            .size(640, 360)
            .resizable(false)
            .fullscreen(true)
            .os_attributes();

        assert_eq!(attrs.title, "cafe");
        assert_eq!(attrs.inner_size, Some(LogicalSize::new(640.0, 360.0).into()));
        assert!(!attrs.resizable);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }
}
