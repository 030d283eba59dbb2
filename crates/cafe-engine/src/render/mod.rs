//! Renderer collaborator.
//!
//! Game code drives a [`Renderer`] from inside the render callback only; the
//! loop itself never draws. One `begin_frame`/`end_frame` pair per rendered frame.
//!
//! Convention:
//! - positions and sizes are logical pixels, top-left origin, +Y down
//! - colors are linear premultiplied

mod null;
mod wgpu_quad;

use anyhow::Result;

use crate::coords::Vec2;
use crate::paint::Color;

pub use null::NullRenderer;
pub use wgpu_quad::WgpuRenderer;

/// Drawing backend.
pub trait Renderer {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Starts a frame. Errors if a frame is already open or the backend failed.
    fn begin_frame(&mut self) -> Result<()>;

    /// Finishes and presents the open frame.
    fn end_frame(&mut self) -> Result<()>;

    /// Color used by [`clear`](Self::clear).
    fn set_clear_color(&mut self, color: Color);

    /// Fills the whole frame with the clear color.
    fn clear(&mut self);

    /// Axis-aligned solid quad with its top-left corner at `position`.
    fn draw_quad(&mut self, position: Vec2, size: Vec2, color: Color);
}
