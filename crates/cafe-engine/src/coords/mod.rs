//! Coordinate and geometry types shared by renderers and game code.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::{lerp, Vec2};
pub use viewport::Viewport;
