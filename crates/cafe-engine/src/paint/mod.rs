//! Paint model shared between game code and renderers.

mod color;

pub use color::Color;
