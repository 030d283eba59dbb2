//! Cafe engine crate.
//!
//! Owns the fixed-timestep loop, the edge-triggered input model, and the thin
//! platform/GPU/audio collaborators game code talks to. The scene stack and
//! isometric tile math sit on top.

pub mod audio;
pub mod core;
pub mod device;
pub mod entity;
pub mod input;
pub mod iso;
pub mod scene;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
