//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform backends translate native events into `InputEvent`s and apply them
//! to the window's `InputLatch`; the game loop commits the latch once per tick.

mod latch;
mod map;
mod types;

pub use latch::InputLatch;
pub use map::{Binding, InputAction, InputAxis, InputMap};
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
};
