//! Game loop core.
//!
//! - `LoopDriver`: poll → fixed ticks → one render → periodic stats
//! - `StopHandle`/`LoopPhase`: cooperative `Idle → Running → Stopped` lifecycle
//! - `TickCtx`/`FrameCtx`/`PeriodicCtx`: what each callback gets to see

mod config;
mod control;
mod ctx;
mod driver;

pub use config::LoopConfig;
pub use control::{LoopPhase, StopHandle};
pub use ctx::{FrameCtx, PeriodicCtx, TickCtx};
pub use driver::LoopDriver;
