//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `Clock` per platform, queried once per loop iteration
//! - one `FixedStep` per loop, fed the frame delta to obtain ticks and alpha
//! - one `FrameStats` per loop for the once-per-second report

mod clock;
mod fixed_step;
mod frame_stats;

pub use clock::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::MonotonicClock;
#[cfg(target_arch = "wasm32")]
pub use clock::PerformanceClock;
pub use fixed_step::{FixedStep, StepPlan};
pub use frame_stats::{FrameStats, PeriodicReport};
