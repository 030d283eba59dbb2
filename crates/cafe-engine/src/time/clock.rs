use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use anyhow::{Context, Result};

/// Monotonic time source.
///
/// `now()` is measured from a start reference captured when the clock is built,
/// so the value is comparable across calls but not across clocks. Implementations
/// must never go backwards.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock backed by the OS steady timer (`std::time::Instant`).
///
/// Wall-clock adjustments do not affect it. Browsers have no `Instant`; use
/// [`PerformanceClock`] there.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Copy, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock backed by the browser's `performance.now()`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: web_sys::Performance,
    start_ms: f64,
    latest: Cell<Duration>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    /// Fails outside a window context (workers without `performance`).
    pub fn new() -> Result<Self> {
        let performance = web_sys::window()
            .and_then(|w| w.performance())
            .context("performance timer is unavailable")?;
        let start_ms = performance.now();
        Ok(Self {
            performance,
            start_ms,
            latest: Cell::new(Duration::ZERO),
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> Duration {
        let now = elapsed_between(self.start_ms, self.performance.now()).max(self.latest.get());
        self.latest.set(now);
        now
    }
}

/// Millisecond timestamps to an elapsed `Duration`.
///
/// A reading before `start_ms` or a non-finite one counts as zero.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn elapsed_between(start_ms: f64, now_ms: f64) -> Duration {
    let ms = now_ms - start_ms;
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// Clock advanced explicitly by its owner.
///
/// Clones share the same time line, so a test can keep one handle while a
/// platform owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get().saturating_add(by));
    }

    /// Jumps to `at` if it lies in the future; earlier values are ignored.
    pub fn set(&self, at: Duration) {
        if at > self.elapsed.get() {
            self.elapsed.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millisecond_readings_convert_to_elapsed_time() {
        assert_eq!(elapsed_between(1000.0, 1250.0), Duration::from_millis(250));
        assert_eq!(elapsed_between(1000.0, 999.0), Duration::ZERO);
        assert_eq!(elapsed_between(0.0, f64::NAN), Duration::ZERO);
        assert_eq!(elapsed_between(0.0, 0.5), Duration::from_micros(500));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..1000 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let a = ManualClock::new();
        let b = a.clone();

        a.advance(Duration::from_millis(5));
        assert_eq!(b.now(), Duration::from_millis(5));

        b.set(Duration::from_millis(2));
        assert_eq!(a.now(), Duration::from_millis(5), "set must not rewind");

        b.set(Duration::from_millis(9));
        assert_eq!(a.now(), Duration::from_millis(9));
    }
}
