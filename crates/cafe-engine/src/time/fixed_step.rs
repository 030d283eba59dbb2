use std::time::Duration;

/// Largest `f32` strictly below 1.0.
const ALPHA_MAX: f32 = 1.0 - f32::EPSILON / 2.0;

/// Outcome of feeding one frame's delta into a [`FixedStep`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StepPlan {
    /// Number of update ticks due this frame.
    pub ticks: u32,

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub alpha: f32,

    /// Frame delta after clamping.
    pub delta: Duration,

    /// Backlog discarded because the step cap was reached.
    pub dropped: Duration,
}

/// Accumulator-based fixed-timestep scheduler.
///
/// Converts variable frame deltas into a whole number of equal simulation
/// ticks plus an interpolation factor for rendering.
///
/// Clamp rationale:
/// - `max_delta` absorbs debugger pauses and suspends before they reach the accumulator
/// - `max_steps` bounds per-frame update work; backlog beyond it is dropped so
///   rendering cannot fall permanently behind simulation
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    max_steps: u32,
    max_delta: Duration,
    accumulator: Duration,
}

impl FixedStep {
    /// Creates a scheduler with an empty accumulator.
    ///
    /// A zero `step` is bumped to one nanosecond and a zero `max_steps` to one.
    pub fn new(step: Duration, max_steps: u32, max_delta: Duration) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            max_steps: max_steps.max(1),
            max_delta,
            accumulator: Duration::ZERO,
        }
    }

    /// Fixed simulation step.
    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Unconsumed simulation time.
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Time left until the next tick becomes due.
    pub fn until_next_tick(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }

    /// Adds one frame's delta and drains it into ticks.
    pub fn accumulate(&mut self, raw_delta: Duration) -> StepPlan {
        let delta = raw_delta.min(self.max_delta);
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_steps {
            self.accumulator -= self.step;
            ticks += 1;
        }

        // Cap reached with debt left: keep only the sub-step remainder.
        let mut dropped = Duration::ZERO;
        if self.accumulator >= self.step {
            let remainder = self.accumulator.as_nanos() % self.step.as_nanos();
            let remainder = Duration::from_nanos(remainder as u64);
            dropped = self.accumulator - remainder;
            self.accumulator = remainder;
        }

        StepPlan {
            ticks,
            alpha: self.alpha(),
            delta,
            dropped,
        }
    }

    /// Interpolation factor between the previous and current tick.
    pub fn alpha(&self) -> f32 {
        if self.accumulator.is_zero() {
            return 0.0;
        }
        let ratio = self.accumulator.as_nanos() as f64 / self.step.as_nanos() as f64;
        (ratio as f32).clamp(f32::MIN_POSITIVE, ALPHA_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixty_hz() -> FixedStep {
        FixedStep::new(
            Duration::from_secs_f64(1.0 / 60.0),
            5,
            Duration::from_millis(250),
        )
    }

    #[test]
    fn one_step_of_delta_fires_one_tick() {
        let mut fs = sixty_hz();
        let plan = fs.accumulate(fs.step());

        assert_eq!(plan.ticks, 1);
        assert_eq!(plan.alpha, 0.0);
        assert_eq!(fs.accumulator(), Duration::ZERO);
    }

    #[test]
    fn two_and_a_half_steps_leave_half_alpha() {
        let mut fs = sixty_hz();
        let step = fs.step();
        let plan = fs.accumulate(step * 2 + step / 2);

        assert_eq!(plan.ticks, 2);
        assert!((plan.alpha - 0.5).abs() < 1e-4, "alpha = {}", plan.alpha);
    }

    #[test]
    fn stall_is_capped_and_backlog_dropped() {
        let mut fs = FixedStep::new(
            Duration::from_secs_f64(1.0 / 60.0),
            5,
            Duration::from_secs(10),
        );
        let step = fs.step();
        let plan = fs.accumulate(step * 100);

        assert_eq!(plan.ticks, 5);
        assert_eq!(plan.dropped, step * 95);
        assert!(fs.accumulator() < step);

        // No catch-up on the following frame.
        let next = fs.accumulate(Duration::ZERO);
        assert_eq!(next.ticks, 0);
    }

    #[test]
    fn delta_is_clamped_before_accumulating() {
        let mut fs = FixedStep::new(Duration::from_millis(10), 100, Duration::from_millis(250));
        let plan = fs.accumulate(Duration::from_secs(3));

        assert_eq!(plan.delta, Duration::from_millis(250));
        assert_eq!(plan.ticks, 25);
        assert_eq!(plan.dropped, Duration::ZERO);
    }

    #[test]
    fn tick_count_matches_floor_of_accumulated_time() {
        let step = Duration::from_millis(16);
        let mut fs = FixedStep::new(step, 4, Duration::from_millis(250));
        let deltas = [3u64, 17, 40, 0, 15, 1, 90, 33, 8, 64, 250, 7];

        for ms in deltas {
            let before = fs.accumulator();
            let delta = Duration::from_millis(ms);
            let expected = ((before + delta).as_nanos() / step.as_nanos()).min(4) as u32;

            let plan = fs.accumulate(delta);
            assert_eq!(plan.ticks, expected, "delta {ms}ms");
            assert!(fs.accumulator() < step);
            assert!((0.0..1.0).contains(&plan.alpha));
            assert_eq!(plan.alpha == 0.0, fs.accumulator().is_zero());
        }
    }

    #[test]
    fn alpha_stays_below_one_near_step_boundary() {
        let step = Duration::from_secs(1);
        let mut fs = FixedStep::new(step, 5, Duration::from_secs(2));
        let plan = fs.accumulate(step - Duration::from_nanos(1));

        assert_eq!(plan.ticks, 0);
        assert!(plan.alpha < 1.0);
        assert!(plan.alpha > 0.0);
    }

    #[test]
    fn until_next_tick_tracks_accumulator() {
        let mut fs = FixedStep::new(Duration::from_millis(20), 5, Duration::from_millis(250));
        fs.accumulate(Duration::from_millis(5));
        assert_eq!(fs.until_next_tick(), Duration::from_millis(15));

        let plan = fs.accumulate(Duration::from_millis(15));
        assert_eq!(plan.ticks, 1);
        assert_eq!(fs.until_next_tick(), Duration::from_millis(20));
    }
}
