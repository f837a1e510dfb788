//! Fixed-step frame scheduler
//!
//! Converts irregular frame timestamps into a whole number of logic ticks
//! plus an interpolation factor for rendering.

use serde::{Deserialize, Serialize};

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameStats {
    /// Clamped elapsed time fed into the accumulator
    pub delta: f64,
    /// Logic ticks run this frame
    pub ticks: u32,
    /// Fraction of a step left over, in [0, 1)
    pub alpha: f32,
}

/// Accumulator-based fixed timestep.
///
/// Every ready step runs, however many that is; the frame delta clamp is
/// the only bound on catch-up work.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepScheduler {
    step: f64,
    max_frame_delta: f64,
    accumulator: f64,
    last_time: Option<f64>,
}

impl FixedStepScheduler {
    pub fn new(step: f64, max_frame_delta: f64) -> Self {
        Self {
            step: if step > 0.0 { step } else { crate::consts::SIM_DT as f64 },
            max_frame_delta: max_frame_delta.max(0.0),
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Current interpolation factor
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step) as f32
    }

    /// Forget the last timestamp, e.g. after the host was suspended
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Feed one frame timestamp (seconds). Runs `tick` on `state` once per
    /// ready step, then `render` once with the interpolation factor.
    ///
    /// The first call only records the timestamp. Elapsed time is clamped to
    /// `[0, max_frame_delta]`, so clocks that go backwards yield no ticks.
    pub fn advance<S: ?Sized>(
        &mut self,
        now: f64,
        state: &mut S,
        mut tick: impl FnMut(&mut S, f64),
        render: impl FnOnce(&S, f32),
    ) -> FrameStats {
        let delta = match self.last_time {
            Some(last) => (now - last).clamp(0.0, self.max_frame_delta),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= self.step {
            tick(state, self.step);
            self.accumulator -= self.step;
            ticks += 1;
        }

        let alpha = self.alpha();
        render(state, alpha);
        FrameStats {
            delta,
            ticks,
            alpha,
        }
    }
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(
            crate::consts::SIM_DT as f64,
            crate::consts::MAX_FRAME_DELTA,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STEP: f64 = 1.0 / 64.0;

    fn run(s: &mut FixedStepScheduler, now: f64) -> FrameStats {
        s.advance(now, &mut (), |_, _| {}, |_, _| {})
    }

    #[test]
    fn test_first_frame_runs_nothing() {
        let mut s = FixedStepScheduler::new(STEP, 0.25);
        let stats = run(&mut s, 100.0);
        assert_eq!(stats.ticks, 0);
        assert_eq!(stats.delta, 0.0);
    }

    #[test]
    fn test_steps_and_alpha() {
        let mut s = FixedStepScheduler::new(STEP, 0.25);
        run(&mut s, 0.0);
        // 2.5 steps
        let stats = run(&mut s, 2.5 * STEP);
        assert_eq!(stats.ticks, 2);
        assert!((stats.alpha - 0.5).abs() < 1e-6);

        let stats = run(&mut s, 3.0 * STEP);
        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.alpha, 0.0);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut s = FixedStepScheduler::new(STEP, 0.25);
        run(&mut s, 0.0);
        let stats = run(&mut s, 10.0);
        assert_eq!(stats.delta, 0.25);
        assert_eq!(stats.ticks, 16);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut s = FixedStepScheduler::new(STEP, 0.25);
        run(&mut s, 5.0);
        let stats = run(&mut s, 4.0);
        assert_eq!(stats.delta, 0.0);
        assert_eq!(stats.ticks, 0);
    }

    #[test]
    fn test_tick_receives_step_and_render_runs_once() {
        let mut s = FixedStepScheduler::new(STEP, 0.25);
        run(&mut s, 0.0);
        let mut seen: Vec<f64> = Vec::new();
        let mut renders = 0;
        s.advance(
            4.0 * STEP,
            &mut seen,
            |seen, dt| seen.push(dt),
            |seen, _| {
                assert_eq!(seen.len(), 4);
                renders += 1;
            },
        );
        assert_eq!(seen, vec![STEP; 4]);
        assert_eq!(renders, 1);
    }

    proptest! {
        #[test]
        fn prop_tick_count_matches_clamped_time(
            gaps in proptest::collection::vec(0u32..400, 1..60)
        ) {
            // Gaps in 1/1024 s keep every sum exact in binary
            let mut s = FixedStepScheduler::new(STEP, 0.25);
            let mut now = 0.0;
            run(&mut s, now);
            let mut total_ticks = 0u64;
            let mut fed = 0.0;
            for gap in gaps {
                now += gap as f64 / 1024.0;
                let stats = run(&mut s, now);
                fed += stats.delta;
                total_ticks += stats.ticks as u64;
                prop_assert!(stats.alpha >= 0.0 && stats.alpha < 1.0);
            }
            prop_assert_eq!(total_ticks, (fed / STEP).floor() as u64);
        }
    }
}
