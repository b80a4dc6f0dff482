//! Fixed-step simulation clock
//!
//! Accumulates real elapsed time from the driver and converts it into a
//! whole number of fixed ticks. Simulation time is derived from the tick
//! count, never from the wall clock, so a replay with the same inputs sees
//! the same timestamps.

/// Fixed-timestep accumulator (integer milliseconds)
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_ms: u64,
    accumulator_ms: u64,
    ticks: u64,
}

impl FixedStepClock {
    /// Create a clock with the given step. A zero step is bumped to 1ms.
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms: step_ms.max(1),
            accumulator_ms: 0,
            ticks: 0,
        }
    }

    /// Feed `elapsed_ms` of real time and return how many fixed ticks are due.
    /// The remainder stays in the accumulator for the next call.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        let mut due = 0u32;
        while self.accumulator_ms >= self.step_ms {
            self.accumulator_ms -= self.step_ms;
            self.ticks += 1;
            due = due.saturating_add(1);
        }
        due
    }

    /// Milliseconds waiting in the accumulator
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulator_ms
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Ticks handed out so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time of tick `tick_index`
    #[inline]
    pub fn sim_time_ms(&self, tick_index: u64) -> u64 {
        tick_index.saturating_mul(self.step_ms)
    }
}
