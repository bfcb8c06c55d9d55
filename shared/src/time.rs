/// How many whole fixed steps a single frame is allowed to drain. Anything
/// beyond this (a debugger pause, a laptop lid close) is discarded rather
/// than replayed as a runaway catch-up burst.
pub const MAX_ACCUMULATED_STEPS: f32 = 10.0;

/// Fixed-timestep accumulator. Variable frame deltas go in, whole fixed
/// steps come out; the remainder is retained for the next frame. Both the
/// server tick loop and the client's local prediction drain through this so
/// the two simulations advance in the same quantum.
pub struct FixedTimestep {
    step_secs: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step_secs: f32) -> Self {
        Self {
            step_secs,
            accumulator: 0.0,
        }
    }

    pub fn step_secs(&self) -> f32 {
        self.step_secs
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Accumulates `frame_secs` and invokes `step_fn` once per whole fixed
    /// step drained, passing the step quantum. Returns the number of steps
    /// taken. The accumulator is clamped to [`MAX_ACCUMULATED_STEPS`] steps
    /// before draining.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_secs: f32, mut step_fn: F) -> u32 {
        self.accumulator += frame_secs;

        let cap = self.step_secs * MAX_ACCUMULATED_STEPS;
        if self.accumulator > cap {
            self.accumulator = cap;
        }

        let mut steps = 0;
        while self.accumulator >= self.step_secs {
            self.accumulator -= self.step_secs;
            step_fn(self.step_secs);
            steps += 1;
        }
        steps
    }
}
