/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Monotonic simulation clock, advanced once per fixed step.
/// Gameplay timers read this instead of a wall clock so runs replay identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt as f64;
    }

    /// Seconds since the clock was created or reset.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

/// Stopwatch over simulation time.
///
/// Two ways to halt it:
/// - [`Timer::stop`] freezes the reading and moves the origin to `now`, so the
///   next [`Timer::start`] begins a fresh window (invulnerability).
/// - [`Timer::get_time_stop`] freezes the reading and leaves the origin alone
///   (level clock on win or lose).
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    origin: f64,
    frozen: f64,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: f64) {
        self.origin = now;
        self.frozen = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self, now: f64) {
        self.frozen = self.elapsed_seconds(now);
        self.running = false;
        self.origin = now;
    }

    /// Freeze and report the elapsed time without touching the origin.
    pub fn get_time_stop(&mut self, now: f64) -> f64 {
        self.frozen = self.elapsed_seconds(now);
        self.running = false;
        self.frozen
    }

    /// Live reading while running, otherwise the last frozen value.
    pub fn elapsed_seconds(&self, now: f64) -> f64 {
        if self.running {
            (now - self.origin).max(0.0)
        } else {
            self.frozen
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn sim_clock_advances_by_fixed_steps() {
        let mut clock = SimClock::new();
        for _ in 0..120 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.now() - 2.0).abs() < 1e-4);
        clock.reset();
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn running_timer_reads_live() {
        let mut t = Timer::new();
        t.start(1.0);
        assert!(t.is_running());
        assert_eq!(t.elapsed_seconds(3.5), 2.5);
    }

    #[test]
    fn stop_freezes_and_rearms_origin() {
        let mut t = Timer::new();
        t.start(1.0);
        t.stop(4.0);
        assert!(!t.is_running());
        assert_eq!(t.elapsed_seconds(10.0), 3.0);
        assert_eq!(t.origin(), 4.0);
    }

    #[test]
    fn get_time_stop_keeps_origin() {
        let mut t = Timer::new();
        t.start(1.0);
        let reported = t.get_time_stop(6.0);
        assert_eq!(reported, 5.0);
        assert_eq!(t.origin(), 1.0);
        assert_eq!(t.elapsed_seconds(100.0), 5.0);
    }

    #[test]
    fn restart_after_stop_begins_fresh_window() {
        let mut t = Timer::new();
        t.start(0.0);
        t.stop(2.5);
        t.start(3.0);
        assert_eq!(t.elapsed_seconds(3.5), 0.5);
    }
}
