/// Self-contained timers - manage internal state, no Frame dependency
/// Each timer accumulates delta time and decides when to fire

/// Fixed rate timer - fires at specific Hz
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    pub interval: f32,
    pub accumulator: f32,
}

impl FixedHz {
    /// Create timer that fires at given frequency
    pub fn new(hz: f32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns true if should fire
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            // Drop whole missed intervals instead of bursting to catch up
            self.accumulator %= self.interval;
            true
        } else {
            false
        }
    }
}

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second average, reported once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    timer: Throttled,
    frames: u32,
    elapsed: f32,
    last: f32,
}

impl FpsCounter {
    pub fn new(report_interval: f32) -> Self {
        Self {
            timer: Throttled::new(report_interval),
            frames: 0,
            elapsed: 0.0,
            last: 0.0,
        }
    }

    /// Count one frame; returns the average rate when the interval elapses
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;
        if !self.timer.try_tick(delta) {
            return None;
        }
        self.last = if self.elapsed > 0.0 {
            self.frames as f32 / self.elapsed
        } else {
            0.0
        };
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.last)
    }

    /// Most recently reported rate
    pub fn fps(&self) -> f32 {
        self.last
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_hz_fires_at_rate() {
        let mut timer = FixedHz::new(10.0); // 0.1s interval

        assert!(!timer.tick(0.05));
        assert!(timer.tick(0.06));
        assert!(!timer.tick(0.05));
    }

    #[test]
    fn fixed_hz_skips_missed_intervals() {
        let mut timer = FixedHz::new(10.0);
        assert!(timer.tick(0.35));
        assert!(!timer.tick(0.01));
    }

    #[test]
    fn throttled_enforces_minimum() {
        let mut timer = Throttled::new(0.1);

        assert!(!timer.try_tick(0.05));
        assert!(timer.try_tick(0.06));
        assert!(!timer.try_tick(0.05));
    }

    #[test]
    fn fps_reports_once_per_interval() {
        let mut fps = FpsCounter::new(1.0);
        let mut reports = Vec::new();
        for _ in 0..130 {
            if let Some(rate) = fps.frame(1.0 / 60.0) {
                reports.push(rate);
            }
        }
        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 60.0).abs() < 1.0);
    }
}
