use std::time::Instant;

use crate::frame::FrameInfo;
use crate::traits::FrameSource;

/// Source of elapsed seconds since animation start
pub trait TimeSource {
    fn elapsed(&mut self) -> f32;
}

/// Wall clock, started on construction
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn elapsed(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Hand-driven clock for headless runs and tests.
///
/// Each read returns the current time and then advances by `step`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f32,
    step: f32,
}

impl ManualClock {
    /// Frozen at `t`
    pub fn at(t: f32) -> Self {
        Self { now: t, step: 0.0 }
    }

    /// Starts at zero and moves `dt` per frame
    pub fn fixed_step(dt: f32) -> Self {
        Self { now: 0.0, step: dt }
    }

    pub fn set(&mut self, t: f32) {
        self.now = t;
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
    }

    pub fn now(&self) -> f32 {
        self.now
    }
}

impl TimeSource for ManualClock {
    fn elapsed(&mut self) -> f32 {
        let t = self.now;
        self.now += self.step;
        t
    }
}

/// Turns a time source into numbered, monotonic frames
#[derive(Debug)]
pub struct FrameClock<S: TimeSource> {
    source: S,
    number: u64,
    last: f32,
}

impl<S: TimeSource> FrameClock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            number: 0,
            last: 0.0,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Never goes backwards, even if the source does
    pub fn next_frame(&mut self) -> FrameInfo {
        let time = self.source.elapsed().max(self.last);
        let info = FrameInfo::new(self.number, time, time - self.last);
        self.last = time;
        self.number += 1;
        info
    }
}

impl<S: TimeSource> Iterator for FrameClock<S> {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.next_frame())
    }
}

impl<S: TimeSource> FrameSource for FrameClock<S> {
    fn elapsed(&self) -> f32 {
        self.last
    }

    fn frame_count(&self) -> u64 {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn system_clock_measures_elapsed() {
        let mut clock = SystemClock::new();
        thread::sleep(Duration::from_millis(10));
        let t = clock.elapsed();
        assert!(t >= 0.009);
    }

    #[test]
    fn manual_clock_steps_after_read() {
        let mut clock = ManualClock::fixed_step(0.5);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.elapsed(), 0.5);
        assert_eq!(clock.now(), 1.0);
    }

    #[test]
    fn frames_are_numbered_with_deltas() {
        let mut frames = FrameClock::new(ManualClock::fixed_step(0.25));
        let a = frames.next_frame();
        let b = frames.next_frame();
        assert_eq!((a.number, b.number), (0, 1));
        assert_eq!(b.time, 0.25);
        assert_eq!(b.delta, 0.25);
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn time_never_decreases() {
        let mut frames = FrameClock::new(ManualClock::at(3.0));
        frames.next_frame();
        frames.source_mut().set(1.0);
        let f = frames.next_frame();
        assert_eq!(f.time, 3.0);
        assert_eq!(f.delta, 0.0);
    }
}
