use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::clock::{FrameClock, TimeSource};
use crate::frame::FrameInfo;

/// Shared stop flag checked once per iteration
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host-owned frame loop.
///
/// Windowed, the event loop calls [`RunLoop::next_frame`] once per redraw;
/// headless, [`RunLoop::run`] spins until the token is cancelled.
#[derive(Debug)]
pub struct RunLoop<S: TimeSource> {
    clock: FrameClock<S>,
    token: CancelToken,
}

impl<S: TimeSource> RunLoop<S> {
    pub fn new(source: S) -> Self {
        Self {
            clock: FrameClock::new(source),
            token: CancelToken::new(),
        }
    }

    pub fn with_token(source: S, token: CancelToken) -> Self {
        Self {
            clock: FrameClock::new(source),
            token,
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The next frame, or `None` once cancelled
    pub fn next_frame(&mut self) -> Option<FrameInfo> {
        if self.token.is_cancelled() {
            return None;
        }
        Some(self.clock.next_frame())
    }

    /// Drive `step` until cancelled; returns the number of frames run.
    ///
    /// `step` may cancel the token itself, which stops the loop before the
    /// following iteration.
    pub fn run<F>(&mut self, mut step: F) -> u64
    where
        F: FnMut(&FrameInfo),
    {
        let mut frames = 0;
        while let Some(frame) = self.next_frame() {
            step(&frame);
            frames += 1;
        }
        log::debug!("run loop stopped after {frames} frames");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    #[test]
    fn cancelled_loop_yields_nothing() {
        let mut run_loop = RunLoop::new(ManualClock::fixed_step(0.1));
        run_loop.token().cancel();
        assert!(run_loop.next_frame().is_none());
        assert_eq!(run_loop.run(|_| {}), 0);
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
    }
}
