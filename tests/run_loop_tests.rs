use portfolio_visuals::core::clock::{FrameClock, ManualClock};
use portfolio_visuals::core::run_loop::{CancelToken, RunLoop};

#[cfg(test)]
mod run_loop_tests {
    use super::*;

    #[test]
    fn test_loop_stops_on_iteration_after_cancel() {
        let token = CancelToken::new();
        let mut run_loop = RunLoop::with_token(ManualClock::fixed_step(1.0 / 60.0), token.clone());

        let mut seen = Vec::new();
        let frames = run_loop.run(|frame| {
            seen.push(frame.number);
            if frame.number == 9 {
                token.cancel();
            }
        });

        assert_eq!(frames, 10);
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert!(run_loop.next_frame().is_none());
    }

    #[test]
    fn test_frames_are_numbered_and_monotonic() {
        let mut run_loop = RunLoop::new(ManualClock::fixed_step(0.25));
        let frames: Vec<_> = (0..4).filter_map(|_| run_loop.next_frame()).collect();

        assert_eq!(frames.iter().map(|f| f.number).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(frames.iter().map(|f| f.time).collect::<Vec<_>>(), vec![0.0, 0.25, 0.5, 0.75]);
        assert!(frames.iter().skip(1).all(|f| f.delta == 0.25));
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut clock = FrameClock::new(ManualClock::at(2.0));
        let first = clock.next_frame();
        clock.source_mut().set(1.0);
        let second = clock.next_frame();

        assert_eq!(first.time, 2.0);
        assert_eq!(second.time, 2.0);
        assert_eq!(second.delta, 0.0);
    }

    #[test]
    fn test_host_token_stops_the_loop() {
        let mut run_loop = RunLoop::new(ManualClock::fixed_step(0.1));
        let token = run_loop.token();
        assert!(run_loop.next_frame().is_some());
        token.cancel();
        assert!(run_loop.is_cancelled());
        assert!(run_loop.next_frame().is_none());
    }
}
