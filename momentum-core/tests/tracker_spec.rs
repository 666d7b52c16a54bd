use speculate2::speculate;

speculate! {
    use momentum_core::tracker::{
        Phase, TrackerConfig, TrackerEvent, TrackerMode, TrackerState, WorkTracker,
    };

    fn short_config() -> TrackerConfig {
        TrackerConfig {
            work_secs: 3,
            short_break_secs: 2,
            long_break_secs: 4,
            sessions_before_long_break: 2,
        }
    }

    fn run(tracker: &mut WorkTracker, secs: u32) -> Vec<TrackerEvent> {
        (0..secs).filter_map(|_| tracker.tick()).collect()
    }

    describe "timer mode" {
        it "counts up while running only" {
            let mut tracker = WorkTracker::new(TrackerMode::Timer, short_config());
            assert!(tracker.tick().is_none());
            assert_eq!(tracker.elapsed_secs(), 0);

            tracker.start();
            run(&mut tracker, 10);
            assert_eq!(tracker.elapsed_secs(), 10);
            assert_eq!(tracker.phase(), Phase::Work);

            tracker.pause();
            run(&mut tracker, 5);
            assert_eq!(tracker.elapsed_secs(), 10);
        }
    }

    describe "pomodoro mode" {
        it "alternates work and breaks with a long break after the configured sessions" {
            let mut tracker = WorkTracker::new(TrackerMode::Pomodoro, short_config());
            tracker.start();

            let events = run(&mut tracker, 3 + 2 + 3);
            assert_eq!(
                events,
                vec![
                    TrackerEvent::PhaseFinished { finished: Phase::Work, next: Phase::ShortBreak },
                    TrackerEvent::PhaseFinished { finished: Phase::ShortBreak, next: Phase::Work },
                    TrackerEvent::PhaseFinished { finished: Phase::Work, next: Phase::LongBreak },
                ]
            );
            assert_eq!(tracker.completed_sessions(), 2);
            assert_eq!(tracker.remaining_secs(), 4);
        }

        it "toggles between running and paused" {
            let mut tracker = WorkTracker::new(TrackerMode::Pomodoro, short_config());
            tracker.toggle();
            assert_eq!(tracker.state(), TrackerState::Running);
            tracker.toggle();
            assert_eq!(tracker.state(), TrackerState::Paused);
            tracker.toggle();
            assert_eq!(tracker.state(), TrackerState::Running);
        }

        it "resets when switching modes" {
            let mut tracker = WorkTracker::new(TrackerMode::Pomodoro, short_config());
            tracker.start();
            run(&mut tracker, 4);

            tracker.switch_mode(TrackerMode::Timer);
            assert_eq!(tracker.mode(), TrackerMode::Timer);
            assert_eq!(tracker.state(), TrackerState::Idle);
            assert_eq!(tracker.elapsed_secs(), 0);
            assert_eq!(tracker.completed_sessions(), 0);
        }

        it "reset keeps the mode" {
            let mut tracker = WorkTracker::new(TrackerMode::Pomodoro, short_config());
            tracker.start();
            run(&mut tracker, 2);
            tracker.reset();
            assert_eq!(tracker.mode(), TrackerMode::Pomodoro);
            assert_eq!(tracker.remaining_secs(), 3);
            assert_eq!(tracker.state(), TrackerState::Idle);
        }
    }
}
