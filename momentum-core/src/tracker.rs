//! Work tracking: a plain stopwatch or a Pomodoro cycle, advanced one
//! second per [`WorkTracker::tick`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    /// A long break replaces the short one after this many work sessions.
    pub sessions_before_long_break: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            sessions_before_long_break: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerMode {
    Timer,
    Pomodoro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short break",
            Self::LongBreak => "long break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    PhaseFinished { finished: Phase, next: Phase },
}

#[derive(Debug, Clone)]
pub struct WorkTracker {
    config: TrackerConfig,
    mode: TrackerMode,
    state: TrackerState,
    phase: Phase,
    remaining_secs: u32,
    elapsed_secs: u64,
    completed_sessions: u32,
}

impl WorkTracker {
    pub fn new(mode: TrackerMode, config: TrackerConfig) -> Self {
        Self {
            config,
            mode,
            state: TrackerState::Idle,
            phase: Phase::Work,
            remaining_secs: config.work_secs,
            elapsed_secs: 0,
            completed_sessions: 0,
        }
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current Pomodoro phase.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds counted while running, across phases.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn start(&mut self) {
        if self.state == TrackerState::Idle {
            self.state = TrackerState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == TrackerState::Running {
            self.state = TrackerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TrackerState::Paused {
            self.state = TrackerState::Running;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            TrackerState::Idle => self.start(),
            TrackerState::Running => self.pause(),
            TrackerState::Paused => self.resume(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.config);
    }

    /// Switching between timer and Pomodoro discards the current run.
    pub fn switch_mode(&mut self, mode: TrackerMode) {
        if mode != self.mode {
            *self = Self::new(mode, self.config);
        }
    }

    /// Advance one second. No-op unless running.
    pub fn tick(&mut self) -> Option<TrackerEvent> {
        if self.state != TrackerState::Running {
            return None;
        }
        self.elapsed_secs += 1;

        if self.mode == TrackerMode::Timer {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let finished = self.phase;
        let next = match finished {
            Phase::Work => {
                self.completed_sessions += 1;
                let every = self.config.sessions_before_long_break.max(1);
                if self.completed_sessions % every == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_secs = self.phase_secs(next);

        tracing::debug!(finished = finished.as_str(), next = next.as_str(), sessions = self.completed_sessions, "pomodoro phase finished");
        Some(TrackerEvent::PhaseFinished { finished, next })
    }

    fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.config.work_secs,
            Phase::ShortBreak => self.config.short_break_secs,
            Phase::LongBreak => self.config.long_break_secs,
        }
    }
}
