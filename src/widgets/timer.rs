//! Work/break countdown timer.
//!
//! Pure state: the owner calls [`PomodoroTimer::tick`] once per elapsed
//! second while the timer is running. When a phase reaches zero the timer
//! flips to the other phase, loads its full duration, and stops, waiting to
//! be started again.

/// Work phase length in minutes.
const WORK_MINUTES: u32 = 25;

/// Break phase length in minutes.
const BREAK_MINUTES: u32 = 5;

/// Which phase the timer is counting down.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerPhase {
    /// A focused work session.
    Work,

    /// A short break.
    Break,
}

impl TimerPhase {
    fn duration_seconds(&self) -> u32 {
        match self {
            TimerPhase::Work => WORK_MINUTES * 60,
            TimerPhase::Break => BREAK_MINUTES * 60,
        }
    }
}

/// A 25/5 work/break countdown.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    phase: TimerPhase,
    remaining_seconds: u32,
    active: bool,
}

impl PomodoroTimer {
    /// Creates a stopped timer at the start of a work session.
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Work,
            remaining_seconds: TimerPhase::Work.duration_seconds(),
            active: false,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// True while the countdown is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds left in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Starts the countdown if paused, pauses it if running.
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Stops the countdown and restores the current phase's full duration.
    pub fn reset(&mut self) {
        self.active = false;
        self.remaining_seconds = self.phase.duration_seconds();
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the phase that just finished when this tick completes one,
    /// after flipping to the other phase and stopping.
    pub fn tick(&mut self) -> Option<TimerPhase> {
        if !self.active {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }
        let finished = self.phase;
        self.phase = match self.phase {
            TimerPhase::Work => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Work,
        };
        self.remaining_seconds = self.phase.duration_seconds();
        self.active = false;
        Some(finished)
    }

    /// The countdown formatted as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    /// Fraction of the current phase already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.phase.duration_seconds();
        f64::from(total - self.remaining_seconds) / f64::from(total)
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new()
    }
}
