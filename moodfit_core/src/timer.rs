//! Countdown timer for a single exercise.
//!
//! The timer is pull-driven: the host calls [`WorkoutTimer::tick`] at whatever
//! cadence it likes and the remaining time is recomputed from the wall clock
//! captured at start/resume. Missed or irregular ticks never cause drift.
//! Operations return the events they produce instead of invoking callbacks;
//! invalid transitions are silent no-ops.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Source of wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulated runs
///
/// Clones share the same instant.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Observable timer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Notification produced by a timer operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Started,
    Paused,
    Resumed,
    Tick(u32),
    Finished,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    Running {
        started_at: DateTime<Utc>,
    },
    Paused {
        started_at: DateTime<Utc>,
        paused_at: DateTime<Utc>,
    },
    Finished,
}

/// Countdown timer over a fixed number of seconds
#[derive(Debug)]
pub struct WorkoutTimer<C: Clock = SystemClock> {
    clock: C,
    total_secs: u32,
    remaining_secs: u32,
    phase: Phase,
}

impl WorkoutTimer<SystemClock> {
    pub fn new(total_secs: u32) -> Self {
        Self::with_clock(total_secs, SystemClock)
    }
}

impl<C: Clock> WorkoutTimer<C> {
    pub fn with_clock(total_secs: u32, clock: C) -> Self {
        Self {
            clock,
            total_secs,
            remaining_secs: total_secs,
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        match self.phase {
            Phase::Idle => TimerState::Idle,
            Phase::Running { .. } => TimerState::Running,
            Phase::Paused { .. } => TimerState::Paused,
            Phase::Finished => TimerState::Finished,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused { .. })
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Fraction of the countdown completed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.total_secs == 0 {
            return 1.0;
        }
        (self.total_secs - self.remaining_secs) as f32 / self.total_secs as f32
    }

    /// Remaining time as `MM:SS`
    pub fn formatted_remaining(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    /// `Idle → Running`
    pub fn start(&mut self) -> Option<TimerEvent> {
        if !matches!(self.phase, Phase::Idle) {
            return None;
        }
        self.phase = Phase::Running {
            started_at: self.clock.now(),
        };
        tracing::debug!("Timer started ({}s)", self.total_secs);
        Some(TimerEvent::Started)
    }

    /// `Running → Paused`
    pub fn pause(&mut self) -> Option<TimerEvent> {
        let Phase::Running { started_at } = self.phase else {
            return None;
        };
        let now = self.clock.now();
        self.remaining_secs = self.compute_remaining(started_at, now);
        self.phase = Phase::Paused {
            started_at,
            paused_at: now,
        };
        tracing::debug!("Timer paused at {}s remaining", self.remaining_secs);
        Some(TimerEvent::Paused)
    }

    /// `Paused → Running`, excluding the paused interval from elapsed time
    pub fn resume(&mut self) -> Option<TimerEvent> {
        let Phase::Paused {
            started_at,
            paused_at,
        } = self.phase
        else {
            return None;
        };
        let paused_for = self.clock.now() - paused_at;
        self.phase = Phase::Running {
            started_at: started_at + paused_for,
        };
        tracing::debug!("Timer resumed after {}s pause", paused_for.num_seconds());
        Some(TimerEvent::Resumed)
    }

    /// Back to `Idle` with the full duration remaining
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_secs = self.total_secs;
    }

    /// `Running | Paused → Finished`
    pub fn stop(&mut self) -> Option<TimerEvent> {
        match self.phase {
            Phase::Running { .. } | Phase::Paused { .. } => Some(self.force_finish()),
            Phase::Idle | Phase::Finished => None,
        }
    }

    /// Finish from any state, always producing `Finished`
    pub fn force_finish(&mut self) -> TimerEvent {
        self.phase = Phase::Finished;
        tracing::debug!("Timer finished with {}s remaining", self.remaining_secs);
        TimerEvent::Finished
    }

    /// Recompute remaining time from the wall clock
    ///
    /// Emits `Tick(remaining)` while running, followed by `Finished` once the
    /// countdown reaches zero. Produces nothing in any other state.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let Phase::Running { started_at } = self.phase else {
            return Vec::new();
        };

        self.remaining_secs = self.compute_remaining(started_at, self.clock.now());
        let mut events = vec![TimerEvent::Tick(self.remaining_secs)];
        if self.remaining_secs == 0 {
            events.push(self.force_finish());
        }
        events
    }

    fn compute_remaining(&self, started_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let elapsed_secs = ((now - started_at).num_milliseconds() / 1000).max(0);
        let elapsed = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
        self.total_secs.saturating_sub(elapsed)
    }
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
