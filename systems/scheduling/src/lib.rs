#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Polling spawn scheduler driven by an owning simulation loop.
//!
//! The scheduler never registers itself anywhere; the owner calls
//! [`SpawnScheduler::poll`] once per simulation tick with the current
//! simulated time and dispatches its own spawn routine when the call reports
//! a due deadline. At most one firing is reported per poll regardless of how
//! far past the deadline the clock has moved, so a stalled frame never
//! produces a catch-up burst.

use std::time::Duration;

use reef_rush_core::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Stopped,
    Running,
}

/// Per-producer polling timer with a reconfigurable cadence.
///
/// Created inert; `configure` arms the first deadline, `start`/`stop` toggle
/// firing without touching the deadline, and `set_interval` rearms relative
/// to the provided clock immediately.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    phase: Phase,
    interval: Duration,
    next_deadline: Duration,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnScheduler {
    /// Creates an inert scheduler that must be configured before use.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            interval: Duration::ZERO,
            next_deadline: Duration::ZERO,
        }
    }

    /// Sets the cadence and arms the first deadline at `now + interval`.
    ///
    /// Valid from any state; the scheduler lands in the stopped state and
    /// must be started explicitly. Zero intervals are rejected.
    pub fn configure(&mut self, interval: Duration, now: Duration) -> Result<(), ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval { seconds: 0.0 });
        }
        self.interval = interval;
        self.next_deadline = now + interval;
        self.phase = Phase::Stopped;
        Ok(())
    }

    /// Begins firing. No-op while already running or still unconfigured.
    pub fn start(&mut self) {
        if self.phase == Phase::Stopped {
            self.phase = Phase::Running;
        }
    }

    /// Ceases firing while preserving the armed deadline, so a stop/start
    /// pair does not desynchronize the cadence.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Stopped;
        }
    }

    /// Replaces the cadence and rearms the deadline at `now + interval`
    /// immediately, without waiting for the old deadline.
    pub fn set_interval(&mut self, interval: Duration, now: Duration) -> Result<(), ConfigError> {
        if self.phase == Phase::Idle {
            return Err(ConfigError::SchedulerNotConfigured);
        }
        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval { seconds: 0.0 });
        }
        self.interval = interval;
        self.next_deadline = now + interval;
        Ok(())
    }

    /// Reports whether the deadline is due, rescheduling it when so.
    ///
    /// The next deadline is `now + interval`, never `deadline + interval`,
    /// so backlog is discarded rather than replayed.
    #[must_use]
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.phase != Phase::Running || now < self.next_deadline {
            return false;
        }
        self.next_deadline = now + self.interval;
        true
    }

    /// Reports whether the scheduler is currently firing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Reports whether `configure` has armed the scheduler at least once.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Currently configured cadence.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Absolute simulated time of the next scheduled firing.
    #[must_use]
    pub const fn next_deadline(&self) -> Duration {
        self.next_deadline
    }
}
