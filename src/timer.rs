use std::time::{Duration, Instant};

use tracing::debug;

use crate::scoring::SessionStats;

/// Period of one countdown tick
pub const SECOND: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
    /// Stopped before reaching zero because the text was finished
    Cancelled,
}

/// What a single tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is not running; nothing changed
    Inactive,
    Running { remaining_secs: u32 },
    /// The countdown just reached zero. Returned exactly once.
    Expired,
}

/// Countdown advanced by an external once-per-second tick.
///
/// Starts idle, runs after [`Countdown::start`], and ends either by expiring
/// or by [`Countdown::cancel`]. Both end states ignore further ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
        }
    }

    /// Returns true only on the transition out of `Idle`.
    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Each running tick with time left adds one second of typing time.
    pub fn tick(&mut self, stats: &mut SessionStats) -> Tick {
        if self.state != TimerState::Running {
            return Tick::Inactive;
        }

        if self.remaining_secs >= 1 {
            stats.typing_time_secs += 1;
            self.remaining_secs -= 1;
        }

        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            debug!(duration_secs = self.duration_secs, "countdown expired");
            Tick::Expired
        } else {
            Tick::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Stops a countdown that has not expired yet. Returns whether it did anything.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            TimerState::Idle | TimerState::Running => {
                self.state = TimerState::Cancelled;
                true
            }
            TimerState::Expired | TimerState::Cancelled => false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

/// Turns a host's frame ticks into whole periods, measured from `start`.
///
/// The host owns the scheduling primitive; this only keeps the phase so
/// countdown seconds line up with the first keystroke rather than with the
/// frame clock.
#[derive(Clone, Copy, Debug)]
pub struct Metronome {
    period: Duration,
    next: Option<Instant>,
}

impl Metronome {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn per_second() -> Self {
        Self::new(SECOND)
    }

    /// Arms the metronome. Has no effect when already armed.
    pub fn start(&mut self, now: Instant) {
        if self.next.is_none() {
            self.next = Some(now + self.period);
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Number of whole periods that elapsed since the last call.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while next <= now {
            count += 1;
            next += self.period;
        }
        self.next = Some(next);
        count
    }
}
