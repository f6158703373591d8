use std::time::{Duration, Instant};

use kitty_common::{Event, TimerId};

/// Longest time a single poll blocks waiting for input.
pub const MAX_WAIT: Duration = Duration::from_millis(16);

struct Timer {
    id: TimerId,
    interval: Duration,
    deadline: Instant,
}

/// Repeating timers, fired by comparing deadlines against the clock on each
/// poll.
#[derive(Default)]
pub struct Timers {
    timers: Vec<Timer>,
}

impl Timers {
    /// Schedules `id` every `interval_ms` from `now`, replacing any timer
    /// already using `id`. An interval of 0 only cancels.
    pub fn set(&mut self, id: TimerId, interval_ms: u32, now: Instant) {
        self.timers.retain(|t| t.id != id);
        if interval_ms == 0 {
            log::debug!("Timer {:?} cancelled", id);
            return;
        }
        let interval = Duration::from_millis(interval_ms as u64);
        log::debug!("Timer {:?} every {:?}", id, interval);
        self.timers.push(Timer {
            id,
            interval,
            deadline: now + interval,
        });
    }

    /// Timer events due at `now`. Each fired timer re-arms at
    /// `now + interval`.
    pub fn expired(&mut self, now: Instant) -> Vec<Event> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            if timer.deadline <= now {
                fired.push(Event::Timer(timer.id));
                timer.deadline = now + timer.interval;
            }
        }
        fired
    }

    /// How long a poll may wait before the next deadline, at most
    /// [`MAX_WAIT`].
    pub fn wait_budget(&self, now: Instant) -> Duration {
        self.timers
            .iter()
            .map(|t| t.deadline.saturating_duration_since(now))
            .min()
            .map_or(MAX_WAIT, |d| d.min(MAX_WAIT))
    }

    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.timers.iter().find(|t| t.id == id).map(|t| t.deadline)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
