//! Rate limiting for scroll-driven work.
//!
//! Scroll and resize fire in bursts. A [`Throttle`] lets the first event of a
//! burst through, defers the rest, and tells the caller when a single trailing
//! run is needed so the final position still gets handled.

use std::time::Duration;
use web_time::Instant;

/// Outcome of offering an event to a [`Throttle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Run now.
    Run,
    /// Skip, and schedule a trailing run after the given delay.
    Defer(Duration),
    /// Skip; a trailing run is already pending.
    Pending,
}

/// Leading-edge throttle with one trailing run.
#[derive(Debug)]
pub struct Throttle {
    /// Minimum spacing between runs. Zero disables throttling.
    interval: Duration,

    /// Time of the last run.
    last_run: Option<Instant>,

    /// Whether a trailing run is scheduled.
    trailing: bool,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: false,
        }
    }

    /// Offer an event at `now`.
    pub fn offer(&mut self, now: Instant) -> Gate {
        if self.interval.is_zero() {
            return Gate::Run;
        }

        let elapsed = self.last_run.map(|last| now.saturating_duration_since(last));
        match elapsed {
            Some(elapsed) if elapsed < self.interval => {
                if self.trailing {
                    Gate::Pending
                } else {
                    self.trailing = true;
                    Gate::Defer(self.interval - elapsed)
                }
            }
            _ => {
                self.last_run = Some(now);
                Gate::Run
            }
        }
    }

    /// Record the trailing run.
    pub fn trailing_fired(&mut self, now: Instant) {
        self.trailing = false;
        self.last_run = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_always_runs() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        assert_eq!(throttle.offer(now), Gate::Run);
        assert_eq!(throttle.offer(now), Gate::Run);
    }

    #[test]
    fn test_burst_defers_once() {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::now();

        assert_eq!(throttle.offer(start), Gate::Run);
        assert_eq!(
            throttle.offer(start + Duration::from_millis(30)),
            Gate::Defer(Duration::from_millis(70))
        );
        assert_eq!(
            throttle.offer(start + Duration::from_millis(60)),
            Gate::Pending
        );

        throttle.trailing_fired(start + Duration::from_millis(100));
        assert_eq!(
            throttle.offer(start + Duration::from_millis(250)),
            Gate::Run
        );
    }
}
