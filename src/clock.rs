use std::time::Instant;

use crate::error::SessionError;

/// Countdown clock for a single typing session.
///
/// The clock owns the start instant and the fixed duration but never
/// schedules anything itself; callers pass `now` into every query so the
/// session logic stays testable without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    duration_secs: u64,
    started_at: Option<Instant>,
}

impl SessionClock {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            started_at: None,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Records the start instant. The instant is set at most once per
    /// clock; a second call is a programmer error.
    pub fn start(&mut self, now: Instant) -> Result<(), SessionError> {
        if self.started_at.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        self.started_at = Some(now);
        Ok(())
    }

    /// Whole seconds elapsed since the clock started.
    ///
    /// Callers must check `is_started` first; an unstarted clock reports
    /// zero elapsed time.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        match self.started_at {
            Some(started) => now.saturating_duration_since(started).as_secs(),
            None => 0,
        }
    }

    /// Seconds left on the countdown, clamped to `[0, duration]`.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        self.duration_secs.saturating_sub(self.elapsed_secs(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    #[test]
    fn starts_once() {
        let mut clock = SessionClock::new(60);
        assert!(!clock.is_started());

        let now = Instant::now();
        assert!(clock.start(now).is_ok());
        assert!(clock.is_started());

        assert_matches!(clock.start(now), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn remaining_counts_down_in_whole_seconds() {
        let mut clock = SessionClock::new(10);
        let start = Instant::now();
        clock.start(start).unwrap();

        assert_eq!(clock.remaining_secs(start), 10);
        assert_eq!(clock.remaining_secs(start + Duration::from_millis(900)), 10);
        assert_eq!(clock.remaining_secs(start + Duration::from_secs(1)), 9);
        assert_eq!(clock.remaining_secs(start + Duration::from_secs(9)), 1);
    }

    #[test]
    fn remaining_clamps_to_zero() {
        let mut clock = SessionClock::new(5);
        let start = Instant::now();
        clock.start(start).unwrap();

        assert_eq!(clock.remaining_secs(start + Duration::from_secs(5)), 0);
        assert_eq!(clock.remaining_secs(start + Duration::from_secs(500)), 0);
    }

    #[test]
    fn unstarted_clock_reports_full_duration() {
        let clock = SessionClock::new(30);
        assert_eq!(clock.elapsed_secs(Instant::now()), 0);
        assert_eq!(clock.remaining_secs(Instant::now()), 30);
    }
}
