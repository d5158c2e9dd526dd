//! Daily simulation clock.

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeDelta};

/// Tracks the current date of a run between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    start: NaiveDate,
    end: NaiveDate,
    current: NaiveDate,
    step: TimeDelta,
}

impl Clock {
    /// Creates a daily clock running `days` steps from `start`.
    pub fn new(start: NaiveDate, days: u32) -> Result<Self> {
        let end = offset(start, days)?;
        Ok(Self {
            start,
            end,
            current: start,
            step: TimeDelta::days(1),
        })
    }

    /// First date of the run.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Date at which the run stops.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Current date.
    pub fn current(&self) -> NaiveDate {
        self.current
    }

    /// Length of the run in days.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Days left before the end.
    pub fn remaining(&self) -> TimeDelta {
        self.end - self.current
    }

    /// True until the current date reaches the end.
    pub fn is_running(&self) -> bool {
        self.current < self.end
    }

    /// Moves one step forward. Does nothing once the end is reached.
    pub fn advance(&mut self) {
        if !self.is_running() {
            return;
        }
        if let Some(next) = self.current.checked_add_signed(self.step) {
            self.current = next.min(self.end);
        }
    }

    /// Moves the start, keeping the duration and resetting the current date.
    pub fn set_start(&mut self, start: NaiveDate) -> Result<()> {
        let end = start
            .checked_add_signed(self.duration())
            .context("clock end date out of range")?;
        self.start = start;
        self.end = end;
        self.current = start;
        Ok(())
    }

    /// Changes the duration, keeping the start.
    pub fn set_duration(&mut self, days: u32) -> Result<()> {
        self.end = offset(self.start, days)?;
        Ok(())
    }
}

fn offset(start: NaiveDate, days: u32) -> Result<NaiveDate> {
    start
        .checked_add_signed(TimeDelta::days(i64::from(days)))
        .with_context(|| format!("{days} days after {start} is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn runs_for_duration() {
        let mut clock = Clock::new(date(2024, 2, 27), 3).unwrap();
        assert_eq!(clock.end(), date(2024, 3, 1));
        let mut seen = Vec::new();
        while clock.is_running() {
            seen.push(clock.current());
            clock.advance();
        }
        assert_eq!(seen, vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29)]);
        assert_eq!(clock.remaining(), TimeDelta::zero());
    }

    #[test]
    fn advance_stops_at_end() {
        let mut clock = Clock::new(date(2024, 1, 1), 1).unwrap();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current(), date(2024, 1, 2));
        assert!(!clock.is_running());
    }

    #[test]
    fn zero_duration_never_runs() {
        let clock = Clock::new(date(2024, 1, 1), 0).unwrap();
        assert!(!clock.is_running());
    }

    #[test]
    fn set_start_keeps_duration() {
        let mut clock = Clock::new(date(2024, 1, 1), 10).unwrap();
        clock.advance();
        clock.set_start(date(2025, 6, 1)).unwrap();
        assert_eq!(clock.current(), date(2025, 6, 1));
        assert_eq!(clock.end(), date(2025, 6, 11));
        assert_eq!(clock.duration(), TimeDelta::days(10));
    }

    #[test]
    fn set_duration_keeps_start() {
        let mut clock = Clock::new(date(2024, 1, 1), 10).unwrap();
        clock.advance();
        clock.set_duration(2).unwrap();
        assert_eq!(clock.start(), date(2024, 1, 1));
        assert_eq!(clock.end(), date(2024, 1, 3));
        assert_eq!(clock.current(), date(2024, 1, 2));
        assert!(clock.is_running());
    }
}
