use chrono::{Duration, NaiveDateTime};

use crate::ClientError;

pub const DEADLINE_REACHED: &str = "Voting has closed.";

const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses the server's naive local closing timestamp.
pub fn parse_closing_time(raw: &str) -> Result<NaiveDateTime, ClientError> {
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ClientError::InvalidClosingTime(raw.to_string()))
}

/// Renders a non-negative distance as `HH:MM:SS`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Expired,
    Reconciling,
    Reloaded,
}

/// What the page has to do after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still running; show this text.
    Remaining(String),
    /// Deadline just passed: stop the timer, lock inputs, finalize.
    Expired,
    /// Timer should not be ticking any more.
    Idle,
}

/// Deadline state for one voting round.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    deadline: NaiveDateTime,
    phase: Phase,
    display: String,
    finalize_attempted: bool,
}

impl Countdown {
    pub fn new(deadline: NaiveDateTime) -> Self {
        Self {
            deadline,
            phase: Phase::Running,
            display: String::new(),
            finalize_attempted: false,
        }
    }

    pub fn deadline(&self) -> NaiveDateTime {
        self.deadline
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Idle;
        }
        let distance = self.deadline - now;
        if distance < Duration::zero() {
            self.phase = Phase::Expired;
            self.display = DEADLINE_REACHED.to_string();
            return Tick::Expired;
        }
        self.display = format_remaining(distance);
        Tick::Remaining(self.display.clone())
    }

    /// Moves `Expired` to `Reconciling`. Only the first call per round
    /// succeeds; a failed finalize is never retried automatically.
    pub fn begin_finalize(&mut self) -> bool {
        if self.phase != Phase::Expired || self.finalize_attempted {
            return false;
        }
        self.finalize_attempted = true;
        self.phase = Phase::Reconciling;
        true
    }

    pub fn finalize_succeeded(&mut self) {
        if self.phase == Phase::Reconciling {
            self.phase = Phase::Reloaded;
        }
    }

    pub fn finalize_failed(&mut self) {
        if self.phase == Phase::Reconciling {
            self.phase = Phase::Expired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_closing_time(s).expect("timestamp")
    }

    #[test]
    fn parses_server_formats() {
        assert_eq!(at("2025-08-21T10:00:00"), at("2025-08-21 10:00:00"));
        assert_eq!(at("2025-08-21T10:00:00.123").and_utc().timestamp_subsec_millis(), 123);
        assert_eq!(at("2025-08-21T10:00"), at("2025-08-21T10:00:00"));
        assert!(matches!(
            parse_closing_time("tomorrow"),
            Err(ClientError::InvalidClosingTime(_))
        ));
    }

    #[test]
    fn remaining_is_zero_padded() {
        assert_eq!(format_remaining(Duration::seconds(5)), "00:00:05");
        assert_eq!(format_remaining(Duration::seconds(3723)), "01:02:03");
        assert_eq!(format_remaining(Duration::hours(100)), "100:00:00");
    }

    #[test]
    fn past_deadline_expires_on_first_tick() {
        let mut c = Countdown::new(at("2025-08-21T10:00:00"));
        assert_eq!(c.tick(at("2025-08-21T10:00:01")), Tick::Expired);
        assert_eq!(c.phase(), Phase::Expired);
        assert_eq!(c.display(), DEADLINE_REACHED);
        assert!(!c.is_running());
    }

    #[test]
    fn exact_deadline_still_shows_zero() {
        let mut c = Countdown::new(at("2025-08-21T10:00:00"));
        assert_eq!(
            c.tick(at("2025-08-21T10:00:00")),
            Tick::Remaining("00:00:00".to_string())
        );
        assert!(c.is_running());
    }

    #[test]
    fn two_second_deadline_finalizes_once() {
        let start = at("2025-08-21T09:59:58");
        let mut c = Countdown::new(at("2025-08-21T10:00:00"));
        let mut finalize_calls = 0;

        for second in 0..6 {
            let now = start + Duration::seconds(second);
            if c.tick(now) == Tick::Expired && c.begin_finalize() {
                finalize_calls += 1;
            }
            if second < 3 {
                assert!(c.display().contains(':'));
            }
        }
        // Further attempts after expiry are rejected.
        assert!(!c.begin_finalize());
        assert_eq!(finalize_calls, 1);
        assert_eq!(c.display(), DEADLINE_REACHED);
        assert_eq!(c.phase(), Phase::Reconciling);
    }

    #[test]
    fn failed_finalize_stays_expired_without_retry() {
        let mut c = Countdown::new(at("2025-08-21T10:00:00"));
        c.tick(at("2025-08-21T11:00:00"));
        assert!(c.begin_finalize());
        c.finalize_failed();
        assert_eq!(c.phase(), Phase::Expired);
        assert!(!c.begin_finalize());
        assert_eq!(c.tick(at("2025-08-21T11:00:01")), Tick::Idle);
    }

    #[test]
    fn successful_finalize_is_terminal() {
        let mut c = Countdown::new(at("2025-08-21T10:00:00"));
        c.tick(at("2025-08-21T10:00:01"));
        assert!(c.begin_finalize());
        c.finalize_succeeded();
        assert_eq!(c.phase(), Phase::Reloaded);
        c.finalize_failed();
        assert_eq!(c.phase(), Phase::Reloaded);
    }
}
