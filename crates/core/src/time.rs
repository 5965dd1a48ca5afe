use chrono::{DateTime, Duration, Utc};

/// Source of timestamps for session start/completion and leaderboard entries.
///
/// Services take a `Clock` instead of calling `Utc::now()` so tests can pin time.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// A copy of this clock moved forward by `delta`.
    #[must_use]
    pub fn advanced(mut self, delta: Duration) -> Self {
        self.advance(delta);
        self
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(15));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(15));
        assert_eq!(
            fixed_clock().advanced(Duration::minutes(1)).now(),
            fixed_now() + Duration::minutes(1)
        );
    }

    #[test]
    fn default_clock_ignores_advance() {
        let mut clock = Clock::default_clock();
        clock.advance(Duration::days(365));
        assert!(clock.now() <= Utc::now());
    }
}
