use chrono::{DateTime, Utc};

/// Wall-clock source used to stamp quiz attempts.
///
/// Countdown ticks are driven separately; this clock only answers "what time is it"
/// when an attempt starts or is archived.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Current time, but never earlier than `earlier`.
    ///
    /// Completion stamps go through this so a clock step backwards cannot produce an
    /// attempt that ends before it started.
    #[must_use]
    pub fn now_not_before(&self, earlier: DateTime<Utc>) -> DateTime<Utc> {
        self.now().max(earlier)
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
