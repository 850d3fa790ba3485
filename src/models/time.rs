//! Injected clock abstraction.
//!
//! The 48-hour cancellation cutoff and the materialization horizon both
//! depend on "now"; reading ambient system time would make them untestable.
//! Services take a `&dyn Clock` instead.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant for policy decisions.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// The current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to an RFC 3339 instant.
    ///
    /// # Panics
    /// Panics on an unparseable instant; intended for test fixtures only.
    pub fn at(rfc3339: &str) -> Self {
        Self(
            DateTime::parse_from_rfc3339(rfc3339)
                .expect("invalid RFC 3339 instant")
                .with_timezone(&Utc),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
