use time::{Date, OffsetDateTime};

/// Source of "today" for creation and update stamps.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Current UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Always the same date. For tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
