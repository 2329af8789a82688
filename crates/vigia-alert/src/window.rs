use chrono::{DateTime, Days, NaiveTime, Utc};

/// Errors raised when constructing an [`ActiveWindow`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    /// The window end precedes its start; overnight windows are not
    /// supported, so this is a configuration mistake.
    #[error("window end {end} precedes start {start}")]
    EndBeforeStart { start: NaiveTime, end: NaiveTime },
}

/// The daily clock interval during which monitoring is active.
///
/// Both bounds are inclusive: a cycle starting exactly at the start or end
/// instant is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ActiveWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether probing is permitted at `now`.
    pub fn is_permitted(&self, now: DateTime<Utc>) -> bool {
        let t = now.time();
        t >= self.start && t <= self.end
    }

    /// The earliest permitted instant at or after `now`: today's start when
    /// `now` is before the window, tomorrow's start when it is past the
    /// window, `now` itself when already inside. The loop sleeps for
    /// exactly `next_permitted_instant(now) - now` instead of polling.
    pub fn next_permitted_instant(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        if now.time() < self.start {
            today.and_time(self.start).and_utc()
        } else if now.time() > self.end {
            let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
            tomorrow.and_time(self.start).and_utc()
        } else {
            now
        }
    }
}
