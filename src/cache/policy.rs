//! Freshness window for cached launches

use chrono::{DateTime, Days, Utc};

/// Default number of calendar days a snapshot stays fresh
pub const DEFAULT_MAX_CACHE_AGE_DAYS: u64 = 7;

/// Decides whether a snapshot taken at some instant is still usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    max_age_days: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_CACHE_AGE_DAYS,
        }
    }
}

impl CachePolicy {
    pub fn new(max_age_days: u64) -> Self {
        Self { max_age_days }
    }

    pub fn max_age_days(&self) -> u64 {
        self.max_age_days
    }

    /// Returns true iff `now` is strictly before `timestamp` plus the window
    ///
    /// The window is added in calendar days. A boundary that cannot be
    /// represented makes the snapshot stale.
    pub fn is_fresh(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match timestamp.checked_add_days(Days::new(self.max_age_days)) {
            Some(max_age) => now < max_age,
            None => false,
        }
    }
}
