// ── Staleness policy ──
//
// Decides, per ingestion cycle, how old an entry may get before eviction.
// A failed scan cycle widens the window by one scan interval so a single
// missed scan does not empty the list. The extension never compounds:
// only the current cycle's flag is consulted.

use std::time::Duration;

use crate::config::TrackerConfig;

/// Effective eviction threshold for one cycle.
pub fn effective_max_age(
    configured_max_age: Duration,
    scan_interval: Duration,
    cycle_succeeded: bool,
) -> Duration {
    if cycle_succeeded {
        configured_max_age
    } else {
        configured_max_age.saturating_add(scan_interval)
    }
}

/// `true` when `now - last_seen` is strictly greater than `max_age`.
///
/// An entry aged exactly `max_age` survives. Observations stamped after
/// `now` count as age zero.
pub fn is_expired(now_millis: i64, last_seen_millis: i64, max_age: Duration) -> bool {
    let Ok(age) = u64::try_from(now_millis.saturating_sub(last_seen_millis)) else {
        return false;
    };
    u128::from(age) > max_age.as_millis()
}

/// The two fixed durations the policy is parameterized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    pub max_entry_age: Duration,
    pub scan_interval: Duration,
}

impl StalenessPolicy {
    pub fn new(max_entry_age: Duration, scan_interval: Duration) -> Self {
        Self {
            max_entry_age,
            scan_interval,
        }
    }

    pub fn effective_max_age(&self, cycle_succeeded: bool) -> Duration {
        effective_max_age(self.max_entry_age, self.scan_interval, cycle_succeeded)
    }
}

impl From<&TrackerConfig> for StalenessPolicy {
    fn from(config: &TrackerConfig) -> Self {
        Self::new(config.max_entry_age, config.scan_interval)
    }
}
