//! Relative-time labels for timeline entries.

use chrono::{DateTime, Utc};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Source of "now". Injected so views can be rendered against a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `"<n> minutes ago"` under an hour, `"<n> hours ago"` under a day,
/// `"<n> days ago"` otherwise. Each count is floored from the millisecond
/// difference. Timestamps in the future read as `"0 minutes ago"`.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - created_at).num_milliseconds().max(0);

    let minutes = elapsed_ms / MS_PER_MINUTE;
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = elapsed_ms / MS_PER_HOUR;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    format!("{} days ago", elapsed_ms / MS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_minutes_bucket() {
        assert_eq!(relative_time(now(), now()), "0 minutes ago");
        assert_eq!(relative_time(now() - Duration::seconds(59), now()), "0 minutes ago");
        assert_eq!(relative_time(now() - Duration::minutes(1), now()), "1 minutes ago");
        assert_eq!(
            relative_time(now() - Duration::minutes(59) - Duration::seconds(59), now()),
            "59 minutes ago"
        );
    }

    #[test]
    fn test_hours_bucket() {
        assert_eq!(relative_time(now() - Duration::minutes(60), now()), "1 hours ago");
        assert_eq!(relative_time(now() - Duration::minutes(150), now()), "2 hours ago");
        assert_eq!(
            relative_time(now() - Duration::hours(23) - Duration::minutes(59), now()),
            "23 hours ago"
        );
    }

    #[test]
    fn test_days_bucket() {
        assert_eq!(relative_time(now() - Duration::hours(24), now()), "1 days ago");
        assert_eq!(relative_time(now() - Duration::hours(47), now()), "1 days ago");
        assert_eq!(relative_time(now() - Duration::days(30), now()), "30 days ago");
    }

    #[test]
    fn test_future_timestamp_clamped() {
        assert_eq!(relative_time(now() + Duration::hours(3), now()), "0 minutes ago");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(now());
        assert_eq!(clock.now(), now());
    }
}
