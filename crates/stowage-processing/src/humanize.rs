//! Relative time rendering ("3 hours ago").

use chrono::Utc;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Describe `timestamp` (unix seconds) relative to `now`.
///
/// Past instants read "N units ago", future ones "N units from now". Anything
/// under a minute, including zero, is reported in whole seconds with a floor of one.
pub fn diff_for_humans(timestamp: i64, now: i64) -> String {
    let delta = now.saturating_sub(timestamp);
    let seconds = delta.saturating_abs();

    let phrase = if seconds < MINUTE {
        plural(seconds.max(1), "second")
    } else if seconds < HOUR {
        plural(seconds / MINUTE, "minute")
    } else if seconds < DAY {
        plural(seconds / HOUR, "hour")
    } else if seconds < WEEK {
        plural(seconds / DAY, "day")
    } else if seconds < 30 * DAY {
        plural(seconds / WEEK, "week")
    } else if seconds < 365 * DAY {
        plural(seconds / DAY / 30, "month")
    } else {
        plural(seconds / DAY / 365, "year")
    };

    if delta < 0 {
        format!("{} from now", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

/// [`diff_for_humans`] against the current wall clock.
pub fn diff_for_humans_now(timestamp: i64) -> String {
    diff_for_humans(timestamp, Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_seconds() {
        assert_eq!(diff_for_humans(NOW, NOW), "1 second ago");
        assert_eq!(diff_for_humans(NOW - 1, NOW), "1 second ago");
        assert_eq!(diff_for_humans(NOW - 59, NOW), "59 seconds ago");
    }

    #[test]
    fn test_minutes_hours_days() {
        assert_eq!(diff_for_humans(NOW - 60, NOW), "1 minute ago");
        assert_eq!(diff_for_humans(NOW - 5 * MINUTE - 30, NOW), "5 minutes ago");
        assert_eq!(diff_for_humans(NOW - 3 * HOUR, NOW), "3 hours ago");
        assert_eq!(diff_for_humans(NOW - DAY, NOW), "1 day ago");
        assert_eq!(diff_for_humans(NOW - 6 * DAY, NOW), "6 days ago");
    }

    #[test]
    fn test_weeks_months_years() {
        assert_eq!(diff_for_humans(NOW - WEEK, NOW), "1 week ago");
        assert_eq!(diff_for_humans(NOW - 29 * DAY, NOW), "4 weeks ago");
        assert_eq!(diff_for_humans(NOW - 30 * DAY, NOW), "1 month ago");
        assert_eq!(diff_for_humans(NOW - 200 * DAY, NOW), "6 months ago");
        assert_eq!(diff_for_humans(NOW - 365 * DAY, NOW), "1 year ago");
        assert_eq!(diff_for_humans(NOW - 800 * DAY, NOW), "2 years ago");
    }

    #[test]
    fn test_future() {
        assert_eq!(diff_for_humans(NOW + 2 * HOUR, NOW), "2 hours from now");
        assert_eq!(diff_for_humans(NOW + 10, NOW), "10 seconds from now");
    }
}
