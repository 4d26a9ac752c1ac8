//! # Relative Time
//!
//! Humanized, suffix-free durations ("3 days", "a few seconds") used for the
//! "time spent on current step" column. Bucketing follows the conventions
//! LMS frontends use for `fromNow` style labels:
//!
//! | elapsed (rounded)        | label            |
//! |--------------------------|------------------|
//! | ≤ 44 seconds             | a few seconds    |
//! | ≤ 1 minute               | a minute         |
//! | < 45 minutes             | N minutes        |
//! | ≤ 1 hour                 | an hour          |
//! | < 22 hours               | N hours          |
//! | ≤ 1 day                  | a day            |
//! | < 26 days                | N days           |
//! | ≤ 1 month                | a month          |
//! | < 11 months              | N months         |
//! | ≤ 1 year                 | a year           |
//! | otherwise                | N years          |

use std::fmt;

use chrono::{DateTime, Utc};

/// Average days per month over the 400 year Gregorian cycle.
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

/// A bucketed elapsed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeSpan {
    FewSeconds,
    Minute,
    Minutes(u64),
    Hour,
    Hours(u64),
    Day,
    Days(u64),
    Month,
    Months(u64),
    Year,
    Years(u64),
}

impl RelativeSpan {
    /// Bucket the absolute distance between `from` and `now`.
    ///
    /// Timestamps in the future are measured the same way as past ones.
    pub fn between(from: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed_ms = (now - from).num_milliseconds().unsigned_abs() as f64;
        Self::from_millis(elapsed_ms)
    }

    fn from_millis(elapsed_ms: f64) -> Self {
        let seconds = (elapsed_ms / 1_000.0).round();
        let minutes = (elapsed_ms / 60_000.0).round();
        let hours = (elapsed_ms / 3_600_000.0).round();
        let exact_days = elapsed_ms / 86_400_000.0;
        let days = exact_days.round();
        let months = (exact_days / DAYS_PER_MONTH).round();
        let years = (exact_days / DAYS_PER_MONTH / 12.0).round();

        if seconds <= 44.0 {
            RelativeSpan::FewSeconds
        } else if minutes <= 1.0 {
            RelativeSpan::Minute
        } else if minutes < 45.0 {
            RelativeSpan::Minutes(minutes as u64)
        } else if hours <= 1.0 {
            RelativeSpan::Hour
        } else if hours < 22.0 {
            RelativeSpan::Hours(hours as u64)
        } else if days <= 1.0 {
            RelativeSpan::Day
        } else if days < 26.0 {
            RelativeSpan::Days(days as u64)
        } else if months <= 1.0 {
            RelativeSpan::Month
        } else if months < 11.0 {
            RelativeSpan::Months(months as u64)
        } else if years <= 1.0 {
            RelativeSpan::Year
        } else {
            RelativeSpan::Years(years as u64)
        }
    }
}

impl fmt::Display for RelativeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeSpan::FewSeconds => f.write_str("a few seconds"),
            RelativeSpan::Minute => f.write_str("a minute"),
            RelativeSpan::Minutes(n) => write!(f, "{n} minutes"),
            RelativeSpan::Hour => f.write_str("an hour"),
            RelativeSpan::Hours(n) => write!(f, "{n} hours"),
            RelativeSpan::Day => f.write_str("a day"),
            RelativeSpan::Days(n) => write!(f, "{n} days"),
            RelativeSpan::Month => f.write_str("a month"),
            RelativeSpan::Months(n) => write!(f, "{n} months"),
            RelativeSpan::Year => f.write_str("a year"),
            RelativeSpan::Years(n) => write!(f, "{n} years"),
        }
    }
}

/// Human readable time elapsed between `from` and `now`, without a suffix.
///
/// # Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use peerwait_util::relative_time::readable_time_since;
///
/// let now = Utc::now();
/// assert_eq!(readable_time_since(now - Duration::days(3), now), "3 days");
/// ```
pub fn readable_time_since(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    RelativeSpan::between(from, now).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn span(elapsed: Duration) -> RelativeSpan {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid date");
        RelativeSpan::between(now - elapsed, now)
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(span(Duration::zero()), RelativeSpan::FewSeconds);
        assert_eq!(span(Duration::seconds(44)), RelativeSpan::FewSeconds);
        assert_eq!(span(Duration::seconds(45)), RelativeSpan::Minute);
        assert_eq!(span(Duration::seconds(89)), RelativeSpan::Minute);
        assert_eq!(span(Duration::seconds(90)), RelativeSpan::Minutes(2));
        assert_eq!(span(Duration::minutes(44)), RelativeSpan::Minutes(44));
    }

    #[test]
    fn hours_and_days() {
        assert_eq!(span(Duration::minutes(45)), RelativeSpan::Hour);
        assert_eq!(span(Duration::minutes(90)), RelativeSpan::Hours(2));
        assert_eq!(span(Duration::hours(21)), RelativeSpan::Hours(21));
        assert_eq!(span(Duration::hours(22)), RelativeSpan::Day);
        assert_eq!(span(Duration::hours(36)), RelativeSpan::Days(2));
        assert_eq!(span(Duration::days(25)), RelativeSpan::Days(25));
    }

    #[test]
    fn months_and_years() {
        assert_eq!(span(Duration::days(26)), RelativeSpan::Month);
        assert_eq!(span(Duration::days(46)), RelativeSpan::Months(2));
        assert_eq!(span(Duration::days(300)), RelativeSpan::Months(10));
        assert_eq!(span(Duration::days(320)), RelativeSpan::Year);
        assert_eq!(span(Duration::days(548)), RelativeSpan::Years(2));
        assert_eq!(span(Duration::days(365 * 5)), RelativeSpan::Years(5));
    }

    #[test]
    fn future_timestamps_measure_absolute_distance() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid date");
        assert_eq!(readable_time_since(now + Duration::days(3), now), "3 days");
    }

    #[test]
    fn labels_render_without_suffix() {
        assert_eq!(RelativeSpan::FewSeconds.to_string(), "a few seconds");
        assert_eq!(RelativeSpan::Hour.to_string(), "an hour");
        assert_eq!(RelativeSpan::Years(3).to_string(), "3 years");
    }
}
