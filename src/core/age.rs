use chrono::{DateTime, Utc};
use std::fmt;

const YEAR: i64 = 31_536_000;
const MONTH: i64 = 2_592_000;
const DAY: i64 = 86_400;
const HOUR: i64 = 3_600;
const MINUTE: i64 = 60;

/// Coarse "how long ago" bucket. Calendar-approximate: a year is 365 days
/// and a month is 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeAge {
    Years(i64),
    Months(i64),
    Days(i64),
    Hours(i64),
    Minutes(i64),
    JustNow,
}

/// Bucket the time between `timestamp` and `now`.
///
/// A bucket applies when the elapsed time is strictly more than one unit,
/// so exactly 60 seconds is still `JustNow`. Timestamps in the future
/// (clock skew between client and store) also read as `JustNow`.
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> RelativeAge {
    let elapsed = (now - timestamp).num_seconds();

    let buckets: [(i64, fn(i64) -> RelativeAge); 5] = [
        (YEAR, RelativeAge::Years),
        (MONTH, RelativeAge::Months),
        (DAY, RelativeAge::Days),
        (HOUR, RelativeAge::Hours),
        (MINUTE, RelativeAge::Minutes),
    ];

    buckets
        .iter()
        .find(|(divisor, _)| elapsed > *divisor)
        .map(|(divisor, bucket)| bucket(elapsed / divisor))
        .unwrap_or(RelativeAge::JustNow)
}

impl fmt::Display for RelativeAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match *self {
            Self::Years(n) => (n, "year"),
            Self::Months(n) => (n, "month"),
            Self::Days(n) => (n, "day"),
            Self::Hours(n) => (n, "hour"),
            Self::Minutes(n) => (n, "minute"),
            Self::JustNow => return f.write_str("a moment ago"),
        };
        let plural = if n == 1 { "" } else { "s" };
        write!(f, "{} {}{} ago", n, unit, plural)
    }
}
