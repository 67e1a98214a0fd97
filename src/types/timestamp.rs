use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use super::error::ValueError;

/// Date-time layouts accepted after the offset has been split off, most
/// specific first.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A point in time with millisecond resolution, normalized to UTC.
///
/// Literal forms, most specific first:
///
/// - `2006-05-17T23:30:42.1Z` / `2006-05-17T23:30:42.1+03:00`
/// - `2006-05-17T23:30:42Z`
/// - `2006-05-17T23:30Z`
/// - `2006-05-17` (midnight UTC)
/// - `2006-05` (first day of the month, midnight UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC instant, truncating it to whole milliseconds.
    #[must_use]
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTimestamp`] if the instant is out of range.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, ValueError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| ValueError::InvalidTimestamp(millis.to_string()))
    }

    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis).unwrap_or(dt)
}

/// Split `Z` or `±HH:MM` off a date-time literal.
fn split_offset(s: &str) -> Option<(&str, FixedOffset)> {
    if let Some(rest) = s.strip_suffix('Z') {
        return Some((rest, FixedOffset::east_opt(0)?));
    }
    let split = s.len().checked_sub(6)?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (rest, offset) = s.split_at(split);
    let sign = match offset.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, minutes) = offset[1..].split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some((rest, FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?))
}

fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    let (local, offset) = split_offset(s)?;
    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())?;
    let dt = offset.from_local_datetime(&naive).single()?;
    Some(dt.with_timezone(&Utc))
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let date = match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            let (year, month) = s.split_once('-')?;
            if year.len() != 4 || month.len() != 2 {
                return None;
            }
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?
        }
    };
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

impl FromStr for Timestamp {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = if s.contains('T') {
            parse_date_time(s)
        } else {
            parse_date(s)
        };
        parsed
            .map(Self::from_utc)
            .ok_or_else(|| ValueError::InvalidTimestamp(s.to_owned()))
    }
}

/// Canonical form: full seconds, fractional seconds (`0` when zero, otherwise
/// three digits) and a numeric UTC offset.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))?;
        match self.0.timestamp_subsec_millis() {
            0 => write!(f, ".0")?,
            ms => write!(f, ".{ms:03}")?,
        }
        write!(f, "+00:00")
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::from_utc(dt)
    }
}
