/// Local calendar date keys
///
/// Every "what day is it" question in the tracker is answered here. A date
/// key is a local calendar day, rendered as a zero-padded `YYYY-MM-DD`
/// string. Because of the fixed width, lexical order of the strings is the
/// same as chronological order, and storage code relies on that.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::DomainError;

/// strftime pattern of the persisted key
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Single-letter weekday labels, indexed by days from Sunday
const WEEKDAY_LETTERS: [char; 7] = ['S', 'M', 'T', 'W', 'T', 'F', 'S'];

/// A local calendar day
///
/// Wraps a `NaiveDate` so that the only way to get "today" is through the
/// local-time constructors below. Never build one from a UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Wrap an already-local calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a key from year/month/day, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's key in the device's local time zone
    pub fn today() -> Self {
        Self::today_at(&Local::now())
    }

    /// The local calendar day of `now`, in whatever zone `now` carries
    ///
    /// Uses the zone-local year/month/day, so 23:30 at UTC-8 stays on the
    /// same day even though the UTC instant has already rolled over.
    pub fn today_at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self(now.date_naive())
    }

    /// The key `days` calendar days away (negative walks backwards)
    pub fn shift_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn previous_day(&self) -> Self {
        self.shift_days(-1)
    }

    pub fn next_day(&self) -> Self {
        self.shift_days(1)
    }

    /// Monday of the week containing this day
    pub fn week_start(&self) -> Self {
        let from_monday = self.0.weekday().num_days_from_monday() as i64;
        self.shift_days(-from_monday)
    }

    /// Sunday of the week containing this day
    pub fn week_end(&self) -> Self {
        self.week_start().shift_days(6)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Weekday as 0-6 with 0 = Sunday
    pub fn weekday_number(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Single-letter weekday label (`S M T W T F S`)
    pub fn weekday_letter(&self) -> char {
        WEEKDAY_LETTERS[self.weekday_number() as usize]
    }

    /// Signed number of days from `self` to `other`
    pub fn days_until(&self, other: DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DomainError;

    /// Parse a strict `YYYY-MM-DD` key
    ///
    /// chrono happily accepts `2024-6-1`; keys must be zero padded so the
    /// string order keeps matching the date order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DomainError::InvalidDate(
                format!("'{}' is not a YYYY-MM-DD date key", s)
            ));
        }

        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|e| DomainError::InvalidDate(format!("'{}': {}", s, e)))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
