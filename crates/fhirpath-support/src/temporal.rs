//! Partial date and time values.
//!
//! FHIR allows `date` and `dateTime` values to be truncated (`2024`,
//! `2024-03`) and FHIRPath compares such values precision by precision.
//! The types here keep the text they were parsed from so a value written back
//! out is byte-identical to the one read.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimePrecision {
    Hour,
    Minute,
    Second,
    /// Seconds with a fractional part.
    Millisecond,
}

/// A calendar date with year, month or day precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    original: String,
}

impl PrecisionDate {
    /// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.splitn(3, '-');
        let year = parse_fixed(parts.next()?, 4)? as i32;
        let month = match parts.next() {
            Some(part) => Some(parse_fixed(part, 2).filter(|m| (1..=12).contains(m))?),
            None => None,
        };
        let day = match parts.next() {
            Some(part) => {
                let day = parse_fixed(part, 2)?;
                NaiveDate::from_ymd_opt(year, month?, day)?;
                Some(day)
            }
            None => None,
        };
        Some(Self {
            year,
            month,
            day,
            original: text.to_string(),
        })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        let text = date.format("%Y-%m-%d").to_string();
        Self {
            year: chrono::Datelike::year(&date),
            month: Some(chrono::Datelike::month(&date)),
            day: Some(chrono::Datelike::day(&date)),
            original: text,
        }
    }

    pub fn precision(&self) -> DatePrecision {
        match (self.month, self.day) {
            (Some(_), Some(_)) => DatePrecision::Day,
            (Some(_), None) => DatePrecision::Month,
            _ => DatePrecision::Year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The date as a chrono value, available only at day precision.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month?, self.day?)
    }

    fn components(&self) -> [Option<i64>; 3] {
        [
            Some(i64::from(self.year)),
            self.month.map(i64::from),
            self.day.map(i64::from),
        ]
    }

    /// FHIRPath `=`: empty when the values differ only in precision.
    pub fn equal(&self, other: &Self) -> Option<bool> {
        compare_components(&self.components(), &other.components())
    }

    /// FHIRPath `~`: values of different precision are never equivalent.
    pub fn equivalent(&self, other: &Self) -> bool {
        self.precision() == other.precision() && self.equal(other) == Some(true)
    }
}

impl fmt::Display for PrecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// A time of day with hour, minute, second or fractional second precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionTime {
    hour: u32,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: Option<u32>,
    original: String,
}

impl PrecisionTime {
    /// Parses `hh`, `hh:mm`, `hh:mm:ss` or `hh:mm:ss.fff`.
    pub fn parse(text: &str) -> Option<Self> {
        let (main, fraction) = match text.split_once('.') {
            Some((main, fraction)) => (main, Some(fraction)),
            None => (text, None),
        };
        let mut parts = main.splitn(3, ':');
        let hour = parse_fixed(parts.next()?, 2).filter(|h| *h < 24)?;
        let minute = match parts.next() {
            Some(part) => Some(parse_fixed(part, 2).filter(|m| *m < 60)?),
            None => None,
        };
        let second = match parts.next() {
            Some(part) => Some(parse_fixed(part, 2).filter(|s| *s < 60)?),
            None => None,
        };
        let nanos = match fraction {
            Some(digits) => {
                if second.is_none()
                    || digits.is_empty()
                    || digits.len() > 9
                    || !digits.bytes().all(|b| b.is_ascii_digit())
                {
                    return None;
                }
                let padded = format!("{digits:0<9}");
                Some(padded.parse().ok()?)
            }
            None => None,
        };
        Some(Self {
            hour,
            minute,
            second,
            nanos,
            original: text.to_string(),
        })
    }

    /// Parses the FHIR `time` lexical form, which always carries seconds.
    pub fn parse_full(text: &str) -> Option<Self> {
        Self::parse(text).filter(|time| time.second.is_some())
    }

    pub fn precision(&self) -> TimePrecision {
        if self.nanos.is_some() {
            TimePrecision::Millisecond
        } else if self.second.is_some() {
            TimePrecision::Second
        } else if self.minute.is_some() {
            TimePrecision::Minute
        } else {
            TimePrecision::Hour
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_nano_opt(
            self.hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanos.unwrap_or(0),
        )
    }

    // Seconds and fractional seconds compare as a single precision.
    fn components(&self) -> [Option<i64>; 3] {
        [
            Some(i64::from(self.hour)),
            self.minute.map(i64::from),
            self.second
                .map(|s| i64::from(s) * 1_000_000_000 + i64::from(self.nanos.unwrap_or(0))),
        ]
    }

    fn comparison_precision(&self) -> TimePrecision {
        self.precision().min(TimePrecision::Second)
    }

    pub fn equal(&self, other: &Self) -> Option<bool> {
        compare_components(&self.components(), &other.components())
    }

    pub fn equivalent(&self, other: &Self) -> bool {
        self.comparison_precision() == other.comparison_precision()
            && self.equal(other) == Some(true)
    }
}

impl fmt::Display for PrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// A date, optionally followed by a time of day and a UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionDateTime {
    date: PrecisionDate,
    time: Option<PrecisionTime>,
    offset_seconds: Option<i32>,
    original: String,
}

impl PrecisionDateTime {
    /// Parses a FHIR `dateTime` or `instant`, for example `2024`,
    /// `2024-03-01` or `2024-03-01T10:15:00.250+01:00`.
    pub fn parse(text: &str) -> Option<Self> {
        let (date_text, rest) = match text.split_once('T') {
            Some((date, rest)) => (date, Some(rest)),
            None => (text, None),
        };
        let date = PrecisionDate::parse(date_text)?;
        let (time, offset_seconds) = match rest {
            None => (None, None),
            Some(rest) => {
                if date.precision() != DatePrecision::Day {
                    return None;
                }
                let (time_text, offset) = split_offset(rest)?;
                let time = if time_text.is_empty() {
                    None
                } else {
                    Some(PrecisionTime::parse(time_text)?)
                };
                (time, offset)
            }
        };
        Some(Self {
            date,
            time,
            offset_seconds,
            original: text.to_string(),
        })
    }

    pub fn date(&self) -> &PrecisionDate {
        &self.date
    }

    pub fn time(&self) -> Option<&PrecisionTime> {
        self.time.as_ref()
    }

    /// Offset from UTC in seconds; `Z` is zero.
    pub fn offset_seconds(&self) -> Option<i32> {
        self.offset_seconds
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Shifts the value to UTC when it carries both a time and an offset.
    fn to_utc(&self) -> Option<NaiveDateTime> {
        let offset = self.offset_seconds?;
        let time = self.time.as_ref()?.to_naive_time()?;
        let local = self.date.to_naive_date()?.and_time(time);
        local.checked_sub_signed(Duration::seconds(i64::from(offset)))
    }

    fn components(&self, normalize: bool) -> [Option<i64>; 6] {
        let [year, month, day] = self.date.components();
        let [hour, minute, second] = match &self.time {
            Some(time) => time.components(),
            None => [None; 3],
        };
        let mut out = [year, month, day, hour, minute, second];
        if normalize {
            if let Some(utc) = self.to_utc() {
                use chrono::{Datelike, Timelike};
                out[0] = Some(i64::from(utc.year()));
                out[1] = Some(i64::from(utc.month()));
                out[2] = Some(i64::from(utc.day()));
                out[3] = Some(i64::from(utc.hour()));
                if out[4].is_some() {
                    out[4] = Some(i64::from(utc.minute()));
                }
            }
        }
        out
    }

    fn comparison_precision(&self) -> (DatePrecision, Option<TimePrecision>) {
        (
            self.date.precision(),
            self.time.as_ref().map(PrecisionTime::comparison_precision),
        )
    }

    pub fn equal(&self, other: &Self) -> Option<bool> {
        let normalize = self.to_utc().is_some() && other.to_utc().is_some();
        compare_components(&self.components(normalize), &other.components(normalize))
    }

    pub fn equivalent(&self, other: &Self) -> bool {
        self.comparison_precision() == other.comparison_precision()
            && self.equal(other) == Some(true)
    }
}

impl From<PrecisionDate> for PrecisionDateTime {
    fn from(date: PrecisionDate) -> Self {
        let original = date.original.clone();
        Self {
            date,
            time: None,
            offset_seconds: None,
            original,
        }
    }
}

impl fmt::Display for PrecisionDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

fn parse_fixed(text: &str, width: usize) -> Option<u32> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn split_offset(text: &str) -> Option<(&str, Option<i32>)> {
    if let Some(time) = text.strip_suffix('Z') {
        return Some((time, Some(0)));
    }
    let Some(index) = text.rfind(|c| c == '+' || c == '-') else {
        return Some((text, None));
    };
    let (time, offset) = text.split_at(index);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let (hours, minutes) = offset[1..].split_once(':')?;
    let hours = parse_fixed(hours, 2).filter(|h| *h <= 14)?;
    let minutes = parse_fixed(minutes, 2).filter(|m| *m < 60)?;
    Some((time, Some(sign * (hours as i32 * 3600 + minutes as i32 * 60))))
}

/// Compares most significant first; a component present on one side only
/// makes the result empty.
fn compare_components(left: &[Option<i64>], right: &[Option<i64>]) -> Option<bool> {
    for (l, r) in left.iter().zip(right.iter()) {
        match (l, r) {
            (Some(l), Some(r)) if l != r => return Some(false),
            (Some(_), Some(_)) => {}
            (None, None) => return Some(true),
            _ => return None,
        }
    }
    Some(true)
}
