//! Codecs for the string-encoded values the Email Verification API returns.
//!
//! Booleans arrive as `"true"`/`"false"` (or `"1"`/`"0"`) and timestamps as
//! `2006-01-02 15:04:05 MST`, both wrapped in JSON strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A boolean the API encodes as a string.
///
/// Decoding is lenient: only `"true"` and `"1"` are `true`. Encoding always
/// produces `"true"` or `"false"`, so `"1"` does not survive a round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringBool(pub bool);

impl StringBool {
    pub fn decode(value: &str) -> Self {
        StringBool(value == "true" || value == "1")
    }

    pub fn encode(self) -> &'static str {
        if self.0 {
            "true"
        } else {
            "false"
        }
    }
}

impl From<StringBool> for bool {
    fn from(value: StringBool) -> Self {
        value.0
    }
}

impl From<bool> for StringBool {
    fn from(value: bool) -> Self {
        StringBool(value)
    }
}

impl fmt::Display for StringBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

impl<'de> Deserialize<'de> for StringBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(StringBool::decode(&raw))
    }
}

impl Serialize for StringBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encode())
    }
}

/// Why a timestamp string did not match the API layout.
///
/// Messages follow the wording of the service's own time parser, with the
/// layout spelled as `2006-01-02 15:04:05 MST`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// `rest` (the unparsed tail of `value`) did not start with `element`.
    #[error("parsing time \"{value}\" as \"2006-01-02 15:04:05 MST\": cannot parse \"{rest}\" as \"{element}\"")]
    Layout {
        value: String,
        rest: String,
        element: &'static str,
    },

    #[error("parsing time \"{value}\": {field} out of range")]
    Range { value: String, field: &'static str },

    #[error("parsing time \"{value}\": extra text: \"{extra}\"")]
    ExtraText { value: String, extra: String },
}

impl TimestampError {
    /// The string that failed to parse.
    pub fn value(&self) -> &str {
        match self {
            TimestampError::Layout { value, .. }
            | TimestampError::Range { value, .. }
            | TimestampError::ExtraText { value, .. } => value,
        }
    }
}

// Walks `value` element by element through the layout.
struct Cursor<'a> {
    value: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn mismatch(&self, element: &'static str) -> TimestampError {
        TimestampError::Layout {
            value: self.value.to_string(),
            rest: self.rest.to_string(),
            element,
        }
    }

    fn out_of_range(&self, field: &'static str) -> TimestampError {
        TimestampError::Range {
            value: self.value.to_string(),
            field,
        }
    }

    fn literal(&mut self, element: &'static str) -> Result<(), TimestampError> {
        match self.rest.strip_prefix(element) {
            Some(rest) => {
                self.rest = rest;
                Ok(())
            }
            None => Err(self.mismatch(element)),
        }
    }

    /// Exactly `element.len()` ASCII digits.
    fn number(&mut self, element: &'static str) -> Result<u32, TimestampError> {
        let rest = self.rest;
        let digits = rest
            .get(..element.len())
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| self.mismatch(element))?;
        self.rest = &rest[digits.len()..];
        Ok(digits
            .bytes()
            .fold(0, |n, b| n * 10 + u32::from(b - b'0')))
    }

    fn bounded(
        &mut self,
        element: &'static str,
        field: &'static str,
        range: std::ops::RangeInclusive<u32>,
    ) -> Result<u32, TimestampError> {
        let n = self.number(element)?;
        if range.contains(&n) {
            Ok(n)
        } else {
            Err(self.out_of_range(field))
        }
    }

    fn zone(&mut self) -> Result<&'a str, TimestampError> {
        let rest = self.rest;
        let len = zone_len(rest).ok_or_else(|| self.mismatch("MST"))?;
        self.rest = &rest[len..];
        Ok(&rest[..len])
    }
}

/// Length of the zone name at the start of `rest`.
///
/// Accepts `UTC`, `ChST`, `MeST`, `GMT` with an optional signed hour
/// (`GMT+3`), a bare signed hour (`+03`), three upper-case letters, four
/// ending in `T` or `WITA`, and five ending in `T`.
fn zone_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if rest.starts_with("UTC") {
        return Some(3);
    }
    if bytes.len() < 3 {
        return None;
    }
    if rest.starts_with("ChST") || rest.starts_with("MeST") {
        return Some(4);
    }
    if let Some(offset) = rest.strip_prefix("GMT") {
        return Some(3 + signed_hour_len(offset).unwrap_or(0));
    }
    if matches!(bytes[0], b'+' | b'-') {
        return signed_hour_len(rest);
    }

    let upper = bytes.iter().take(6).take_while(|b| b.is_ascii_uppercase()).count();
    match upper {
        3 => Some(3),
        4 if bytes[3] == b'T' || rest.starts_with("WITA") => Some(4),
        5 if bytes[4] == b'T' => Some(5),
        _ => None,
    }
}

// A sign followed by an hour of at most 23, e.g. "+3" or "-10".
fn signed_hour_len(rest: &str) -> Option<usize> {
    let digits = rest.strip_prefix(['+', '-'])?;
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    let hour = digits[..len].parse::<u32>().ok()?;
    (hour <= 23).then_some(1 + len)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Stamp {
    clock: NaiveDateTime,
    zone: String,
}

/// An audit timestamp in the `2006-01-02 15:04:05 MST` layout.
///
/// Every clock field has a fixed width, so any value that parses encodes
/// back to the same string. The API sends `""` when it has no date; that
/// decodes to the empty value ([`ApiTime::default`]) and encodes back to
/// `""`. The zone name is kept verbatim; see [`ApiTime::as_utc`] for how it
/// is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ApiTime(Option<Stamp>);

impl ApiTime {
    pub fn new(clock: NaiveDateTime, zone: impl Into<String>) -> Self {
        ApiTime(Some(Stamp {
            clock,
            zone: zone.into(),
        }))
    }

    /// Parses the API layout. `""` yields the empty value.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        if value.is_empty() {
            return Ok(ApiTime::default());
        }

        let mut cursor = Cursor { value, rest: value };
        let year = cursor.number("2006")?;
        cursor.literal("-")?;
        let month = cursor.bounded("01", "month", 1..=12)?;
        cursor.literal("-")?;
        let day = cursor.number("02")?;
        cursor.literal(" ")?;
        let hour = cursor.bounded("15", "hour", 0..=23)?;
        cursor.literal(":")?;
        let minute = cursor.bounded("04", "minute", 0..=59)?;
        cursor.literal(":")?;
        let second = cursor.bounded("05", "second", 0..=59)?;
        cursor.literal(" ")?;
        let zone = cursor.zone()?;

        if !cursor.rest.is_empty() {
            return Err(TimestampError::ExtraText {
                value: value.to_string(),
                extra: cursor.rest.to_string(),
            });
        }

        let clock = NaiveDate::from_ymd_opt(year as i32, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or_else(|| cursor.out_of_range("day"))?;

        Ok(ApiTime::new(clock, zone))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn naive(&self) -> Option<NaiveDateTime> {
        self.0.as_ref().map(|s| s.clock)
    }

    pub fn zone(&self) -> Option<&str> {
        self.0.as_ref().map(|s| s.zone.as_str())
    }

    /// The instant in UTC.
    ///
    /// `GMT+h` / `GMT-h` zones shift the clock by that many hours. Every
    /// other zone name (including `UTC` itself) is read at zero offset.
    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        let stamp = self.0.as_ref()?;
        let hours = stamp
            .zone
            .strip_prefix("GMT")
            .and_then(|offset| offset.parse::<i64>().ok())
            .unwrap_or(0);
        Some((stamp.clock - TimeDelta::hours(hours)).and_utc())
    }

    /// Formats the value in the API layout; the empty value becomes `""`.
    pub fn encode(&self) -> String {
        match &self.0 {
            Some(stamp) => format!("{} {}", stamp.clock.format(CLOCK_FORMAT), stamp.zone),
            None => String::new(),
        }
    }
}

impl fmt::Display for ApiTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl std::str::FromStr for ApiTime {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiTime::parse(s)
    }
}

impl<'de> Deserialize<'de> for ApiTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ApiTime::parse(&raw).map_err(D::Error::custom)
    }
}

impl Serialize for ApiTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}
