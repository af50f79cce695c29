//! Minute-of-day time handling.
//!
//! The schedule encodes times as "HH:MM" strings. This module provides a
//! minute-of-day representation in which the literal "00:00" denotes 1440,
//! the end of the service day, so that a last-stop arrival at midnight
//! orders after same-evening departures. All arithmetic wraps modulo 1440.

use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A minute of the service day in `[0, 1440]`.
///
/// The value 1440 is produced only by parsing the literal "00:00" and marks
/// the end of the day; every other "HH:MM" string maps to `h * 60 + m`.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::DayMinute;
///
/// let t = DayMinute::parse("08:30").unwrap();
/// assert_eq!(t.minutes(), 510);
/// assert_eq!(t.to_string(), "08:30");
///
/// // Midnight is the end of the day, not the start.
/// let midnight = DayMinute::parse("00:00").unwrap();
/// assert_eq!(midnight.minutes(), 1440);
/// assert_eq!(midnight.to_string(), "00:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayMinute(u16);

impl DayMinute {
    /// Minutes in a day.
    pub const DAY: u16 = 1440;

    /// Create from a raw minute value in `[0, 1440]`.
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes <= Self::DAY).then_some(Self(minutes))
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// The literal "00:00" maps to 1440; all other values require
    /// `0 <= h < 24` and `0 <= m < 60`.
    ///
    /// # Examples
    ///
    /// ```
    /// use itinerary_server::domain::DayMinute;
    ///
    /// assert!(DayMinute::parse("23:59").is_ok());
    /// assert!(DayMinute::parse("08:05").is_ok());
    ///
    /// assert!(DayMinute::parse("24:00").is_err());
    /// assert!(DayMinute::parse("12:60").is_err());
    /// assert!(DayMinute::parse("805").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        if s == "00:00" {
            return Ok(Self(Self::DAY));
        }

        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Returns the raw minute value in `[0, 1440]`.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Minutes from `self` until `later`, wrapping at midnight.
    ///
    /// Returns `(later - self) mod 1440`, so a late-evening departure
    /// followed by an early-morning arrival yields a short duration.
    pub fn until(self, later: DayMinute) -> u16 {
        (later.0 + Self::DAY - self.0) % Self::DAY
    }
}

impl fmt::Debug for DayMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DayMinute({} = {})", self.0, self)
    }
}

impl fmt::Display for DayMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0 % Self::DAY;
        write!(f, "{:02}:{:02}", m / 60, m % 60)
    }
}

/// Render an accumulated minute count as "HH:MM", wrapping every 24 hours.
///
/// Timelines accumulated by walking a path can exceed a day; only the
/// time-of-day component is displayed.
pub fn format_minutes(total: u32) -> String {
    let m = total % u32::from(DayMinute::DAY);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Render a duration as "Xh Ym".
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::format_duration;
///
/// assert_eq!(format_duration(60), "1h 0m");
/// assert_eq!(format_duration(95), "1h 35m");
/// assert_eq!(format_duration(0), "0h 0m");
/// ```
pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Parse two ASCII digit bytes into a u16.
fn parse_two_digits(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)? as u16;
    let d2 = (bytes[1] as char).to_digit(10)? as u16;
    Some(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u16..24, minute in 0u16..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Any valid HH:MM string parses successfully.
        #[test]
        fn valid_hhmm_parses(s in valid_time()) {
            prop_assert!(DayMinute::parse(&s).is_ok());
        }

        /// Parse then display round-trips, modulo the day length.
        #[test]
        fn parse_format_roundtrip(m in 0u16..=1440) {
            let t = DayMinute::new(m).unwrap();
            let reparsed = DayMinute::parse(&t.to_string()).unwrap();
            prop_assert_eq!(reparsed.minutes() % 1440, m % 1440);
        }

        /// Durations are always in [0, 1440).
        #[test]
        fn duration_in_range(a in 0u16..=1440, b in 0u16..=1440) {
            let a = DayMinute::new(a).unwrap();
            let b = DayMinute::new(b).unwrap();
            prop_assert!(a.until(b) < 1440);
        }

        /// Going forward then back covers the whole day.
        #[test]
        fn duration_antisymmetric(a in 0u16..1440, b in 0u16..1440) {
            let a = DayMinute::new(a).unwrap();
            let b = DayMinute::new(b).unwrap();
            if a != b {
                prop_assert_eq!(u32::from(a.until(b)) + u32::from(b.until(a)), 1440);
            }
        }

        /// Invalid hours are rejected.
        #[test]
        fn invalid_hour_rejected(hour in 24u16..100, minute in 0u16..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            if s != "00:00" {
                prop_assert!(DayMinute::parse(&s).is_err());
            }
        }

        /// Invalid minutes are rejected.
        #[test]
        fn invalid_minute_rejected(hour in 0u16..24, minute in 60u16..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(DayMinute::parse(&s).is_err());
        }
    }
}
