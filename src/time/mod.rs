//! Time module for astronomical time calculations
//!
//! Converts a UTC instant into the time scales the position engine needs:
//! the Julian Date, Julian centuries since J2000 and Greenwich Mean Sidereal
//! Time. UTC is used directly as UT1; the sub-second difference is far below
//! the precision of the catalog and the planetary elements.

use crate::constants::{
    DAYS_PER_CENTURY, DAY_S, GMST_J2000_DEG, GMST_RATE_DEG_PER_DAY, GMST_T2, GMST_T3_DIVISOR,
    GREGORIAN_START, GREGORIAN_START_YEAR, J2000,
};
use crate::coordinates::normalize_degrees;
use crate::{Result, SkyviewError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Naive (zone-less) layouts accepted from date/time form inputs, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Snapshot of the astronomical time scales for one instant
///
/// Created fresh on every update tick and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScales {
    /// Julian Date (days)
    pub julian_date: f64,
    /// Julian centuries elapsed since J2000.0
    pub centuries_since_j2000: f64,
    /// Greenwich Mean Sidereal Time in degrees, in [0, 360)
    pub gmst_deg: f64,
}

impl TimeScales {
    /// Build the time scales for a Julian Date
    pub fn from_julian_date(julian_date: f64) -> Result<Self> {
        if !julian_date.is_finite() {
            return Err(SkyviewError::InvalidDate(format!(
                "Julian date is not finite: {}",
                julian_date
            )));
        }
        // Calendar days start at JD x.5, so the Gregorian start is half a day earlier
        if julian_date < GREGORIAN_START as f64 - 0.5 {
            return Err(SkyviewError::InvalidDate(format!(
                "Julian date {} precedes the Gregorian calendar",
                julian_date
            )));
        }

        let days = julian_date - J2000;
        let t = days / DAYS_PER_CENTURY;

        Ok(Self {
            julian_date,
            centuries_since_j2000: t,
            gmst_deg: gmst_degrees(days, t),
        })
    }

    /// Days elapsed since J2000.0
    pub fn days_since_j2000(&self) -> f64 {
        self.julian_date - J2000
    }

    /// Local sidereal time in degrees for an east-positive longitude
    pub fn local_sidereal_deg(&self, longitude_deg: f64) -> f64 {
        normalize_degrees(self.gmst_deg + longitude_deg)
    }

    /// The UTC instant this snapshot was computed for
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        julian_date_to_datetime(self.julian_date)
    }
}

impl fmt::Display for TimeScales {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JD {:.6} (T = {:+.9}), GMST {:.6}°",
            self.julian_date, self.centuries_since_j2000, self.gmst_deg
        )
    }
}

/// Compute the time scales for a UTC timestamp
pub fn compute_time_scales(timestamp: DateTime<Utc>) -> Result<TimeScales> {
    TimeScales::from_julian_date(julian_date(&timestamp)?)
}

/// Parse a timestamp string and compute its time scales
pub fn compute_time_scales_str(timestamp: &str) -> Result<TimeScales> {
    compute_time_scales(parse_timestamp(timestamp)?)
}

/// Parse an ISO-8601 timestamp
///
/// Strings carrying an offset (`Z`, `+02:00`) are converted to UTC. Strings
/// without one, including the `YYYY-MM-DDTHH:MM` shape produced by HTML date
/// and time inputs, and bare dates, are read as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SkyviewError::InvalidDate(format!("Unrecognized timestamp: {:?}", input)))
}

/// Convert a UTC timestamp to a Julian Date
///
/// Valid for Gregorian calendar dates only (1582-10-15 onward).
pub fn julian_date(timestamp: &DateTime<Utc>) -> Result<f64> {
    let year = timestamp.year();
    if year < GREGORIAN_START_YEAR {
        return Err(SkyviewError::InvalidDate(format!(
            "Year {} precedes the Gregorian calendar",
            year
        )));
    }

    let jdn = julian_day(year, timestamp.month(), timestamp.day());
    if jdn < GREGORIAN_START {
        return Err(SkyviewError::InvalidDate(format!(
            "{} precedes the Gregorian calendar (1582-10-15)",
            timestamp.date_naive()
        )));
    }

    let seconds = timestamp.num_seconds_from_midnight() as f64
        + timestamp.nanosecond() as f64 / 1_000_000_000.0;

    // The day number refers to noon; midnight is half a day earlier
    Ok(jdn as f64 - 0.5 + seconds / DAY_S)
}

/// Calculate the Julian day number (at noon) of a Gregorian calendar date
///
/// This follows the algorithm in the Explanatory Supplement to the Astronomical Almanac 15.11.
pub fn julian_day(year: i32, month: u32, day: u32) -> i32 {
    let janfeb = month <= 2;
    let g = year + 4716 - if janfeb { 1 } else { 0 };
    let f = (month + 9) % 12;
    let e = 1461 * g / 4 + day as i32 - 1402;
    let j = e + (153 * f as i32 + 2) / 5;

    j + 38 - (g + 184) / 100 * 3 / 4
}

/// Convert a Julian Date back to a UTC timestamp
pub fn julian_date_to_datetime(julian_date: f64) -> Result<DateTime<Utc>> {
    if !julian_date.is_finite() {
        return Err(SkyviewError::InvalidDate(format!(
            "Julian date is not finite: {}",
            julian_date
        )));
    }

    let unix_seconds = (julian_date - UNIX_EPOCH_JD) * DAY_S;
    let whole = unix_seconds.floor();
    let nanos = ((unix_seconds - whole) * 1_000_000_000.0).round() as u32;

    // Rounding can carry a full second into the nanosecond field
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole + 1.0, 0)
    } else {
        (whole, nanos)
    };

    DateTime::from_timestamp(whole as i64, nanos).ok_or_else(|| {
        SkyviewError::InvalidDate(format!("Julian date {} is out of range", julian_date))
    })
}

/// Greenwich Mean Sidereal Time in degrees (IAU 1982 polynomial)
fn gmst_degrees(days_since_j2000: f64, centuries: f64) -> f64 {
    let gmst = GMST_J2000_DEG + GMST_RATE_DEG_PER_DAY * days_since_j2000
        + GMST_T2 * centuries * centuries
        - centuries * centuries * centuries / GMST_T3_DIVISOR;

    normalize_degrees(gmst)
}
