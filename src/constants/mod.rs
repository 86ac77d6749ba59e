//! Constants module for astronomical calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date (2000-01-01T12:00:00 TT)
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;
/// Days in a Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

// Angles
/// Milliarcseconds to degrees conversion factor
pub const MAS2DEG: f64 = 1.0 / 3_600_000.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Earth constants
/// Mean obliquity of the ecliptic at J2000 in degrees (IAU 1976)
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291_1;

// Sidereal time (IAU 1982, Meeus eq. 12.4)
/// GMST at J2000 in degrees
pub const GMST_J2000_DEG: f64 = 280.460_618_37;
/// GMST rate in degrees per day
pub const GMST_RATE_DEG_PER_DAY: f64 = 360.985_647_366_29;
/// GMST quadratic coefficient (per century squared)
pub const GMST_T2: f64 = 0.000_387_933;
/// GMST cubic divisor (per century cubed)
pub const GMST_T3_DIVISOR: f64 = 38_710_000.0;

// Calendar constants
/// First day of Gregorian calendar in Julian day number (1582-10-15)
pub const GREGORIAN_START: i32 = 2_299_161;
/// First year accepted by the Gregorian date conversion
pub const GREGORIAN_START_YEAR: i32 = 1582;
