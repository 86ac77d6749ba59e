//! Catalog entry types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DAYS_PER_YEAR, MAS2DEG};
use crate::coordinates::Equatorial;
use crate::planetlib::{self, OrbitalElements};
use crate::time::TimeScales;

/// Kind of catalog object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Star,
    Planet,
    #[serde(alias = "deep_sky_space", alias = "deepsky")]
    DeepSky,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectKind::Star => "Star",
            ObjectKind::Planet => "Planet",
            ObjectKind::DeepSky => "Deep Sky",
        };
        f.write_str(label)
    }
}

/// Proper motion in milliarcseconds per Julian year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProperMotion {
    /// Motion in right ascension, already multiplied by cos(dec)
    pub pm_ra_mas_yr: f64,
    /// Motion in declination
    pub pm_dec_mas_yr: f64,
}

/// An immutable catalog object
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    /// Catalog identifier
    pub id: u64,
    pub name: String,
    pub kind: ObjectKind,
    /// Apparent visual magnitude (lower is brighter)
    pub magnitude: f64,
    /// Position at the J2000 reference epoch
    pub position: Equatorial,
    pub proper_motion: Option<ProperMotion>,
    /// Mean elements, present for planets
    pub elements: Option<OrbitalElements>,
}

impl CelestialObject {
    /// Right ascension at the reference epoch in degrees
    pub fn ra_deg(&self) -> f64 {
        self.position.ra_degrees()
    }

    /// Declination at the reference epoch in degrees
    pub fn dec_deg(&self) -> f64 {
        self.position.dec_degrees()
    }

    /// Equatorial position at the instant of `time`
    ///
    /// Planets are propagated from their orbital elements. Stars and deep-sky
    /// objects use the catalog position, moved linearly by proper motion when
    /// `apply_proper_motion` is set.
    pub fn position_at(&self, time: &TimeScales, apply_proper_motion: bool) -> Equatorial {
        if let Some(elements) = &self.elements {
            return planetlib::geocentric_equatorial(elements, time.centuries_since_j2000);
        }

        match (&self.proper_motion, apply_proper_motion) {
            (Some(pm), true) => self.apply_proper_motion(pm, time.days_since_j2000() / DAYS_PER_YEAR),
            _ => self.position,
        }
    }

    fn apply_proper_motion(&self, pm: &ProperMotion, years: f64) -> Equatorial {
        let dec_deg = self.dec_deg();
        let cos_dec = dec_deg.to_radians().cos();

        // RA motion is undefined exactly at a pole
        let d_ra = if cos_dec.abs() < 1e-12 {
            0.0
        } else {
            pm.pm_ra_mas_yr * MAS2DEG * years / cos_dec
        };
        let d_dec = pm.pm_dec_mas_yr * MAS2DEG * years;

        Equatorial::from_degrees(self.ra_deg() + d_ra, (dec_deg + d_dec).clamp(-90.0, 90.0))
    }
}

impl fmt::Display for CelestialObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({}, mag {:.2}, RA {:.4}°, Dec {:+.4}°)",
            self.name,
            self.id,
            self.kind,
            self.magnitude,
            self.ra_deg(),
            self.dec_deg()
        )
    }
}
