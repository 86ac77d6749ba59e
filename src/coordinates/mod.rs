//! Coordinate systems used by the engine
//!
//! `Equatorial` holds catalog and planet positions (RA/Dec, radians, J2000
//! mean equator), `Horizontal` holds observer-local altitude/azimuth in
//! degrees. Both convert to and from [`Cartesian3`] through [`SphericalFrame`].

pub mod cartesian;

pub use cartesian::Cartesian3;

use serde::{Deserialize, Serialize};

/// Normalize an angle in degrees into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in degrees into [-180, 180]
pub fn wrap_degrees_180(angle: f64) -> f64 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// A spherical coordinate frame backed by unit vectors
pub trait SphericalFrame: Sized {
    fn to_cartesian(&self) -> Cartesian3;
    fn from_cartesian(cart: Cartesian3) -> Self;

    /// Great-circle separation in radians
    fn angle_between(&self, other: &Self) -> f64 {
        self.to_cartesian().angular_distance(&other.to_cartesian())
    }
}

/// Equatorial coordinates (RA/Dec)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    pub ra: f64,  // Right ascension in radians, [0, 2π)
    pub dec: f64, // Declination in radians
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Self {
        let normalized_ra = ra.rem_euclid(2.0 * std::f64::consts::PI);
        Equatorial {
            ra: normalized_ra,
            dec,
        }
    }

    /// Create a new Equatorial coordinate with values in degrees
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::new(ra_deg.to_radians(), dec_deg.to_radians())
    }

    /// Get right ascension in degrees
    pub fn ra_degrees(&self) -> f64 {
        normalize_degrees(self.ra.to_degrees())
    }

    /// Get declination in degrees
    pub fn dec_degrees(&self) -> f64 {
        self.dec.to_degrees()
    }
}

impl SphericalFrame for Equatorial {
    fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_spherical(self.ra, self.dec, 1.0)
    }

    fn from_cartesian(cart: Cartesian3) -> Self {
        let (ra, dec, _) = cart.to_spherical();
        Equatorial::new(ra, dec)
    }
}

/// Observer-local horizontal coordinates
///
/// Azimuth is measured from north through east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horizontal {
    /// Altitude above the horizon in degrees, [-90, 90]
    pub altitude_deg: f64,
    /// Azimuth in degrees, [0, 360)
    pub azimuth_deg: f64,
}

impl Horizontal {
    /// Create a horizontal direction, normalizing azimuth and clamping altitude
    pub fn new(altitude_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            altitude_deg: altitude_deg.clamp(-90.0, 90.0),
            azimuth_deg: normalize_degrees(azimuth_deg),
        }
    }

    /// Zenith distance in degrees
    pub fn zenith_distance_deg(&self) -> f64 {
        90.0 - self.altitude_deg
    }
}

impl SphericalFrame for Horizontal {
    fn to_cartesian(&self) -> Cartesian3 {
        Cartesian3::from_horizontal(self.altitude_deg, self.azimuth_deg)
    }

    fn from_cartesian(cart: Cartesian3) -> Self {
        // ENU: x east, y north, so azimuth = atan2(east, north)
        let (_, lat, _) = cart.to_spherical();
        let r_xy = (cart.x * cart.x + cart.y * cart.y).sqrt();
        let azimuth = if r_xy == 0.0 {
            0.0
        } else {
            cart.x.atan2(cart.y).to_degrees()
        };
        Horizontal::new(lat.to_degrees(), azimuth)
    }
}
