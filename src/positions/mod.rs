//! Position engine
//!
//! Turns catalog entries into observer-local directions for one instant.
//! Every function here is pure: the output depends only on the catalog
//! entry, the observer location and the [`TimeScales`] snapshot, so two calls
//! with the same inputs return bit-identical results.
//!
//! ```rust
//! use skyview::catalogs::bright_sky;
//! use skyview::{compute_directions, compute_time_scales_str, Observer};
//!
//! let observer = Observer::new(51.48, 0.0).unwrap();
//! let time = compute_time_scales_str("2024-03-20T21:00:00Z").unwrap();
//!
//! let directions = compute_directions(bright_sky(), &observer, &time);
//! assert_eq!(directions.len(), bright_sky().len());
//! ```

use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalogs::{Catalog, CelestialObject};
use crate::config::EngineConfig;
use crate::coordinates::{normalize_degrees, wrap_degrees_180, Cartesian3, Horizontal};
use crate::time::TimeScales;
use crate::{Result, SkyviewError};

/// Horizontal-plane projections below this length have no defined azimuth
const AZIMUTH_SINGULARITY: f64 = 1e-12;

/// A validated observer location on Earth
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    latitude_deg: f64,
    longitude_deg: f64,
}

impl Observer {
    /// Create an observer at a geodetic latitude and east-positive longitude
    ///
    /// # Errors
    /// `InvalidObserverState` if either value is non-finite, latitude is
    /// outside [-90, 90] or longitude outside [-180, 180].
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(SkyviewError::InvalidObserverState(format!(
                "latitude must be within [-90, 90], got {}",
                latitude_deg
            )));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(SkyviewError::InvalidObserverState(format!(
                "longitude must be within [-180, 180], got {}",
                longitude_deg
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }
}

/// Where one catalog object appears in the observer's sky
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Catalog id of the object
    pub object_id: u64,
    /// Altitude above the horizon in degrees, [-90, 90]
    pub altitude_deg: f64,
    /// Azimuth from north through east in degrees, [0, 360)
    pub azimuth_deg: f64,
}

impl Direction {
    pub fn horizontal(&self) -> Horizontal {
        Horizontal {
            altitude_deg: self.altitude_deg,
            azimuth_deg: self.azimuth_deg,
        }
    }

    /// Unit vector in the (east, north, up) frame
    pub fn to_unit_vector(&self) -> Cartesian3 {
        Cartesian3::from_horizontal(self.altitude_deg, self.azimuth_deg)
    }

    /// Position on a sky sphere of the given radius centered on the observer
    pub fn sky_sphere_position(&self, radius: f64) -> Cartesian3 {
        self.to_unit_vector() * radius
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg >= 0.0
    }
}

/// Local sidereal time in degrees, [0, 360)
pub fn local_sidereal_time_deg(gmst_deg: f64, longitude_deg: f64) -> f64 {
    normalize_degrees(gmst_deg + longitude_deg)
}

/// Hour angle in degrees, [-180, 180]; negative east of the meridian
pub fn hour_angle_deg(lst_deg: f64, ra_deg: f64) -> f64 {
    wrap_degrees_180(lst_deg - ra_deg)
}

/// Convert an equatorial position to altitude/azimuth for one observer
///
/// Azimuth is reported as 0 when the direction is at the zenith or nadir,
/// where it has no meaning.
///
/// ```rust
/// use skyview::positions::horizontal_from_equatorial;
///
/// // A star on the celestial equator transiting for an observer at 40°N
/// let h = horizontal_from_equatorial(90.0, 0.0, 90.0, 40.0);
/// assert!((h.altitude_deg - 50.0).abs() < 1e-9);
/// assert!((h.azimuth_deg - 180.0).abs() < 1e-9);
/// ```
pub fn horizontal_from_equatorial(
    ra_deg: f64,
    dec_deg: f64,
    lst_deg: f64,
    latitude_deg: f64,
) -> Horizontal {
    let ha = hour_angle_deg(lst_deg, ra_deg).to_radians();
    let (sin_ha, cos_ha) = ha.sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = latitude_deg.to_radians().sin_cos();

    // Components of the direction in the (east, north, up) frame
    let east = -cos_dec * sin_ha;
    let north = cos_lat * sin_dec - sin_lat * cos_dec * cos_ha;
    let up = sin_lat * sin_dec + cos_lat * cos_dec * cos_ha;

    let horizontal_len = east.hypot(north);
    let altitude = up.atan2(horizontal_len).to_degrees();
    let azimuth = if horizontal_len < AZIMUTH_SINGULARITY {
        0.0
    } else {
        east.atan2(north).to_degrees()
    };

    Horizontal::new(altitude, azimuth)
}

/// Direction of a single object
pub fn direction_of(
    object: &CelestialObject,
    observer: &Observer,
    time: &TimeScales,
    apply_proper_motion: bool,
) -> Direction {
    let position = object.position_at(time, apply_proper_motion);
    let lst = local_sidereal_time_deg(time.gmst_deg, observer.longitude_deg);
    let h = horizontal_from_equatorial(
        position.ra_degrees(),
        position.dec_degrees(),
        lst,
        observer.latitude_deg,
    );

    Direction {
        object_id: object.id,
        altitude_deg: h.altitude_deg,
        azimuth_deg: h.azimuth_deg,
    }
}

/// Directions for every catalog object, in catalog order
pub fn compute_directions(catalog: &Catalog, observer: &Observer, time: &TimeScales) -> Vec<Direction> {
    compute_directions_with(&EngineConfig::default(), catalog, observer, time)
}

/// Directions for the catalog under an explicit engine configuration
///
/// Objects below `min_altitude_deg` are dropped; the remaining ones keep
/// catalog order.
pub fn compute_directions_with(
    config: &EngineConfig,
    catalog: &Catalog,
    observer: &Observer,
    time: &TimeScales,
) -> Vec<Direction> {
    let directions: Vec<Direction> = catalog
        .objects()
        .map(|object| direction_of(object, observer, time, config.apply_proper_motion))
        .filter(|d| passes_horizon(config, d))
        .collect();

    trace!(
        "Computed {} of {} directions at JD {:.6}",
        directions.len(),
        catalog.len(),
        time.julian_date
    );
    directions
}

/// Parallel variant of [`compute_directions_with`]
///
/// Objects are mapped on the rayon pool and collected back in catalog order,
/// so the output equals the sequential version exactly.
pub fn compute_directions_par(
    config: &EngineConfig,
    catalog: &Catalog,
    observer: &Observer,
    time: &TimeScales,
) -> Vec<Direction> {
    catalog
        .as_slice()
        .par_iter()
        .map(|object| direction_of(object, observer, time, config.apply_proper_motion))
        .filter(|d| passes_horizon(config, d))
        .collect()
}

fn passes_horizon(config: &EngineConfig, direction: &Direction) -> bool {
    config
        .min_altitude_deg
        .map_or(true, |min_alt| direction.altitude_deg >= min_alt)
}
