//! Planetary positions from Keplerian mean elements
//!
//! Low-precision planet positions following the JPL "Approximate Positions of
//! the Planets" model (E. M. Standish): J2000 mean ecliptic elements with
//! linear rates per Julian century, valid 1800–2050 AD to within a few
//! arcminutes for the inner planets. Positions are geometric (no light time or
//! aberration) and referred to the J2000 mean equator.

pub mod kepler;

use crate::constants::{OBLIQUITY_J2000_DEG, RAD2DEG};
use crate::coordinates::{Cartesian3, Equatorial, SphericalFrame};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use kepler::{eccentric_anomaly, orbital_plane_position};

/// Enum representing the major solar system bodies with built-in elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    /// All bodies other than Earth, ordered by distance from the Sun
    pub const PLANETS: [Body; 7] = [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }

    /// Look up a planet by name, ignoring case
    ///
    /// Earth is not a match: it has no direction as seen from itself.
    pub fn from_name(name: &str) -> Option<Body> {
        Body::PLANETS
            .iter()
            .find(|body| body.name().eq_ignore_ascii_case(name.trim()))
            .copied()
    }

    /// J2000 mean elements and rates (Standish, Table 1)
    ///
    /// Earth's entry is the Earth-Moon barycenter.
    pub fn elements(&self) -> OrbitalElements {
        let row = match self {
            Body::Mercury => [
                0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93,
                0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81,
            ],
            Body::Venus => [
                0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55,
                0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18,
            ],
            Body::Earth => [
                1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0,
                0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0,
            ],
            Body::Mars => [
                1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91,
                0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43,
            ],
            Body::Jupiter => [
                5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09,
                -0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06,
            ],
            Body::Saturn => [
                9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48,
                -0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94,
            ],
            Body::Uranus => [
                19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03,
                -0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89,
            ],
            Body::Neptune => [
                30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74,
                0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64,
            ],
        };

        OrbitalElements {
            a: row[0],
            e: row[1],
            i: row[2],
            l: row[3],
            long_peri: row[4],
            long_node: row[5],
            a_rate: row[6],
            e_rate: row[7],
            i_rate: row[8],
            l_rate: row[9],
            long_peri_rate: row[10],
            long_node_rate: row[11],
        }
    }
}

/// Keplerian mean elements referred to the J2000 ecliptic and equinox
///
/// Angles are in degrees, distances in AU, rates per Julian century.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU)
    pub a: f64,
    /// Eccentricity
    pub e: f64,
    /// Inclination
    pub i: f64,
    /// Mean longitude
    pub l: f64,
    /// Longitude of perihelion
    pub long_peri: f64,
    /// Longitude of the ascending node
    pub long_node: f64,
    #[serde(default)]
    pub a_rate: f64,
    #[serde(default)]
    pub e_rate: f64,
    #[serde(default)]
    pub i_rate: f64,
    #[serde(default)]
    pub l_rate: f64,
    #[serde(default)]
    pub long_peri_rate: f64,
    #[serde(default)]
    pub long_node_rate: f64,
}

impl OrbitalElements {
    /// Check that the elements describe a bound, finite orbit
    pub fn validate(&self) -> std::result::Result<(), String> {
        let values = [
            self.a,
            self.e,
            self.i,
            self.l,
            self.long_peri,
            self.long_node,
            self.a_rate,
            self.e_rate,
            self.i_rate,
            self.l_rate,
            self.long_peri_rate,
            self.long_node_rate,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("orbital elements must be finite".to_string());
        }
        if self.a <= 0.0 {
            return Err(format!("semi-major axis must be positive, got {}", self.a));
        }
        if !(0.0..1.0).contains(&self.e) {
            return Err(format!("eccentricity must be in [0, 1), got {}", self.e));
        }
        Ok(())
    }

    /// Elements propagated to `t` Julian centuries after J2000
    pub fn at(&self, t: f64) -> OrbitalElements {
        OrbitalElements {
            a: self.a + self.a_rate * t,
            // Keep the orbit bound even when extrapolating far outside the fit
            e: (self.e + self.e_rate * t).clamp(0.0, 0.999_999),
            i: self.i + self.i_rate * t,
            l: self.l + self.l_rate * t,
            long_peri: self.long_peri + self.long_peri_rate * t,
            long_node: self.long_node + self.long_node_rate * t,
            ..*self
        }
    }

    /// Heliocentric position in the J2000 ecliptic frame (AU)
    pub fn heliocentric_ecliptic(&self, t: f64) -> Cartesian3 {
        let el = self.at(t);

        let arg_peri = (el.long_peri - el.long_node).to_radians();
        let mean_anomaly = (el.l - el.long_peri).to_radians();

        let ea = eccentric_anomaly(el.e, mean_anomaly);
        let (x, y) = orbital_plane_position(el.a, el.e, ea);

        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), el.long_node.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), el.i.to_radians())
            * Rotation3::from_axis_angle(&Vector3::z_axis(), arg_peri);

        Cartesian3::from_vector3(rotation * Vector3::new(x, y, 0.0))
    }
}

/// Rotate an ecliptic J2000 vector onto the J2000 mean equator
pub fn ecliptic_to_equatorial(v: Cartesian3) -> Cartesian3 {
    let rotation =
        Rotation3::from_axis_angle(&Vector3::x_axis(), OBLIQUITY_J2000_DEG.to_radians());
    Cartesian3::from_vector3(rotation * v.to_vector3())
}

/// Geocentric J2000 equatorial direction of a body given its elements
///
/// `t` is Julian centuries since J2000. The observer is treated as sitting at
/// the Earth-Moon barycenter; the resulting parallax is below an arcminute
/// for every planet.
pub fn geocentric_equatorial(elements: &OrbitalElements, t: f64) -> Equatorial {
    let planet = elements.heliocentric_ecliptic(t);
    let earth = Body::Earth.elements().heliocentric_ecliptic(t);
    Equatorial::from_cartesian(ecliptic_to_equatorial(planet - earth))
}

/// Geocentric distance in AU
pub fn geocentric_distance(elements: &OrbitalElements, t: f64) -> f64 {
    let earth = Body::Earth.elements().heliocentric_ecliptic(t);
    (elements.heliocentric_ecliptic(t) - earth).magnitude()
}

/// Heliocentric ecliptic longitude in degrees, in [0, 360)
pub fn heliocentric_longitude_deg(elements: &OrbitalElements, t: f64) -> f64 {
    let p = elements.heliocentric_ecliptic(t);
    (p.y.atan2(p.x) * RAD2DEG).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DAYS_PER_CENTURY, J2000};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn centuries(jd: f64) -> f64 {
        (jd - J2000) / DAYS_PER_CENTURY
    }

    #[test]
    fn test_builtin_elements_are_valid() {
        for body in Body::PLANETS.iter().chain(std::iter::once(&Body::Earth)) {
            assert!(body.elements().validate().is_ok(), "{}", body.name());
        }
    }

    #[rstest]
    #[case(Body::Mercury)]
    #[case(Body::Mars)]
    #[case(Body::Jupiter)]
    #[case(Body::Neptune)]
    fn test_heliocentric_radius_within_apsides(#[case] body: Body) {
        let el = body.elements();
        for step in 0..40 {
            let t = -1.0 + step as f64 * 0.037;
            let r = el.heliocentric_ecliptic(t).magnitude();
            let now = el.at(t);
            assert!(r >= now.a * (1.0 - now.e) - 1e-9);
            assert!(r <= now.a * (1.0 + now.e) + 1e-9);
        }
    }

    #[test]
    fn test_earth_heliocentric_longitude_near_equinox() {
        // At the March equinox the Sun is at longitude 0, so Earth sits near 180
        let t = centuries(2_451_623.815_97); // 2000-03-20 07:35 UT
        let lon = heliocentric_longitude_deg(&Body::Earth.elements(), t);
        assert_relative_eq!(lon, 180.0, epsilon = 0.1);
    }

    #[test]
    fn test_venus_matches_meeus_example() {
        // Meeus example 33.a: 1992-12-20 0h TD, RA 21h04m41.45s, Dec -18°53'16.8"
        // (apparent of date; the J2000 frame differs by ~0.1° of precession)
        let t = centuries(2_448_976.5);
        let venus = geocentric_equatorial(&Body::Venus.elements(), t);

        assert_relative_eq!(venus.ra_degrees(), 316.172_7, epsilon = 0.5);
        assert_relative_eq!(venus.dec_degrees(), -18.888, epsilon = 0.5);
        assert_relative_eq!(
            geocentric_distance(&Body::Venus.elements(), t),
            0.910_947,
            epsilon = 0.01
        );
    }

    #[test]
    fn test_planets_stay_near_ecliptic() {
        let t = centuries(2_460_000.5);
        for body in Body::PLANETS {
            let eq = geocentric_equatorial(&body.elements(), t);
            // Obliquity plus the largest inclination seen from Earth
            assert!(eq.dec_degrees().abs() < 35.0, "{} dec", body.name());
        }
    }

    #[test]
    fn test_ecliptic_pole_maps_to_equatorial() {
        let pole = ecliptic_to_equatorial(Cartesian3::new(0.0, 0.0, 1.0));
        let eq = Equatorial::from_cartesian(pole);
        assert_relative_eq!(eq.ra_degrees(), 270.0, epsilon = 1e-9);
        assert_relative_eq!(eq.dec_degrees(), 90.0 - OBLIQUITY_J2000_DEG, epsilon = 1e-9);
    }

    #[test]
    fn test_body_from_name() {
        assert_eq!(Body::from_name("jupiter"), Some(Body::Jupiter));
        assert_eq!(Body::from_name(" Mars "), Some(Body::Mars));
        assert_eq!(Body::from_name("Pluto"), None);
        assert_eq!(Body::from_name("Earth"), None);
    }

    #[test]
    fn test_validate_rejects_unbound_orbits() {
        let mut el = Body::Mars.elements();
        el.e = 1.2;
        assert!(el.validate().is_err());

        let mut el = Body::Mars.elements();
        el.a = -1.0;
        assert!(el.validate().is_err());

        let mut el = Body::Mars.elements();
        el.l_rate = f64::NAN;
        assert!(el.validate().is_err());
    }
}
