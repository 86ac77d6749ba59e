//! # Cartesian Coordinate Module
//!
//! A 3D Cartesian vector used as the intermediate format for every frame
//! conversion in the engine: equatorial directions, heliocentric planet
//! positions and observer-local (east, north, up) directions all pass through
//! it.
//!
//! ## Frame Conventions
//!
//! - **Equatorial**: X toward the vernal equinox (RA = 0°, Dec = 0°), Y toward
//!   RA = 90°, Z toward the north celestial pole.
//! - **Horizontal (ENU)**: X toward the east horizon, Y toward the north
//!   horizon, Z toward the zenith.
//!
//! Spherical angles are singular at the poles; Cartesian vectors are not,
//! which is why separations and pick queries are evaluated on them.
//!
//! ## Examples
//!
//! ```rust
//! use skyview::coordinates::cartesian::Cartesian3;
//!
//! let east = Cartesian3::from_horizontal(0.0, 90.0);
//! let zenith = Cartesian3::from_horizontal(90.0, 0.0);
//! assert!(east.dot(&zenith).abs() < 1e-15);
//! ```

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Three-dimensional Cartesian vector
///
/// Represents either a unit direction or a position (for planets, in AU).
/// The frame is implied by the producer; see the module documentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    /// Creates a new Cartesian vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Cartesian3 { x, y, z }
    }

    /// Creates a vector from spherical coordinates
    ///
    /// # Arguments
    ///
    /// * `lon` - Longitude-like angle (right ascension) in radians
    /// * `lat` - Latitude-like angle (declination) in radians
    /// * `distance` - Length of the resulting vector
    pub fn from_spherical(lon: f64, lat: f64, distance: f64) -> Self {
        let cos_lat = lat.cos();
        Cartesian3 {
            x: distance * cos_lat * lon.cos(),
            y: distance * cos_lat * lon.sin(),
            z: distance * lat.sin(),
        }
    }

    /// Creates an (east, north, up) unit vector from altitude and azimuth
    ///
    /// Azimuth is measured from north through east, both angles in degrees.
    ///
    /// ```rust
    /// use skyview::coordinates::cartesian::Cartesian3;
    ///
    /// let north = Cartesian3::from_horizontal(0.0, 0.0);
    /// assert!((north.y - 1.0).abs() < 1e-15);
    /// ```
    pub fn from_horizontal(altitude_deg: f64, azimuth_deg: f64) -> Self {
        let alt = altitude_deg.to_radians();
        let az = azimuth_deg.to_radians();
        let cos_alt = alt.cos();
        Cartesian3 {
            x: cos_alt * az.sin(),
            y: cos_alt * az.cos(),
            z: alt.sin(),
        }
    }

    /// Converts to spherical coordinates
    ///
    /// Returns `(lon, lat, distance)` with `lon` in [0, 2π) and `lat` in
    /// [-π/2, π/2], both in radians. Along the Z axis the longitude is
    /// undefined and reported as 0.
    pub fn to_spherical(&self) -> (f64, f64, f64) {
        let distance = self.magnitude();

        if distance == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let r_xy = (self.x * self.x + self.y * self.y).sqrt();
        let lat = self.z.atan2(r_xy);
        let lon = if r_xy == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x).rem_euclid(2.0 * PI)
        };

        (lon, lat, distance)
    }

    /// Euclidean length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector
    pub fn normalize(&self) -> Option<Cartesian3> {
        let mag = self.magnitude();
        if mag == 0.0 {
            None
        } else {
            Some(*self / mag)
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Cartesian3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Angle between two vectors in radians, in [0, π]
    ///
    /// Uses `atan2(|a × b|, a · b)`, which keeps full precision for both tiny
    /// and nearly antipodal separations where `acos` of the dot product loses it.
    ///
    /// ```rust
    /// use skyview::coordinates::cartesian::Cartesian3;
    /// use std::f64::consts::PI;
    ///
    /// let x_axis = Cartesian3::new(1.0, 0.0, 0.0);
    /// let y_axis = Cartesian3::new(0.0, 1.0, 0.0);
    /// assert!((x_axis.angular_distance(&y_axis) - PI / 2.0).abs() < 1e-15);
    /// ```
    pub fn angular_distance(&self, other: &Cartesian3) -> f64 {
        let cross = self.cross(other).magnitude();
        let dot = self.dot(other);

        if cross == 0.0 && dot == 0.0 {
            // One of the vectors is zero
            return 0.0;
        }

        cross.atan2(dot)
    }

    /// Converts to a nalgebra Vector3 for matrix operations
    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Creates from a nalgebra Vector3
    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        Cartesian3 {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

impl std::ops::Sub for Cartesian3 {
    type Output = Cartesian3;

    fn sub(self, other: Cartesian3) -> Cartesian3 {
        Cartesian3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn mul(self, scalar: f64) -> Cartesian3 {
        Cartesian3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Div<f64> for Cartesian3 {
    type Output = Cartesian3;

    fn div(self, scalar: f64) -> Cartesian3 {
        Cartesian3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}
