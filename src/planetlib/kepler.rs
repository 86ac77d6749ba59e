//! Kepler's equation for elliptic orbits

use std::f64::consts::PI;

const MAX_ITERATIONS: usize = 30;
const TOLERANCE: f64 = 1e-14;

/// Normalize angle to [-π, π]
pub(crate) fn normpi(m: f64) -> f64 {
    let mut x = m % (2.0 * PI);
    if x > PI {
        x -= 2.0 * PI;
    }
    if x < -PI {
        x += 2.0 * PI;
    }
    x
}

/// Solve Kepler's equation `E - e sin E = M` for the eccentric anomaly
///
/// Newton iteration for elliptic orbits (`0 <= e < 1`), angles in radians.
/// The mean anomaly is reduced to [-π, π] first, so the result lies in the
/// same range.
pub fn eccentric_anomaly(e: f64, m: f64) -> f64 {
    let m = normpi(m);
    // Starter that keeps the iteration monotone for high eccentricities
    let mut ea = if e > 0.8 { PI.copysign(m) } else { m + e * m.sin() };

    for _ in 0..MAX_ITERATIONS {
        let f = ea - e * ea.sin() - m;
        let d_ea = f / (1.0 - e * ea.cos());
        ea -= d_ea;
        if d_ea.abs() < TOLERANCE {
            break;
        }
    }

    ea
}

/// Position in the orbital plane `(x, y)` for a given eccentric anomaly
///
/// The x axis points to perihelion; units follow the semi-major axis.
pub fn orbital_plane_position(a: f64, e: f64, ea: f64) -> (f64, f64) {
    (a * (ea.cos() - e), a * (1.0 - e * e).sqrt() * ea.sin())
}
