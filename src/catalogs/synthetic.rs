//! Synthetic star catalog generator
//!
//! Seeded random star fields for exercising the engine and the pick index on
//! catalogs much larger than the built-in one. Positions are uniform over the
//! sphere; magnitudes follow the Pogson ratio (about 2.5x more stars per
//! magnitude step).

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Catalog, CatalogEntry, ObjectKind};
use crate::Result;

/// Brightest generated magnitude
const MIN_MAGNITUDE: f64 = 1.0;
/// Faintest generated magnitude
const MAX_MAGNITUDE: f64 = 8.0;
/// Stars-per-magnitude growth factor (100^0.4)
const LOG_BASE: f64 = 2.5;

/// Build a catalog of `count` random stars, reproducible for a given seed
///
/// Ids run from 1 to `count` in insertion order.
pub fn random_catalog(seed: u64, count: usize) -> Result<Catalog> {
    let mut rng = StdRng::seed_from_u64(seed);

    let ra_dist = Uniform::from(0.0..360.0);
    // Uniform in sin(dec) gives uniform density on the sphere
    let z_dist = Uniform::new_inclusive(-1.0, 1.0);
    let unit = Uniform::from(0.0..1.0);

    let exp_range = LOG_BASE.powf(MAX_MAGNITUDE - MIN_MAGNITUDE) - 1.0;

    let entries = (1..=count as u64)
        .map(|id| {
            let ra: f64 = ra_dist.sample(&mut rng);
            let z: f64 = z_dist.sample(&mut rng);
            let dec = z.asin().to_degrees().clamp(-90.0, 90.0);

            // Transform uniform to the exponential magnitude distribution
            let t: f64 = unit.sample(&mut rng) * exp_range + 1.0;
            let magnitude =
                MIN_MAGNITUDE + t.log(LOG_BASE).clamp(0.0, MAX_MAGNITUDE - MIN_MAGNITUDE);

            CatalogEntry::fixed(id, &format!("SYN {}", id), ObjectKind::Star, magnitude, ra, dec)
        })
        .collect();

    Catalog::from_entries(entries, &format!("Synthetic catalog (seed {})", seed))
}
