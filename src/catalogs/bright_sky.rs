//! Built-in catalog of the brightest naked-eye objects
//!
//! Stars carry their Hipparcos numbers as ids, planets their NAIF ids, and
//! Messier objects `200_000 + M`. Positions are J2000 (ICRS), proper motions in
//! mas/yr from Hipparcos.

use lazy_static::lazy_static;
use log::error;

use super::{Catalog, CatalogEntry, ObjectKind};
use crate::planetlib::Body;

/// Catalog id offset for Messier objects
pub const MESSIER_ID_OFFSET: u64 = 200_000;

lazy_static! {
    static ref BRIGHT_SKY: Catalog = match Catalog::from_entries(bright_sky_entries(), "Bright sky") {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Built-in bright sky catalog is malformed: {}", e);
            debug_assert!(false, "built-in bright sky catalog is malformed: {}", e);
            Catalog::default()
        }
    };
}

/// Shared built-in catalog of bright stars, the major planets and a few
/// showpiece deep-sky objects
pub fn bright_sky() -> &'static Catalog {
    &BRIGHT_SKY
}

fn star(hip: u64, name: &str, mag: f64, ra: f64, dec: f64, pm: Option<(f64, f64)>) -> CatalogEntry {
    let entry = CatalogEntry::fixed(hip, name, ObjectKind::Star, mag, ra, dec);
    match pm {
        Some((pm_ra, pm_dec)) => entry.with_proper_motion(pm_ra, pm_dec),
        None => entry,
    }
}

fn messier(number: u64, name: &str, mag: f64, ra: f64, dec: f64) -> CatalogEntry {
    CatalogEntry::fixed(MESSIER_ID_OFFSET + number, name, ObjectKind::DeepSky, mag, ra, dec)
}

fn bright_sky_entries() -> Vec<CatalogEntry> {
    let mut entries = vec![
        star(32349, "Sirius", -1.46, 101.287_155, -16.716_116, Some((-546.01, -1223.07))),
        star(30438, "Canopus", -0.74, 95.987_958, -52.695_661, Some((19.93, 23.24))),
        star(69673, "Arcturus", -0.05, 213.915_300, 19.182_409, Some((-1093.39, -2000.06))),
        star(71683, "Rigil Kentaurus", -0.01, 219.899_079, -60.835_151, Some((-3679.25, 473.67))),
        star(91262, "Vega", 0.03, 279.234_735, 38.783_689, Some((200.94, 286.23))),
        star(24608, "Capella", 0.08, 79.172_328, 45.997_991, Some((75.52, -427.11))),
        star(24436, "Rigel", 0.13, 78.634_467, -8.201_638, Some((1.87, -0.56))),
        star(37279, "Procyon", 0.34, 114.825_493, 5.224_993, Some((-716.57, -1034.58))),
        star(7588, "Achernar", 0.46, 24.428_523, -57.236_753, Some((88.02, -40.08))),
        star(27989, "Betelgeuse", 0.50, 88.792_939, 7.407_064, Some((27.33, 10.86))),
        star(68702, "Hadar", 0.61, 210.955_856, -60.373_035, None),
        star(97649, "Altair", 0.77, 297.695_827, 8.868_321, Some((536.82, 385.54))),
        star(60718, "Acrux", 0.77, 186.649_563, -63.099_093, None),
        star(21421, "Aldebaran", 0.86, 68.980_163, 16.509_302, Some((62.78, -189.36))),
        star(80763, "Antares", 0.96, 247.351_915, -26.432_003, None),
        star(65474, "Spica", 0.97, 201.298_247, -11.161_319, None),
        star(37826, "Pollux", 1.14, 116.328_958, 28.026_199, Some((-625.69, -45.95))),
        star(113368, "Fomalhaut", 1.16, 344.412_693, -29.622_237, Some((329.22, -164.22))),
        star(102098, "Deneb", 1.25, 310.357_980, 45.280_339, None),
        star(49669, "Regulus", 1.40, 152.092_962, 11.967_209, Some((-249.40, 4.91))),
        star(11767, "Polaris", 1.97, 37.954_561, 89.264_109, Some((44.22, -11.74))),
        star(104382, "Sigma Octantis", 5.45, 317.195_164, -88.956_503, None),
    ];

    let planet_magnitudes = [0.23, -4.14, 0.71, -2.20, 0.46, 5.68, 7.78];
    for (body, mag) in Body::PLANETS.iter().zip(planet_magnitudes) {
        entries.push(CatalogEntry::planet(
            planet_naif_id(*body),
            body.name(),
            mag,
            body.elements(),
        ));
    }

    entries.extend([
        messier(31, "Andromeda Galaxy", 3.44, 10.684_708, 41.268_750),
        messier(42, "Orion Nebula", 4.0, 83.822_083, -5.391_111),
        messier(45, "Pleiades", 1.6, 56.750_000, 24.116_667),
        messier(13, "Hercules Cluster", 5.8, 250.423_475, 36.461_319),
        messier(44, "Beehive Cluster", 3.7, 130.100_000, 19.666_667),
    ]);

    entries
}

/// NAIF id of a planet barycenter-centered body (199 for Mercury, ...)
fn planet_naif_id(body: Body) -> u64 {
    match body {
        Body::Mercury => 199,
        Body::Venus => 299,
        Body::Earth => 399,
        Body::Mars => 499,
        Body::Jupiter => 599,
        Body::Saturn => 699,
        Body::Uranus => 799,
        Body::Neptune => 899,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_sky_entries_are_valid() {
        let entries = bright_sky_entries();
        let count = entries.len();
        let catalog = Catalog::from_entries(entries, "test").unwrap();

        assert_eq!(catalog.len(), count);
        assert_eq!(bright_sky().len(), count);
    }

    #[test]
    fn test_bright_sky_contents() {
        let catalog = bright_sky();

        assert_eq!(catalog.of_kind(ObjectKind::Planet).len(), 7);
        assert_eq!(catalog.get(32349).unwrap().name, "Sirius");
        assert_eq!(catalog.get(499).unwrap().name, "Mars");
        assert_eq!(
            catalog.get(MESSIER_ID_OFFSET + 42).unwrap().kind,
            ObjectKind::DeepSky
        );
        // Sirius is the first and brightest star
        assert_eq!(catalog.objects().next().map(|o| o.id), Some(32349));
    }
}
