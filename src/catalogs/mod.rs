//! Catalog store
//!
//! An immutable, insertion-ordered collection of [`CelestialObject`]s with
//! lookup by catalog id. Catalogs are loaded from JSON (one array of entries)
//! or built from entries in code, and validated as a whole: a single
//! malformed entry fails the load and nothing partial is returned.
//!
//! After loading, a `Catalog` is never mutated, so any number of threads can
//! read it concurrently without locking.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::coordinates::Equatorial;
use crate::planetlib::{self, Body, OrbitalElements};
use crate::{Result, SkyviewError};

mod bright_sky;
mod object;
pub mod synthetic;

pub use bright_sky::{bright_sky, MESSIER_ID_OFFSET};
pub use object::{CelestialObject, ObjectKind, ProperMotion};

/// Elements closer than this to the Earth-Moon barycenter have no usable
/// geocentric direction
const MIN_GEOCENTRIC_DISTANCE_AU: f64 = 1e-6;

/// A catalog entry as it appears in catalog files
///
/// Stars and deep-sky objects need `ra_deg`/`dec_deg` (J2000). Planets take
/// `elements`, or fixed `ra_deg`/`dec_deg`, or neither when the name matches
/// one of the built-in major planets. Without given coordinates a planet's
/// reference position is the J2000 position computed from its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub kind: ObjectKind,
    pub magnitude: f64,
    #[serde(default)]
    pub ra_deg: Option<f64>,
    #[serde(default)]
    pub dec_deg: Option<f64>,
    #[serde(default)]
    pub proper_motion: Option<ProperMotion>,
    #[serde(default)]
    pub elements: Option<OrbitalElements>,
}

impl CatalogEntry {
    /// Create a star or deep-sky entry at J2000 RA/Dec in degrees
    pub fn fixed(id: u64, name: &str, kind: ObjectKind, magnitude: f64, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            magnitude,
            ra_deg: Some(ra_deg),
            dec_deg: Some(dec_deg),
            proper_motion: None,
            elements: None,
        }
    }

    /// Create a planet entry with the given elements
    pub fn planet(id: u64, name: &str, magnitude: f64, elements: OrbitalElements) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: ObjectKind::Planet,
            magnitude,
            ra_deg: None,
            dec_deg: None,
            proper_motion: None,
            elements: Some(elements),
        }
    }

    /// Attach a proper motion in mas/yr
    pub fn with_proper_motion(mut self, pm_ra_mas_yr: f64, pm_dec_mas_yr: f64) -> Self {
        self.proper_motion = Some(ProperMotion {
            pm_ra_mas_yr,
            pm_dec_mas_yr,
        });
        self
    }

    /// Validate the entry and turn it into a catalog object
    fn into_object(self, index: usize) -> Result<CelestialObject> {
        let fail = |reason: String| SkyviewError::CatalogParse { index, reason };
        let label = format!("{:?} (id {})", self.name, self.id);

        if self.name.trim().is_empty() {
            return Err(fail(format!("id {} has an empty name", self.id)));
        }
        if !self.magnitude.is_finite() {
            return Err(fail(format!("{} has non-finite magnitude", label)));
        }

        let has_coordinates = self.ra_deg.is_some() && self.dec_deg.is_some();
        let elements = match (self.kind, self.elements) {
            (ObjectKind::Planet, Some(elements)) => Some(elements),
            // Fixed reference coordinates are used as given
            (ObjectKind::Planet, None) if has_coordinates => None,
            (ObjectKind::Planet, None) => Some(
                Body::from_name(&self.name)
                    .map(|body| body.elements())
                    .ok_or_else(|| {
                        fail(format!(
                            "planet {} has neither orbital elements nor coordinates",
                            label
                        ))
                    })?,
            ),
            (_, Some(_)) => {
                return Err(fail(format!(
                    "{} is a {} but carries orbital elements",
                    label, self.kind
                )))
            }
            (_, None) => None,
        };
        if let Some(elements) = &elements {
            elements
                .validate()
                .map_err(|reason| fail(format!("{}: {}", label, reason)))?;
            let distance = planetlib::geocentric_distance(elements, 0.0);
            if !distance.is_finite() || distance < MIN_GEOCENTRIC_DISTANCE_AU {
                return Err(fail(format!(
                    "{} has no direction as seen from Earth ({} AU away)",
                    label, distance
                )));
            }
        }

        let position = match (self.ra_deg, self.dec_deg, &elements) {
            (Some(ra), Some(dec), _) => {
                if !ra.is_finite() {
                    return Err(fail(format!("{} has non-finite right ascension", label)));
                }
                if !dec.is_finite() || !(-90.0..=90.0).contains(&dec) {
                    return Err(fail(format!(
                        "{} has declination {} outside [-90, 90]",
                        label, dec
                    )));
                }
                Equatorial::from_degrees(ra, dec)
            }
            (None, None, Some(elements)) => planetlib::geocentric_equatorial(elements, 0.0),
            _ => {
                return Err(fail(format!(
                    "{} needs both ra_deg and dec_deg",
                    label
                )))
            }
        };

        if let Some(pm) = &self.proper_motion {
            if !pm.pm_ra_mas_yr.is_finite() || !pm.pm_dec_mas_yr.is_finite() {
                return Err(fail(format!("{} has non-finite proper motion", label)));
            }
        }

        Ok(CelestialObject {
            id: self.id,
            name: self.name,
            kind: self.kind,
            magnitude: self.magnitude,
            position,
            proper_motion: self.proper_motion,
            elements,
        })
    }
}

/// Immutable collection of celestial objects
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Objects in insertion order
    objects: Vec<CelestialObject>,
    /// Catalog id to position in `objects`
    index: HashMap<u64, usize>,
    description: String,
}

impl Catalog {
    /// Build a catalog from entries, failing on the first invalid one
    pub fn from_entries(entries: Vec<CatalogEntry>, description: &str) -> Result<Self> {
        let mut objects = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.into_iter().enumerate() {
            let object = entry.into_object(i)?;
            if index.insert(object.id, i).is_some() {
                return Err(SkyviewError::CatalogParse {
                    index: i,
                    reason: format!("duplicate id {}", object.id),
                });
            }
            objects.push(object);
        }

        debug!("Loaded catalog {:?} with {} objects", description, objects.len());

        Ok(Self {
            objects,
            index,
            description: description.to_string(),
        })
    }

    /// Load a catalog from a JSON array of entries
    ///
    /// Malformed JSON is reported as [`SkyviewError::Json`]; an element that is
    /// not a valid entry is reported as [`SkyviewError::CatalogParse`] with its
    /// position in the array.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_reader(reader)?;

        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<CatalogEntry>(value).map_err(|e| {
                    SkyviewError::CatalogParse {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_entries(entries, "JSON catalog")
    }

    /// Load a catalog from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::load(json.as_bytes())
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut catalog = Self::load(BufReader::new(file))?;
        catalog.description = path.as_ref().display().to_string();
        Ok(catalog)
    }

    /// Get an object by catalog id
    pub fn get(&self, id: u64) -> Result<&CelestialObject> {
        self.index
            .get(&id)
            .map(|&i| &self.objects[i])
            .ok_or_else(|| SkyviewError::NotFound(format!("no object with id {}", id)))
    }

    /// Iterate over all objects in insertion order
    pub fn objects(&self) -> impl ExactSizeIterator<Item = &CelestialObject> + '_ {
        self.objects.iter()
    }

    /// All objects as a slice, in insertion order
    pub fn as_slice(&self) -> &[CelestialObject] {
        &self.objects
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Human-readable description (source file or catalog name)
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Objects brighter than or equal to a magnitude, in insertion order
    pub fn brighter_than(&self, magnitude: f64) -> Vec<&CelestialObject> {
        self.objects
            .iter()
            .filter(|object| object.magnitude <= magnitude)
            .collect()
    }

    /// Objects of one kind, in insertion order
    pub fn of_kind(&self, kind: ObjectKind) -> Vec<&CelestialObject> {
        self.objects.iter().filter(|object| object.kind == kind).collect()
    }

    /// First object whose name matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&CelestialObject> {
        let name = name.trim();
        self.objects
            .iter()
            .find(|object| object.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const SMALL_CATALOG: &str = r#"[
        {"id": 32349, "name": "Sirius", "kind": "star", "magnitude": -1.46,
         "ra_deg": 101.287155, "dec_deg": -16.716116,
         "proper_motion": {"pm_ra_mas_yr": -546.01, "pm_dec_mas_yr": -1223.07}},
        {"id": 91262, "name": "Vega", "kind": "star", "magnitude": 0.03,
         "ra_deg": 279.234735, "dec_deg": 38.783689},
        {"id": 1004, "name": "Mars", "kind": "planet", "magnitude": 0.7},
        {"id": 2031, "name": "Andromeda Galaxy", "kind": "deep_sky", "magnitude": 3.44,
         "ra_deg": 10.684708, "dec_deg": 41.26875}
    ]"#;

    fn parse_error_index(result: Result<Catalog>) -> usize {
        match result {
            Err(SkyviewError::CatalogParse { index, .. }) => index,
            other => panic!("expected CatalogParse, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_load_preserves_order_and_ids() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();

        let ids: Vec<u64> = catalog.objects().map(|o| o.id).collect();
        assert_eq!(ids, vec![32349, 91262, 1004, 2031]);

        // The iterator is restartable
        assert_eq!(catalog.objects().count(), 4);
        assert_eq!(catalog.objects().len(), catalog.len());

        let vega = catalog.get(91262).unwrap();
        assert_eq!(vega.name, "Vega");
        assert_relative_eq!(vega.dec_deg(), 38.783689, epsilon = 1e-9);
    }

    #[test]
    fn test_planet_without_elements_uses_builtin() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();
        let mars = catalog.get(1004).unwrap();

        assert_eq!(mars.kind, ObjectKind::Planet);
        assert_eq!(mars.elements, Some(Body::Mars.elements()));
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();
        assert!(matches!(catalog.get(7), Err(SkyviewError::NotFound(_))));
    }

    #[test]
    fn test_declination_out_of_range_fails_load() {
        let json = r#"[
            {"id": 1, "name": "Fine", "kind": "star", "magnitude": 1.0, "ra_deg": 0.0, "dec_deg": 0.0},
            {"id": 2, "name": "Broken", "kind": "star", "magnitude": 1.0, "ra_deg": 0.0, "dec_deg": 91.0}
        ]"#;
        assert_eq!(parse_error_index(Catalog::from_json_str(json)), 1);
    }

    #[test]
    fn test_non_finite_magnitude_fails_load() {
        let entries = vec![CatalogEntry::fixed(1, "Odd", ObjectKind::Star, f64::NAN, 10.0, 10.0)];
        assert_eq!(parse_error_index(Catalog::from_entries(entries, "test")), 0);
    }

    #[test]
    fn test_duplicate_id_fails_load() {
        let entries = vec![
            CatalogEntry::fixed(5, "A", ObjectKind::Star, 1.0, 10.0, 10.0),
            CatalogEntry::fixed(6, "B", ObjectKind::Star, 1.0, 20.0, 10.0),
            CatalogEntry::fixed(5, "C", ObjectKind::Star, 1.0, 30.0, 10.0),
        ];
        assert_eq!(parse_error_index(Catalog::from_entries(entries, "test")), 2);
    }

    #[test]
    fn test_unknown_planet_without_elements_fails_load() {
        let json = r#"[{"id": 9, "name": "Vulcan", "kind": "planet", "magnitude": 1.0}]"#;
        assert_eq!(parse_error_index(Catalog::from_json_str(json)), 0);
    }

    #[test]
    fn test_planet_with_fixed_coordinates_keeps_them() {
        let json = r#"[
            {"id": 9, "name": "Planet X", "kind": "planet", "magnitude": 5.0, "ra_deg": 40.0, "dec_deg": 10.0},
            {"id": 4, "name": "Mars", "kind": "planet", "magnitude": 0.7, "ra_deg": 40.0, "dec_deg": 10.0}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let time = crate::time::compute_time_scales_str("2031-06-01T00:00:00Z").unwrap();

        for id in [9, 4] {
            let planet = catalog.get(id).unwrap();
            assert_eq!(planet.kind, ObjectKind::Planet);
            assert!(planet.elements.is_none());

            let position = planet.position_at(&time, true);
            assert_relative_eq!(position.ra_degrees(), 40.0, epsilon = 1e-9);
            assert_relative_eq!(position.dec_degrees(), 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_earth_as_planet_fails_load() {
        let json = r#"[{"id": 3, "name": "Earth", "kind": "planet", "magnitude": 0.0}]"#;
        assert_eq!(parse_error_index(Catalog::from_json_str(json)), 0);

        let entries = vec![
            CatalogEntry::planet(4, "Mars", 0.7, Body::Mars.elements()),
            CatalogEntry::planet(3, "Home", 0.0, Body::Earth.elements()),
        ];
        assert_eq!(parse_error_index(Catalog::from_entries(entries, "test")), 1);
    }

    #[test]
    fn test_star_with_elements_fails_load() {
        let mut entry = CatalogEntry::fixed(3, "Odd", ObjectKind::Star, 1.0, 10.0, 10.0);
        entry.elements = Some(Body::Mars.elements());
        assert_eq!(parse_error_index(Catalog::from_entries(vec![entry], "test")), 0);
    }

    #[test]
    fn test_missing_declination_fails_load() {
        let json = r#"[{"id": 1, "name": "Half", "kind": "star", "magnitude": 1.0, "ra_deg": 12.0}]"#;
        assert_eq!(parse_error_index(Catalog::from_json_str(json)), 0);
    }

    #[test]
    fn test_wrong_field_type_reports_entry_index() {
        let json = r#"[
            {"id": 1, "name": "Fine", "kind": "star", "magnitude": 1.0, "ra_deg": 0.0, "dec_deg": 0.0},
            {"id": 2, "name": "Bad", "kind": "comet", "magnitude": 1.0, "ra_deg": 0.0, "dec_deg": 0.0}
        ]"#;
        assert_eq!(parse_error_index(Catalog::from_json_str(json)), 1);
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(
            Catalog::from_json_str("[{\"id\": 1,"),
            Err(SkyviewError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(SMALL_CATALOG.as_bytes()).unwrap();

        let catalog = Catalog::from_file(&path).unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.description().ends_with("catalog.json"));

        assert!(matches!(
            Catalog::from_file(dir.path().join("missing.json")),
            Err(SkyviewError::Io(_))
        ));
    }

    #[test]
    fn test_filters_and_name_lookup() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();

        let bright: Vec<&str> = catalog
            .brighter_than(0.5)
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(bright, vec!["Sirius", "Vega"]);

        assert_eq!(catalog.of_kind(ObjectKind::DeepSky).len(), 1);
        assert_eq!(catalog.find_by_name("  sirius").map(|o| o.id), Some(32349));
        assert!(catalog.find_by_name("Betelgeuse").is_none());
    }

    #[test]
    fn test_catalog_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
