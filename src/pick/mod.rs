//! Nearest-object picking
//!
//! A pick query is a horizontal direction (where the pointer ray meets the
//! sky) plus a maximum angular distance. The answer is the closest direction
//! within range, ties going to the object that comes first in the input.
//!
//! [`nearest`] is a straight scan. [`PickIndex`] buckets directions on a
//! fixed altitude/azimuth grid and only scans the cells a search cap can
//! touch; it returns exactly what the scan returns.

use log::trace;
use std::fmt;

use crate::catalogs::{Catalog, CelestialObject, ObjectKind};
use crate::config::DEFAULT_PICK_CELL_DEG;
use crate::coordinates::{normalize_degrees, Cartesian3, Horizontal, SphericalFrame};
use crate::positions::Direction;
use crate::{Result, SkyviewError};

/// Smallest accepted grid cell in degrees
const MIN_CELL_DEG: f64 = 0.5;
/// Slack added to cap bounds so directions on the boundary stay candidates
const CAP_MARGIN_DEG: f64 = 1e-6;

/// Placeholder line shown when nothing is selected
pub const NO_SELECTION: &str = "Select an object...";

/// Result of a pick query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Position of the hit in the searched direction list
    pub index: usize,
    pub object_id: u64,
    /// Great-circle distance from the query in degrees
    pub separation_deg: f64,
}

/// Keep `best` unless the candidate is strictly closer, or equally close
/// and earlier in the input
fn closer(best: &Option<PickHit>, index: usize, separation_deg: f64) -> bool {
    match best {
        None => true,
        Some(hit) => {
            separation_deg < hit.separation_deg
                || (separation_deg == hit.separation_deg && index < hit.index)
        }
    }
}

fn separation_deg(query: &Cartesian3, target: &Cartesian3) -> f64 {
    query.angular_distance(target).to_degrees()
}

/// Closest direction to `query` within `max_angular_distance_deg`
///
/// Returns `None` when no direction is in range, including for an empty
/// list or a negative/NaN range.
pub fn nearest(
    directions: &[Direction],
    query: &Horizontal,
    max_angular_distance_deg: f64,
) -> Option<PickHit> {
    let q = query.to_cartesian();
    let mut best = None;

    for (index, direction) in directions.iter().enumerate() {
        let sep = separation_deg(&q, &direction.to_unit_vector());
        if sep <= max_angular_distance_deg && closer(&best, index, sep) {
            best = Some(PickHit {
                index,
                object_id: direction.object_id,
                separation_deg: sep,
            });
        }
    }

    best
}

/// Catalog object nearest to the query
///
/// # Errors
/// `NotFound` when nothing lies within range, or the hit's id is not in the
/// catalog.
pub fn pick_object<'a>(
    catalog: &'a Catalog,
    directions: &[Direction],
    query: &Horizontal,
    max_angular_distance_deg: f64,
) -> Result<&'a CelestialObject> {
    let hit = nearest(directions, query, max_angular_distance_deg).ok_or_else(|| {
        SkyviewError::NotFound(format!(
            "no object within {}° of alt {:.3}° az {:.3}°",
            max_angular_distance_deg, query.altitude_deg, query.azimuth_deg
        ))
    })?;
    trace!("Picked object {} at {:.4}°", hit.object_id, hit.separation_deg);
    catalog.get(hit.object_id)
}

/// Altitude/azimuth bucket grid over one set of directions
#[derive(Debug, Clone)]
pub struct PickIndex {
    directions: Vec<Direction>,
    vectors: Vec<Cartesian3>,
    cell_deg: f64,
    rows: usize,
    cols: usize,
    /// Direction indices per cell, row-major, ascending within each cell
    cells: Vec<Vec<usize>>,
}

impl PickIndex {
    /// Bucket `directions` into cells of `cell_deg` degrees
    ///
    /// Non-finite or non-positive cell sizes fall back to the default; sizes
    /// are clamped to [0.5, 180].
    pub fn build(directions: &[Direction], cell_deg: f64) -> Self {
        let cell_deg = if cell_deg.is_finite() && cell_deg > 0.0 {
            cell_deg.clamp(MIN_CELL_DEG, 180.0)
        } else {
            DEFAULT_PICK_CELL_DEG
        };
        let rows = (180.0 / cell_deg).ceil() as usize;
        let cols = (360.0 / cell_deg).ceil() as usize;

        let mut index = Self {
            directions: directions.to_vec(),
            vectors: directions.iter().map(Direction::to_unit_vector).collect(),
            cell_deg,
            rows,
            cols,
            cells: vec![Vec::new(); rows * cols],
        };

        for (i, d) in directions.iter().enumerate() {
            let cell = index.row_of(d.altitude_deg) * cols + index.col_of(d.azimuth_deg);
            index.cells[cell].push(i);
        }

        trace!(
            "Built pick index: {} directions in {}x{} cells of {}°",
            directions.len(),
            rows,
            cols,
            cell_deg
        );
        index
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn cell_deg(&self) -> f64 {
        self.cell_deg
    }

    fn row_of(&self, altitude_deg: f64) -> usize {
        let row = ((altitude_deg + 90.0) / self.cell_deg).floor();
        (row.max(0.0) as usize).min(self.rows - 1)
    }

    fn col_of(&self, azimuth_deg: f64) -> usize {
        let col = (normalize_degrees(azimuth_deg) / self.cell_deg).floor();
        (col.max(0.0) as usize).min(self.cols - 1)
    }

    /// Same answer as [`nearest`] over the indexed directions
    pub fn nearest(&self, query: &Horizontal, max_angular_distance_deg: f64) -> Option<PickHit> {
        if self.is_empty() || max_angular_distance_deg.is_nan() || max_angular_distance_deg < 0.0 {
            return None;
        }

        let radius = max_angular_distance_deg + CAP_MARGIN_DEG;
        let alt_lo = query.altitude_deg - radius;
        let alt_hi = query.altitude_deg + radius;

        // Caps reaching a pole span every azimuth
        if radius >= 90.0 || alt_hi >= 90.0 || alt_lo <= -90.0 {
            return nearest(&self.directions, query, max_angular_distance_deg);
        }

        // Azimuth half-width of a cap that stays clear of the poles
        let ratio = radius.to_radians().sin() / query.altitude_deg.to_radians().cos();
        let half_width = if ratio >= 1.0 {
            180.0
        } else {
            ratio.asin().to_degrees() + CAP_MARGIN_DEG
        };

        let cols: Vec<usize> = if 2.0 * half_width >= 360.0 - self.cell_deg {
            (0..self.cols).collect()
        } else {
            let start = self.col_of(query.azimuth_deg - half_width);
            let end = self.col_of(query.azimuth_deg + half_width);
            let mut cols = vec![start];
            let mut col = start;
            while col != end {
                col = (col + 1) % self.cols;
                cols.push(col);
            }
            cols
        };

        let q = query.to_cartesian();
        let mut best = None;
        for row in self.row_of(alt_lo)..=self.row_of(alt_hi) {
            for &col in &cols {
                for &i in &self.cells[row * self.cols + col] {
                    let sep = separation_deg(&q, &self.vectors[i]);
                    if sep <= max_angular_distance_deg && closer(&best, i, sep) {
                        best = Some(PickHit {
                            index: i,
                            object_id: self.directions[i].object_id,
                            separation_deg: sep,
                        });
                    }
                }
            }
        }

        best
    }
}

/// What the info panel shows for a selected object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: ObjectKind,
    pub magnitude: f64,
}

impl From<&CelestialObject> for ObjectInfo {
    fn from(object: &CelestialObject) -> Self {
        Self {
            name: object.name.clone(),
            kind: object.kind,
            magnitude: object.magnitude,
        }
    }
}

/// Three-line object info panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoPanel {
    selection: Option<ObjectInfo>,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, object: &CelestialObject) {
        self.selection = Some(ObjectInfo::from(object));
    }

    /// Show the outcome of a pick, clearing the panel on a miss
    pub fn show_pick(&mut self, picked: Result<&CelestialObject>) {
        match picked {
            Ok(object) => self.select(object),
            Err(_) => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&ObjectInfo> {
        self.selection.as_ref()
    }

    /// Name, type and magnitude lines; the placeholder and two blanks when
    /// nothing is selected
    pub fn lines(&self) -> [String; 3] {
        match &self.selection {
            Some(info) => [
                format!("Name: {}", info.name),
                format!("Type: {}", info.kind),
                format!("Magnitude: {:.2}", info.magnitude),
            ],
            None => [NO_SELECTION.to_string(), String::new(), String::new()],
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selection {
            Some(_) => write!(f, "{}", self.lines().join("\n")),
            None => write!(f, "{}", NO_SELECTION),
        }
    }
}
