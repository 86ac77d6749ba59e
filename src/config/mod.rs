//! Engine configuration
//!
//! A small serde-backed settings struct. Every field has a default, so a
//! config file only needs the keys it changes:
//!
//! ```json
//! { "apply_proper_motion": false, "min_altitude_deg": 0.0, "pick_radius_deg": 1.5 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{Result, SkyviewError};

/// Default pick search radius in degrees
pub const DEFAULT_PICK_RADIUS_DEG: f64 = 2.0;
/// Default pick index cell size in degrees
pub const DEFAULT_PICK_CELL_DEG: f64 = 10.0;

/// Settings for direction computation and picking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Move stars by their proper motion from J2000 to the tick's instant
    pub apply_proper_motion: bool,
    /// Drop objects below this altitude from the output (order is preserved)
    pub min_altitude_deg: Option<f64>,
    /// Cell size of the alt/az pick grid
    pub pick_cell_deg: f64,
    /// Maximum angular distance for a pick to select an object
    pub pick_radius_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            apply_proper_motion: true,
            min_altitude_deg: None,
            pick_cell_deg: DEFAULT_PICK_CELL_DEG,
            pick_radius_deg: DEFAULT_PICK_RADIUS_DEG,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Only return objects at or above `altitude_deg`
    pub fn with_min_altitude(mut self, altitude_deg: f64) -> Self {
        self.min_altitude_deg = Some(altitude_deg);
        self
    }

    /// Enable or disable proper motion
    pub fn with_proper_motion(mut self, apply: bool) -> Self {
        self.apply_proper_motion = apply;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if let Some(min_alt) = self.min_altitude_deg {
            if !min_alt.is_finite() || !(-90.0..=90.0).contains(&min_alt) {
                return Err(SkyviewError::InvalidConfig(format!(
                    "min_altitude_deg must be within [-90, 90], got {}",
                    min_alt
                )));
            }
        }
        if !self.pick_cell_deg.is_finite() || self.pick_cell_deg <= 0.0 || self.pick_cell_deg > 180.0 {
            return Err(SkyviewError::InvalidConfig(format!(
                "pick_cell_deg must be within (0, 180], got {}",
                self.pick_cell_deg
            )));
        }
        if !self.pick_radius_deg.is_finite() || self.pick_radius_deg < 0.0 {
            return Err(SkyviewError::InvalidConfig(format!(
                "pick_radius_deg must be non-negative, got {}",
                self.pick_radius_deg
            )));
        }
        Ok(())
    }
}
