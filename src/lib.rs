//! Skyview: celestial position engine for sky-viewer hosts
//!
//! Given an observer location and a UTC instant, this crate computes the
//! altitude/azimuth of every object in a star/planet catalog and answers
//! nearest-object pick queries. Rendering, input handling and timers belong to
//! the host; the engine is a set of pure functions called once per tick.

use thiserror::Error;

pub mod catalogs;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod pick;
pub mod planetlib;
pub mod positions;
pub mod session;
pub mod time;

// Re-export commonly used types
pub use catalogs::{Catalog, CelestialObject, ObjectKind};
pub use config::EngineConfig;
pub use coordinates::{Equatorial, Horizontal};
pub use pick::{nearest, pick_object, InfoPanel, ObjectInfo, PickHit, PickIndex};
pub use positions::{
    compute_directions, compute_directions_par, compute_directions_with, Direction, Observer,
};
pub use session::{Frame, ObserverState, Session, SharedSession};
pub use time::{compute_time_scales, compute_time_scales_str, parse_timestamp, TimeScales};

/// Main error type for the skyview library
#[derive(Debug, Error)]
pub enum SkyviewError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid observer state: {0}")]
    InvalidObserverState(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Catalog parse error at entry {index}: {reason}")]
    CatalogParse { index: usize, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for skyview operations
pub type Result<T> = std::result::Result<T, SkyviewError>;
