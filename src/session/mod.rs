//! Observer session
//!
//! Owns the mutable observer state (location, simulated clock, advance rate)
//! and turns it into one [`Frame`] per tick. Updates are validated in full
//! before anything is replaced, so a tick never sees a half-applied change.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::catalogs::Catalog;
use crate::config::EngineConfig;
use crate::positions::{compute_directions_with, Direction, Observer};
use crate::time::{compute_time_scales, parse_timestamp, TimeScales};
use crate::{Result, SkyviewError};

/// Consistent view of the observer at one moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverState {
    pub observer: Observer,
    /// Current simulated UTC time
    pub timestamp: DateTime<Utc>,
    /// Simulated seconds per real second while running
    pub rate: f64,
    pub running: bool,
}

/// Everything the host needs to draw one update
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub state: ObserverState,
    pub time_scales: TimeScales,
    pub directions: Vec<Direction>,
}

impl Frame {
    /// Compute a frame for a state snapshot
    pub fn compute(state: ObserverState, config: &EngineConfig, catalog: &Catalog) -> Result<Self> {
        let time_scales = compute_time_scales(state.timestamp)?;
        let directions = compute_directions_with(config, catalog, &state.observer, &time_scales);
        Ok(Self {
            state,
            time_scales,
            directions,
        })
    }
}

/// Single-threaded session controller
#[derive(Debug, Clone)]
pub struct Session {
    state: ObserverState,
    config: EngineConfig,
}

impl Session {
    /// Start a stopped session at the given location and time
    pub fn new(latitude_deg: f64, longitude_deg: f64, timestamp: DateTime<Utc>) -> Result<Self> {
        let observer = Observer::new(latitude_deg, longitude_deg)?;
        compute_time_scales(timestamp)?;
        Ok(Self {
            state: ObserverState {
                observer,
                timestamp,
                rate: 1.0,
                running: false,
            },
            config: EngineConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace location and time
    ///
    /// All three values are checked before any is stored; on error the
    /// session is unchanged.
    pub fn apply(&mut self, latitude_deg: f64, longitude_deg: f64, timestamp: &str) -> Result<()> {
        let validated = Observer::new(latitude_deg, longitude_deg).and_then(|observer| {
            let timestamp = parse_timestamp(timestamp)?;
            compute_time_scales(timestamp)?;
            Ok((observer, timestamp))
        });

        match validated {
            Ok((observer, timestamp)) => {
                self.state.observer = observer;
                self.state.timestamp = timestamp;
                debug!(
                    "Applied observer lat {} lon {} at {}",
                    latitude_deg, longitude_deg, timestamp
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rejected observer update: {}", e);
                Err(e)
            }
        }
    }

    /// Begin advancing the simulated clock at `rate` seconds per second
    pub fn start(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            warn!("Rejected time rate {}", rate);
            return Err(SkyviewError::InvalidObserverState(format!(
                "time rate must be positive and finite, got {}",
                rate
            )));
        }
        self.state.rate = rate;
        self.state.running = true;
        info!("Time advance started at {}x", rate);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state.running {
            info!("Time advance stopped at {}", self.state.timestamp);
        }
        self.state.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Move the simulated clock by `rate * real_elapsed`
    ///
    /// Does nothing while stopped. A step that would leave the supported
    /// date range is rejected and the clock stays put.
    pub fn advance(&mut self, real_elapsed: Duration) -> Result<()> {
        if !self.state.running {
            return Ok(());
        }
        if real_elapsed < Duration::zero() {
            return Err(SkyviewError::InvalidObserverState(format!(
                "elapsed time must be non-negative, got {}",
                real_elapsed
            )));
        }

        let real_us = real_elapsed.num_microseconds().ok_or_else(|| {
            SkyviewError::InvalidDate(format!("elapsed time {} is too large", real_elapsed))
        })?;
        let simulated_us = (real_us as f64 * self.state.rate).round();
        if simulated_us >= i64::MAX as f64 {
            return Err(SkyviewError::InvalidDate(format!(
                "simulated step of {} µs is too large",
                simulated_us
            )));
        }

        let next = self
            .state
            .timestamp
            .checked_add_signed(Duration::microseconds(simulated_us as i64))
            .ok_or_else(|| SkyviewError::InvalidDate("simulated time out of range".to_string()))?;
        compute_time_scales(next)?;

        self.state.timestamp = next;
        Ok(())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ObserverState {
        self.state
    }

    pub fn time_scales(&self) -> Result<TimeScales> {
        compute_time_scales(self.state.timestamp)
    }

    /// Compute the frame for the current state
    pub fn tick(&self, catalog: &Catalog) -> Result<Frame> {
        Frame::compute(self.state, &self.config, catalog)
    }
}

/// Session shared between a UI thread and a render thread
///
/// Mutations take the write lock; a tick holds the read lock only long
/// enough to copy the state, then computes without it.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn apply(&self, latitude_deg: f64, longitude_deg: f64, timestamp: &str) -> Result<()> {
        self.inner.write().apply(latitude_deg, longitude_deg, timestamp)
    }

    pub fn start(&self, rate: f64) -> Result<()> {
        self.inner.write().start(rate)
    }

    pub fn stop(&self) {
        self.inner.write().stop()
    }

    pub fn is_running(&self) -> bool {
        self.inner.read().is_running()
    }

    pub fn advance(&self, real_elapsed: Duration) -> Result<()> {
        self.inner.write().advance(real_elapsed)
    }

    pub fn snapshot(&self) -> ObserverState {
        self.inner.read().snapshot()
    }

    pub fn tick(&self, catalog: &Catalog) -> Result<Frame> {
        let (state, config) = {
            let session = self.inner.read();
            (session.snapshot(), session.config().clone())
        };
        Frame::compute(state, &config, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::bright_sky;
    use chrono::{Datelike, TimeZone};
    use rstest::rstest;
    use std::thread;

    fn session() -> Session {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 22, 0, 0).unwrap();
        Session::new(45.0, 7.0, start).unwrap()
    }

    #[rstest]
    #[case(95.0, 0.0, "2024-06-21T22:00:00Z")]
    #[case(45.0, f64::NAN, "2024-06-21T22:00:00Z")]
    #[case(45.0, 7.0, "yesterday")]
    #[case(45.0, 7.0, "1500-01-01T00:00:00Z")]
    fn test_rejected_apply_leaves_state(#[case] lat: f64, #[case] lon: f64, #[case] ts: &str) {
        let mut s = session();
        let before = s.snapshot();

        assert!(s.apply(lat, lon, ts).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_apply_replaces_location_and_time() {
        let mut s = session();
        s.apply(-33.87, 151.21, "2025-01-01T12:00:00+11:00").unwrap();

        let state = s.snapshot();
        assert_eq!(state.observer.latitude_deg(), -33.87);
        assert_eq!(state.observer.longitude_deg(), 151.21);
        assert_eq!(state.timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-10.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_start_rejects_bad_rate(#[case] rate: f64) {
        let mut s = session();
        assert!(matches!(
            s.start(rate),
            Err(SkyviewError::InvalidObserverState(_))
        ));
        assert!(!s.is_running());
    }

    #[test]
    fn test_advance_only_while_running() {
        let mut s = session();
        let t0 = s.snapshot().timestamp;

        s.advance(Duration::seconds(10)).unwrap();
        assert_eq!(s.snapshot().timestamp, t0);

        s.start(60.0).unwrap();
        s.advance(Duration::seconds(10)).unwrap();
        assert_eq!(s.snapshot().timestamp, t0 + Duration::minutes(10));

        s.stop();
        s.advance(Duration::seconds(10)).unwrap();
        assert_eq!(s.snapshot().timestamp, t0 + Duration::minutes(10));
        assert!(s.advance(Duration::seconds(-1)).is_ok());
    }

    #[test]
    fn test_advance_rejects_negative_elapsed() {
        let mut s = session();
        s.start(1.0).unwrap();
        let before = s.snapshot();
        assert!(s.advance(Duration::seconds(-1)).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_tick_uses_snapshot() {
        let s = session();
        let frame = s.tick(bright_sky()).unwrap();

        assert_eq!(frame.state, s.snapshot());
        assert_eq!(frame.directions.len(), bright_sky().len());
        assert_eq!(frame.time_scales, s.time_scales().unwrap());
    }

    #[test]
    fn test_tick_honors_config() {
        let s = session().with_config(EngineConfig::default().with_min_altitude(0.0));
        let frame = s.tick(bright_sky()).unwrap();
        assert!(frame.directions.iter().all(Direction::is_above_horizon));
    }

    #[test]
    fn test_shared_session_frames_are_consistent() {
        let shared = SharedSession::new(session());
        let catalog = bright_sky();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let (lat, lon, ts) = if i % 2 == 0 {
                        (10.0, 20.0, "2030-01-01T00:00:00Z")
                    } else {
                        (-40.0, -70.0, "2031-06-15T12:00:00Z")
                    };
                    shared.apply(lat, lon, ts).unwrap();
                }
            })
        };

        for _ in 0..50 {
            let frame = shared.tick(catalog).unwrap();
            let lat = frame.state.observer.latitude_deg();
            let year = frame.state.timestamp.year();
            match lat {
                l if l == 45.0 => assert_eq!(year, 2024),
                l if l == 10.0 => assert_eq!(year, 2030),
                l if l == -40.0 => assert_eq!(year, 2031),
                other => panic!("unexpected latitude {}", other),
            }
            assert_eq!(frame.time_scales, compute_time_scales(frame.state.timestamp).unwrap());
        }

        writer.join().unwrap();
    }
}
