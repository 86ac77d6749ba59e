//! End-to-end scenarios: catalog file to frames to picks

use std::io::Write;

use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;

use skyview::catalogs::{bright_sky, synthetic::random_catalog};
use skyview::coordinates::wrap_degrees_180;
use skyview::pick::NO_SELECTION;
use skyview::{
    compute_directions, compute_directions_with, compute_time_scales, compute_time_scales_str,
    nearest, pick_object, Catalog, EngineConfig, Horizontal, InfoPanel, Observer, PickIndex,
    Session, SharedSession, SkyviewError,
};

const EQUATOR_STAR: &str = r#"[
    {"id": 1, "name": "Equator Star", "kind": "star", "magnitude": 2.0,
     "ra_deg": 0.0, "dec_deg": 0.0}
]"#;

#[test]
fn test_j2000_epoch() {
    let time = compute_time_scales_str("2000-01-01T12:00:00Z").unwrap();

    assert_eq!(time.julian_date, 2_451_545.0);
    assert_eq!(time.centuries_since_j2000, 0.0);
    assert_abs_diff_eq!(time.gmst_deg, 280.460_618_37, epsilon = 1e-9);
}

#[rstest]
#[case(0.0, 90.0)]
#[case(30.0, 60.0)]
#[case(-45.0, 45.0)]
fn test_equator_star_transits_when_lst_is_zero(#[case] latitude: f64, #[case] altitude: f64) {
    let catalog = Catalog::from_json_str(EQUATOR_STAR).unwrap();
    let time = compute_time_scales_str("2024-03-20T00:00:00Z").unwrap();

    // Pick the longitude whose local sidereal time is zero
    let longitude = wrap_degrees_180(-time.gmst_deg);
    let lst = time.local_sidereal_deg(longitude);
    assert!(lst < 1e-9 || lst > 360.0 - 1e-9, "LST {}", lst);

    let observer = Observer::new(latitude, longitude).unwrap();
    let directions = compute_directions(&catalog, &observer, &time);

    assert_eq!(directions.len(), 1);
    assert_abs_diff_eq!(directions[0].altitude_deg, altitude, epsilon = 1e-6);
    assert_abs_diff_eq!(directions[0].altitude_deg, 90.0 - latitude.abs(), epsilon = 1e-6);
}

#[test]
fn test_fixed_stars_repeat_after_one_sidereal_day() {
    let catalog = random_catalog(21, 500).unwrap();
    let observer = Observer::new(41.9, 12.5).unwrap();
    let config = EngineConfig::default().with_proper_motion(false);

    let t0 = Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap();
    let t1 = t0 + Duration::milliseconds(86_164_091);

    let first = compute_directions_with(&config, &catalog, &observer, &compute_time_scales(t0).unwrap());
    let second = compute_directions_with(&config, &catalog, &observer, &compute_time_scales(t1).unwrap());

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.object_id, b.object_id);
        let separation = a.to_unit_vector().angular_distance(&b.to_unit_vector()).to_degrees();
        assert!(separation < 1e-3, "object {} moved {}°", a.object_id, separation);
    }
}

#[test]
fn test_catalog_file_round_trip_through_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": 10, "name": "Sirius", "kind": "star", "magnitude": -1.46,
              "ra_deg": 101.287155, "dec_deg": -16.716116,
              "proper_motion": {{"pm_ra_mas_yr": -546.01, "pm_dec_mas_yr": -1223.07}}}},
            {{"id": 20, "name": "Jupiter", "kind": "planet", "magnitude": -2.2}},
            {{"id": 30, "name": "Orion Nebula", "kind": "deep_sky", "magnitude": 4.0,
              "ra_deg": 83.822083, "dec_deg": -5.391111}}
        ]"#
    )
    .unwrap();

    let catalog = Catalog::from_file(file.path()).unwrap();
    let observer = Observer::new(-23.5, -46.6).unwrap();
    let time = compute_time_scales_str("2025-12-01T02:00:00Z").unwrap();
    let directions = compute_directions(&catalog, &observer, &time);

    let ids: Vec<u64> = directions.iter().map(|d| d.object_id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    for d in &directions {
        assert!(d.altitude_deg.is_finite() && (-90.0..=90.0).contains(&d.altitude_deg));
        assert!((0.0..360.0).contains(&d.azimuth_deg));
    }
}

#[test]
fn test_one_bad_entry_rejects_whole_catalog() {
    let json = r#"[
        {"id": 1, "name": "Good", "kind": "star", "magnitude": 1.0, "ra_deg": 10.0, "dec_deg": 10.0},
        {"id": 2, "name": "Bad", "kind": "star", "magnitude": 1.0, "ra_deg": 10.0, "dec_deg": 120.0}
    ]"#;

    match Catalog::from_json_str(json) {
        Err(SkyviewError::CatalogParse { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected CatalogParse, got {:?}", other.map(|c| c.len())),
    }
}

#[test]
fn test_unknown_id_is_not_found() {
    assert!(matches!(bright_sky().get(42), Err(SkyviewError::NotFound(_))));
}

#[test]
fn test_session_drives_frames_and_picks() {
    let start = Utc.with_ymd_and_hms(2025, 1, 20, 3, 0, 0).unwrap();
    let mut session = Session::new(35.7, 139.7, start)
        .unwrap()
        .with_config(EngineConfig::default().with_min_altitude(0.0));

    session.apply(35.7, 139.7, "2025-01-20T12:00:00Z").unwrap();
    session.start(3600.0).unwrap();
    session.advance(Duration::seconds(2)).unwrap();
    assert_eq!(
        session.snapshot().timestamp,
        Utc.with_ymd_and_hms(2025, 1, 20, 14, 0, 0).unwrap()
    );

    let frame = session.tick(bright_sky()).unwrap();
    assert!(!frame.directions.is_empty());
    assert!(frame.directions.iter().all(|d| d.altitude_deg >= 0.0));

    // Point at the first visible object, slightly off
    let target = frame.directions[0];
    let query = Horizontal::new(target.altitude_deg - 0.2, target.azimuth_deg);
    let index = PickIndex::build(&frame.directions, session.config().pick_cell_deg);
    let radius = session.config().pick_radius_deg;

    assert_eq!(index.nearest(&query, radius), nearest(&frame.directions, &query, radius));

    let mut panel = InfoPanel::new();
    panel.show_pick(pick_object(bright_sky(), &frame.directions, &query, radius));
    let picked = panel.selection().unwrap();
    assert_eq!(
        picked.name,
        bright_sky().get(index.nearest(&query, radius).unwrap().object_id).unwrap().name
    );

    // Nothing near the nadir while only above-horizon objects are listed
    panel.show_pick(pick_object(bright_sky(), &frame.directions, &Horizontal::new(-90.0, 0.0), radius));
    assert_eq!(panel.lines()[0], NO_SELECTION);

    session.stop();
    assert!(!session.is_running());
}

#[test]
fn test_shared_session_rejects_bad_update_atomically() {
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let shared = SharedSession::new(Session::new(0.0, 0.0, start).unwrap());
    let before = shared.snapshot();

    assert!(matches!(
        shared.apply(10.0, 200.0, "2025-05-02T00:00:00Z"),
        Err(SkyviewError::InvalidObserverState(_))
    ));
    assert!(matches!(
        shared.apply(10.0, 20.0, "not a date"),
        Err(SkyviewError::InvalidDate(_))
    ));
    assert_eq!(shared.snapshot(), before);
}
