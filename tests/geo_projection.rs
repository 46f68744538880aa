use geosketch::GeoError;
use geosketch::geo::{
    CartesianPoint, GeoPoint, Ray, cartesian_to_geo, geo_to_cartesian, graticule, pick_to_geo,
};
use proptest::prelude::*;

const RADIUS: f64 = 5.0;

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

/// Longitude difference on the circle, so 180 and -180 compare equal
fn lng_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

proptest! {
    #[test]
    fn round_trip_within_tolerance(lat in -89.999f64..=89.999, lng in -179.999f64..=180.0) {
        let back = cartesian_to_geo(geo_to_cartesian(GeoPoint::new(lat, lng), RADIUS)).unwrap();
        prop_assert!((back.latitude - lat).abs() < 1e-6);
        prop_assert!(lng_diff(back.longitude, lng) < 1e-6);
        prop_assert!(back.longitude > -180.0 && back.longitude <= 180.0);
    }

    #[test]
    fn pick_from_outside_hits_facing_point(lat in -80.0f64..80.0, lng in -179.0f64..179.0) {
        let target = GeoPoint::new(lat, lng);
        let eye = geo_to_cartesian(target, RADIUS * 4.0);
        let hit = pick_to_geo(Ray::through(eye, CartesianPoint::ZERO), RADIUS).unwrap().unwrap();
        prop_assert!((hit.latitude - lat).abs() < 1e-6);
        prop_assert!(lng_diff(hit.longitude, lng) < 1e-6);
    }
}

#[test]
fn test_north_pole() {
    let p = geo_to_cartesian(GeoPoint::new(90.0, 0.0), RADIUS);
    assert_close(p.x, 0.0, 1e-12);
    assert_close(p.y, 5.0, 1e-12);
    assert_close(p.z, 0.0, 1e-12);

    let geo = cartesian_to_geo(CartesianPoint::new(0.0, 5.0, 0.0)).unwrap();
    assert_close(geo.latitude, 90.0, 1e-12);
    assert!(geo.longitude.is_finite());
}

#[test]
fn test_south_pole() {
    let geo = cartesian_to_geo(CartesianPoint::new(0.0, -2.0, 0.0)).unwrap();
    assert_close(geo.latitude, -90.0, 1e-12);
    assert_eq!(geo.longitude, 0.0);
}

#[test]
fn test_center_is_degenerate() {
    assert!(matches!(
        cartesian_to_geo(CartesianPoint::ZERO),
        Err(GeoError::Degenerate(_))
    ));
}

#[test]
fn test_pick_known_location() {
    let target = GeoPoint::new(12.34, -56.78);
    let eye = geo_to_cartesian(target, 30.0);
    let hit = pick_to_geo(Ray::through(eye, CartesianPoint::ZERO), RADIUS)
        .unwrap()
        .unwrap();
    assert_close(hit.latitude, 12.34, 1e-9);
    assert_close(hit.longitude, -56.78, 1e-9);
}

#[test]
fn test_pick_misses() {
    // Passes beside the sphere
    let ray = Ray::new(
        CartesianPoint::new(0.0, 10.0, 20.0),
        CartesianPoint::new(0.0, 0.0, -1.0),
    );
    assert_eq!(pick_to_geo(ray, RADIUS).unwrap(), None);

    // Sphere is behind the ray
    let ray = Ray::new(
        CartesianPoint::new(0.0, 0.0, 20.0),
        CartesianPoint::new(0.0, 0.0, 1.0),
    );
    assert_eq!(pick_to_geo(ray, RADIUS).unwrap(), None);
}

#[test]
fn test_pick_rejects_degenerate_input() {
    let zero_dir = Ray::new(CartesianPoint::new(0.0, 0.0, 20.0), CartesianPoint::ZERO);
    assert!(pick_to_geo(zero_dir, RADIUS).is_err());

    let ray = Ray::new(
        CartesianPoint::new(0.0, 0.0, 20.0),
        CartesianPoint::new(0.0, 0.0, -1.0),
    );
    assert!(pick_to_geo(ray, 0.0).is_err());
    assert!(pick_to_geo(ray, f64::NAN).is_err());
}

#[test]
fn test_graticule_lines_lie_on_sphere() {
    for line in graticule(RADIUS, 30, 30, 16) {
        for point in line {
            assert_close(point.length(), RADIUS, 1e-9);
        }
    }
}
