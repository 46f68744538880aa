use super::{CartesianPoint, GeoPoint, geo_to_cartesian};

/// Latitude/longitude grid lines as polylines on a sphere of `radius`.
///
/// Meridians run pole to pole every `meridian_step_deg` of longitude,
/// parallels run all the way round every `parallel_step_deg` of latitude
/// (the poles themselves are skipped). Each line has `segments + 1` points.
pub fn graticule(
    radius: f64,
    meridian_step_deg: u32,
    parallel_step_deg: u32,
    segments: u32,
) -> Vec<Vec<CartesianPoint>> {
    let meridian_step = meridian_step_deg.clamp(1, 360);
    let parallel_step = parallel_step_deg.clamp(1, 90);
    let segments = segments.max(2);

    let mut lines = Vec::new();

    for lon_deg in (0..360).step_by(meridian_step as usize) {
        let lon = lon_deg as f64;
        let line = (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                let lat = -90.0 + 180.0 * t;
                geo_to_cartesian(GeoPoint::new(lat, wrap_longitude(lon)), radius)
            })
            .collect();
        lines.push(line);
    }

    let mut lat = -90 + parallel_step as i32;
    while lat < 90 {
        let line = (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                let lon = -180.0 + 360.0 * t;
                geo_to_cartesian(GeoPoint::new(lat as f64, lon), radius)
            })
            .collect();
        lines.push(line);
        lat += parallel_step as i32;
    }

    lines
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 { lon - 360.0 } else { lon }
}
