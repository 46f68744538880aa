//! Conversions between geographic coordinates and points on a sphere.
//!
//! The sphere is centred at the origin with +Y pointing at the north pole.
//! Longitude 0 lies along +X and longitude 90 along +Z.

mod graticule;

pub use graticule::graticule;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A point (or direction) in the sphere's Cartesian frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for CartesianPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for CartesianPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// A pointer ray supplied by the rendering host.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: CartesianPoint,
    /// Does not need to be normalized, but must not be zero.
    pub direction: CartesianPoint,
}

impl Ray {
    pub fn new(origin: CartesianPoint, direction: CartesianPoint) -> Self {
        Self { origin, direction }
    }

    /// Ray starting at `origin` and passing through `target`
    pub fn through(origin: CartesianPoint, target: CartesianPoint) -> Self {
        Self::new(origin, target - origin)
    }

    pub fn at(&self, t: f64) -> CartesianPoint {
        self.origin + self.direction.scale(t)
    }
}

pub fn geo_to_cartesian(geo: GeoPoint, radius: f64) -> CartesianPoint {
    let phi = (90.0 - geo.latitude).to_radians();
    let theta = geo.longitude.to_radians();

    CartesianPoint::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

pub fn cartesian_to_geo(point: CartesianPoint) -> Result<GeoPoint, GeoError> {
    if !point.is_finite() {
        return Err(GeoError::Degenerate("point has non-finite coordinates"));
    }
    let r = point.length();
    if r == 0.0 {
        return Err(GeoError::Degenerate("point lies at the sphere center"));
    }

    // Rounding can push y/r a hair outside [-1, 1] right at the poles.
    let latitude = 90.0 - (point.y / r).clamp(-1.0, 1.0).acos().to_degrees();

    // atan2(0, 0) is 0, which is the longitude convention at the poles.
    let mut longitude = point.z.atan2(point.x).to_degrees();
    if longitude <= -180.0 {
        longitude += 360.0;
    } else if longitude > 180.0 {
        longitude -= 360.0;
    }

    Ok(GeoPoint::new(latitude, longitude))
}

/// Resolves the point of the sphere a pointer ray hits first.
///
/// Returns `Ok(None)` when the ray misses the sphere or the sphere lies
/// entirely behind the ray origin. Degenerate input (zero direction,
/// non-positive radius) is an error so the caller can log it.
pub fn pick_to_geo(ray: Ray, sphere_radius: f64) -> Result<Option<GeoPoint>, GeoError> {
    if !(sphere_radius.is_finite() && sphere_radius > 0.0) {
        return Err(GeoError::Degenerate("sphere radius must be positive"));
    }
    if !ray.origin.is_finite() || !ray.direction.is_finite() {
        return Err(GeoError::Degenerate("ray has non-finite components"));
    }

    let a = ray.direction.dot(ray.direction);
    if a == 0.0 {
        return Err(GeoError::Degenerate("ray direction has zero length"));
    }
    let b = 2.0 * ray.origin.dot(ray.direction);
    let c = ray.origin.dot(ray.origin) - sphere_radius * sphere_radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Ok(None);
    }

    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / (2.0 * a);
    let far = (-b + sqrt_d) / (2.0 * a);

    let t = if near > 0.0 {
        near
    } else if far > 0.0 {
        // Origin inside the sphere.
        far
    } else {
        return Ok(None);
    };

    cartesian_to_geo(ray.at(t)).map(Some)
}

/// Where to draw a landmark sprite: just above the surface so it does not
/// z-fight with the globe.
pub fn billboard_anchor(geo: GeoPoint, radius: f64, lift: f64) -> CartesianPoint {
    geo_to_cartesian(geo, radius + lift)
}
