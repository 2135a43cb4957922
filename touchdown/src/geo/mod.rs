//! Geodesic helpers.
//!
//! Great-circle distance between latitude/longitude points and heading
//! comparison. Everything here is stateless; all distances are meters and
//! all angles are degrees unless a name says otherwise.

mod units;

pub use units::{
    meters_to_feet, ms_to_fpm, ms_to_knots, round_off, DistanceUnit, UnknownUnit, FT_TO_METERS,
    KM_TO_METERS, MI_TO_METERS, NM_TO_METERS,
};

/// Mean earth radius used by the haversine formula (meters).
pub const EARTH_RADIUS_M: f64 = 6372.8e3;

/// A geodetic position in degrees.
///
/// Double precision on purpose: the glide path is built from many samples
/// a few meters apart and single-precision positions visibly wobble.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point in meters.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance_m(self.lat, self.lon, other.lat, other.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Great-circle distance between two points using the haversine formula.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
///
/// # Returns
///
/// Distance in meters. Symmetric in its arguments and exactly zero for
/// identical points.
#[inline]
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    c * EARTH_RADIUS_M
}

/// Absolute angular difference between two headings, in degrees (0-180).
///
/// Wraps across north, so 358° and 4° are 6° apart.
#[inline]
pub fn heading_delta(a: f32, b: f32) -> f32 {
    let delta = (a - b).abs() % 360.0;
    if delta > 180.0 {
        360.0 - delta
    } else {
        delta
    }
}
