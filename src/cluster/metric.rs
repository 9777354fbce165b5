//! Distance functions.

use super::point::Point;
use super::traits::Metric;

/// Planar Euclidean distance. The default metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers.
///
/// Reads `x` as longitude and `y` as latitude, both in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Haversine {
    /// Sphere radius; distances are reported in its unit.
    pub radius: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            radius: EARTH_RADIUS_KM,
        }
    }
}

impl Metric for Haversine {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        let lat1 = a.y.to_radians();
        let lat2 = b.y.to_radians();
        let dlat = (b.y - a.y).to_radians();
        let dlon = (b.x - a.x).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // Rounding can push `h` a hair past 1 for antipodal points.
        let h = h.clamp(0.0, 1.0);
        2.0 * self.radius * h.sqrt().atan2((1.0 - h).sqrt())
    }
}
