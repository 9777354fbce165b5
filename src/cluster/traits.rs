use super::point::Point;

/// Distance between two points.
///
/// Implementations must be symmetric, non-negative, and return 0 exactly for
/// identical points. The approximation guarantees additionally assume the
/// triangle inequality, which is never checked.
///
/// Metrics are shared read-only across candidate scans, hence `Sync`.
pub trait Metric: Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &Point, b: &Point) -> f64;
}

impl<M: Metric + ?Sized> Metric for &M {
    #[inline]
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (**self).distance(a, b)
    }
}
