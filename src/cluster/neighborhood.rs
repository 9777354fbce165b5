//! Neighborhood queries: the primitive every clustering pass is built on.
//!
//! A neighborhood of `center` is every point strictly closer than
//! `scale * radius`, with the center itself always included (and listed first)
//! whether or not it belongs to the scanned set.

use super::point::Point;
use super::traits::Metric;

/// Number of points strictly within `scale * radius` of `center`, center included.
pub fn count_within<M: Metric>(
    points: &[Point],
    radius: f64,
    center: &Point,
    scale: f64,
    metric: &M,
) -> usize {
    let limit = scale * radius;
    1 + points
        .iter()
        .filter(|p| *p != center && metric.distance(center, p) < limit)
        .count()
}

/// The points strictly within `scale * radius` of `center`, center first, then in scan order.
pub fn collect_within<M: Metric>(
    points: &[Point],
    radius: f64,
    center: &Point,
    scale: f64,
    metric: &M,
) -> Vec<Point> {
    let limit = scale * radius;
    let mut out = vec![*center];
    out.extend(
        points
            .iter()
            .filter(|p| *p != center && metric.distance(center, p) < limit)
            .copied(),
    );
    out
}

/// Counts at two scales in a single pass: `(count at inner, count at outer)`.
///
/// The greedy clusterer ranks candidates by the inner count and bounds what a
/// pick can remove with the outer one.
pub(crate) fn count_within_pair<M: Metric>(
    points: &[Point],
    radius: f64,
    center: &Point,
    inner: f64,
    outer: f64,
    metric: &M,
) -> (usize, usize) {
    let (inner, outer) = (inner * radius, outer * radius);
    let mut counts = (1, 1);
    for p in points {
        if p == center {
            continue;
        }
        let d = metric.distance(center, p);
        if d < inner {
            counts.0 += 1;
        }
        if d < outer {
            counts.1 += 1;
        }
    }
    counts
}
