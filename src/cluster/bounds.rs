//! Distance bound estimation.
//!
//! Estimates the closest or farthest pair distance in a sample without the full
//! O(n^2) distance matrix. Starting from a random anchor, each round scans the
//! sample for a point that improves the bound in the requested direction and
//! moves the anchor there. The bound improves strictly every round, so the
//! walk reaches a fixed point after finitely many rounds.
//!
//! The result is a heuristic: a local optimum of the anchor walk, not
//! necessarily the true closest or farthest pair.

use rand::Rng;

use super::metric::Euclidean;
use super::point::Point;
use super::traits::Metric;
use crate::error::{Error, Result};

/// Smallest radius handed out when a lower bound collapses to zero.
pub const RADIUS_FLOOR: f64 = 0.1;

/// Minimum sample size for bound estimation.
pub const MIN_SAMPLE: usize = 3;

/// Which extreme pair distance to estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// Closest pair (lower bound on useful radii).
    Minimum,
    /// Farthest pair (upper bound on useful radii).
    Maximum,
}

impl Comparison {
    #[inline]
    fn improves(self, candidate: f64, bound: f64) -> bool {
        match self {
            Comparison::Minimum => candidate < bound,
            Comparison::Maximum => candidate > bound,
        }
    }

    /// The zero policy each direction uses by default.
    pub fn default_policy(self) -> ZeroPolicy {
        match self {
            Comparison::Minimum => ZeroPolicy::Reject,
            Comparison::Maximum => ZeroPolicy::Accept,
        }
    }
}

/// How zero distances (duplicate points) are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Zero is a valid bound.
    Accept,
    /// Zero is never a bound; an all-zero sample yields [`RADIUS_FLOOR`].
    Reject,
}

/// Estimate a pair-distance bound with Euclidean distance and the direction's default policy.
pub fn estimate_bound<R: Rng + ?Sized>(
    points: &[Point],
    comparison: Comparison,
    rng: &mut R,
) -> Result<f64> {
    estimate_bound_with_policy(points, comparison, comparison.default_policy(), &Euclidean, rng)
}

/// Estimate a pair-distance bound.
///
/// # Errors
///
/// [`Error::InsufficientSample`] if `points` has fewer than three entries.
pub fn estimate_bound_with_policy<M, R>(
    points: &[Point],
    comparison: Comparison,
    policy: ZeroPolicy,
    metric: &M,
    rng: &mut R,
) -> Result<f64>
where
    M: Metric,
    R: Rng + ?Sized,
{
    if points.len() < MIN_SAMPLE {
        return Err(Error::InsufficientSample {
            required: MIN_SAMPLE,
            found: points.len(),
        });
    }

    let picks = rand::seq::index::sample(rng, points.len(), 3);
    let mut bound = metric.distance(&points[picks.index(0)], &points[picks.index(1)]);
    let mut anchor = picks.index(2);
    let mut rounds = 0usize;

    loop {
        let mut next = None;
        let origin = points[anchor];
        for (idx, other) in points.iter().enumerate() {
            if *other == origin {
                continue;
            }
            let d = metric.distance(&origin, other);
            let accepted = match policy {
                ZeroPolicy::Accept => comparison.improves(d, bound),
                // A zero bound is a placeholder: any positive distance replaces it.
                ZeroPolicy::Reject => d > 0.0 && (bound == 0.0 || comparison.improves(d, bound)),
            };
            if accepted {
                bound = d;
                next = Some(idx);
            }
        }
        rounds += 1;
        match next {
            Some(idx) => anchor = idx,
            None => break,
        }
    }

    if policy == ZeroPolicy::Reject && bound == 0.0 {
        bound = RADIUS_FLOOR;
    }
    tracing::debug!(?comparison, ?policy, bound, rounds, "estimated distance bound");
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid() -> Vec<Point> {
        let mut pts = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                pts.push(Point::new(i as f64, j as f64 * 2.0));
            }
        }
        pts
    }

    #[test]
    fn test_insufficient_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let err = estimate_bound(&pts, Comparison::Minimum, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientSample {
                required: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_minimum_finds_closest_spacing() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = estimate_bound(&grid(), Comparison::Minimum, &mut rng).unwrap();
            // Every anchor has a neighbor at distance 1, so the walk always reaches it.
            assert_eq!(d, 1.0, "seed {seed}");
        }
    }

    #[test]
    fn test_maximum_is_a_real_pair_distance() {
        let pts = grid();
        let diameter = Euclidean.distance(&pts[0], &pts[15]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = estimate_bound(&pts, Comparison::Maximum, &mut rng).unwrap();
            assert!(d > 0.0 && d <= diameter, "seed {seed}: {d}");
        }
    }

    #[test]
    fn test_reject_policy_skips_duplicates() {
        let mut pts = vec![Point::new(0.0, 0.0); 4];
        pts.push(Point::new(3.0, 0.0));
        pts.push(Point::new(5.0, 0.0));
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = estimate_bound(&pts, Comparison::Minimum, &mut rng).unwrap();
            assert!(d > 0.0, "seed {seed}");
        }
    }

    #[test]
    fn test_all_identical_uses_floor() {
        let pts = vec![Point::new(2.0, 2.0); 5];
        let mut rng = StdRng::seed_from_u64(7);
        let d = estimate_bound(&pts, Comparison::Minimum, &mut rng).unwrap();
        assert_eq!(d, RADIUS_FLOOR);

        let d = estimate_bound(&pts, Comparison::Maximum, &mut rng).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let pts = grid();
        let a = estimate_bound(&pts, Comparison::Maximum, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = estimate_bound(&pts, Comparison::Maximum, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }
}
