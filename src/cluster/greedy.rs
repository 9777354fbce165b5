//! Greedy k-center with outliers (offline).
//!
//! # The Algorithm (Charikar et al., 2001)
//!
//! For a fixed radius `r`, repeat up to `k` times:
//!
//! 1. Score every still-unclustered point by the size of its neighborhood.
//! 2. Promote the densest point to a center.
//! 3. Remove every point within a wider multiple of `r` of that center.
//!
//! The radius is feasible when at most `outlier_count` points survive. Trying
//! radii in increasing order and keeping the first feasible one gives a
//! 3-approximation of the optimal covering radius.
//!
//! Two variants differ only in their scales:
//!
//! | variant     | density scale | removal scale |
//! |-------------|---------------|---------------|
//! | `Offline`   | `1 * r`       | `3 * r`       |
//! | `Streaming` | `2 * r`       | `4 * r`       |
//!
//! The streaming variant finishes off the leftovers of a streaming pass and
//! keeps extra margin for the later conflict checks.
//!
//! ## Ties
//!
//! Candidates are scanned in arrival order; a later candidate replaces the
//! current best only with a strictly larger count, so the earliest densest
//! point wins.
//!
//! ## Early exit
//!
//! Each pick removes at most `D` points, where `D` is the largest
//! removal-scale neighborhood among the current candidates (the unclustered
//! set only shrinks, so `D` never grows). With `m` picks left, once
//! `|unclustered| > outlier_count + m * D` the radius cannot succeed and the
//! pass stops.
//!
//! # References
//!
//! Charikar, Khuller, Mount, Narasimhan (2001). "Algorithms for Facility Location
//! Problems with Outliers." SODA 2001.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::prelude::*;

use super::bounds::{estimate_bound_with_policy, Comparison, MIN_SAMPLE};
use super::metric::Euclidean;
use super::neighborhood::{collect_within, count_within_pair};
use super::point::{dedup_in_order, Point};
use super::radii::generate_radii;
use super::traits::Metric;
use crate::error::{Error, Result};

/// Scale pair used by one greedy pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreedyVariant {
    /// One-shot clustering: density at `r`, removal at `3r`.
    Offline,
    /// Finalizing a streaming pass: density at `2r`, removal at `4r`.
    Streaming,
}

impl GreedyVariant {
    /// Multiple of the radius used to rank candidates.
    pub fn density_scale(self) -> f64 {
        match self {
            GreedyVariant::Offline => 1.0,
            GreedyVariant::Streaming => 2.0,
        }
    }

    /// Multiple of the radius cleared around each new center.
    pub fn removal_scale(self) -> f64 {
        match self {
            GreedyVariant::Offline => 3.0,
            GreedyVariant::Streaming => 4.0,
        }
    }
}

/// A successful clustering at a fixed radius.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Selected centers, in selection order.
    pub centers: Vec<Point>,
    /// Points removed by each center (`clusters[i]` belongs to `centers[i]`, center first).
    pub clusters: Vec<Vec<Point>>,
    /// Points no center covers; at most the outlier budget.
    pub unclustered: Vec<Point>,
    /// Radius the solution was found at.
    pub radius: f64,
}

/// Offline k-center clusterer with an outlier budget.
#[derive(Debug, Clone)]
pub struct KCenter<M = Euclidean> {
    k: usize,
    outlier_count: usize,
    alpha: f64,
    sample_size: Option<usize>,
    seed: Option<u64>,
    metric: M,
}

impl KCenter {
    /// Create a clusterer for at most `k` centers leaving at most `outlier_count` points uncovered.
    ///
    /// Defaults: `alpha = 2.0`, bounds estimated from the first `k + outlier_count + 1`
    /// points (at least 3), Euclidean distance.
    pub fn new(k: usize, outlier_count: usize) -> Self {
        Self {
            k,
            outlier_count,
            alpha: 2.0,
            sample_size: None,
            seed: None,
            metric: Euclidean,
        }
    }
}

impl<M: Metric> KCenter<M> {
    /// Set the radius growth factor used by [`KCenter::fit`].
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Estimate distance bounds from the first `sample_size` points only.
    ///
    /// Defaults to `k + outlier_count + 1` (at least 3).
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Seed the bound estimator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Swap the distance function.
    pub fn with_metric<N: Metric>(self, metric: N) -> KCenter<N> {
        KCenter {
            k: self.k,
            outlier_count: self.outlier_count,
            alpha: self.alpha,
            sample_size: self.sample_size,
            seed: self.seed,
            metric,
        }
    }

    /// Maximum number of centers.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Outlier budget.
    pub fn outlier_count(&self) -> usize {
        self.outlier_count
    }

    /// The distance function in use.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if !(self.alpha.is_finite() && self.alpha > 1.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be a finite value greater than 1",
            });
        }
        if self.sample_size == Some(0) {
            return Err(Error::InvalidParameter {
                name: "sample_size",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Run one greedy pass at a fixed radius.
    ///
    /// Returns `Ok(None)` when the radius is infeasible (more than
    /// `outlier_count` points left uncovered).
    pub fn greedy_cluster(
        &self,
        points: &[Point],
        radius: f64,
        variant: GreedyVariant,
    ) -> Result<Option<Solution>> {
        self.validate()?;
        check_radius(radius)?;
        Ok(greedy(
            points,
            self.k,
            radius,
            self.outlier_count,
            variant,
            &self.metric,
        ))
    }

    /// Try each radius in order and return the first feasible solution.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `points` is empty.
    /// - [`Error::InfeasibleRadius`] if no radius satisfies the outlier budget.
    pub fn cluster_offline(&self, points: &[Point], radii: &[f64]) -> Result<Solution> {
        self.validate()?;
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        let Some(&max_radius) = radii.last() else {
            return Err(Error::InvalidParameter {
                name: "radii",
                message: "must not be empty",
            });
        };

        for &radius in radii {
            check_radius(radius)?;
            if let Some(solution) = greedy(
                points,
                self.k,
                radius,
                self.outlier_count,
                GreedyVariant::Offline,
                &self.metric,
            ) {
                tracing::info!(
                    radius,
                    centers = solution.centers.len(),
                    outliers = solution.unclustered.len(),
                    "offline clustering succeeded"
                );
                return Ok(solution);
            }
            tracing::debug!(radius, "radius infeasible, growing");
        }

        Err(Error::InfeasibleRadius {
            k: self.k,
            outlier_count: self.outlier_count,
            max_radius,
        })
    }

    /// Estimate bounds from a leading sample, generate radii, and cluster the whole input.
    ///
    /// # Errors
    ///
    /// - [`Error::InsufficientSample`] if fewer than three points are available for bounds.
    /// - [`Error::EmptyRadiusSequence`] if the sampled bounds leave no candidate radius.
    /// - [`Error::InfeasibleRadius`] if no candidate radius satisfies the outlier budget.
    pub fn fit(&self, points: &[Point]) -> Result<Solution> {
        self.validate()?;
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        let wanted = self
            .sample_size
            .unwrap_or(self.k.saturating_add(self.outlier_count).saturating_add(1))
            .max(MIN_SAMPLE);
        let sample = &points[..wanted.min(points.len())];

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let dmin = estimate_bound_with_policy(
            sample,
            Comparison::Minimum,
            Comparison::Minimum.default_policy(),
            &self.metric,
            rng.as_mut(),
        )?;
        let dmax = estimate_bound_with_policy(
            sample,
            Comparison::Maximum,
            Comparison::Maximum.default_policy(),
            &self.metric,
            rng.as_mut(),
        )?;
        let radii = generate_radii(dmin, dmax, self.alpha)?;
        tracing::debug!(dmin, dmax, candidates = radii.len(), "radius candidates ready");

        self.cluster_offline(points, &radii)
    }
}

pub(crate) fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "radius",
            message: "must be finite and positive",
        })
    }
}

/// Result of scoring every candidate once.
struct Scan {
    /// Index of the densest candidate (earliest on ties).
    best: usize,
    /// Largest removal-scale neighborhood over all candidates.
    max_reach: usize,
}

fn scan_candidates<M: Metric>(
    unclustered: &[Point],
    radius: f64,
    variant: GreedyVariant,
    metric: &M,
) -> Option<Scan> {
    let (inner, outer) = (variant.density_scale(), variant.removal_scale());
    let score = |c: &Point| count_within_pair(unclustered, radius, c, inner, outer, metric);

    #[cfg(feature = "parallel")]
    let counts: Vec<(usize, usize)> = unclustered.par_iter().map(score).collect();
    #[cfg(not(feature = "parallel"))]
    let counts: Vec<(usize, usize)> = unclustered.iter().map(score).collect();

    let mut best: Option<(usize, usize)> = None;
    let mut max_reach = 0;
    for (idx, &(density, reach)) in counts.iter().enumerate() {
        if best.is_none_or(|(_, top)| density > top) {
            best = Some((idx, density));
        }
        max_reach = max_reach.max(reach);
    }
    best.map(|(best, _)| Scan { best, max_reach })
}

/// One greedy pass with `k` picks at `radius`. `k` may be zero.
pub(crate) fn greedy<M: Metric>(
    points: &[Point],
    k: usize,
    radius: f64,
    outlier_count: usize,
    variant: GreedyVariant,
    metric: &M,
) -> Option<Solution> {
    greedy_pass(points, k, radius, outlier_count, variant, metric, true)
}

fn greedy_pass<M: Metric>(
    points: &[Point],
    k: usize,
    radius: f64,
    outlier_count: usize,
    variant: GreedyVariant,
    metric: &M,
    early_exit: bool,
) -> Option<Solution> {
    let mut unclustered = dedup_in_order(points.iter().copied());
    let mut centers = Vec::new();
    let mut clusters = Vec::new();
    let limit = variant.removal_scale() * radius;

    while centers.len() < k {
        let Some(scan) = scan_candidates(&unclustered, radius, variant, metric) else {
            break;
        };
        let picks_left = k - centers.len();
        if early_exit
            && unclustered.len()
                > outlier_count.saturating_add(picks_left.saturating_mul(scan.max_reach))
        {
            tracing::debug!(
                radius,
                remaining = unclustered.len(),
                picks_left,
                max_reach = scan.max_reach,
                "outlier budget unreachable, abandoning radius"
            );
            break;
        }

        let center = unclustered[scan.best];
        let cluster = collect_within(&unclustered, radius, &center, variant.removal_scale(), metric);
        unclustered.retain(|p| *p != center && metric.distance(&center, p) >= limit);
        centers.push(center);
        clusters.push(cluster);
    }

    if unclustered.len() <= outlier_count {
        Some(Solution {
            centers,
            clusters,
            unclustered,
            radius,
        })
    } else {
        None
    }
}
