//! Streaming k-center with outliers.
//!
//! Points arrive in batches. Each batch is merged with whatever the previous
//! state left uncovered, and only that union is re-examined: points already
//! covered by a surviving center are never revisited.
//!
//! # Radius epochs
//!
//! For each candidate radius `r`, in increasing order:
//!
//! 1. **Redundancy**: a center carried over from a smaller radius that now lies
//!    within `scale * r` of an earlier surviving center is dropped; the earlier
//!    center covers its disk.
//! 2. **Coverage**: drop every point within `scale * r` of an existing center.
//!    Scan the rest in arrival order; a point whose `beta * r` neighborhood
//!    holds more than `outlier_count` points becomes a center, keeping the first
//!    `outlier_count + 1` neighborhood members as its support set.
//! 3. **Conflicts**: two centers conflict when either one's support set holds a
//!    point farther than `8 * r` ([`CONFLICT_FACTOR`]) from the other. Walking
//!    the centers in order, every later center that conflicts with a surviving
//!    earlier one is evicted. Evictions send the epoch back to step 2; evicted
//!    points are not promoted again within the same epoch, so this settles.
//! 4. **Termination**: with nothing left uncovered and at most `k` centers the
//!    run is done. Otherwise, if `l <= k` centers exist and fewer than
//!    `(k - l) * z + z` points remain, the greedy clusterer tries to place the
//!    last `k - l` centers; success finalizes the run.
//!
//! Otherwise the next radius is tried. Because termination is only checked on
//! a conflict-free center set, surviving centers never conflict at the radius
//! the run stopped at, and a resolved state never holds more than `k` centers.
//!
//! The coverage scan never restarts, and this relies on the scan following
//! arrival order. Neighborhoods are taken over the whole batch, so a point that
//! fails the density test once fails for the rest of the epoch; a restarted
//! scan would revisit the same arrival-ordered candidates, skip the ones the
//! new center covers, and reach the next promotion at the same point the
//! continued scan does. Under any other visiting order the two strategies
//! could promote different centers.

use std::collections::HashSet;

use rand::prelude::*;

use super::bounds::{estimate_bound_with_policy, Comparison, MIN_SAMPLE};
use super::greedy::{check_radius, greedy, GreedyVariant, Solution};
use super::metric::Euclidean;
use super::neighborhood::collect_within;
use super::point::{dedup_in_order, Point};
use super::radii::generate_radii;
use super::traits::Metric;
use crate::error::{Error, Result};

/// Conflict threshold as a multiple of the current radius.
pub const CONFLICT_FACTOR: f64 = 8.0;

/// A center and the support set that justified promoting it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Center {
    /// The center itself.
    pub point: Point,
    /// At most `outlier_count + 1` neighbors, center first.
    pub support: Vec<Point>,
}

/// How a streaming run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Every point is covered by at most `k` streaming centers.
    Covered,
    /// The greedy clusterer placed the remaining centers within the outlier budget.
    Finalized,
    /// The radius sequence ran out first (also the state before any batch).
    Unresolved,
}

/// Live state of a streaming clustering, threaded from one batch to the next.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusteringResult {
    centers: Vec<Center>,
    radius: f64,
    unclustered: Vec<Point>,
    solution: Option<Solution>,
    termination: Termination,
    /// Centers evicted during the epoch at `radius`; the next merge resumes that epoch.
    evicted: Vec<Point>,
}

/// Points partitioned by center.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    /// `clusters[i]` holds the points claimed by the `i`-th center.
    pub clusters: Vec<Vec<Point>>,
    /// Points no center claimed.
    pub unassigned: Vec<Point>,
}

impl ClusteringResult {
    /// State before the first batch: no centers, nothing pending, radius epochs start at `initial_radius`.
    pub fn empty(initial_radius: f64) -> Self {
        Self {
            centers: Vec::new(),
            radius: initial_radius,
            unclustered: Vec::new(),
            solution: None,
            termination: Termination::Unresolved,
            evicted: Vec::new(),
        }
    }

    /// Streaming centers with their support sets, oldest first.
    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    /// Streaming center points, oldest first.
    pub fn center_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.centers.iter().map(|c| &c.point)
    }

    /// Support set recorded for `center`, if it is a streaming center.
    pub fn support(&self, center: &Point) -> Option<&[Point]> {
        self.centers
            .iter()
            .find(|c| c.point == *center)
            .map(|c| c.support.as_slice())
    }

    /// Radius the last run stopped at.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Points neither covered nor promoted.
    pub fn unclustered(&self) -> &[Point] {
        &self.unclustered
    }

    /// Greedy completion of the last run, present only when it [`Termination::Finalized`].
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// How the last run ended.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Whether the last run satisfied the outlier budget.
    pub fn is_resolved(&self) -> bool {
        self.termination != Termination::Unresolved
    }

    /// Streaming centers followed by any finalize centers.
    pub fn all_centers(&self) -> Vec<Point> {
        let mut out: Vec<Point> = self.center_points().copied().collect();
        if let Some(sol) = &self.solution {
            out.extend(sol.centers.iter().copied());
        }
        out
    }

    /// Partition `points` among [`all_centers`](Self::all_centers).
    ///
    /// Each center in turn claims every unclaimed point strictly within
    /// `scale * radius`, so a point lands in at most one cluster.
    pub fn assign<M: Metric>(&self, points: &[Point], scale: f64, metric: &M) -> Assignment {
        let reach = scale * self.radius;
        let mut remaining = dedup_in_order(points.iter().copied());
        let mut clusters = Vec::new();
        for center in self.all_centers() {
            let (claimed, rest): (Vec<Point>, Vec<Point>) = remaining
                .into_iter()
                .partition(|p| metric.distance(&center, p) < reach);
            clusters.push(claimed);
            remaining = rest;
        }
        Assignment {
            clusters,
            unassigned: remaining,
        }
    }
}

/// Whether two centers' radius claims are inconsistent at `threshold`.
///
/// True when a support point of either center lies farther than `threshold`
/// from the other center.
pub fn check_conflict<M: Metric>(a: &Center, b: &Center, threshold: f64, metric: &M) -> bool {
    a.support
        .iter()
        .any(|s| metric.distance(&b.point, s) > threshold)
        || b
            .support
            .iter()
            .any(|s| metric.distance(&a.point, s) > threshold)
}

/// Evict every center that conflicts with a surviving earlier one at `8 * radius`.
///
/// Returns the evicted centers in their original order.
pub fn resolve_conflicts<M: Metric>(
    centers: &mut Vec<Center>,
    radius: f64,
    metric: &M,
) -> Vec<Center> {
    let threshold = CONFLICT_FACTOR * radius;
    let n = centers.len();
    let mut evict = vec![false; n];
    for i in 0..n {
        if evict[i] {
            continue;
        }
        for j in (i + 1)..n {
            if !evict[j] && check_conflict(&centers[i], &centers[j], threshold, metric) {
                evict[j] = true;
            }
        }
    }

    let mut kept = Vec::with_capacity(n);
    let mut evicted = Vec::new();
    for (center, gone) in centers.drain(..).zip(evict) {
        if gone {
            evicted.push(center);
        } else {
            kept.push(center);
        }
    }
    *centers = kept;
    evicted
}

/// Drop every center lying strictly within `reach` of a surviving earlier one.
///
/// Returns how many were dropped.
fn drop_redundant<M: Metric>(centers: &mut Vec<Center>, reach: f64, metric: &M) -> usize {
    let before = centers.len();
    let mut kept: Vec<Center> = Vec::with_capacity(before);
    for center in centers.drain(..) {
        if !kept
            .iter()
            .any(|c| metric.distance(&c.point, &center.point) < reach)
        {
            kept.push(center);
        }
    }
    *centers = kept;
    before - centers.len()
}

fn settle(
    centers: Vec<Center>,
    radius: f64,
    unclustered: Vec<Point>,
    solution: Option<Solution>,
    termination: Termination,
    banned: HashSet<Point>,
) -> ClusteringResult {
    let mut evicted: Vec<Point> = banned.into_iter().collect();
    evicted.sort();
    ClusteringResult {
        centers,
        radius,
        unclustered,
        solution,
        termination,
        evicted,
    }
}

/// Streaming k-center clusterer with an outlier budget.
#[derive(Debug, Clone)]
pub struct StreamingKCenter<M = Euclidean> {
    k: usize,
    outlier_count: usize,
    alpha: f64,
    beta: f64,
    scale: f64,
    batch_size: Option<usize>,
    sample_size: Option<usize>,
    seed: Option<u64>,
    metric: M,
}

impl StreamingKCenter {
    /// Create a streaming clusterer for at most `k` centers and `outlier_count` outliers.
    ///
    /// Defaults: `alpha = 2.0`, `beta = 2.0`, `scale = 4.0`, Euclidean distance.
    pub fn new(k: usize, outlier_count: usize) -> Self {
        Self {
            k,
            outlier_count,
            alpha: 2.0,
            beta: 2.0,
            scale: 4.0,
            batch_size: None,
            sample_size: None,
            seed: None,
            metric: Euclidean,
        }
    }
}

impl<M: Metric> StreamingKCenter<M> {
    /// Set the radius growth factor.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the density neighborhood multiplier used for promotion.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the coverage multiplier: a center covers points within `scale * r`.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the batch size used by [`StreamingKCenter::fit`].
    ///
    /// Defaults to `max(k * outlier_count, k + outlier_count + 1)`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set how many leading points [`StreamingKCenter::fit`] samples for distance bounds.
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
    pub fn with_metric<N: Metric>(self, metric: N) -> StreamingKCenter<N> {
        StreamingKCenter {
            k: self.k,
            outlier_count: self.outlier_count,
            alpha: self.alpha,
            beta: self.beta,
            scale: self.scale,
            batch_size: self.batch_size,
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
        if !(self.beta.is_finite() && self.beta >= 1.0) {
            return Err(Error::InvalidParameter {
                name: "beta",
                message: "must be a finite value of at least 1",
            });
        }
        if !(self.scale.is_finite() && self.scale >= 1.0) {
            return Err(Error::InvalidParameter {
                name: "scale",
                message: "must be a finite value of at least 1",
            });
        }
        if self.batch_size == Some(0) {
            return Err(Error::InvalidParameter {
                name: "batch_size",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Run the radius epochs over `points`, starting from `seed` centers.
    ///
    /// The returned state is [`Termination::Unresolved`] when every radius was
    /// tried without covering the points within the outlier budget.
    pub fn cluster_stream(
        &self,
        points: &[Point],
        radii: &[f64],
        seed: Vec<Center>,
    ) -> Result<ClusteringResult> {
        self.validate()?;
        self.run(points, radii, seed, Vec::new())
    }

    /// Fold a new batch into `prior`.
    ///
    /// Re-examines only the points `prior` left unclustered plus `batch`, with
    /// radii regenerated from the prior stopping radius up to `dmax`. When the
    /// stopping radius already reaches `dmax`, the stopping radius alone is used.
    pub fn merge_batch(
        &self,
        prior: ClusteringResult,
        batch: &[Point],
        dmax: f64,
    ) -> Result<ClusteringResult> {
        self.validate()?;
        let ClusteringResult {
            centers,
            radius,
            unclustered,
            evicted,
            ..
        } = prior;

        let points = dedup_in_order(unclustered.into_iter().chain(batch.iter().copied()));
        let radii = match generate_radii(radius, dmax, self.alpha) {
            Ok(radii) => radii,
            Err(Error::EmptyRadiusSequence { .. }) => {
                tracing::warn!(radius, dmax, "stopping radius reached dmax, staying at it");
                vec![radius]
            }
            Err(e) => return Err(e),
        };

        let carried = if radii.first() == Some(&radius) {
            evicted
        } else {
            Vec::new()
        };
        let result = self.run(&points, &radii, centers, carried)?;
        tracing::info!(
            batch = batch.len(),
            examined = points.len(),
            centers = result.centers.len(),
            unclustered = result.unclustered.len(),
            radius = result.radius,
            termination = ?result.termination,
            "merged batch"
        );
        Ok(result)
    }

    /// Cluster a whole stream: estimate bounds from a leading sample, then merge it batch by batch.
    ///
    /// # Errors
    ///
    /// - [`Error::InsufficientSample`] if fewer than three points are available for bounds.
    /// - [`Error::EmptyRadiusSequence`] if the sampled bounds leave no candidate radius.
    /// - [`Error::InfeasibleRadius`] if the final batch ends unresolved.
    pub fn fit(&self, points: &[Point]) -> Result<ClusteringResult> {
        self.validate()?;
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }

        let (k, z) = (self.k, self.outlier_count);
        let wanted = self
            .sample_size
            .unwrap_or(k.saturating_add(z).saturating_add(1))
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
        // Surface a degenerate sample before any batch work.
        generate_radii(dmin, dmax, self.alpha)?;
        tracing::debug!(dmin, dmax, "sampled distance bounds");

        let batch_size = self
            .batch_size
            .unwrap_or_else(|| k.saturating_mul(z).max(k.saturating_add(z).saturating_add(1)));

        let mut state = ClusteringResult::empty(dmin);
        for batch in points.chunks(batch_size) {
            state = self.merge_batch(state, batch, dmax)?;
        }

        if state.is_resolved() {
            Ok(state)
        } else {
            Err(Error::InfeasibleRadius {
                k,
                outlier_count: z,
                max_radius: state.radius,
            })
        }
    }

    fn run(
        &self,
        points: &[Point],
        radii: &[f64],
        mut centers: Vec<Center>,
        carried: Vec<Point>,
    ) -> Result<ClusteringResult> {
        if radii.is_empty() {
            return Err(Error::InvalidParameter {
                name: "radii",
                message: "must not be empty",
            });
        }
        for &radius in radii {
            check_radius(radius)?;
        }

        let (k, z) = (self.k, self.outlier_count);
        let graph = dedup_in_order(points.iter().copied());
        let mut carried = Some(carried);
        let mut unclustered = Vec::new();
        let mut banned: HashSet<Point> = HashSet::new();

        for &radius in radii {
            banned = carried.take().unwrap_or_default().into_iter().collect();
            let dropped = drop_redundant(&mut centers, self.scale * radius, &self.metric);
            if dropped > 0 {
                tracing::debug!(
                    radius,
                    dropped,
                    surviving = centers.len(),
                    "redundant centers dropped"
                );
            }
            loop {
                unclustered = self.cover(&graph, radius, &mut centers, &banned);
                let evicted = resolve_conflicts(&mut centers, radius, &self.metric);
                if evicted.is_empty() {
                    break;
                }
                tracing::debug!(
                    radius,
                    evicted = evicted.len(),
                    surviving = centers.len(),
                    "conflicting centers evicted"
                );
                banned.extend(evicted.into_iter().map(|c| c.point));
            }

            let l = centers.len();
            if unclustered.is_empty() && l <= k {
                tracing::info!(radius, centers = l, "all points covered");
                return Ok(settle(
                    centers,
                    radius,
                    unclustered,
                    None,
                    Termination::Covered,
                    banned,
                ));
            }

            if l <= k && unclustered.len() < (k - l).saturating_mul(z).saturating_add(z) {
                if let Some(solution) =
                    greedy(&unclustered, k - l, radius, z, GreedyVariant::Streaming, &self.metric)
                {
                    tracing::info!(
                        radius,
                        centers = l,
                        finalize_centers = solution.centers.len(),
                        outliers = solution.unclustered.len(),
                        "finalized with greedy completion"
                    );
                    return Ok(settle(
                        centers,
                        radius,
                        unclustered,
                        Some(solution),
                        Termination::Finalized,
                        banned,
                    ));
                }
            }
            tracing::debug!(
                radius,
                centers = l,
                unclustered = unclustered.len(),
                "radius epoch unresolved"
            );
        }

        Ok(settle(
            centers,
            radii[radii.len() - 1],
            unclustered,
            None,
            Termination::Unresolved,
            banned,
        ))
    }

    /// Coverage pass at `radius`: returns what is left uncovered, promoting new centers along the way.
    fn cover(
        &self,
        graph: &[Point],
        radius: f64,
        centers: &mut Vec<Center>,
        banned: &HashSet<Point>,
    ) -> Vec<Point> {
        let reach = self.scale * radius;
        let z = self.outlier_count;
        let covers = |c: &Point, p: &Point| *p == *c || self.metric.distance(c, p) < reach;

        let candidates: Vec<Point> = graph
            .iter()
            .filter(|p| !centers.iter().any(|c| covers(&c.point, *p)))
            .copied()
            .collect();

        let first_new = centers.len();
        for p in &candidates {
            if banned.contains(p) || centers[first_new..].iter().any(|c| covers(&c.point, p)) {
                continue;
            }
            let hood = collect_within(graph, radius, p, self.beta, &self.metric);
            if hood.len() > z {
                centers.push(Center {
                    point: *p,
                    support: hood.into_iter().take(z + 1).collect(),
                });
            }
        }

        let promoted = &centers[first_new..];
        candidates
            .into_iter()
            .filter(|p| !promoted.iter().any(|c| covers(&c.point, p)))
            .collect()
    }
}
