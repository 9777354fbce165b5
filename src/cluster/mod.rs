//! k-center clustering with outliers, offline and streaming.
//!
//! ## The Problem
//!
//! Pick at most `k` centers and the smallest radius `r` such that all but
//! `z` points (the outlier budget) lie within `r` of some center. The exact
//! problem is NP-hard; everything here is a constant-factor approximation.
//!
//! ## Pipeline
//!
//! ```text
//! points ──► bounds (dmin, dmax) ──► radii dmin·αⁱ < dmax ──► greedy ──► Solution
//!
//! state + batch ──► union ──► radii from last radius ──► streaming epochs ──► state'
//!      ▲                                                                    │
//!      └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`estimate_bound`]: closest / farthest pair estimate from a sample.
//! - [`generate_radii`]: geometric radius candidates.
//! - [`count_within`] / [`collect_within`]: the neighborhood primitive.
//! - [`KCenter`]: offline greedy clustering over a fixed point set.
//! - [`StreamingKCenter`]: radius epochs with conflict resolution, and batch merging.
//!
//! Distances come from a [`Metric`]; [`Euclidean`] is the default and
//! [`Haversine`] handles longitude/latitude pairs.
//!
//! ## Usage
//!
//! ```rust
//! use kcenter::cluster::{generate_radii, KCenter, Point, StreamingKCenter, ClusteringResult};
//!
//! let data = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.1, 0.1),
//!     Point::new(10.0, 10.0),
//!     Point::new(10.1, 10.1),
//! ];
//!
//! // Offline: first feasible radius wins.
//! let radii = generate_radii(0.05, 20.0, 2.0).unwrap();
//! let solution = KCenter::new(2, 0).cluster_offline(&data, &radii).unwrap();
//! assert_eq!(solution.centers.len(), 2);
//!
//! // Streaming: fold batches into a running state.
//! let model = StreamingKCenter::new(2, 0);
//! let mut state = ClusteringResult::empty(0.05);
//! for batch in data.chunks(2) {
//!     state = model.merge_batch(state, batch, 20.0).unwrap();
//! }
//! assert!(state.is_resolved());
//! ```

mod bounds;
mod greedy;
mod metric;
mod neighborhood;
mod point;
mod radii;
mod streaming;
mod traits;

pub use bounds::{
    estimate_bound, estimate_bound_with_policy, Comparison, ZeroPolicy, MIN_SAMPLE, RADIUS_FLOOR,
};
pub use greedy::{GreedyVariant, KCenter, Solution};
pub use metric::{Euclidean, Haversine, EARTH_RADIUS_KM};
pub use neighborhood::{collect_within, count_within};
pub use point::Point;
pub use radii::generate_radii;
pub use streaming::{
    check_conflict, resolve_conflicts, Assignment, Center, ClusteringResult, StreamingKCenter,
    Termination, CONFLICT_FACTOR,
};
pub use traits::Metric;
