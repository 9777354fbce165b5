//! k-center clustering with outliers.
//!
//! `kcenter` picks at most `k` centers over a set of planar points so that all but
//! `outlier_count` points lie within a discovered covering radius of some center.
//!
//! The primary public API is under [`cluster`], which provides:
//! - bound estimation and geometric radius candidates
//! - an offline greedy clusterer ([`KCenter`])
//! - a streaming clusterer with conflict resolution and batch merging ([`StreamingKCenter`])

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    check_conflict, collect_within, count_within, estimate_bound, estimate_bound_with_policy,
    generate_radii, resolve_conflicts, Assignment, Center, ClusteringResult, Comparison,
    Euclidean, GreedyVariant, Haversine, KCenter, Metric, Point, Solution, StreamingKCenter,
    Termination, ZeroPolicy, CONFLICT_FACTOR, RADIUS_FLOOR,
};
pub use error::{Error, Result};
