use thiserror::Error;

/// Errors returned by the clustering routines in this crate.
///
/// Every variant is recoverable: callers typically widen the bound sample,
/// raise `k`, or raise the outlier budget and try again.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Bound estimation needs more points than it was given.
    #[error("insufficient sample: need at least {required} points, found {found}")]
    InsufficientSample {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },

    /// No candidate radius satisfied the outlier budget.
    #[error(
        "no feasible radius up to {max_radius} for k = {k} with {outlier_count} outliers"
    )]
    InfeasibleRadius {
        /// Requested number of centers.
        k: usize,
        /// Outlier budget.
        outlier_count: usize,
        /// Largest radius that was evaluated.
        max_radius: f64,
    },

    /// The radius generator produced no candidates.
    #[error("empty radius sequence: dmin {dmin} is not below dmax {dmax}")]
    EmptyRadiusSequence {
        /// Lower bound handed to the generator.
        dmin: f64,
        /// Upper bound handed to the generator.
        dmax: f64,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
