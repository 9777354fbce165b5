//! Geometric radius candidates.

use super::bounds::RADIUS_FLOOR;
use crate::error::{Error, Result};

/// Candidate covering radii `dmin, dmin * alpha, dmin * alpha^2, ...` strictly below `dmax`.
///
/// A zero `dmin` is replaced by [`RADIUS_FLOOR`].
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `alpha <= 1`, or a bound is negative or not finite.
/// - [`Error::EmptyRadiusSequence`] if no candidate lies below `dmax`.
pub fn generate_radii(dmin: f64, dmax: f64, alpha: f64) -> Result<Vec<f64>> {
    if !(alpha.is_finite() && alpha > 1.0) {
        return Err(Error::InvalidParameter {
            name: "alpha",
            message: "must be a finite value greater than 1",
        });
    }
    if !(dmin.is_finite() && dmin >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "dmin",
            message: "must be finite and non-negative",
        });
    }
    if !(dmax.is_finite() && dmax >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "dmax",
            message: "must be finite and non-negative",
        });
    }

    let mut radius = if dmin == 0.0 { RADIUS_FLOOR } else { dmin };
    let mut radii = Vec::new();
    while radius < dmax {
        radii.push(radius);
        radius *= alpha;
    }

    if radii.is_empty() {
        return Err(Error::EmptyRadiusSequence { dmin, dmax });
    }
    Ok(radii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometric_sequence() {
        let radii = generate_radii(1.0, 10.0, 2.0).unwrap();
        assert_eq!(radii, vec![1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_stops_before_dmax() {
        let radii = generate_radii(1.0, 8.0, 2.0).unwrap();
        assert_eq!(radii, vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_strictly_increasing() {
        let radii = generate_radii(0.3, 500.0, 1.1).unwrap();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
        assert!(*radii.last().unwrap() < 500.0);
        assert_eq!(radii[0], 0.3);
    }

    #[test]
    fn test_zero_dmin_uses_floor() {
        let radii = generate_radii(0.0, 1.0, 2.0).unwrap();
        assert_eq!(radii[0], RADIUS_FLOOR);
    }

    #[test]
    fn test_empty_when_dmin_not_below_dmax() {
        assert!(matches!(
            generate_radii(5.0, 5.0, 2.0),
            Err(Error::EmptyRadiusSequence { .. })
        ));
        assert!(matches!(
            generate_radii(6.0, 5.0, 2.0),
            Err(Error::EmptyRadiusSequence { .. })
        ));
        // The floor can exceed a tiny dmax.
        assert!(matches!(
            generate_radii(0.0, 0.05, 2.0),
            Err(Error::EmptyRadiusSequence { .. })
        ));
    }

    #[test]
    fn test_invalid_alpha() {
        assert!(generate_radii(1.0, 10.0, 1.0).is_err());
        assert!(generate_radii(1.0, 10.0, 0.5).is_err());
        assert!(generate_radii(1.0, 10.0, f64::NAN).is_err());
        assert!(generate_radii(-1.0, 10.0, 2.0).is_err());
    }
}
