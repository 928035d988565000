//! Longitude wrap-around arithmetic.
//!
//! Longitudes are plain `f64` degrees. None of these functions clamp
//! latitude or validate their input beyond what is documented.

use crate::error::{CoverageError, CoverageResult};

/// Equivalent longitude in the range `[0, 360)`.
pub fn constrain_longitude_360(value: f64) -> f64 {
    let val = value % 360.0;
    let val = if val < 0.0 { val + 360.0 } else { val };
    // Tiny negative inputs round up to exactly 360
    if val >= 360.0 {
        0.0
    } else {
        val
    }
}

/// Equivalent longitude in the range `(-180, 180]`.
pub fn constrain_longitude_180(value: f64) -> f64 {
    let val = constrain_longitude_360(value);
    if val > 180.0 {
        val - 360.0
    } else {
        val
    }
}

/// The first longitude at or east of `reference` that is equivalent to `target`.
///
/// The result lies in `[reference, reference + 360)`.
pub fn next_equivalent_longitude(reference: f64, target: f64) -> f64 {
    reference + constrain_longitude_360(target - reference)
}

/// The longitude equivalent to `longitude` that is closest to `target`.
///
/// Ties go to the eastern candidate.
pub fn nearest_equivalent_longitude(target: f64, longitude: f64) -> f64 {
    let lon1 = next_equivalent_longitude(target, longitude);
    let lon2 = lon1 - 360.0;
    if (target - lon1).abs() <= (target - lon2).abs() {
        lon1
    } else {
        lon2
    }
}

/// Equivalent of `test` minimising `|reference - test|`.
///
/// The result is not necessarily within `[-180, 180]`. Fails if `reference`
/// itself is outside `[-180, 180]`.
pub fn harmonize_longitudes(reference: f64, test: f64) -> CoverageResult<f64> {
    if !(-180.0..=180.0).contains(&reference) {
        return Err(CoverageError::invalid_argument(format!(
            "reference longitude {} must be in the range [-180,180]",
            reference
        )));
    }
    let lon1 = constrain_longitude_180(test);
    let lon2 = if reference < 0.0 {
        lon1 - 360.0
    } else {
        lon1 + 360.0
    };
    if (reference - lon1).abs() < (reference - lon2).abs() {
        Ok(lon1)
    } else {
        Ok(lon2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_360() {
        assert_eq!(constrain_longitude_360(-90.0), 270.0);
        assert_eq!(constrain_longitude_360(360.0), 0.0);
        assert_eq!(constrain_longitude_360(725.0), 5.0);
    }

    #[test]
    fn test_constrain_360_tiny_negative_stays_below_360() {
        for v in [-1e-17, -1e-300, -f64::MIN_POSITIVE, -360.0 - 1e-14] {
            let c = constrain_longitude_360(v);
            assert!((0.0..360.0).contains(&c), "{} constrained to {}", v, c);
        }
        assert_eq!(constrain_longitude_360(-1e-17), 0.0);
    }

    #[test]
    fn test_constrain_180() {
        assert_eq!(constrain_longitude_180(180.0), 180.0);
        assert_eq!(constrain_longitude_180(-180.0), 180.0);
        assert_eq!(constrain_longitude_180(270.0), -90.0);
        assert_eq!(constrain_longitude_180(-190.0), 170.0);
    }

    #[test]
    fn test_next_equivalent() {
        assert_eq!(next_equivalent_longitude(100.0, 0.0), 360.0);
        assert_eq!(next_equivalent_longitude(100.0, 460.0), 100.0);
        assert_eq!(next_equivalent_longitude(-20.0, -30.0), 330.0);
    }

    #[test]
    fn test_nearest_equivalent() {
        assert_eq!(nearest_equivalent_longitude(170.0, -170.0), 190.0);
        assert_eq!(nearest_equivalent_longitude(-170.0, 170.0), -190.0);
        assert_eq!(nearest_equivalent_longitude(0.0, 10.0), 10.0);
        // equidistant candidates: 180 and -180
        assert_eq!(nearest_equivalent_longitude(0.0, 180.0), 180.0);
    }

    #[test]
    fn test_harmonize() {
        assert_eq!(harmonize_longitudes(179.0, -179.0).unwrap(), 181.0);
        assert_eq!(harmonize_longitudes(-179.0, 179.0).unwrap(), -181.0);
        assert_eq!(harmonize_longitudes(10.0, 20.0).unwrap(), 20.0);
        assert!(harmonize_longitudes(200.0, 0.0).is_err());
    }
}
