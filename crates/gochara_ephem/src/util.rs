//! Angle helpers shared across the workspace.

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Shortest angular distance between two longitudes, in [0, 180].
pub fn angular_separation_deg(a: f64, b: f64) -> f64 {
    let d = normalize_deg(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_ways() {
        assert!((normalize_deg(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_deg(-10.0) - 350.0).abs() < 1e-12);
        assert_eq!(normalize_deg(-1e-18), 0.0);
    }

    #[test]
    fn separation_across_zero() {
        assert!((angular_separation_deg(359.5, 0.5) - 1.0).abs() < 1e-12);
        assert!((angular_separation_deg(10.0, 190.0) - 180.0).abs() < 1e-12);
        assert!((angular_separation_deg(45.0, 44.0) - 1.0).abs() < 1e-12);
    }
}
