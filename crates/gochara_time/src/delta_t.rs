//! ΔT = TT − UT estimates.
//!
//! Piecewise polynomials of Espenak & Meeus (NASA Five Millennium Canon,
//! 2006) for 1900–2150, with their long-term parabola outside that span.
//! Good to a few seconds over the modern era, which is far below the
//! resolution of a one-minute transit boundary.

use crate::julian::{J2000_JD, SECONDS_PER_DAY};

/// Decimal Gregorian year for a Julian Date.
pub fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000_JD) / 365.25
}

/// ΔT in seconds at the given UT Julian Date.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    let y = decimal_year(jd_ut);
    if !(1900.0..2150.0).contains(&y) {
        let u = (y - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if y < 1920.0 {
        let t = y - 1900.0;
        -2.79 + 1.494119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
            - 0.000_197 * t.powi(4)
    } else if y < 1941.0 {
        let t = y - 1920.0;
        21.20 + 0.84493 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
            + 0.001_727_5 * t.powi(3)
            + 0.000_651_814 * t.powi(4)
            + 0.000_023_735_99 * t.powi(5)
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
    }
}

/// Convert a UT Julian Date to TT.
pub fn jd_ut_to_jd_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::calendar_to_jd;

    #[test]
    fn modern_values_are_plausible() {
        // Observed: ~56.9 s in 1990, ~63.8 s in 2000, ~69 s in 2020.
        let dt_1990 = delta_t_seconds(calendar_to_jd(1990, 1, 1.5));
        let dt_2000 = delta_t_seconds(J2000_JD);
        let dt_2020 = delta_t_seconds(calendar_to_jd(2020, 1, 1.0));
        assert!((dt_1990 - 56.9).abs() < 0.5, "1990: {dt_1990}");
        assert!((dt_2000 - 63.86).abs() < 0.01, "2000: {dt_2000}");
        assert!((dt_2020 - 71.6).abs() < 3.0, "2020: {dt_2020}");
    }

    #[test]
    fn continuous_across_segment_edges() {
        for year in [1920, 1941, 1961, 1986, 2005, 2050] {
            let jd = calendar_to_jd(year, 1, 1.0);
            let before = delta_t_seconds(jd - 1.0);
            let after = delta_t_seconds(jd + 1.0);
            assert!(
                (before - after).abs() < 2.5,
                "jump at {year}: {before} vs {after}"
            );
        }
    }

    #[test]
    fn tt_is_later_than_ut_in_modern_era() {
        let jd = calendar_to_jd(2024, 6, 1.0);
        assert!(jd_ut_to_jd_tt(jd) > jd);
    }
}
