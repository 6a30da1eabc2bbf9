//! Earth Rotation Angle, Greenwich Mean Sidereal Time, and local sidereal time.
//!
//! Inputs are UT1 Julian Dates. Callers here pass UTC directly; the
//! sub-second UT1−UTC difference is below the resolution of house cusps
//! used for sign placement.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use std::f64::consts::{PI, TAU};

use crate::julian::J2000_JD;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Earth Rotation Angle in radians [0, 2π).
pub fn earth_rotation_angle_rad(jd_ut1: f64) -> f64 {
    let du = jd_ut1 - J2000_JD;
    (TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du)).rem_euclid(TAU)
}

/// Greenwich Mean Sidereal Time in radians [0, 2π).
pub fn gmst_rad(jd_ut1: f64) -> f64 {
    let t = (jd_ut1 - J2000_JD) / 36_525.0;
    let poly_arcsec = 0.014506
        + t * (4612.156534 + t * (1.3915817 + t * (-0.00000044 + t * (-0.000029956 - t * 0.0000000368))));
    (earth_rotation_angle_rad(jd_ut1) + poly_arcsec * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// Local sidereal time (radians) for an east-positive longitude in degrees.
pub fn local_sidereal_time_rad(jd_ut1: f64, longitude_east_deg: f64) -> f64 {
    (gmst_rad(jd_ut1) + longitude_east_deg.to_radians()).rem_euclid(TAU)
}
