//! Time primitives for transit scanning.
//!
//! This crate provides:
//! - `Instant`, an absolute UTC timestamp with second resolution
//! - Julian Date ↔ calendar conversions
//! - ΔT (TT − UT) estimates for converting civil time to dynamical time
//! - Earth Rotation Angle, GMST, and local sidereal time

pub mod delta_t;
pub mod error;
pub mod instant;
pub mod julian;
pub mod sidereal;

pub use delta_t::{decimal_year, delta_t_seconds, jd_ut_to_jd_tt};
pub use error::TimeError;
pub use instant::Instant;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD, calendar_to_jd, jd_to_calendar,
    julian_centuries_tt,
};
pub use sidereal::{earth_rotation_angle_rad, gmst_rad, local_sidereal_time_rad};
