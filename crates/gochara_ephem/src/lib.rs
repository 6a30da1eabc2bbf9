//! Ephemeris layer for transit scanning.
//!
//! This crate provides:
//! - `Body` and `Ayanamsa` enumerations
//! - `EphemerisProvider`, the boundary to a position source that keeps a
//!   single global sidereal mode
//! - `AnalyticEphemeris`, a built-in low-precision provider
//! - Placidus / Porphyry house cusps
//! - `Ephemeris`, the thread-safe adapter answering "sidereal longitude of
//!   body B at instant T under ayanamsa A"

pub mod adapter;
pub mod analytic;
pub mod ayanamsa;
pub mod body;
pub mod error;
pub mod houses;
pub mod provider;
pub mod util;

pub use adapter::{Ephemeris, SiderealSource};
pub use analytic::{AnalyticEphemeris, VALID_JD_RANGE};
pub use ayanamsa::{Ayanamsa, general_precession_deg};
pub use body::Body;
pub use error::EphemerisError;
pub use houses::{
    PLACIDUS_LATITUDE_LIMIT_DEG, ascendant_and_mc, compute_houses, mean_obliquity_deg,
    placidus_cusps, porphyry_cusps,
};
pub use provider::{EphemerisProvider, GeoLocation, HouseCusps, HouseSystem};
pub use util::{angular_separation_deg, normalize_deg};
