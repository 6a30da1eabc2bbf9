//! Error types for ephemeris queries.

use thiserror::Error;

use crate::ayanamsa::Ayanamsa;
use crate::body::Body;

/// Errors from the ephemeris provider or adapter.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    /// The provider cannot switch to this sidereal mode.
    #[error("ayanamsa {0} is not supported by the ephemeris provider")]
    UnsupportedAyanamsa(Ayanamsa),
    /// Query epoch lies outside the provider's validity span.
    #[error("Julian Date {jd:.5} outside the ephemeris validity range")]
    OutOfRange { jd: f64 },
    /// The body is location-dependent and must be queried with coordinates.
    #[error("{0} depends on observer location; use the house/ascendant query")]
    NeedsLocation(Body),
    /// Latitude/longitude not usable.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
    /// The source does not compute house cusps.
    #[error("house cusps are not available from this source")]
    HousesUnavailable,
    /// Iterative algorithm did not converge.
    #[error("no convergence: {0}")]
    NoConvergence(&'static str),
}
