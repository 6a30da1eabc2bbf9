//! Error types for natal chart construction.

use gochara_ephem::EphemerisError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// Position or house query failed.
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
    /// Birth location failed validation.
    #[error("invalid birth location: {0}")]
    InvalidLocation(&'static str),
}
