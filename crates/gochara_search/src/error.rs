//! Error types for transit scanning.

use std::convert::Infallible;

use gochara_ephem::EphemerisError;
use gochara_vedic::ChartError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ScanError {
    /// Request rejected before any scanning began.
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(&'static str),
    /// Position query failed during the coarse pass.
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
    #[error("natal chart error: {0}")]
    Chart(#[from] ChartError),
}

impl From<Infallible> for ScanError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}
