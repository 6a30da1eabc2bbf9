//! Sidereal zodiac primitives and the natal chart.
//!
//! This crate provides:
//! - Rashi (sign), nakshatra/pada, and navamsa (D9) lookups
//! - Sign lordship and nakshatra lordship tables
//! - Panaphara / Apoklima house classes and degree windows
//! - `NatalChart`, built once per birth and shared read-only by every rule

pub mod chart;
pub mod chart_builder;
pub mod error;
pub mod nakshatra;
pub mod navamsa;
pub mod rashi;
pub mod windows;

pub use chart::{
    CelestialPosition, HouseFramework, LuckyPlanet, NatalChart, PanapharaPlanet,
};
pub use chart_builder::{NatalChartBuilder, build_natal_chart};
pub use error::ChartError;
pub use nakshatra::{
    ALL_NAKSHATRAS, NAKSHATRA_SPAN, Nakshatra, NakshatraInfo, PADA_SPAN, nakshatra_from_longitude,
    nakshatras_ruled_by,
};
pub use navamsa::{NAVAMSA_SPAN, navamsa_sign};
pub use rashi::{ALL_RASHIS, Rashi, sign_and_degree, sign_lord};
pub use windows::{
    APOKLIMA_WINDOWS, DegreeWindow, HouseClass, PANAPHARA_WINDOWS, apoklima_window,
    format_dms_short, panaphara_window,
};
