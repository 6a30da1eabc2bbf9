//! Boundary to an ephemeris provider.
//!
//! Providers are modelled on libraries that keep one process-global
//! "current sidereal mode": switching modes mutates provider state, so
//! every method takes `&mut self`. Callers never use a provider directly;
//! [`crate::Ephemeris`] serialises access.

use serde::{Deserialize, Serialize};

use crate::ayanamsa::Ayanamsa;
use crate::body::Body;
use crate::error::EphemerisError;
use crate::util::normalize_deg;

/// Geographic observer location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive.
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive.
    pub longitude_deg: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err("latitude must be within [-90, 90] degrees");
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err("longitude must be within [-180, 180] degrees");
        }
        Ok(())
    }
}

/// House division method actually used for a set of cusps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseSystem {
    Placidus,
    /// Quadrant trisection; substituted where Placidus is undefined.
    Porphyry,
}

/// House cusps plus the angles they derive from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseCusps {
    /// Cusp longitudes for houses 1..=12 (index 0 = house 1), degrees [0, 360).
    pub cusps: [f64; 12],
    pub ascendant_deg: f64,
    pub mc_deg: f64,
    pub system: HouseSystem,
}

impl HouseCusps {
    /// Same cusps with `offset_deg` subtracted (tropical → sidereal).
    pub fn shifted(&self, offset_deg: f64) -> Self {
        let mut cusps = self.cusps;
        for c in &mut cusps {
            *c = normalize_deg(*c - offset_deg);
        }
        Self {
            cusps,
            ascendant_deg: normalize_deg(self.ascendant_deg - offset_deg),
            mc_deg: normalize_deg(self.mc_deg - offset_deg),
            system: self.system,
        }
    }

    /// House (1..=12) whose cusp-bounded sector contains `lon_deg`.
    ///
    /// House `n` spans `[cusp[n], cusp[n+1])` measured forward along the
    /// ecliptic.
    pub fn house_of(&self, lon_deg: f64) -> u8 {
        let lon = normalize_deg(lon_deg);
        for i in 0..12 {
            let start = self.cusps[i];
            let end = self.cusps[(i + 1) % 12];
            let width = normalize_deg(end - start);
            if normalize_deg(lon - start) < width {
                return i as u8 + 1;
            }
        }
        // Degenerate cusps (all equal); place everything in the 1st.
        1
    }
}

/// A source of tropical positions and houses with a global sidereal mode.
pub trait EphemerisProvider: Send {
    /// Switch the provider's global sidereal mode.
    fn set_sidereal_mode(&mut self, mode: Ayanamsa) -> Result<(), EphemerisError>;

    /// Mode currently in effect.
    fn sidereal_mode(&self) -> Ayanamsa;

    /// Geocentric tropical ecliptic longitude (degrees, of date) at a UT Julian Date.
    fn tropical_longitude(&mut self, jd_ut: f64, body: Body) -> Result<f64, EphemerisError>;

    /// Ayanamsa of the current mode at a UT Julian Date, degrees.
    fn ayanamsa_deg(&mut self, jd_ut: f64) -> Result<f64, EphemerisError>;

    /// Tropical house cusps for a location at a UT Julian Date.
    fn houses(&mut self, jd_ut: f64, location: GeoLocation) -> Result<HouseCusps, EphemerisError>;
}
