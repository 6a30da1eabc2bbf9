//! Natal chart construction from a sidereal source.

use gochara_ephem::{Ayanamsa, Body, GeoLocation, SiderealSource};
use gochara_time::Instant;
use tracing::debug;

use crate::chart::{HouseFramework, NatalChart};
use crate::error::ChartError;

/// Builder for [`NatalChart`].
///
/// Defaults: Lahiri ayanamsa, whole-sign houses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NatalChartBuilder {
    birth: Instant,
    location: GeoLocation,
    ayanamsa: Ayanamsa,
    framework: HouseFramework,
}

impl NatalChartBuilder {
    pub fn new(birth: Instant, location: GeoLocation) -> Self {
        Self {
            birth,
            location,
            ayanamsa: Ayanamsa::Lahiri,
            framework: HouseFramework::WholeSign,
        }
    }

    pub fn ayanamsa(mut self, ayanamsa: Ayanamsa) -> Self {
        self.ayanamsa = ayanamsa;
        self
    }

    pub fn framework(mut self, framework: HouseFramework) -> Self {
        self.framework = framework;
        self
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        self.location.validate().map_err(ChartError::InvalidLocation)
    }

    /// Query every body and the house cusps, then derive significators.
    pub fn build<S: SiderealSource + ?Sized>(&self, source: &S) -> Result<NatalChart, ChartError> {
        self.validate()?;

        let cusps = source.houses(self.birth, self.location, self.ayanamsa)?;
        let mut longitudes = [0.0; 13];
        for body in Body::ALL {
            longitudes[body.index()] = match body {
                Body::Ascendant => cusps.ascendant_deg,
                _ => source.longitude(self.birth, body, self.ayanamsa)?,
            };
        }

        let chart = NatalChart::from_longitudes(
            self.birth,
            self.location,
            self.ayanamsa,
            self.framework,
            longitudes,
            cusps,
        );
        debug!(
            birth = %self.birth,
            ascendant = %chart.ascendant_sign(),
            panaphara = chart.panaphara_planets().len(),
            lucky = chart.lucky_planets().len(),
            "natal chart built"
        );
        Ok(chart)
    }
}

/// Build a natal chart with the default framework.
pub fn build_natal_chart<S: SiderealSource + ?Sized>(
    source: &S,
    birth: Instant,
    location: GeoLocation,
    ayanamsa: Ayanamsa,
) -> Result<NatalChart, ChartError> {
    NatalChartBuilder::new(birth, location)
        .ayanamsa(ayanamsa)
        .build(source)
}
