//! Immutable natal chart and the significators derived from it.

use std::fmt::{Display, Formatter};

use gochara_ephem::{Ayanamsa, Body, GeoLocation, HouseCusps, normalize_deg};
use gochara_time::Instant;
use serde::{Deserialize, Serialize};

use crate::nakshatra::{Nakshatra, nakshatra_from_longitude};
use crate::navamsa::navamsa_sign;
use crate::rashi::{Rashi, sign_and_degree, sign_lord};
use crate::windows::{DegreeWindow, HouseClass};

/// How house numbers are assigned to longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HouseFramework {
    /// House n is the n-th sign counted from the ascendant's sign.
    #[default]
    WholeSign,
    /// House n is the sector between cusp n and cusp n+1.
    Placidus,
}

impl HouseFramework {
    pub const fn name(self) -> &'static str {
        match self {
            Self::WholeSign => "whole-sign",
            Self::Placidus => "placidus",
        }
    }
}

impl Display for HouseFramework {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for HouseFramework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "whole-sign" | "wholesign" | "whole" | "sign" => Ok(Self::WholeSign),
            "placidus" => Ok(Self::Placidus),
            _ => Err(format!("unknown house framework '{s}'")),
        }
    }
}

/// One body's placement in the natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CelestialPosition {
    pub body: Body,
    /// Sidereal longitude in degrees [0, 360).
    pub longitude: f64,
    pub rashi: Rashi,
    pub degree_in_sign: f64,
    pub nakshatra: Nakshatra,
    /// Pada 1..=4.
    pub pada: u8,
    /// D9 sign.
    pub navamsa: Rashi,
    pub whole_sign_house: u8,
    pub placidus_house: u8,
}

impl CelestialPosition {
    fn new(body: Body, longitude: f64, asc_sign: Rashi, cusps: &HouseCusps) -> Self {
        let longitude = normalize_deg(longitude);
        let (rashi, degree_in_sign) = sign_and_degree(longitude);
        let nak = nakshatra_from_longitude(longitude);
        Self {
            body,
            longitude,
            rashi,
            degree_in_sign,
            nakshatra: nak.nakshatra,
            pada: nak.pada,
            navamsa: navamsa_sign(longitude),
            whole_sign_house: asc_sign.distance_to(rashi) + 1,
            placidus_house: cusps.house_of(longitude),
        }
    }

    /// House number under the given framework.
    pub fn house(&self, framework: HouseFramework) -> u8 {
        match framework {
            HouseFramework::WholeSign => self.whole_sign_house,
            HouseFramework::Placidus => self.placidus_house,
        }
    }
}

/// A graha in a Panaphara house and inside a Panaphara degree window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanapharaPlanet {
    pub body: Body,
    pub house: u8,
    pub window: DegreeWindow,
}

/// A lord of the 3rd, 6th, 9th or 12th placed in an Apoklima house.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckyPlanet {
    pub body: Body,
    /// Apoklima houses this body rules, ascending.
    pub lord_of: Vec<u8>,
    pub house: u8,
    /// Also inside an Apoklima degree window.
    pub extremely: bool,
}

impl LuckyPlanet {
    /// Lordship tag such as `6L` or `3L/6L`.
    pub fn lord_label(&self) -> String {
        self.lord_of
            .iter()
            .map(|h| format!("{h}L"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Natal chart: positions for every [`Body`], sidereal cusps, and the
/// significators the transit rules consult. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalChart {
    birth: Instant,
    location: GeoLocation,
    ayanamsa: Ayanamsa,
    framework: HouseFramework,
    positions: [CelestialPosition; 13],
    cusps: HouseCusps,
    house_lords: [Body; 12],
    panaphara_planets: Vec<PanapharaPlanet>,
    d9_second_lord_dispositor: Body,
    lucky_planets: Vec<LuckyPlanet>,
}

impl NatalChart {
    /// Assemble a chart from sidereal longitudes indexed by [`Body::index`]
    /// (the Ascendant included) and sidereal cusps.
    pub fn from_longitudes(
        birth: Instant,
        location: GeoLocation,
        ayanamsa: Ayanamsa,
        framework: HouseFramework,
        longitudes: [f64; 13],
        cusps: HouseCusps,
    ) -> Self {
        let (asc_sign, _) = sign_and_degree(longitudes[Body::Ascendant.index()]);
        let positions =
            Body::ALL.map(|b| CelestialPosition::new(b, longitudes[b.index()], asc_sign, &cusps));
        let house_lords = std::array::from_fn(|i| sign_lord(asc_sign.nth(i as i32 + 1)));

        let mut chart = Self {
            birth,
            location,
            ayanamsa,
            framework,
            positions,
            cusps,
            house_lords,
            panaphara_planets: Vec::new(),
            d9_second_lord_dispositor: Body::Sun,
            lucky_planets: Vec::new(),
        };
        chart.panaphara_planets = chart.find_panaphara_planets();
        chart.d9_second_lord_dispositor = sign_lord(chart.position(chart.house_lord(2)).navamsa);
        chart.lucky_planets = chart.find_lucky_planets();
        chart
    }

    pub fn birth(&self) -> Instant {
        self.birth
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn ayanamsa(&self) -> Ayanamsa {
        self.ayanamsa
    }

    pub fn framework(&self) -> HouseFramework {
        self.framework
    }

    /// Sidereal cusps (Placidus, or Porphyry where Placidus is undefined).
    pub fn cusps(&self) -> &HouseCusps {
        &self.cusps
    }

    pub fn position(&self, body: Body) -> &CelestialPosition {
        &self.positions[body.index()]
    }

    /// All positions in [`Body::ALL`] order.
    pub fn positions(&self) -> &[CelestialPosition; 13] {
        &self.positions
    }

    /// D9 sign of a natal body.
    pub fn navamsa(&self, body: Body) -> Rashi {
        self.position(body).navamsa
    }

    pub fn ascendant_sign(&self) -> Rashi {
        self.position(Body::Ascendant).rashi
    }

    /// Sign of house `n` (1..=12) counted from the ascendant sign.
    pub fn house_sign(&self, n: u8) -> Rashi {
        self.ascendant_sign().nth(i32::from(n))
    }

    /// Lord of house `n` (1..=12); values wrap modulo 12.
    pub fn house_lord(&self, n: u8) -> Body {
        self.house_lords[(usize::from(n) + 11) % 12]
    }

    pub fn house_lords(&self) -> &[Body; 12] {
        &self.house_lords
    }

    /// Signs of the 2nd, 5th, 8th and 11th houses.
    pub fn panaphara_house_signs(&self) -> [Rashi; 4] {
        HouseClass::Panaphara.houses().map(|h| self.house_sign(h))
    }

    /// Signs of the 3rd, 6th, 9th and 12th houses.
    pub fn apoklima_house_signs(&self) -> [Rashi; 4] {
        HouseClass::Apoklima.houses().map(|h| self.house_sign(h))
    }

    /// Natal house of an arbitrary sidereal longitude under the chart's
    /// framework.
    pub fn house_of_longitude(&self, lon_deg: f64) -> u8 {
        match self.framework {
            HouseFramework::WholeSign => {
                let (rashi, _) = sign_and_degree(lon_deg);
                self.ascendant_sign().distance_to(rashi) + 1
            }
            HouseFramework::Placidus => self.cusps.house_of(lon_deg),
        }
    }

    pub fn panaphara_planets(&self) -> &[PanapharaPlanet] {
        &self.panaphara_planets
    }

    pub fn is_panaphara_planet(&self, body: Body) -> bool {
        self.panaphara_planets.iter().any(|p| p.body == body)
    }

    /// Sign lord of the D9 sign occupied by the 2nd lord.
    pub fn d9_second_lord_dispositor(&self) -> Body {
        self.d9_second_lord_dispositor
    }

    /// Lucky and extremely lucky planets, in order of first lordship.
    pub fn lucky_planets(&self) -> &[LuckyPlanet] {
        &self.lucky_planets
    }

    fn find_panaphara_planets(&self) -> Vec<PanapharaPlanet> {
        Body::GRAHAS
            .iter()
            .filter_map(|&body| {
                let pos = self.position(body);
                let house = pos.house(self.framework);
                if !HouseClass::Panaphara.contains_house(house) {
                    return None;
                }
                let window = HouseClass::Panaphara.window_of(pos.degree_in_sign)?;
                Some(PanapharaPlanet { body, house, window })
            })
            .collect()
    }

    fn find_lucky_planets(&self) -> Vec<LuckyPlanet> {
        let mut lords: Vec<(Body, Vec<u8>)> = Vec::new();
        for house in HouseClass::Apoklima.houses() {
            let lord = self.house_lord(house);
            match lords.iter_mut().find(|(b, _)| *b == lord) {
                Some((_, ruled)) => ruled.push(house),
                None => lords.push((lord, vec![house])),
            }
        }

        lords
            .into_iter()
            .filter_map(|(body, lord_of)| {
                let pos = self.position(body);
                let house = pos.house(self.framework);
                HouseClass::Apoklima.contains_house(house).then(|| LuckyPlanet {
                    body,
                    lord_of,
                    house,
                    extremely: HouseClass::Apoklima.window_of(pos.degree_in_sign).is_some(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use gochara_ephem::HouseSystem;

    use super::*;

    /// Equal 30° houses starting at the ascendant.
    fn equal_cusps(asc: f64) -> HouseCusps {
        HouseCusps {
            cusps: std::array::from_fn(|i| normalize_deg(asc + 30.0 * i as f64)),
            ascendant_deg: asc,
            mc_deg: normalize_deg(asc + 270.0),
            system: HouseSystem::Porphyry,
        }
    }

    fn chart_with(asc: f64, placements: &[(Body, f64)]) -> NatalChart {
        // Everything not placed sits on the ascendant.
        let mut lons = [asc; 13];
        for &(b, l) in placements {
            lons[b.index()] = l;
        }
        lons[Body::Ascendant.index()] = asc;
        NatalChart::from_longitudes(
            Instant::from_unix_seconds(0),
            GeoLocation::new(0.0, 0.0),
            Ayanamsa::Lahiri,
            HouseFramework::WholeSign,
            lons,
            equal_cusps(asc),
        )
    }

    #[test]
    fn house_lords_from_aries_rising() {
        let c = chart_with(15.0, &[]);
        assert_eq!(c.ascendant_sign(), Rashi::Mesha);
        assert_eq!(c.house_lord(1), Body::Mars);
        assert_eq!(c.house_lord(2), Body::Venus);
        assert_eq!(c.house_lord(12), Body::Jupiter);
        assert_eq!(
            c.panaphara_house_signs(),
            [Rashi::Vrishabha, Rashi::Simha, Rashi::Vrischika, Rashi::Kumbha]
        );
    }

    #[test]
    fn panaphara_planet_needs_house_and_degree() {
        // Aries rising: Taurus is the 2nd house.
        let c = chart_with(
            15.0,
            &[(Body::Venus, 30.0 + 11.0), (Body::Jupiter, 30.0 + 15.0)],
        );
        assert!(c.is_panaphara_planet(Body::Venus));
        assert!(!c.is_panaphara_planet(Body::Jupiter));
        let v = c.panaphara_planets()[0];
        assert_eq!(v.house, 2);
        assert_eq!(v.window, DegreeWindow::new(10.0, 12.5));
    }

    #[test]
    fn shared_lordship_is_merged() {
        // Aries rising: Mercury rules the 3rd (Gemini) and 6th (Virgo).
        // Place Mercury in Virgo at 6° (Apoklima house, Apoklima degree).
        let c = chart_with(15.0, &[(Body::Mercury, 150.0 + 6.0)]);
        let mercury = c
            .lucky_planets()
            .iter()
            .find(|p| p.body == Body::Mercury)
            .expect("mercury is lucky");
        assert_eq!(mercury.lord_of, vec![3, 6]);
        assert_eq!(mercury.lord_label(), "3L/6L");
        assert!(mercury.extremely);
        assert_eq!(mercury.house, 6);
    }

    #[test]
    fn d9_dispositor_of_second_lord() {
        // Aries rising: 2L Venus; Venus at Mesha 4° → D9 Vrishabha → Venus.
        let c = chart_with(15.0, &[(Body::Venus, 4.0)]);
        assert_eq!(c.navamsa(Body::Venus), Rashi::Vrishabha);
        assert_eq!(c.d9_second_lord_dispositor(), Body::Venus);
    }

    #[test]
    fn transit_house_numbers() {
        let c = chart_with(75.0, &[]);
        assert_eq!(c.house_of_longitude(75.0), 1);
        assert_eq!(c.house_of_longitude(59.9), 12);
        assert_eq!(c.house_of_longitude(90.0), 2);
    }

    #[test]
    fn framework_parsing() {
        assert_eq!(
            "whole_sign".parse::<HouseFramework>(),
            Ok(HouseFramework::WholeSign)
        );
        assert_eq!(
            "Placidus".parse::<HouseFramework>(),
            Ok(HouseFramework::Placidus)
        );
        assert!("koch".parse::<HouseFramework>().is_err());
    }
}
