//! House cusps: Ascendant, MC, Placidus, and Porphyry.
//!
//! RAMC is the local sidereal time; the obliquity is the IAU 2006 mean
//! obliquity of date. All inputs and outputs are degrees.
//!
//! Placidus: a point lies on the 11th/12th cusp when it has covered
//! 1/3 or 2/3 of its diurnal semi-arc before culminating, and on the
//! 2nd/3rd cusp when it is 2/3 or 1/3 of its nocturnal semi-arc past the
//! lower meridian. Each cusp is found by fixed-point iteration on the
//! right ascension of an ecliptic point.

use gochara_time::{jd_ut_to_jd_tt, julian_centuries_tt, local_sidereal_time_rad};
use tracing::warn;

use crate::error::EphemerisError;
use crate::provider::{GeoLocation, HouseCusps, HouseSystem};
use crate::util::normalize_deg;

/// Placidus is undefined beyond this absolute latitude (parts of the
/// ecliptic become circumpolar).
pub const PLACIDUS_LATITUDE_LIMIT_DEG: f64 = 66.5;

const MAX_ITERATIONS: u32 = 100;
const CONVERGENCE_DEG: f64 = 1e-10;

/// Mean obliquity of the ecliptic (IAU 2006), degrees, at a TT Julian Date.
pub fn mean_obliquity_deg(jd_tt: f64) -> f64 {
    let t = julian_centuries_tt(jd_tt);
    let arcsec = 84381.406 + t * (-46.836769 + t * (-0.0001831 + t * 0.00200340));
    arcsec / 3600.0
}

/// Ascendant and MC ecliptic longitudes from RAMC, obliquity, and latitude.
pub fn ascendant_and_mc(ramc_deg: f64, obliquity_deg: f64, latitude_deg: f64) -> (f64, f64) {
    let ramc = ramc_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();

    let asc = ramc
        .cos()
        .atan2(-(ramc.sin() * eps.cos() + phi.tan() * eps.sin()));
    let mc = ramc.sin().atan2(ramc.cos() * eps.cos());
    (normalize_deg(asc.to_degrees()), normalize_deg(mc.to_degrees()))
}

/// Declination of the ecliptic point with right ascension `ra_deg`.
fn ecliptic_declination_deg(ra_deg: f64, eps_deg: f64) -> f64 {
    (eps_deg.to_radians().tan() * ra_deg.to_radians().sin())
        .atan()
        .to_degrees()
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra_deg`.
fn ecliptic_longitude_from_ra(ra_deg: f64, eps_deg: f64) -> f64 {
    let ra = ra_deg.to_radians();
    normalize_deg(ra.sin().atan2(ra.cos() * eps_deg.to_radians().cos()).to_degrees())
}

/// Diurnal semi-arc in degrees for a declination at a latitude.
fn diurnal_semi_arc_deg(dec_deg: f64, latitude_deg: f64) -> f64 {
    let x = -latitude_deg.to_radians().tan() * dec_deg.to_radians().tan();
    x.clamp(-1.0, 1.0).acos().to_degrees()
}

/// One intermediate Placidus cusp.
///
/// `fraction` is 1/3 or 2/3; `above` selects the 11th/12th (diurnal) side,
/// otherwise the 2nd/3rd (nocturnal) side.
fn placidus_cusp(
    ramc: f64,
    eps: f64,
    latitude: f64,
    fraction: f64,
    above: bool,
) -> Result<f64, EphemerisError> {
    let mut ra = if above {
        ramc + 90.0 * fraction
    } else {
        ramc + 180.0 - 90.0 * (1.0 - fraction)
    };
    for _ in 0..MAX_ITERATIONS {
        let dsa = diurnal_semi_arc_deg(ecliptic_declination_deg(ra, eps), latitude);
        let next = if above {
            ramc + fraction * dsa
        } else {
            ramc + 180.0 - (1.0 - fraction) * (180.0 - dsa)
        };
        if (next - ra).abs() < CONVERGENCE_DEG {
            return Ok(ecliptic_longitude_from_ra(next, eps));
        }
        ra = next;
    }
    Err(EphemerisError::NoConvergence("placidus cusp iteration"))
}

/// Placidus cusps for houses 1..=12.
pub fn placidus_cusps(
    ramc_deg: f64,
    obliquity_deg: f64,
    latitude_deg: f64,
) -> Result<[f64; 12], EphemerisError> {
    if latitude_deg.abs() > PLACIDUS_LATITUDE_LIMIT_DEG {
        return Err(EphemerisError::InvalidLocation(
            "Placidus houses are undefined beyond ±66.5° latitude",
        ));
    }
    let ramc = normalize_deg(ramc_deg);
    let (asc, mc) = ascendant_and_mc(ramc, obliquity_deg, latitude_deg);

    let c11 = placidus_cusp(ramc, obliquity_deg, latitude_deg, 1.0 / 3.0, true)?;
    let c12 = placidus_cusp(ramc, obliquity_deg, latitude_deg, 2.0 / 3.0, true)?;
    let c2 = placidus_cusp(ramc, obliquity_deg, latitude_deg, 1.0 / 3.0, false)?;
    let c3 = placidus_cusp(ramc, obliquity_deg, latitude_deg, 2.0 / 3.0, false)?;

    Ok(with_opposites(asc, c2, c3, mc, c11, c12))
}

/// Porphyry cusps: each quadrant between the angles split in three.
pub fn porphyry_cusps(ascendant_deg: f64, mc_deg: f64) -> [f64; 12] {
    let ic = normalize_deg(mc_deg + 180.0);
    let upper = normalize_deg(ascendant_deg - mc_deg);
    let lower = normalize_deg(ic - ascendant_deg);
    let c11 = normalize_deg(mc_deg + upper / 3.0);
    let c12 = normalize_deg(mc_deg + 2.0 * upper / 3.0);
    let c2 = normalize_deg(ascendant_deg + lower / 3.0);
    let c3 = normalize_deg(ascendant_deg + 2.0 * lower / 3.0);
    with_opposites(ascendant_deg, c2, c3, mc_deg, c11, c12)
}

fn with_opposites(asc: f64, c2: f64, c3: f64, mc: f64, c11: f64, c12: f64) -> [f64; 12] {
    let opp = |x: f64| normalize_deg(x + 180.0);
    [
        asc,
        c2,
        c3,
        opp(mc),
        opp(c11),
        opp(c12),
        opp(asc),
        opp(c2),
        opp(c3),
        mc,
        c11,
        c12,
    ]
}

/// Tropical houses for a UT Julian Date and location.
///
/// Falls back to Porphyry (with a warning) where Placidus is undefined.
pub fn compute_houses(jd_ut: f64, location: GeoLocation) -> Result<HouseCusps, EphemerisError> {
    location
        .validate()
        .map_err(EphemerisError::InvalidLocation)?;
    let ramc = local_sidereal_time_rad(jd_ut, location.longitude_deg).to_degrees();
    let eps = mean_obliquity_deg(jd_ut_to_jd_tt(jd_ut));
    let (asc, mc) = ascendant_and_mc(ramc, eps, location.latitude_deg);

    let (cusps, system) = match placidus_cusps(ramc, eps, location.latitude_deg) {
        Ok(c) => (c, HouseSystem::Placidus),
        Err(err) => {
            warn!(
                latitude = location.latitude_deg,
                %err,
                "Placidus unavailable, using Porphyry cusps"
            );
            (porphyry_cusps(asc, mc), HouseSystem::Porphyry)
        }
    };
    Ok(HouseCusps {
        cusps,
        ascendant_deg: asc,
        mc_deg: mc,
        system,
    })
}
