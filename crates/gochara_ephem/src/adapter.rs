//! Thread-safe ephemeris adapter.
//!
//! The provider's sidereal mode is global state. Each query takes the lock,
//! switches the mode, computes, and reads the result before releasing, so
//! concurrent scans under different ayanamsas never observe each other's
//! mode. The lock is held for one query only, never for a whole scan.

use std::sync::atomic::{AtomicU64, Ordering};

use gochara_time::Instant;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::analytic::AnalyticEphemeris;
use crate::ayanamsa::Ayanamsa;
use crate::body::Body;
use crate::error::EphemerisError;
use crate::provider::{EphemerisProvider, GeoLocation, HouseCusps};
use crate::util::normalize_deg;

/// Read-only view of sidereal positions, as consumed by chart building
/// and rule evaluation.
pub trait SiderealSource: Sync {
    /// Sidereal ecliptic longitude in degrees [0, 360).
    fn longitude(&self, at: Instant, body: Body, ayanamsa: Ayanamsa)
    -> Result<f64, EphemerisError>;

    /// Sidereal house cusps and angles for a location.
    fn houses(
        &self,
        _at: Instant,
        _location: GeoLocation,
        _ayanamsa: Ayanamsa,
    ) -> Result<HouseCusps, EphemerisError> {
        Err(EphemerisError::HousesUnavailable)
    }
}

/// Serialising wrapper around an [`EphemerisProvider`].
#[derive(Debug)]
pub struct Ephemeris<P> {
    provider: Mutex<P>,
    fallback: Ayanamsa,
    degradations: AtomicU64,
    queries: AtomicU64,
}

impl Ephemeris<AnalyticEphemeris> {
    /// Adapter over the built-in analytic provider.
    pub fn analytic() -> Self {
        Self::new(AnalyticEphemeris::new())
    }
}

impl<P: EphemerisProvider> Ephemeris<P> {
    pub fn new(provider: P) -> Self {
        Self::with_fallback(provider, Ayanamsa::DEFAULT_FALLBACK)
    }

    /// Adapter that degrades to `fallback` when a requested mode is rejected.
    pub fn with_fallback(provider: P, fallback: Ayanamsa) -> Self {
        Self {
            provider: Mutex::new(provider),
            fallback,
            degradations: AtomicU64::new(0),
            queries: AtomicU64::new(0),
        }
    }

    /// Number of queries answered under the fallback mode.
    pub fn degradations(&self) -> u64 {
        self.degradations.load(Ordering::Relaxed)
    }

    /// Number of provider round-trips made so far.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Sidereal longitude of `body` at `at` under `ayanamsa`.
    pub fn position(
        &self,
        at: Instant,
        body: Body,
        ayanamsa: Ayanamsa,
    ) -> Result<f64, EphemerisError> {
        if body.is_location_dependent() {
            return Err(EphemerisError::NeedsLocation(body));
        }
        let jd = at.to_jd_utc();
        self.queries.fetch_add(1, Ordering::Relaxed);

        let mut provider = self.provider.lock();
        self.select_mode(&mut *provider, ayanamsa)?;
        let tropical = provider.tropical_longitude(jd, body)?;
        let offset = provider.ayanamsa_deg(jd)?;
        drop(provider);

        Ok(normalize_deg(tropical - offset))
    }

    /// Sidereal house cusps (Placidus, Porphyry at polar latitudes).
    pub fn houses(
        &self,
        at: Instant,
        location: GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<HouseCusps, EphemerisError> {
        let jd = at.to_jd_utc();
        self.queries.fetch_add(1, Ordering::Relaxed);

        let mut provider = self.provider.lock();
        self.select_mode(&mut *provider, ayanamsa)?;
        let tropical = provider.houses(jd, location)?;
        let offset = provider.ayanamsa_deg(jd)?;
        drop(provider);

        Ok(tropical.shifted(offset))
    }

    /// Sidereal ascendant longitude.
    pub fn ascendant(
        &self,
        at: Instant,
        location: GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<f64, EphemerisError> {
        Ok(self.houses(at, location, ayanamsa)?.ascendant_deg)
    }

    /// Put the provider in `requested` mode, degrading to the fallback.
    fn select_mode(&self, provider: &mut P, requested: Ayanamsa) -> Result<Ayanamsa, EphemerisError> {
        match provider.set_sidereal_mode(requested) {
            Ok(()) => Ok(requested),
            Err(EphemerisError::UnsupportedAyanamsa(_)) => {
                let previous = self.degradations.fetch_add(1, Ordering::Relaxed);
                if previous == 0 {
                    warn!(
                        requested = %requested,
                        fallback = %self.fallback,
                        "ayanamsa not supported by provider, falling back"
                    );
                } else {
                    debug!(requested = %requested, fallback = %self.fallback, "ayanamsa fallback");
                }
                provider.set_sidereal_mode(self.fallback)?;
                Ok(self.fallback)
            }
            Err(e) => Err(e),
        }
    }
}

impl<P: EphemerisProvider> SiderealSource for Ephemeris<P> {
    fn longitude(
        &self,
        at: Instant,
        body: Body,
        ayanamsa: Ayanamsa,
    ) -> Result<f64, EphemerisError> {
        self.position(at, body, ayanamsa)
    }

    fn houses(
        &self,
        at: Instant,
        location: GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<HouseCusps, EphemerisError> {
        Ephemeris::houses(self, at, location, ayanamsa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birth() -> Instant {
        Instant::from_utc(1990, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn sidereal_is_tropical_minus_ayanamsa() {
        let eph = Ephemeris::analytic();
        let trop = eph.position(birth(), Body::Sun, Ayanamsa::Tropical).unwrap();
        let sid = eph.position(birth(), Body::Sun, Ayanamsa::Lahiri).unwrap();
        let diff = normalize_deg(trop - sid);
        assert!((diff - 23.713).abs() < 0.001, "diff = {diff}");
        assert_eq!(eph.degradations(), 0);
        assert_eq!(eph.queries(), 2);
    }

    #[test]
    fn unsupported_mode_falls_back_to_lahiri() {
        let eph = Ephemeris::new(AnalyticEphemeris::with_supported(&[
            Ayanamsa::Lahiri,
            Ayanamsa::Tropical,
        ]));
        let kp = eph.position(birth(), Body::Moon, Ayanamsa::KpOld).unwrap();
        let lahiri = eph.position(birth(), Body::Moon, Ayanamsa::Lahiri).unwrap();
        assert_eq!(kp, lahiri);
        assert_eq!(eph.degradations(), 1);
    }

    #[test]
    fn ascendant_is_not_a_plain_position() {
        let eph = Ephemeris::analytic();
        assert_eq!(
            eph.position(birth(), Body::Ascendant, Ayanamsa::Lahiri),
            Err(EphemerisError::NeedsLocation(Body::Ascendant))
        );
        let asc = eph
            .ascendant(birth(), GeoLocation::new(28.6139, 77.2090), Ayanamsa::Lahiri)
            .unwrap();
        assert!((0.0..360.0).contains(&asc));
    }

    #[test]
    fn out_of_range_is_an_error_not_a_degradation() {
        let eph = Ephemeris::analytic();
        let far = Instant::from_utc(2500, 1, 1, 0, 0, 0).unwrap();
        assert!(eph.position(far, Body::Sun, Ayanamsa::Lahiri).is_err());
        assert_eq!(eph.degradations(), 0);
    }
}
