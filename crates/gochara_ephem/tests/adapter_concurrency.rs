//! The adapter must keep each query's (set-mode, compute, read) triad atomic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use gochara_ephem::{
    Ayanamsa, Body, Ephemeris, EphemerisError, EphemerisProvider, GeoLocation, HouseCusps,
};
use gochara_time::Instant;

/// Provider that yields between mode switch and read-back, so any
/// unsynchronised interleaving would corrupt results.
struct SlowGlobalMode {
    mode: Ayanamsa,
    busy: AtomicBool,
}

impl EphemerisProvider for SlowGlobalMode {
    fn set_sidereal_mode(&mut self, mode: Ayanamsa) -> Result<(), EphemerisError> {
        assert!(!self.busy.swap(true, Ordering::SeqCst), "re-entered provider");
        self.mode = mode;
        Ok(())
    }

    fn sidereal_mode(&self) -> Ayanamsa {
        self.mode
    }

    fn tropical_longitude(&mut self, _jd: f64, _body: Body) -> Result<f64, EphemerisError> {
        thread::yield_now();
        Ok(100.0)
    }

    fn ayanamsa_deg(&mut self, _jd: f64) -> Result<f64, EphemerisError> {
        let offset = match self.mode {
            Ayanamsa::Tropical => 0.0,
            Ayanamsa::Lahiri => 20.0,
            Ayanamsa::KpOld => 30.0,
            Ayanamsa::FaganBradley => 40.0,
        };
        self.busy.store(false, Ordering::SeqCst);
        Ok(offset)
    }

    fn houses(&mut self, _jd: f64, _loc: GeoLocation) -> Result<HouseCusps, EphemerisError> {
        Err(EphemerisError::HousesUnavailable)
    }
}

#[test]
fn concurrent_queries_under_different_modes_do_not_interleave() {
    let eph = Ephemeris::new(SlowGlobalMode {
        mode: Ayanamsa::Lahiri,
        busy: AtomicBool::new(false),
    });
    let t = Instant::from_unix_seconds(0);

    thread::scope(|s| {
        for (mode, expected) in [
            (Ayanamsa::Tropical, 100.0),
            (Ayanamsa::Lahiri, 80.0),
            (Ayanamsa::KpOld, 70.0),
            (Ayanamsa::FaganBradley, 60.0),
        ] {
            let eph = &eph;
            s.spawn(move || {
                for _ in 0..500 {
                    let got = eph.position(t, Body::Sun, mode).unwrap();
                    assert_eq!(got, expected, "mode {mode} corrupted");
                }
            });
        }
    });
    assert_eq!(eph.queries(), 2000);
    assert_eq!(eph.degradations(), 0);
}

#[test]
fn analytic_adapter_is_shareable_across_threads() {
    let eph = Ephemeris::analytic();
    let t: Instant = "2010-06-15T06:00:00Z".parse().unwrap();
    let sequential: Vec<f64> = Ayanamsa::ALL
        .iter()
        .map(|&a| eph.position(t, Body::Mars, a).unwrap())
        .collect();

    let parallel: Vec<f64> = thread::scope(|s| {
        let handles: Vec<_> = Ayanamsa::ALL
            .iter()
            .map(|&a| {
                let eph = &eph;
                s.spawn(move || eph.position(t, Body::Mars, a).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}
