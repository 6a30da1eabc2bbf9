use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gochara_ephem::{AnalyticEphemeris, Ayanamsa, Body, Ephemeris, EphemerisProvider, GeoLocation};
use gochara_time::Instant;

fn provider_bench(c: &mut Criterion) {
    let jd = 2_460_000.5;
    let mut eph = AnalyticEphemeris::new();

    let mut group = c.benchmark_group("analytic");
    for body in [Body::Sun, Body::Moon, Body::Saturn, Body::Pluto] {
        group.bench_function(body.name(), |b| {
            b.iter(|| eph.tropical_longitude(black_box(jd), body))
        });
    }
    group.bench_function("placidus_houses", |b| {
        b.iter(|| eph.houses(black_box(jd), GeoLocation::new(28.6139, 77.2090)))
    });
    group.finish();
}

fn adapter_bench(c: &mut Criterion) {
    let eph = Ephemeris::analytic();
    let t = Instant::from_unix_seconds(1_700_000_000);

    let mut group = c.benchmark_group("adapter");
    group.bench_function("moon_lahiri", |b| {
        b.iter(|| eph.position(black_box(t), Body::Moon, Ayanamsa::Lahiri))
    });
    group.bench_function("moon_alternating_modes", |b| {
        b.iter(|| {
            let _ = eph.position(black_box(t), Body::Moon, Ayanamsa::Lahiri);
            eph.position(black_box(t), Body::Moon, Ayanamsa::KpOld)
        })
    });
    group.finish();
}

criterion_group!(benches, provider_bench, adapter_bench);
criterion_main!(benches);
