use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gochara_ephem::{Ayanamsa, Ephemeris, GeoLocation};
use gochara_time::Instant;
use gochara_vedic::{
    HouseClass, NatalChartBuilder, nakshatra_from_longitude, navamsa_sign, sign_and_degree,
};

fn zodiac_bench(c: &mut Criterion) {
    let lon = 123.456;

    let mut group = c.benchmark_group("zodiac");
    group.bench_function("sign_and_degree", |b| b.iter(|| sign_and_degree(black_box(lon))));
    group.bench_function("nakshatra_from_longitude", |b| {
        b.iter(|| nakshatra_from_longitude(black_box(lon)))
    });
    group.bench_function("navamsa_sign", |b| b.iter(|| navamsa_sign(black_box(lon))));
    group.bench_function("panaphara_window", |b| {
        b.iter(|| HouseClass::Panaphara.window_of(black_box(11.2)))
    });
    group.finish();
}

fn natal_bench(c: &mut Criterion) {
    let eph = Ephemeris::analytic();
    let birth = Instant::from_unix_seconds(631_195_200);
    let builder = NatalChartBuilder::new(birth, GeoLocation::new(28.6139, 77.2090))
        .ayanamsa(Ayanamsa::Lahiri);

    let mut group = c.benchmark_group("natal");
    group.bench_function("build_chart", |b| b.iter(|| builder.build(black_box(&eph))));
    group.finish();
}

criterion_group!(benches, zodiac_bench, natal_bench);
criterion_main!(benches);
