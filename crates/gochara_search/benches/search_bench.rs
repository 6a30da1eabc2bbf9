use std::convert::Infallible;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gochara_ephem::{Ayanamsa, Ephemeris, GeoLocation};
use gochara_search::{RuleId, ScanConfig, ScanRequest, evaluate_at, scan, scan_predicate};
use gochara_time::Instant;
use gochara_vedic::NatalChartBuilder;

fn engine_bench(c: &mut Criterion) {
    let config = ScanConfig::default();
    let start = Instant::from_unix_seconds(0);
    let end = Instant::from_unix_seconds(365 * 86_400);

    let mut group = c.benchmark_group("scan_predicate");
    group.bench_function("one_year_periodic", |b| {
        b.iter(|| {
            scan_predicate(
                |t: Instant| Ok::<_, Infallible>(t.unix_seconds().rem_euclid(7 * 86_400) < 86_400),
                black_box(start),
                black_box(end),
                &config,
            )
        })
    });
    group.finish();
}

fn rules_bench(c: &mut Criterion) {
    let eph = Ephemeris::analytic();
    let birth = Instant::from_unix_seconds(631_195_200);
    let Ok(chart) = NatalChartBuilder::new(birth, GeoLocation::new(28.6139, 77.2090))
        .ayanamsa(Ayanamsa::Lahiri)
        .build(&eph)
    else {
        return;
    };
    let at = Instant::from_unix_seconds(1_704_067_200);

    let mut group = c.benchmark_group("rules");
    for rule in [RuleId::Money1, RuleId::Money8, RuleId::Loss6] {
        group.bench_function(rule.code(), |b| {
            b.iter(|| evaluate_at(rule, black_box(at), &chart, &eph))
        });
    }
    group.sample_size(10);
    group.bench_function("scan_all_rules_30_days", |b| {
        let end = Instant::from_unix_seconds(1_704_067_200 + 30 * 86_400);
        let request = ScanRequest::new(RuleId::ALL, at, end);
        b.iter(|| scan(black_box(&request), &chart, &eph))
    });
    group.finish();
}

criterion_group!(benches, engine_bench, rules_bench);
criterion_main!(benches);
