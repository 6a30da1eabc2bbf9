//! Two-phase transit scanner.
//!
//! Phase 1 samples a predicate every coarse step across the range
//! (both ends included). Each maximal run of true samples becomes a
//! candidate bracketed by the false samples on either side, or by the range
//! edge. Phase 2 bisects each bracketed boundary down to the fine
//! tolerance: the refined start is the earliest instant known true, the
//! refined end the earliest instant known false after the run, giving a
//! half-open interval. Spans whose gap is within the tolerance are merged.
//!
//! Cost is O(range / step + transitions × log2(step / tolerance))
//! predicate evaluations.
//!
//! A predicate failure during the coarse pass aborts the scan. A failure
//! during bisection only affects that one boundary: it is snapped to the
//! coarse sample and recorded as a [`RefinementAnomaly`].

use std::sync::atomic::{AtomicU64, Ordering};

use gochara_ephem::{Ayanamsa, Body, EphemerisError, GeoLocation, HouseCusps, SiderealSource};
use gochara_time::Instant;
use gochara_vedic::NatalChart;
use tracing::{debug, debug_span, info, warn};

use crate::error::ScanError;
use crate::rule_types::{Hit, RuleId};
use crate::rules::evaluate_at;
use crate::scanner_types::{
    Boundary, Interval, PredicateScan, RefinementAnomaly, ScanConfig, ScanReport, ScanRequest,
    TransitEvent,
};

/// Evaluation count and anomalies gathered while scanning one signal.
#[derive(Default)]
struct Tally {
    evaluations: u64,
    anomalies: Vec<RefinementAnomaly>,
}

impl Tally {
    fn anomaly(&mut self, boundary: Boundary, lo: Instant, hi: Instant, reason: ScanError) {
        warn!(
            ?boundary,
            bracket_start = %lo,
            bracket_end = %hi,
            %reason,
            "boundary refinement failed, snapping to coarse sample"
        );
        self.anomalies.push(RefinementAnomaly {
            rule: None,
            boundary,
            bracket: Interval::new(lo, hi),
            snapped_to: hi,
            reason: reason.to_string(),
        });
    }
}

fn sample<T, E, F>(eval: &mut F, tally: &mut Tally, t: Instant) -> Result<Option<T>, ScanError>
where
    F: FnMut(Instant) -> Result<Option<T>, E>,
    E: Into<ScanError>,
{
    tally.evaluations += 1;
    eval(t).map_err(Into::into)
}

/// Bisect a rising edge inside `(lo, hi]`, `lo` false and `hi` true.
fn refine_start<T, E, F>(
    eval: &mut F,
    tally: &mut Tally,
    lo: Instant,
    hi: Instant,
    at_hi: T,
    tolerance: i64,
) -> (Instant, T)
where
    F: FnMut(Instant) -> Result<Option<T>, E>,
    E: Into<ScanError>,
{
    let (mut a, mut b) = (lo, hi);
    let mut best = None;
    while a.seconds_until(b) > tolerance {
        let mid = a.midpoint(b);
        match sample(eval, tally, mid) {
            Ok(Some(payload)) => {
                b = mid;
                best = Some(payload);
            }
            Ok(None) => a = mid,
            Err(e) => {
                tally.anomaly(Boundary::Start, lo, hi, e);
                return (hi, at_hi);
            }
        }
    }
    (b, best.unwrap_or(at_hi))
}

/// Bisect a falling edge inside `(lo, hi]`, `lo` true and `hi` false.
fn refine_end<T, E, F>(
    eval: &mut F,
    tally: &mut Tally,
    lo: Instant,
    hi: Instant,
    tolerance: i64,
) -> Instant
where
    F: FnMut(Instant) -> Result<Option<T>, E>,
    E: Into<ScanError>,
{
    let (mut a, mut b) = (lo, hi);
    while a.seconds_until(b) > tolerance {
        let mid = a.midpoint(b);
        match sample(eval, tally, mid) {
            Ok(Some(_)) => a = mid,
            Ok(None) => b = mid,
            Err(e) => {
                tally.anomaly(Boundary::End, lo, hi, e);
                return hi;
            }
        }
    }
    b
}

/// Scan a payload-carrying signal: `Some(payload)` where the condition
/// holds, `None` where it does not. Each returned span carries the payload
/// observed at its refined start.
pub fn scan_signal<T, E, F>(
    mut eval: F,
    start: Instant,
    end: Instant,
    step_secs: i64,
    config: &ScanConfig,
) -> Result<PredicateScan<T>, ScanError>
where
    F: FnMut(Instant) -> Result<Option<T>, E>,
    E: Into<ScanError>,
{
    config.validate().map_err(ScanError::InvalidConfig)?;
    if step_secs <= 0 {
        return Err(ScanError::InvalidConfig("step_secs must be positive"));
    }
    if start >= end {
        return Err(ScanError::InvalidConfig("scan start must be before scan end"));
    }
    let tolerance = config.fine_tolerance_secs;

    let mut tally = Tally::default();
    let mut spans = Vec::new();
    let mut prev: Option<Instant> = None;
    // (refined start, payload at start, last true coarse sample)
    let mut open: Option<(Instant, T, Instant)> = None;
    let mut t = start;

    loop {
        let value = sample(&mut eval, &mut tally, t)?;
        match (open.take(), value) {
            (None, Some(payload)) => {
                let (s, payload) = match prev {
                    None => (t, payload),
                    Some(lo) => refine_start(&mut eval, &mut tally, lo, t, payload, tolerance),
                };
                open = Some((s, payload, t));
            }
            (Some((s, payload, _)), Some(_)) => open = Some((s, payload, t)),
            (Some((s, payload, last)), None) => {
                let e = refine_end(&mut eval, &mut tally, last, t, tolerance);
                spans.push((Interval::new(s, e), payload));
            }
            (None, None) => {}
        }
        if t >= end {
            break;
        }
        prev = Some(t);
        t = t.saturating_add_seconds(step_secs).min(end);
    }

    if let Some((s, payload, _)) = open {
        // True only at the very end of the range leaves nothing to report.
        if s < end {
            spans.push((Interval::new(s, end), payload));
        }
    }

    Ok(PredicateScan {
        spans: merge_spans(spans, tolerance),
        anomalies: tally.anomalies,
        evaluations: tally.evaluations,
    })
}

/// Scan a boolean predicate with the configured coarse step.
pub fn scan_predicate<E, F>(
    mut pred: F,
    start: Instant,
    end: Instant,
    config: &ScanConfig,
) -> Result<PredicateScan<()>, ScanError>
where
    F: FnMut(Instant) -> Result<bool, E>,
    E: Into<ScanError>,
{
    scan_signal(
        |t| pred(t).map(|held| held.then_some(())),
        start,
        end,
        config.coarse_step_secs,
        config,
    )
}

fn merge_spans<T>(mut spans: Vec<(Interval, T)>, tolerance: i64) -> Vec<(Interval, T)> {
    spans.sort_by_key(|(iv, _)| *iv);
    let mut merged: Vec<(Interval, T)> = Vec::with_capacity(spans.len());
    for (iv, payload) in spans {
        if let Some((last, _)) = merged.last_mut() {
            if last.end.seconds_until(iv.start) <= tolerance {
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push((iv, payload));
    }
    merged
}

/// Merge intervals that overlap or whose gap is at most `tolerance_secs`.
/// Output is sorted by start; applying it twice changes nothing.
pub fn merge_intervals(intervals: Vec<Interval>, tolerance_secs: i64) -> Vec<Interval> {
    merge_spans(intervals.into_iter().map(|iv| (iv, ())).collect(), tolerance_secs)
        .into_iter()
        .map(|(iv, ())| iv)
        .collect()
}

/// Pass-through source that counts position queries.
struct CountingSource<'a, S: ?Sized> {
    inner: &'a S,
    calls: AtomicU64,
}

impl<'a, S: SiderealSource + ?Sized> CountingSource<'a, S> {
    fn new(inner: &'a S) -> Self {
        Self {
            inner,
            calls: AtomicU64::new(0),
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<S: SiderealSource + ?Sized> SiderealSource for CountingSource<'_, S> {
    fn longitude(&self, at: Instant, body: Body, ayanamsa: Ayanamsa) -> Result<f64, EphemerisError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.longitude(at, body, ayanamsa)
    }

    fn houses(
        &self,
        at: Instant,
        location: GeoLocation,
        ayanamsa: Ayanamsa,
    ) -> Result<HouseCusps, EphemerisError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.houses(at, location, ayanamsa)
    }
}

type RuleOutcome = (RuleId, Vec<TransitEvent>, Vec<RefinementAnomaly>);

fn scan_rule<S: SiderealSource + ?Sized>(
    rule: RuleId,
    request: &ScanRequest,
    chart: &NatalChart,
    source: &S,
) -> Result<RuleOutcome, ScanError> {
    let _span = debug_span!("rule", rule = %rule).entered();
    let step = request.config.step_for(rule);

    let outcome = scan_signal::<Hit, EphemerisError, _>(
        |t| evaluate_at(rule, t, chart, source),
        request.start,
        request.end,
        step,
        &request.config,
    )?;

    debug!(
        step_secs = step,
        evaluations = outcome.evaluations,
        events = outcome.spans.len(),
        anomalies = outcome.anomalies.len(),
        "rule scanned"
    );

    let events = outcome
        .spans
        .into_iter()
        .map(|(interval, hit)| TransitEvent { rule, interval, hit })
        .collect();
    let anomalies = outcome
        .anomalies
        .into_iter()
        .map(|a| RefinementAnomaly {
            rule: Some(rule),
            ..a
        })
        .collect();
    Ok((rule, events, anomalies))
}

#[cfg(feature = "parallel")]
fn scan_rules<S: SiderealSource + ?Sized>(
    rules: &[RuleId],
    request: &ScanRequest,
    chart: &NatalChart,
    source: &S,
) -> Vec<Result<RuleOutcome, ScanError>> {
    use rayon::prelude::*;
    rules
        .par_iter()
        .map(|&rule| scan_rule(rule, request, chart, source))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn scan_rules<S: SiderealSource + ?Sized>(
    rules: &[RuleId],
    request: &ScanRequest,
    chart: &NatalChart,
    source: &S,
) -> Vec<Result<RuleOutcome, ScanError>> {
    rules
        .iter()
        .map(|&rule| scan_rule(rule, request, chart, source))
        .collect()
}

/// Scan every enabled rule over the request's range against `chart`.
///
/// Transiting positions use the chart's ayanamsa. Configuration errors are
/// reported before any position is queried.
pub fn scan<S: SiderealSource + ?Sized>(
    request: &ScanRequest,
    chart: &NatalChart,
    source: &S,
) -> Result<ScanReport, ScanError> {
    request.validate().map_err(ScanError::InvalidConfig)?;

    info!(
        rules = request.rules.len(),
        start = %request.start,
        end = %request.end,
        ayanamsa = %chart.ayanamsa(),
        step_secs = request.config.coarse_step_secs,
        tolerance_secs = request.config.fine_tolerance_secs,
        "transit scan started"
    );

    let counted = CountingSource::new(source);
    let rules: Vec<RuleId> = request.rules.iter().copied().collect();

    let mut report = ScanReport::default();
    for outcome in scan_rules(&rules, request, chart, &counted) {
        let (rule, events, anomalies) = outcome?;
        report.events.insert(rule, events);
        report.anomalies.extend(anomalies);
    }
    report.ephemeris_calls = counted.calls();

    info!(
        events = report.total_events(),
        anomalies = report.anomalies.len(),
        ephemeris_calls = report.ephemeris_calls,
        "transit scan finished"
    );
    Ok(report)
}
