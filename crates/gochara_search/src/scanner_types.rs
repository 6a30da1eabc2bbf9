//! Types for the transit scanner.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use gochara_time::Instant;
use serde::Serialize;

use crate::rule_types::{Hit, RuleId};

/// Default coarse sampling step: one hour.
pub const DEFAULT_COARSE_STEP_SECS: i64 = 3600;

/// Default boundary precision: one minute.
pub const DEFAULT_FINE_TOLERANCE_SECS: i64 = 60;

/// Sampling and refinement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanConfig {
    /// Coarse sampling step in seconds.
    pub coarse_step_secs: i64,
    /// Bisection stops once a boundary is bracketed this tightly; also the
    /// largest gap closed by interval merging.
    pub fine_tolerance_secs: i64,
    /// Shrink the step for rules that declare a tighter ceiling.
    pub adaptive_step: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            coarse_step_secs: DEFAULT_COARSE_STEP_SECS,
            fine_tolerance_secs: DEFAULT_FINE_TOLERANCE_SECS,
            adaptive_step: true,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.coarse_step_secs <= 0 {
            return Err("coarse_step_secs must be positive");
        }
        if self.fine_tolerance_secs <= 0 {
            return Err("fine_tolerance_secs must be positive");
        }
        if self.fine_tolerance_secs > self.coarse_step_secs {
            return Err("fine_tolerance_secs must not exceed coarse_step_secs");
        }
        Ok(())
    }

    /// Coarse step actually used for `rule`.
    pub fn step_for(&self, rule: RuleId) -> i64 {
        match rule.max_step_secs() {
            Some(cap) if self.adaptive_step => self.coarse_step_secs.min(cap),
            _ => self.coarse_step_secs,
        }
    }
}

/// A scan over one transit range for a set of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub rules: BTreeSet<RuleId>,
    pub start: Instant,
    pub end: Instant,
    pub config: ScanConfig,
}

impl ScanRequest {
    pub fn new(rules: impl IntoIterator<Item = RuleId>, start: Instant, end: Instant) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            start,
            end,
            config: ScanConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.rules.is_empty() {
            return Err("no rules enabled");
        }
        if self.start >= self.end {
            return Err("transit start must be before transit end");
        }
        self.config.validate()
    }
}

/// Half-open time span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Interval {
    pub start: Instant,
    pub end: Instant,
}

impl Interval {
    pub fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }

    pub fn duration_secs(&self) -> i64 {
        self.start.seconds_until(self.end)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs().max(0).unsigned_abs())
    }

    pub fn contains(&self, t: Instant) -> bool {
        self.start <= t && t < self.end
    }
}

/// A finalized interval during which a rule held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitEvent {
    pub rule: RuleId,
    pub interval: Interval,
    /// Payload reported at the interval's refined start.
    pub hit: Hit,
}

impl TransitEvent {
    pub fn duration_secs(&self) -> i64 {
        self.interval.duration_secs()
    }
}

/// Which side of an interval a refinement was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Boundary {
    Start,
    End,
}

/// A boundary that could not be refined and was snapped to the coarse
/// sample instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefinementAnomaly {
    pub rule: Option<RuleId>,
    pub boundary: Boundary,
    /// Coarse bracket `[last sample before, first sample after]`.
    pub bracket: Interval,
    pub snapped_to: Instant,
    pub reason: String,
}

/// Output of the generic two-phase scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateScan<T> {
    /// Merged spans, ascending, each with the payload seen at its start.
    pub spans: Vec<(Interval, T)>,
    pub anomalies: Vec<RefinementAnomaly>,
    /// Number of predicate evaluations, coarse and fine.
    pub evaluations: u64,
}

impl<T> PredicateScan<T> {
    pub fn intervals(&self) -> Vec<Interval> {
        self.spans.iter().map(|(iv, _)| *iv).collect()
    }
}

/// Result of [`crate::scan`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanReport {
    /// Events per enabled rule, ascending by start. Every enabled rule has
    /// an entry, possibly empty.
    pub events: BTreeMap<RuleId, Vec<TransitEvent>>,
    pub anomalies: Vec<RefinementAnomaly>,
    /// Position queries issued during the scan.
    pub ephemeris_calls: u64,
}

impl ScanReport {
    pub fn events_for(&self, rule: RuleId) -> &[TransitEvent] {
        self.events.get(&rule).map_or(&[], Vec::as_slice)
    }

    pub fn total_events(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: i64) -> Instant {
        Instant::from_unix_seconds(s)
    }

    #[test]
    fn defaults_validate() {
        let c = ScanConfig::default();
        assert_eq!(c.coarse_step_secs, 3600);
        assert_eq!(c.fine_tolerance_secs, 60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_steps() {
        let mut c = ScanConfig::default();
        c.coarse_step_secs = 0;
        assert!(c.validate().is_err());

        let mut c = ScanConfig::default();
        c.fine_tolerance_secs = -5;
        assert!(c.validate().is_err());

        let mut c = ScanConfig::default();
        c.fine_tolerance_secs = 7200;
        assert!(c.validate().is_err());
    }

    #[test]
    fn adaptive_step_caps_moon_rules() {
        let c = ScanConfig::default();
        assert_eq!(c.step_for(RuleId::Loss4), 1200);
        assert_eq!(c.step_for(RuleId::Money1), 3600);

        let fixed = ScanConfig {
            adaptive_step: false,
            ..c
        };
        assert_eq!(fixed.step_for(RuleId::Loss4), 3600);

        let fine = ScanConfig {
            coarse_step_secs: 600,
            ..c
        };
        assert_eq!(fine.step_for(RuleId::Loss4), 600);
    }

    #[test]
    fn request_validation() {
        let ok = ScanRequest::new([RuleId::Money1], t(0), t(10));
        assert!(ok.validate().is_ok());
        assert_eq!(
            ScanRequest::new([], t(0), t(10)).validate(),
            Err("no rules enabled")
        );
        assert!(ScanRequest::new([RuleId::Money1], t(10), t(10)).validate().is_err());
        assert!(ScanRequest::new([RuleId::Money1], t(10), t(0)).validate().is_err());
    }

    #[test]
    fn interval_basics() {
        let iv = Interval::new(t(100), t(160));
        assert_eq!(iv.duration_secs(), 60);
        assert_eq!(iv.duration(), Duration::from_secs(60));
        assert!(iv.contains(t(100)));
        assert!(!iv.contains(t(160)));
    }
}
