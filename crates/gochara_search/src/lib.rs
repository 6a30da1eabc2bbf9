//! Transit rule evaluation and interval search.
//!
//! This crate provides:
//! - The fourteen money/loss rule predicates (`rules`)
//! - A two-phase scanner: coarse sampling, bisection of each boundary,
//!   and merging of near-adjacent intervals (`scanner`)
//! - Flattening of scan output into sorted records and CSV (`assembler`)
//!
//! Rules are pure functions of an instant and an immutable [`NatalChart`];
//! every position comes from a [`gochara_ephem::SiderealSource`].
//!
//! [`NatalChart`]: gochara_vedic::NatalChart

pub mod assembler;
pub mod error;
pub mod rule_types;
pub mod rules;
pub mod scanner;
pub mod scanner_types;

pub use assembler::{EventRecord, NatalRow, assemble, natal_summary, write_csv};
pub use error::ScanError;
pub use rule_types::{Category, Hit, MOON_MAX_STEP_SECS, RuleId};
pub use rules::{CONJUNCTION_ORB_DEG, Sky, TOUCH_TRANSITS, evaluate, evaluate_at};
pub use scanner::{merge_intervals, scan, scan_predicate, scan_signal};
pub use scanner_types::{
    Boundary, DEFAULT_COARSE_STEP_SECS, DEFAULT_FINE_TOLERANCE_SECS, Interval, PredicateScan,
    RefinementAnomaly, ScanConfig, ScanReport, ScanRequest, TransitEvent,
};
