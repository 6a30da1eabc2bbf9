//! Flattening of scan output into presentation records.

use std::io::Write;

use gochara_time::Instant;
use gochara_vedic::{NatalChart, format_dms_short};
use serde::Serialize;

use crate::rule_types::{Category, RuleId};
use crate::scanner_types::ScanReport;

/// One row per transit event. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub rule_id: RuleId,
    pub category: Category,
    /// Rule title with its sub-case, e.g. `Rule #7 (Lucky)`.
    pub rule: String,
    pub body: String,
    /// Description supplied by the rule at the interval start.
    pub label: String,
    pub start: Instant,
    pub end: Instant,
    pub duration_secs: i64,
    pub sign: String,
    pub house: String,
    pub window: String,
}

/// Union of all rules' events, ordered by start then rule.
pub fn assemble(report: &ScanReport) -> Vec<EventRecord> {
    let mut records: Vec<EventRecord> = report
        .events
        .values()
        .flatten()
        .map(|ev| EventRecord {
            rule_id: ev.rule,
            category: ev.hit.category,
            rule: ev.hit.title(ev.rule),
            body: ev.hit.body.clone(),
            label: ev.hit.description.clone(),
            start: ev.interval.start,
            end: ev.interval.end,
            duration_secs: ev.duration_secs(),
            sign: ev.hit.sign.clone(),
            house: ev.hit.house.clone(),
            window: ev.hit.window.clone(),
        })
        .collect();
    records.sort_by_key(|r| (r.start, r.rule_id));
    records
}

/// Write records as CSV with a header row.
pub fn write_csv<W: Write>(records: &[EventRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record([
            "rule_id",
            "category",
            "rule",
            "body",
            "label",
            "start",
            "end",
            "duration_secs",
            "sign",
            "house",
            "window",
        ])?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One body of the natal chart, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalRow {
    pub body: String,
    pub longitude: f64,
    pub sign: String,
    /// Degree within sign as `DD°MM'`.
    pub degree: String,
    pub nakshatra: String,
    pub pada: u8,
    pub navamsa: String,
    pub house: u8,
}

pub fn natal_summary(chart: &NatalChart) -> Vec<NatalRow> {
    chart
        .positions()
        .iter()
        .map(|p| NatalRow {
            body: p.body.name().to_string(),
            longitude: p.longitude,
            sign: p.rashi.western_name().to_string(),
            degree: format_dms_short(p.degree_in_sign),
            nakshatra: p.nakshatra.name().to_string(),
            pada: p.pada,
            navamsa: p.navamsa.western_name().to_string(),
            house: p.house(chart.framework()),
        })
        .collect()
}
