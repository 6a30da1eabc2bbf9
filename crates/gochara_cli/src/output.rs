//! Rendering of charts, events, and the rule list.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use gochara_search::{EventRecord, NatalRow, RefinementAnomaly, RuleId};
use gochara_vedic::NatalChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn write_natal<W: Write>(
    out: &mut W,
    chart: &NatalChart,
    rows: &[NatalRow],
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, chart)?;
            writeln!(out)?;
        }
        Format::Csv => {
            writeln!(out, "body,longitude,sign,degree,nakshatra,pada,navamsa,house")?;
            for r in rows {
                writeln!(
                    out,
                    "{},{:.4},{},{},{},{},{},{}",
                    r.body, r.longitude, r.sign, r.degree, r.nakshatra, r.pada, r.navamsa, r.house
                )?;
            }
        }
        Format::Table => {
            writeln!(
                out,
                "Birth {}  lat {:.4} lon {:.4}  ayanamsa {}  houses {}",
                chart.birth(),
                chart.location().latitude_deg,
                chart.location().longitude_deg,
                chart.ayanamsa(),
                chart.framework()
            )?;
            writeln!(out)?;
            writeln!(
                out,
                "{:<10} {:>9} {:<12} {:>7} {:<18} {:>4} {:<12} {:>5}",
                "Body", "Lon", "Sign", "Deg", "Nakshatra", "Pada", "D9", "House"
            )?;
            for r in rows {
                writeln!(
                    out,
                    "{:<10} {:>9.4} {:<12} {:>7} {:<18} {:>4} {:<12} {:>5}",
                    r.body, r.longitude, r.sign, r.degree, r.nakshatra, r.pada, r.navamsa, r.house
                )?;
            }
            writeln!(out)?;
            write_significators(out, chart)?;
        }
    }
    Ok(())
}

fn write_significators<W: Write>(out: &mut W, chart: &NatalChart) -> Result<()> {
    writeln!(out, "Ascendant sign: {}", chart.ascendant_sign())?;
    let lords: Vec<String> = (1..=12u8)
        .map(|n| format!("{n}:{}", chart.house_lord(n)))
        .collect();
    writeln!(out, "House lords: {}", lords.join(" "))?;
    let signs: Vec<String> = chart
        .panaphara_house_signs()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "Panaphara house signs: {}", signs.join(", "))?;
    let signs: Vec<String> = chart
        .apoklima_house_signs()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "Apoklima house signs: {}", signs.join(", "))?;

    if chart.panaphara_planets().is_empty() {
        writeln!(out, "Panaphara planets: none")?;
    } else {
        let pp: Vec<String> = chart
            .panaphara_planets()
            .iter()
            .map(|p| format!("{} (house {}, {})", p.body, p.house, p.window))
            .collect();
        writeln!(out, "Panaphara planets: {}", pp.join("; "))?;
    }
    writeln!(
        out,
        "D9 dispositor of 2L ({}): {}",
        chart.house_lord(2),
        chart.d9_second_lord_dispositor()
    )?;

    let (extreme, lucky): (Vec<_>, Vec<_>) =
        chart.lucky_planets().iter().partition(|l| l.extremely);
    for (label, group) in [("Lucky planets", lucky), ("Extremely lucky planets", extreme)] {
        if group.is_empty() {
            writeln!(out, "{label}: none")?;
        } else {
            let names: Vec<String> = group
                .iter()
                .map(|l| format!("{} ({}, house {})", l.body, l.lord_label(), l.house))
                .collect();
            writeln!(out, "{label}: {}", names.join("; "))?;
        }
    }
    Ok(())
}

pub fn write_events<W: Write>(out: &mut W, records: &[EventRecord], format: Format) -> Result<()> {
    match format {
        Format::Csv => gochara_search::write_csv(records, &mut *out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
        Format::Table => {
            writeln!(
                out,
                "{:<9} {:<24} {:<14} {:<20} {:<20} {:>8} {:<12} {:<6} {}",
                "Category", "Rule", "Body", "Start (UTC)", "End (UTC)", "Minutes", "Sign", "House", "Window"
            )?;
            for r in records {
                writeln!(
                    out,
                    "{:<9} {:<24} {:<14} {:<20} {:<20} {:>8} {:<12} {:<6} {}",
                    r.category.to_string(),
                    r.rule,
                    r.body,
                    r.start.to_string(),
                    r.end.to_string(),
                    r.duration_secs / 60,
                    r.sign,
                    r.house,
                    r.window
                )?;
            }
            writeln!(out, "{} event(s)", records.len())?;
        }
    }
    Ok(())
}

/// Anomalies are data-quality notes, printed to stderr.
pub fn report_anomalies(anomalies: &[RefinementAnomaly]) {
    for a in anomalies {
        let rule = a.rule.map_or_else(|| "-".to_string(), |r| r.to_string());
        eprintln!(
            "note: {rule} {:?} boundary snapped to {} ({})",
            a.boundary, a.snapped_to, a.reason
        );
    }
}

pub fn write_rules<W: Write>(out: &mut W) -> Result<()> {
    for rule in RuleId::ALL {
        writeln!(
            out,
            "{:<7} {:<8} {:<8} {}",
            rule.code(),
            rule.title(),
            rule.base_category().name(),
            rule.summary()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_list_has_every_rule() {
        let mut buf = Vec::new();
        write_rules(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 14);
        assert!(text.starts_with("money1"));
        assert!(text.contains("loss5   Loss #5  Expense"));
    }

    #[test]
    fn empty_event_table() {
        let mut buf = Vec::new();
        write_events(&mut buf, &[], Format::Table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("0 event(s)\n"));
    }
}
