//! TOML configuration file and its merge with command-line flags.
//!
//! Every field is optional in the file; flags win over file values, file
//! values win over built-in defaults.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use gochara_ephem::{Ayanamsa, GeoLocation, VALID_JD_RANGE};
use gochara_search::{RuleId, ScanConfig};
use gochara_time::Instant;
use gochara_vedic::HouseFramework;
use serde::Deserialize;

use crate::logging::LoggingConfig;

/// Contents of a `gochara.toml` file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub birth: BirthConfig,
    #[serde(default)]
    pub transit: TransitConfig,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BirthConfig {
    /// RFC 3339, quoted.
    pub instant: Option<Instant>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitConfig {
    pub from: Option<Instant>,
    pub to: Option<Instant>,
    #[serde(default = "default_rules")]
    pub rules: Vec<String>,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            rules: default_rules(),
        }
    }
}

fn default_rules() -> Vec<String> {
    vec!["all".to_string()]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    #[serde(default = "default_step_secs")]
    pub step_secs: i64,
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
    #[serde(default = "default_true")]
    pub adaptive_step: bool,
    #[serde(default = "default_ayanamsa")]
    pub ayanamsa: String,
    #[serde(default = "default_houses")]
    pub houses: String,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            step_secs: default_step_secs(),
            tolerance_secs: default_tolerance_secs(),
            adaptive_step: true,
            ayanamsa: default_ayanamsa(),
            houses: default_houses(),
        }
    }
}

fn default_step_secs() -> i64 {
    gochara_search::DEFAULT_COARSE_STEP_SECS
}

fn default_tolerance_secs() -> i64 {
    gochara_search::DEFAULT_FINE_TOLERANCE_SECS
}

fn default_true() -> bool {
    true
}

fn default_ayanamsa() -> String {
    "KP_old".to_string()
}

fn default_houses() -> String {
    "whole-sign".to_string()
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Flags shared by every chart-based subcommand.
#[derive(Debug, Default, Clone)]
pub struct ChartOverrides {
    pub birth: Option<Instant>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ayanamsa: Option<String>,
    pub houses: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ScanOverrides {
    pub from: Option<Instant>,
    pub to: Option<Instant>,
    pub rules: Vec<String>,
    pub step_secs: Option<i64>,
    pub tolerance_secs: Option<i64>,
    pub fixed_step: bool,
}

/// Resolved inputs for building a natal chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub birth: Instant,
    pub location: GeoLocation,
    pub ayanamsa: Ayanamsa,
    pub framework: HouseFramework,
}

/// Resolved inputs for a transit scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub chart: ChartSettings,
    pub from: Instant,
    pub to: Instant,
    pub rules: BTreeSet<RuleId>,
    pub config: ScanConfig,
}

pub fn resolve_chart(file: &FileConfig, flags: &ChartOverrides) -> Result<ChartSettings> {
    let birth = flags
        .birth
        .or(file.birth.instant)
        .ok_or_else(|| anyhow!("birth instant missing: pass --birth or set [birth] instant"))?;
    let lat = flags
        .lat
        .or(file.birth.latitude)
        .ok_or_else(|| anyhow!("birth latitude missing: pass --lat or set [birth] latitude"))?;
    let lon = flags
        .lon
        .or(file.birth.longitude)
        .ok_or_else(|| anyhow!("birth longitude missing: pass --lon or set [birth] longitude"))?;

    let location = GeoLocation::new(lat, lon);
    location
        .validate()
        .map_err(|e| anyhow!("invalid birth location: {e}"))?;

    let ayanamsa = flags
        .ayanamsa
        .as_deref()
        .unwrap_or(file.scan.ayanamsa.as_str())
        .parse::<Ayanamsa>()
        .map_err(|e| anyhow!(e))?;
    let framework = flags
        .houses
        .as_deref()
        .unwrap_or(file.scan.houses.as_str())
        .parse::<HouseFramework>()
        .map_err(|e| anyhow!(e))?;

    Ok(ChartSettings {
        birth,
        location,
        ayanamsa,
        framework,
    })
}

pub fn resolve_scan(
    file: &FileConfig,
    chart: &ChartOverrides,
    flags: &ScanOverrides,
) -> Result<ScanSettings> {
    let chart = resolve_chart(file, chart)?;
    let from = flags
        .from
        .or(file.transit.from)
        .ok_or_else(|| anyhow!("transit start missing: pass --from or set [transit] from"))?;
    let to = flags
        .to
        .or(file.transit.to)
        .ok_or_else(|| anyhow!("transit end missing: pass --to or set [transit] to"))?;
    if from >= to {
        bail!("transit start {from} must be before transit end {to}");
    }
    for (what, at) in [("transit start", from), ("transit end", to)] {
        if !VALID_JD_RANGE.contains(&at.to_jd_utc()) {
            bail!("{what} {at} is outside the ephemeris range (1800-01-01 to 2200-01-01)");
        }
    }

    let names = if flags.rules.is_empty() {
        &file.transit.rules
    } else {
        &flags.rules
    };
    let rules = parse_rules(names)?;

    let config = ScanConfig {
        coarse_step_secs: flags.step_secs.unwrap_or(file.scan.step_secs),
        fine_tolerance_secs: flags.tolerance_secs.unwrap_or(file.scan.tolerance_secs),
        adaptive_step: file.scan.adaptive_step && !flags.fixed_step,
    };
    config
        .validate()
        .map_err(|e| anyhow!("invalid scan settings: {e}"))?;

    Ok(ScanSettings {
        chart,
        from,
        to,
        rules,
        config,
    })
}

/// Parse rule names; `all` selects every rule. Entries may be
/// comma-separated.
pub fn parse_rules<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<RuleId>> {
    let mut rules = BTreeSet::new();
    for name in names
        .iter()
        .flat_map(|n| n.as_ref().split(','))
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        if name.eq_ignore_ascii_case("all") {
            rules.extend(RuleId::ALL);
        } else {
            rules.insert(name.parse::<RuleId>().map_err(|e| anyhow!(e))?);
        }
    }
    if rules.is_empty() {
        bail!("no rules enabled");
    }
    Ok(rules)
}
