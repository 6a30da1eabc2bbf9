mod config;
mod logging;
mod output;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gochara_ephem::{Ephemeris, SiderealSource};
use gochara_search::{ScanRequest, assemble, natal_summary, scan};
use gochara_time::Instant;
use gochara_vedic::{NatalChart, NatalChartBuilder};
use tracing::info;

use crate::config::{ChartOverrides, ChartSettings, FileConfig, ScanOverrides};
use crate::output::Format;

#[derive(Parser)]
#[command(name = "gochara", version, about = "Vedic transit event scanner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the natal chart and its significators
    Natal {
        #[command(flatten)]
        chart: ChartArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Find intervals where transit rules hold
    Scan {
        #[command(flatten)]
        chart: ChartArgs,
        /// Transit range start (RFC 3339)
        #[arg(long)]
        from: Option<Instant>,
        /// Transit range end (RFC 3339)
        #[arg(long)]
        to: Option<Instant>,
        /// Rules to scan: money1..money8, loss1..loss6, or all
        #[arg(long, value_delimiter = ',')]
        rules: Vec<String>,
        /// Coarse sampling step in seconds
        #[arg(long)]
        step_secs: Option<i64>,
        /// Boundary precision in seconds
        #[arg(long)]
        tolerance_secs: Option<i64>,
        /// Use the coarse step for every rule, including Moon-driven ones
        #[arg(long)]
        fixed_step: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List rule codes and titles
    Rules,
}

#[derive(Args)]
struct ChartArgs {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Birth instant (RFC 3339, e.g. 1990-01-01T12:00:00Z)
    #[arg(long)]
    birth: Option<Instant>,
    /// Birth latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Birth longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// KP_old (default), Lahiri, Fagan-Bradley or Tropical
    #[arg(long)]
    ayanamsa: Option<String>,
    /// whole-sign (default) or placidus
    #[arg(long)]
    houses: Option<String>,
}

impl ChartArgs {
    fn overrides(&self) -> ChartOverrides {
        ChartOverrides {
            birth: self.birth,
            lat: self.lat,
            lon: self.lon,
            ayanamsa: self.ayanamsa.clone(),
            houses: self.houses.clone(),
        }
    }
}

fn build_chart<S: SiderealSource>(source: &S, s: &ChartSettings) -> Result<NatalChart> {
    NatalChartBuilder::new(s.birth, s.location)
        .ayanamsa(s.ayanamsa)
        .framework(s.framework)
        .build(source)
        .context("building natal chart")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Rules => output::write_rules(&mut out)?,

        Commands::Natal { chart, format } => {
            let file = FileConfig::load_or_default(chart.config.as_deref())?;
            file.logging.init();
            let settings = config::resolve_chart(&file, &chart.overrides())?;

            let eph = Ephemeris::analytic();
            let natal = build_chart(&eph, &settings)?;
            output::write_natal(&mut out, &natal, &natal_summary(&natal), format)?;
        }

        Commands::Scan {
            chart,
            from,
            to,
            rules,
            step_secs,
            tolerance_secs,
            fixed_step,
            format,
        } => {
            let file = FileConfig::load_or_default(chart.config.as_deref())?;
            file.logging.init();
            let flags = ScanOverrides {
                from,
                to,
                rules,
                step_secs,
                tolerance_secs,
                fixed_step,
            };
            let settings = config::resolve_scan(&file, &chart.overrides(), &flags)?;

            let eph = Ephemeris::analytic();
            let natal = build_chart(&eph, &settings.chart)?;
            let request = ScanRequest::new(settings.rules, settings.from, settings.to)
                .with_config(settings.config);
            let report = scan(&request, &natal, &eph).context("transit scan failed")?;

            let records = assemble(&report);
            info!(
                events = records.len(),
                queries = eph.queries(),
                degraded = eph.degradations(),
                "scan complete"
            );
            output::report_anomalies(&report.anomalies);
            output::write_events(&mut out, &records, format)?;
        }
    }

    out.flush()?;
    Ok(())
}
