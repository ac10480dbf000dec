// indicator-lab: run the analysis engine over a local candle file
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::catalog;
use engine::config::EngineSettings;
use engine::services::{AnalysisReport, AnalysisRequest, AnalysisService};
use shared::utils::format_timestamp;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "indicator-lab")]
#[command(about = "Technical indicator analysis over OHLCV candles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators, events, pattern hints and insights for a CSV file
    Analyze {
        /// CSV file with a timestamp,open,high,low,close,volume header
        candles: PathBuf,

        /// Comma separated indicator ids (e.g. "rsi,macd,bbands")
        #[arg(short, long, value_delimiter = ',')]
        indicators: Vec<String>,

        /// Add a named indicator group (momentum, trend, volatility)
        #[arg(long)]
        preset: Option<String>,

        /// Add the indicators of a guided scenario (e.g. "trend-reversal")
        #[arg(long)]
        scenario: Option<String>,

        /// Parameter override as indicator.parameter=value (e.g. "rsi.period=10")
        #[arg(short, long = "param", value_parser = parse_param_override)]
        params: Vec<(String, String, f64)>,

        /// JSON settings file; the bundled defaults are used otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the supported indicators and their parameters
    Catalog {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_param_override(s: &str) -> Result<(String, String, f64), String> {
    let (key, value) = s.split_once('=').ok_or_else(|| format!("expected indicator.parameter=value, got '{}'", s))?;
    let (indicator, parameter) = key
        .split_once('.')
        .ok_or_else(|| format!("expected indicator.parameter, got '{}'", key))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value '{}': {}", value, e))?;
    Ok((indicator.trim().to_lowercase(), parameter.trim().to_string(), value))
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { candles, indicators, preset, scenario, params, config, format, pretty } => {
            let settings = match &config {
                Some(path) => EngineSettings::from_file(path)
                    .with_context(|| format!("Failed to load settings from {}", path.display()))?,
                None => EngineSettings::bundled().context("Bundled settings are invalid")?,
            };

            let mut selected = indicators;
            if let Some(name) = preset {
                let ids = catalog::preset(&name).ok_or_else(|| anyhow!("Unknown preset '{}'", name))?;
                selected.extend(ids.iter().map(|id| id.as_str().to_string()));
            }
            if let Some(id) = scenario {
                let scenario = catalog::scenario(&id).ok_or_else(|| anyhow!("Unknown scenario '{}'", id))?;
                selected.extend(scenario.indicators.iter().map(|id| id.as_str().to_string()));
            }
            if selected.is_empty() {
                selected = settings.indicators.clone();
            }

            let mut parameters = settings.parameters.clone();
            for (indicator, parameter, value) in params {
                parameters.entry(indicator).or_default().insert(parameter, value);
            }

            let request = AnalysisRequest { indicators: selected, parameters };
            let service = AnalysisService::new(settings.analysis.clone());
            let report = service
                .analyze_csv(&candles, settings.data.csv_delimiter, &request)
                .with_context(|| format!("Failed to analyze {}", candles.display()))?;
            info!(candles = report.candle_count, events = report.events.len(), "Analysis complete");

            match format {
                OutputFormat::Json if pretty => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
                OutputFormat::Text => print_report(&report),
            }
        }
        Commands::Catalog { format } => match format {
            OutputFormat::Json => {
                let listing = serde_json::json!({
                    "indicators": catalog::all(),
                    "scenarios": catalog::scenarios(),
                });
                println!("{}", serde_json::to_string_pretty(&listing)?)
            }
            OutputFormat::Text => print_catalog(),
        },
    }
    Ok(())
}

fn print_catalog() {
    for spec in catalog::all() {
        println!("{} ({}, {:?})", spec.name, spec.id, spec.category);
        println!("  {}", spec.description);
        for p in spec.parameters {
            println!("  - {} [{}]: default {}, range {}..{} step {}", p.name, p.label, p.default, p.min, p.max, p.step);
        }
    }
    println!("\nScenarios");
    for s in catalog::scenarios() {
        let ids: Vec<&str> = s.indicators.iter().map(|id| id.as_str()).collect();
        println!("  {} ({}): {} [{}]", s.id, s.title, s.subtitle, ids.join(", "));
    }
}

fn print_report(report: &AnalysisReport) {
    println!("Candles analysed: {}", report.candle_count);
    for name in &report.unknown_indicators {
        println!("Skipped unknown indicator: {}", name);
    }

    println!("\nLatest values");
    for (id, series) in &report.series {
        for (key, values) in series {
            let latest = values
                .last()
                .copied()
                .flatten()
                .map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v));
            println!("  {}.{}: {}", id, key, latest);
        }
    }

    if !report.events.is_empty() {
        println!("\nEvents");
        for event in &report.events {
            println!("  [{}] {}: {}", format_timestamp(event.timestamp), event.label, event.detail);
        }
    }

    if !report.hints.is_empty() {
        println!("\nPattern hints");
        for hint in &report.hints {
            println!("  ({:?}) {}: {}", hint.severity, hint.title, hint.description);
        }
    }

    let readings = &report.readings;
    println!("\nReadings");
    match &readings.trend {
        Some(trend) => println!("  Trend strength: {:.0}/100 ({})", trend.score, trend.label),
        None => println!("  Trend strength: add EMA to see trend"),
    }
    match &readings.momentum {
        Some(momentum) => println!("  Momentum: {:.0}/100 ({})", momentum.score, momentum.label),
        None => println!("  Momentum: add RSI to see momentum"),
    }
    if let Some(atr_pct) = readings.atr_pct {
        println!("  ATR: {:.2}% of price", atr_pct);
    }
    if let Some(width) = readings.band_width_pct {
        println!("  BB width: {:.2}%", width);
    }
    if let Some(stops) = readings.stop_distances {
        println!("  ATR stops: conservative {:.2}, balanced {:.2}", stops.conservative, stops.balanced);
    }
    for item in &readings.checklist {
        println!("  ({:?}) {}: {}", item.kind, item.title, item.body);
    }

    if !report.insights.is_empty() {
        println!("\nInsights");
        for insight in &report.insights {
            println!("  {}: {}", insight.indicator, insight.title);
            println!("    {}", insight.description);
            if let Some(warning) = &insight.warning {
                println!("    Note: {}", warning);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_override() {
        assert_eq!(parse_param_override("RSI.period=10"), Ok(("rsi".to_string(), "period".to_string(), 10.0)));
        assert_eq!(
            parse_param_override("bbands.stdDev=2.5"),
            Ok(("bbands".to_string(), "stdDev".to_string(), 2.5))
        );
        assert!(parse_param_override("rsi=10").is_err());
        assert!(parse_param_override("rsi.period").is_err());
        assert!(parse_param_override("rsi.period=abc").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
