use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use whooprs::charts;
use whooprs::config::{AppConfig, VALID_PERIODS};
use whooprs::export::{self, json, text, OutputFormat};
use whooprs::{
    init_logging, DailySnapshot, InsightGenerator, LogLevel, RecordSet, SummaryStats,
    TrendCalculator, TrendData, TrendStats, WhoopError,
};

/// Upper bound for `summary --days`
const MAX_SUMMARY_DAYS: i64 = 3650;

/// whooprs - Recovery, sleep and strain analysis CLI
///
/// Reads a combined JSON export of wearable records and reports trends,
/// rule-based insights, daily summaries and chart-ready series.
#[derive(Parser)]
#[command(name = "whooprs")]
#[command(author = "whooprs Contributors")]
#[command(version)]
#[command(about = "Recovery, sleep and strain analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average, range and direction of each metric over a period
    Trends {
        /// Record export (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Lookback period in days (7, 14 or 30)
        #[arg(short, long, value_parser = parse_period)]
        period: Option<u32>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Render a table instead of one line per metric
        #[arg(long, conflicts_with = "json")]
        table: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rule-based recommendations for today
    Insights {
        /// Record export (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Daily summary, or averages over the last N days
    Summary {
        /// Record export (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Average over this many days instead of showing today
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_SUMMARY_DAYS))]
        days: Option<u32>,

        /// Traffic-light status icons
        #[arg(long)]
        color: bool,

        /// Full single-day view with profile, body and per-workout lines
        #[arg(long, conflicts_with_all = ["color", "days", "json"])]
        detail: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recovery, sleep, strain and 7-day trends in one view
    Dashboard {
        /// Record export (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write chart-ready series as JSON
    Chart {
        /// Record export (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Which chart to build
        #[arg(short, long, value_enum)]
        kind: ChartKind,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,

        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartKind {
    Sleep,
    Recovery,
    Strain,
    Hrv,
    Dashboard,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Avg")]
    average: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Trend")]
    trend: &'static str,
}

impl TrendRow {
    fn new(metric: &'static str, stats: &TrendStats, decimals: u32) -> Self {
        let fixed = |v: f64| whooprs::units::to_fixed(v, decimals);
        TrendRow {
            metric,
            // averages keep their stored tenth even for whole-number metrics
            average: whooprs::units::to_fixed(stats.average, decimals.max(1)),
            min: fixed(stats.min),
            max: fixed(stats.max),
            current: fixed(stats.current),
            trend: stats.trend.arrow(),
        }
    }
}

fn parse_period(s: &str) -> std::result::Result<u32, String> {
    let period: u32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if VALID_PERIODS.contains(&period) {
        Ok(period)
    } else {
        Err(format!("period must be one of 7, 14 or 30, got {}", period))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        if let Some(whoop_err) = err.downcast_ref::<WhoopError>() {
            let hint = whoop_err.user_message();
            if hint != whoop_err.to_string() {
                eprintln!("  {}", hint.dimmed());
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::default_config_path()?,
    };
    let mut config = AppConfig::load_or_default(Some(&config_path));

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config).context("Failed to initialize logging")?;
    debug!(config = %config_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Trends {
            input,
            period,
            json,
            table,
            output,
        } => {
            let records = load_records(input.as_deref(), &config)?;
            let period = period.unwrap_or(config.settings.default_period);
            let window = records.within_days(period, records.as_of());

            let trends = TrendCalculator::with_config(config.trend.clone()).analyze_trends(
                &window.recovery,
                &window.sleep,
                &window.cycle,
                period,
            );

            if table {
                emit(&trends_table(&trends), output.as_deref())?;
            } else {
                let rendered = render_output(&trends, json, &config, text::format_trends)?;
                emit(&rendered, output.as_deref())?;
            }
        }

        Commands::Insights {
            input,
            json,
            output,
        } => {
            let records = load_records(input.as_deref(), &config)?;
            let insights = InsightGenerator::with_thresholds(config.thresholds.clone()).generate(
                &records.recovery,
                &records.sleep,
                &records.cycle,
                &records.workout,
            );

            let rendered = render_output(&insights, json, &config, |i| text::format_insights(i))?;
            emit(&rendered, output.as_deref())?;
        }

        Commands::Summary {
            input,
            days,
            color,
            detail,
            json,
            output,
        } => {
            let records = load_records(input.as_deref(), &config)?;
            let rendered = match days {
                Some(days) => {
                    let window = records.within_days(days, records.as_of());
                    let stats =
                        SummaryStats::compute(&window.sleep, &window.recovery, &window.cycle, days);
                    render_output(&stats, json, &config, |s| {
                        text::format_summary_stats(s, color, &config.thresholds)
                    })?
                }
                None => {
                    let date = records.report_date();
                    let day = DailySnapshot::from_records(
                        &records.recovery,
                        &records.sleep,
                        &records.cycle,
                        &records.workout,
                    );
                    render_output(&day, json, &config, |d| {
                        if detail {
                            text::format_daily_detail(
                                date,
                                records.profile.as_ref(),
                                records.body.as_ref(),
                                d,
                            )
                        } else if color {
                            text::format_daily_color(date, d, &config.thresholds)
                        } else {
                            text::format_daily_summary(date, d)
                        }
                    })?
                }
            };
            emit(&rendered, output.as_deref())?;
        }

        Commands::Dashboard { input, output } => {
            let records = load_records(input.as_deref(), &config)?;
            let week = records.within_days(7, records.as_of());
            let trends = TrendCalculator::with_config(config.trend.clone()).analyze_trends(
                &week.recovery,
                &week.sleep,
                &week.cycle,
                7,
            );
            let day = DailySnapshot::from_records(
                &records.recovery,
                &records.sleep,
                &records.cycle,
                &records.workout,
            );

            let rendered = text::format_dashboard(
                records.report_date(),
                records.profile.as_ref(),
                &day,
                &trends,
                &config.thresholds,
            );
            emit(&rendered, output.as_deref())?;
        }

        Commands::Chart {
            input,
            kind,
            output,
        } => {
            let records = load_records(input.as_deref(), &config)?;
            let thresholds = &config.thresholds;
            let content = match kind {
                ChartKind::Recovery => {
                    json::to_json_pretty(&charts::recovery_series(&records.recovery, thresholds))
                }
                ChartKind::Hrv => json::to_json_pretty(&charts::hrv_series(&records.recovery)),
                ChartKind::Strain => json::to_json_pretty(&charts::strain_series(&records.cycle)),
                ChartKind::Sleep => json::to_json_pretty(&charts::sleep_series(&records.sleep)),
                ChartKind::Dashboard => json::to_json_pretty(&charts::dashboard_series(
                    &records.sleep,
                    &records.recovery,
                    &records.cycle,
                    thresholds,
                )),
            }
            .context("Failed to serialize chart series")?;

            debug!(?kind, "Chart series built");
            emit(&content, output.as_deref())?;
        }

        Commands::Config {
            list,
            set,
            get,
            init,
        } => {
            if init {
                if config_path.exists() {
                    println!(
                        "{}",
                        format!("Config already exists at {}", config_path.display()).yellow()
                    );
                } else {
                    AppConfig::default().save_to_file(&config_path)?;
                    println!(
                        "{}",
                        format!("✓ Created {}", config_path.display()).green()
                    );
                }
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .context("Expected key=value, e.g. settings.default_period=14")?;
                config.set_value(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{}", format!("✓ {} = {}", key.trim(), value.trim()).green());
            } else if let Some(key) = get {
                println!("{}", config.get_value(&key)?);
            } else if list {
                println!("{}", format!("# {}", config_path.display()).dimmed());
                println!(
                    "{}",
                    toml::to_string_pretty(&config).context("Failed to render config")?
                );
            } else {
                bail!("Nothing to do: pass --list, --get, --set or --init");
            }
        }
    }

    Ok(())
}

fn load_records(input: Option<&Path>, config: &AppConfig) -> Result<RecordSet> {
    let path = input
        .map(Path::to_path_buf)
        .or_else(|| config.settings.data_file.clone())
        .context("No input file: pass --input or set settings.data_file")?;

    RecordSet::load_from_file(&path)
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

fn render_output<T, F>(data: &T, json: bool, config: &AppConfig, render: F) -> Result<String>
where
    T: serde::Serialize,
    F: FnOnce(&T) -> String,
{
    let format = OutputFormat::from_json_flag(json);
    let rendered = match format {
        OutputFormat::Json if !config.settings.pretty => serde_json::to_string(data)?,
        _ => export::render(data, format, render)?,
    };
    Ok(rendered)
}

/// Print to stdout, or write to `output` with a status line on stderr
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            text::export_text(content, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{}", format!("✓ Wrote {}", path.display()).green());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn trends_table(trends: &TrendData) -> String {
    let metrics: [(&'static str, &Option<TrendStats>, u32); 6] = [
        ("Recovery %", &trends.recovery, 0),
        ("HRV ms", &trends.hrv, 1),
        ("RHR bpm", &trends.rhr, 0),
        ("Sleep %", &trends.sleep_performance, 0),
        ("Sleep h", &trends.sleep_hours, 1),
        ("Strain", &trends.strain, 1),
    ];

    let rows: Vec<TrendRow> = metrics
        .into_iter()
        .filter_map(|(name, stats, decimals)| {
            stats.as_ref().map(|s| TrendRow::new(name, s, decimals))
        })
        .collect();

    if rows.is_empty() {
        return format!("No scored records in the last {} days", trends.period);
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}-Day Trends\n{}", trends.period, table)
}
