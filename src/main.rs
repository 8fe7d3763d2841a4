//! CLI entry point for the bikeflow station traffic tool.
//!
//! Provides subcommands for querying station traffic under a time filter,
//! listing the busiest stations, and sweeping the whole day the way the
//! map's time slider does.

use anyhow::Result;
use bikeflow::{
    loader::{load_stations, load_trips},
    output::{append_records, format_minute, print_json, tooltip_line},
    traffic::{NO_FILTER, TimeFilter, TrafficEngine, TripIndex},
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeflow")]
#[command(about = "A tool to analyze bike-share station traffic by time of day", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Path to the GBFS-style station JSON file
    #[arg(short, long, default_value = "data/stations.json")]
    stations: String,

    /// Path to the trip CSV file
    #[arg(short, long, default_value = "data/trips.csv")]
    trips: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-station traffic for one time filter
    Query {
        #[command(flatten)]
        data: DataArgs,

        /// Minute of day (0-1439) to center the ±60-minute window on, or -1 for the whole day
        #[arg(short, long, default_value_t = NO_FILTER, allow_hyphen_values = true)]
        minute: i32,

        /// Optional CSV file to append per-station rows to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the busiest stations under a time filter
    Top {
        #[command(flatten)]
        data: DataArgs,

        /// Minute of day (0-1439), or -1 for the whole day
        #[arg(short, long, default_value_t = NO_FILTER, allow_hyphen_values = true)]
        minute: i32,

        /// Number of stations to show
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },
    /// Sweep the whole day, querying every Nth minute
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        /// Step between query minutes
        #[arg(long, default_value_t = 60)]
        step: u16,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeflow.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeflow.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            data,
            minute,
            output,
        } => {
            let filter = TimeFilter::from_raw(minute)?;
            let engine = build_engine(&data)?;
            let snapshot = engine.query(filter);

            info!(
                filter = %describe_filter(filter),
                stations = snapshot.stations.len(),
                system_total = snapshot.system_total(),
                radius_range = ?snapshot.scale_hint.radius_range(),
                "Query complete"
            );
            print_json(&snapshot)?;

            if let Some(path) = output {
                append_records(&path, &snapshot.stations)?;
                info!(path = %path, "Wrote station rows");
            }
        }
        Commands::Top {
            data,
            minute,
            count,
        } => {
            let filter = TimeFilter::from_raw(minute)?;
            let engine = build_engine(&data)?;
            let mut stations = engine.query(filter).stations;

            stations.sort_by(|a, b| {
                b.total_traffic
                    .cmp(&a.total_traffic)
                    .then_with(|| a.short_name.cmp(&b.short_name))
            });
            stations.truncate(count);

            info!(filter = %describe_filter(filter), "Busiest stations");
            for (rank, station) in stations.iter().enumerate() {
                info!(
                    rank = rank + 1,
                    short_name = %station.short_name,
                    name = station.name.as_deref().unwrap_or("-"),
                    "{}",
                    tooltip_line(station)
                );
            }
        }
        Commands::Sweep { data, step } => {
            anyhow::ensure!(step > 0, "sweep step must be positive");
            let engine = build_engine(&data)?;

            for minute in (0..1440).step_by(step as usize) {
                let snapshot = engine.query(TimeFilter::Around(minute as u16));
                info!(
                    time = %format_minute(minute as u16),
                    system_total = snapshot.system_total(),
                    "Sweep point"
                );
            }
        }
    }

    Ok(())
}

fn build_engine(data: &DataArgs) -> Result<TrafficEngine> {
    let stations = load_stations(Path::new(&data.stations))?;
    let trips = load_trips(Path::new(&data.trips))?;
    Ok(TrafficEngine::new(stations, TripIndex::build(trips)))
}

fn describe_filter(filter: TimeFilter) -> String {
    match filter {
        TimeFilter::All => "any time".to_string(),
        TimeFilter::Around(minute) => format_minute(minute),
    }
}
