//! CLI entry point for the bike rental dashboard.
//!
//! Provides subcommands for printing the summary payload, rendering a
//! standalone HTML page, and serving the interactive dashboard over HTTP.

use anyhow::{Context, Result};
use bike_rental_dashboard::{
    aggregate::{Aggregator, MissingKeys},
    dashboard::Dashboard,
    filter::DateRange,
    loader::load_records,
    output::{print_json, write_json, write_page},
    page::render_page,
    server::{AppState, run_server},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATA_PATH: &str = "dashboard/main_data.csv";

#[derive(Parser)]
#[command(name = "bike_rental_dashboard")]
#[command(about = "Summaries and charts of bike-sharing rental data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Path to the rental CSV (defaults to $DATA_PATH, then dashboard/main_data.csv)
    #[arg(short, long, value_name = "CSV")]
    data: Option<PathBuf>,

    /// How to treat records with an empty grouping column
    #[arg(long, value_enum, default_value_t = MissingKeysArg::Group)]
    missing_keys: MissingKeysArg,
}

/// Command-line spelling of [`MissingKeys`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MissingKeysArg {
    /// Sum them under a separate "(missing)" group
    Group,
    /// Leave them out of the summaries
    Drop,
}

impl From<MissingKeysArg> for MissingKeys {
    fn from(arg: MissingKeysArg) -> Self {
        match arg {
            MissingKeysArg::Group => MissingKeys::Group,
            MissingKeysArg::Drop => MissingKeys::Drop,
        }
    }
}

#[derive(Args)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD); defaults to the earliest date in the data
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD); defaults to the latest date in the data
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save the dashboard summaries as JSON
    Summary {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// JSON file to write instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the dashboard into a standalone HTML file
    Render {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// HTML file to write
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
    /// Serve the interactive dashboard over HTTP
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bike_rental_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_rental_dashboard.log"));

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
        Commands::Summary {
            data,
            range,
            output,
        } => {
            let dashboard = build_dashboard(&data, &range)?;
            match output {
                Some(path) => write_json(&path, &dashboard)?,
                None => print_json(&dashboard)?,
            }
        }
        Commands::Render {
            data,
            range,
            output,
        } => {
            let dashboard = build_dashboard(&data, &range)?;
            let html = render_page(&dashboard)?;
            write_page(&output, &html)?;
        }
        Commands::Serve { data, addr } => {
            let path = data_path(&data);
            let records = load_records(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let state = AppState::new(records, Aggregator::new(data.missing_keys.into()))?;
            run_server(addr, state).await?;
        }
    }

    Ok(())
}

/// Resolves the dataset path: flag, then `DATA_PATH`, then the default.
fn data_path(args: &DataArgs) -> PathBuf {
    args.data.clone().unwrap_or_else(|| {
        std::env::var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
    })
}

/// Loads the dataset and builds the dashboard for the requested range.
#[tracing::instrument(skip_all)]
fn build_dashboard(data: &DataArgs, range: &RangeArgs) -> Result<Dashboard> {
    let path = data_path(data);
    let records =
        load_records(&path).with_context(|| format!("failed to load {}", path.display()))?;

    let selection = match (range.start, range.end) {
        (None, None) => None,
        (start, end) => {
            let bounds = DateRange::observed(&records)
                .with_context(|| format!("{} contains no records", path.display()))?;
            Some(DateRange::resolve(start, end, bounds)?)
        }
    };

    let dashboard = Dashboard::build(&records, selection, Aggregator::new(data.missing_keys.into()))?;
    info!(
        start = %dashboard.range.start(),
        end = %dashboard.range.end(),
        records = dashboard.record_count,
        "Summaries computed"
    );
    Ok(dashboard)
}
