//! CLI entry point for the HAR tidy-dataset tool.
//!
//! Provides subcommands for running the full pipeline, fetching the source
//! dataset, and inspecting the feature selection and facet decomposition.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use har_tidy::{
    acquire::{DEFAULT_DATASET_URL, ensure_dataset},
    config::PipelineConfig,
    facets::FacetTable,
    features,
    output::print_json,
    pipeline,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "har_tidy")]
#[command(about = "Builds a tidy per-subject, per-activity summary of the HAR dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: fetch the dataset if needed, transform it and
    /// write the tidy table
    Run {
        /// Directory holding (or receiving) the extracted dataset
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Destination file for the tidy table (must not already exist)
        #[arg(short, long, default_value = "tidy_averages.tsv")]
        output: PathBuf,

        /// Archive URL override (falls back to HAR_DATASET_URL, then the
        /// upstream default)
        #[arg(long)]
        url: Option<String>,
    },
    /// Download and extract the dataset without transforming it
    Fetch {
        /// Directory to extract the dataset into
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Archive URL override
        #[arg(long)]
        url: Option<String>,
    },
    /// Print the selected features and their facet decomposition
    Features {
        /// Directory holding (or receiving) the extracted dataset
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Archive URL override
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/har_tidy.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("har_tidy.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data_dir,
            output,
            url,
        } => {
            let root = ensure_dataset(&data_dir, &resolve_url(url))?;
            let config = PipelineConfig::new(root, output);
            let summary = pipeline::run(&config)?;
            print_json(&summary)?;
        }
        Commands::Fetch { data_dir, url } => {
            let root = ensure_dataset(&data_dir, &resolve_url(url))?;
            info!(root = %root.display(), "Dataset ready");
        }
        Commands::Features { data_dir, url } => {
            let root = ensure_dataset(&data_dir, &resolve_url(url))?;
            let dictionary = features::load_dictionary(&root.join("features.txt"))?;
            let selected = features::select(&dictionary);
            let table = FacetTable::build(selected.iter().map(|f| f.name.as_str()))?;

            for feature in &selected {
                // Present by construction of the table above.
                let facets = table.get(&feature.name).unwrap();
                info!(index = feature.index, name = %feature.name, ?facets, "Selected feature");
            }
            info!(
                total = dictionary.len(),
                selected = selected.len(),
                distinct_facet_tuples = table.len(),
                "Feature selection summary"
            );
        }
    }

    Ok(())
}

/// CLI flag, then `HAR_DATASET_URL`, then the upstream default.
fn resolve_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("HAR_DATASET_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATASET_URL.to_string())
}
