use anyhow::Result;
use clap::Parser;
use csv_graph_loader::loader::{DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL};
use csv_graph_loader::{run, Config, LoadOptions, LoadReport};
use log::{error, info};
use std::path::PathBuf;

/// CSV Graph Loader
///
/// Loads the rows of a CSV file into FalkorDB as nodes with a single label,
/// one property per column.
#[derive(Parser)]
#[command(name = "csv-graph-loader")]
#[command(about = "Load a CSV file into FalkorDB as labeled nodes")]
struct Args {
    /// YAML config with a FALKORDB section
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Node label (overrides FALKORDB.node_label)
    #[arg(long)]
    label: Option<String>,

    /// Rows per UNWIND statement (overrides FALKORDB.batch_size)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Create nodes one statement per row instead of in batches
    #[arg(long)]
    per_row: bool,

    /// Report progress every N records (0 disables progress reporting)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: usize,
}

const DEFAULT_LABEL: &str = "ConsumerComplaints";

async fn load(args: Args) -> Result<LoadReport> {
    let config = Config::from_file(&args.config)?;
    let settings = config.falkordb;

    let options = LoadOptions {
        label: args
            .label
            .or_else(|| settings.node_label.clone())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        batch_size: args
            .batch_size
            .or(settings.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE),
        per_row: args.per_row,
        progress_interval: args.progress_interval,
    };
    info!("Source: {}", settings.csv_file_path.display());

    Ok(run(&settings, &options).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match load(args).await {
        Ok(report) => {
            info!(
                "Data loaded successfully: {} nodes from {} rows in {} batches",
                report.nodes_created, report.rows, report.batches
            );
        }
        Err(e) => {
            error!("❌ Loading failed: {}", e);
            std::process::exit(1);
        }
    }
}
