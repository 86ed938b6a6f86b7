//! Command-line interface components.

use crate::config::{CompressionAlgorithm, EtlConfig, UserSnapshotStrategy};
use crate::models::RunSummary;
use crate::processor::{EtlProcessor, default_output_path};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "songplay_etl")]
#[command(about = "Build a partitioned Parquet star schema from song catalog and activity log JSON")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory containing song_data/ and log_data/
    #[arg(value_name = "INPUT_ROOT")]
    pub input_root: PathBuf,

    /// Output directory for the five tables (default: <INPUT_ROOT>/../output)
    #[arg(short, long, value_name = "OUTPUT_ROOT")]
    pub output_path: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Parquet compression algorithm
    #[arg(long, value_enum)]
    pub compression: Option<CompressionAlgorithm>,

    /// Users dimension resolution
    #[arg(long, value_enum)]
    pub user_snapshot: Option<UserSnapshotStrategy>,

    /// Maximum number of source files parsed concurrently
    #[arg(long)]
    pub max_concurrent_files: Option<usize>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Get the output path, defaulting to input_root/../output if not specified
    pub fn output_root(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => default_output_path(&self.input_root),
        }
    }

    /// Defaults, then the config file, then explicit flags
    pub fn load_config(&self) -> Result<EtlConfig> {
        let mut config = match &self.config {
            Some(path) => EtlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => EtlConfig::default(),
        };

        if let Some(compression) = self.compression {
            config = config.with_compression(compression);
        }
        if let Some(strategy) = self.user_snapshot {
            config = config.with_user_snapshot(strategy);
        }
        if let Some(max_files) = self.max_concurrent_files {
            config = config.with_max_concurrent_files(max_files);
        }
        if self.no_progress {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initialise the tracing subscriber; `RUST_LOG` overrides the level
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("songplay_etl={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Parse arguments already collected by `main` and run one ETL job
pub async fn run(args: Args) -> Result<RunSummary> {
    debug!("Command line arguments: {:?}", args);
    let config = args.load_config()?;
    let output = args.output_root();

    println!("{}", "Starting songplay ETL".bright_green().bold());
    println!("  {} {}", "Input:".bright_cyan(), args.input_root.display());
    println!("  {} {}", "Output:".bright_cyan(), output.display());

    let processor = EtlProcessor::new(args.input_root.clone(), Some(output))
        .with_context(|| format!("Cannot use input root {}", args.input_root.display()))?
        .with_config(config);

    let summary = processor
        .process()
        .await
        .context("ETL run failed")?;
    info!("Run {} complete", summary.run_id);

    print_summary(&summary);
    Ok(summary)
}

/// Colored end-of-run report on stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!("  {} {}", "Run:".bright_cyan(), summary.run_id);
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {} files, {} records",
        "Song data:".bright_cyan(),
        summary.songs.files_read.to_string().bright_white(),
        summary.songs.records_parsed.to_string().bright_white()
    );
    println!(
        "  {} {} files, {} records",
        "Log data:".bright_cyan(),
        summary.logs.files_read.to_string().bright_white(),
        summary.logs.records_parsed.to_string().bright_white()
    );

    let dropped = summary.songs.records_dropped + summary.logs.records_dropped;
    if dropped > 0 {
        println!(
            "  {} {}",
            "Malformed records dropped:".bright_red(),
            dropped.to_string().bright_red().bold()
        );
    }
    if summary.events_bad_timestamp > 0 {
        println!(
            "  {} {}",
            "Song plays with bad timestamps:".bright_red(),
            summary.events_bad_timestamp.to_string().bright_red().bold()
        );
    }

    for table in &summary.tables {
        println!(
            "  {} {} rows in {} files -> {}",
            format!("{}:", table.table).bright_cyan(),
            table.rows_written.to_string().bright_white().bold(),
            table.files_written,
            display_relative(&table.path, &summary.output_path)
        );
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}
