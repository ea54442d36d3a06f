//! playlog-etl: Load song metadata and listening logs into SQLite
//!
//! Usage:
//!   # Defaults: ./playlog.db, data/song_data, data/log_data
//!   playlog-etl
//!
//!   # Explicit roots and database
//!   playlog-etl --database plays.db --song-data data/song_data --log-data data/log_data
//!
//!   # Settings from a TOML file, keep going past bad files
//!   playlog-etl --config playlog.toml --on-error skip_file

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use playlog::{EtlConfig, FailurePolicy, RunSummary, TimeFormat};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "playlog-etl")]
#[command(about = "Load song metadata and listening logs into SQLite", long_about = None)]
struct Args {
    /// TOML file with run settings; flags below override it
    #[arg(long, short = 'c', env = "PLAYLOG_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (created if missing)
    #[arg(long, env = "PLAYLOG_DATABASE")]
    database: Option<PathBuf>,

    /// Root directory of the song metadata files
    #[arg(long)]
    song_data: Option<PathBuf>,

    /// Root directory of the event logs
    #[arg(long)]
    log_data: Option<PathBuf>,

    /// Extension of source files (default: json)
    #[arg(long)]
    extension: Option<String>,

    /// What to do when a file fails to load
    #[arg(long, value_enum)]
    on_error: Option<FailurePolicy>,

    /// start_time key format
    #[arg(long, value_enum)]
    time_format: Option<TimeFormat>,

    /// Don't create missing tables
    #[arg(long)]
    no_create_schema: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let config = build_config(args)?;
    info!("database: {}", config.database.display());

    let report = match playlog::run(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("Load aborted: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&report.songs);
    print_summary(&report.logs);

    Ok(())
}

fn build_config(args: Args) -> Result<EtlConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            EtlConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => EtlConfig::default(),
    };

    if let Some(database) = args.database {
        config.database = database;
    }
    if let Some(song_data) = args.song_data {
        config.song_data = song_data;
    }
    if let Some(log_data) = args.log_data {
        config.log_data = log_data;
    }
    if let Some(extension) = args.extension {
        config.extension = extension;
    }
    if let Some(on_error) = args.on_error {
        config.on_error = on_error;
    }
    if let Some(time_format) = args.time_format {
        config.time_format = time_format;
    }
    if args.no_create_schema {
        config.create_schema = false;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    info!(
        "{}: {}/{} files loaded from {}",
        summary.kind.label(),
        summary.files_loaded,
        summary.files_found,
        summary.root.display()
    );
    info!(
        "  songs={} artists={} users={} time={} songplays={} (unresolved {})",
        summary.rows.songs,
        summary.rows.artists,
        summary.rows.users,
        summary.rows.times,
        summary.rows.songplays,
        summary.rows.unresolved
    );
    for failed in &summary.failed {
        error!("  skipped {}: {}", failed.path.display(), failed.error);
    }
}
