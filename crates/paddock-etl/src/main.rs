//! Paddock ETL - load a results document into the database

use anyhow::{Context, Result};
use clap::Parser;
use paddock_common::db::{create_pool, run_migrations, DbConfig};
use paddock_common::logging::{init_logging, LogConfig, LogLevel};
use paddock_etl::{
    extract, normalize_table, preview, EtlConfig, LoadOrchestrator, NormalizedTable, PgStore,
    ValidationPolicy,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "paddock-etl")]
#[command(author, version, about = "Load motorsport results into the Paddock database")]
struct Cli {
    /// Source document (.json, .csv or .tsv tables)
    source: PathBuf,

    /// Extract and normalize only; print a preview and touch no database
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip invalid records instead of rejecting the whole batch
    #[arg(long)]
    skip_invalid: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("paddock-etl")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let _guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("paddock-etl: failed to initialize logging: {:#}", err);
            return ExitCode::FAILURE;
        },
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{:#}", err), "Run failed");
            eprintln!("paddock-etl: {:#}", err);
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = EtlConfig::from_env()?;
    if cli.skip_invalid {
        config.validation_policy = ValidationPolicy::SkipRecord;
    }

    let tables = extract::extract_tables(&cli.source)
        .with_context(|| format!("Failed to read {}", cli.source.display()))?;
    let batch = NormalizedTable::concat(tables.iter().map(normalize_table));

    info!(
        source = %cli.source.display(),
        tables = tables.len(),
        records = batch.len(),
        "Normalized source document"
    );

    if cli.dry_run {
        print!("{}", preview::format_preview(&batch, config.preview_rows));
        return Ok(());
    }

    let db_config = DbConfig::from_env()?;
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let orchestrator =
        LoadOrchestrator::new(PgStore::new(pool)).with_policy(config.validation_policy);
    let stats = orchestrator.load(&batch).await?;

    info!(
        riders_created = stats.riders_created,
        riders_updated = stats.riders_updated,
        seasons_created = stats.seasons_created,
        races_created = stats.races_created,
        results_created = stats.results_created,
        results_updated = stats.results_updated,
        records_skipped = stats.records_skipped,
        "Load complete"
    );
    println!("{}", stats);

    Ok(())
}
