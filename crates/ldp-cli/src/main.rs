//! LDP CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use ldp_common::logging::{init_logging, LogConfig, LogLevel};
use ldp_pipeline::{DatabaseLoader, FileDiscovery, PipelineConfig, PipelineOrchestrator};
use std::process;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "ldp")]
#[command(author, version, about = "Landing data pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full ingestion pipeline over the landing directory
    Run,

    /// List the files the pipeline would process, without touching them
    Discover,

    /// Check database connectivity and report target table row counts
    Verify,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Environment configuration first, then the verbose flag on top
    let mut log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_file_prefix("ldp");
    if cli.verbose {
        log_config = log_config.with_level(LogLevel::Debug);
    }

    // The CLI should still work if logging cannot be initialized
    let _ = init_logging(&log_config);

    let result = match cli.command {
        Command::Run => run().await,
        Command::Discover => discover().await,
        Command::Verify => verify().await,
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}

/// Execute the pipeline and map its summary to the process exit status.
async fn run() -> Result<i32> {
    let config = PipelineConfig::load()?;
    let mut orchestrator = PipelineOrchestrator::new(config);

    let summary = orchestrator.run().await?;
    println!("{}", summary.summary());

    Ok(summary.exit_code())
}

/// Show what a run would pick up.
async fn discover() -> Result<i32> {
    let config = PipelineConfig::load()?;
    let files = FileDiscovery::new(&config).discover()?;

    println!("Landing directory: {}", config.landing_dir.display());
    for record in files.transactions.iter().chain(files.customers.iter()) {
        match &record.file_date {
            Some(date) => println!("  [{}] {} (dated {})", record.entity, record.file_name, date),
            None => println!("  [{}] {}", record.entity, record.file_name),
        }
    }
    println!("{} file(s) total", files.total());

    Ok(0)
}

/// Confirm the database is reachable and the target tables exist.
async fn verify() -> Result<i32> {
    let config = PipelineConfig::load()?;
    let mut loader = DatabaseLoader::new(&config);

    loader.connect().await?;
    let counts = table_counts(&loader).await;
    loader.close().await;

    let (transactions, customers) = counts?;
    println!(
        "✓ Database connected. {} transactions, {} customers loaded.",
        transactions, customers
    );

    Ok(0)
}

async fn table_counts(loader: &DatabaseLoader) -> Result<(i64, i64)> {
    let transactions = loader.table_count("transactions").await?;
    let customers = loader.table_count("customers").await?;
    Ok((transactions, customers))
}
