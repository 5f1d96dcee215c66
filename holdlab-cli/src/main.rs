//! HoldLab CLI — 13F holdings trajectories and position signals.
//!
//! Commands:
//! - `sources` — list configured institutional filers
//! - `signals` — fetch, analyze and print signals for one source
//! - `analyze` — run the engine over a local snapshot JSON file
//! - `generate` — write JSON + CSV artifacts for every source
//! - `serve` — HTTP API over the signal service

mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use holdlab_core::data::load_snapshots;
use holdlab_core::signals::SignalReport;
use holdlab_runner::{
    analyze_snapshots, export_json, init_logging, save_artifacts, AppConfig, SignalService,
};

#[derive(Parser)]
#[command(
    name = "holdlab",
    about = "HoldLab CLI — institutional holdings trajectory analysis"
)]
struct Cli {
    /// Path to a TOML config file. Environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources.
    Sources,
    /// Fetch filings for a source and print its signals.
    Signals {
        /// Source key (e.g., berkshire, nps).
        source: String,

        /// Ignore any cached report.
        #[arg(long, default_value_t = false)]
        refresh: bool,

        /// Print the full report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze a local JSON file of period snapshots (offline).
    Analyze {
        /// Snapshot file, most recent period first.
        #[arg(long)]
        input: PathBuf,

        /// Label recorded as the report's source.
        #[arg(long, default_value = "local")]
        label: String,

        /// Print the full report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fetch every source and write JSON + CSV artifacts.
    Generate {
        /// Output directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
    /// Serve the HTTP API.
    Serve {
        /// Listen port. Overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log_level, &config.log_format);

    match cli.command {
        Commands::Sources => run_sources(&config),
        Commands::Signals {
            source,
            refresh,
            json,
        } => run_signals(&config, &source, refresh, json),
        Commands::Analyze { input, label, json } => run_analyze(&input, &label, json),
        Commands::Generate { output_dir } => run_generate(&config, &output_dir),
        Commands::Serve { port } => run_serve(&config, port.unwrap_or(config.port)),
    }
}

fn run_sources(config: &AppConfig) -> Result<()> {
    let registry = config.source_registry()?;
    println!("{:<12} {:<12} {:<4} NAME", "KEY", "CIK", "FLAG");
    for (key, source) in &registry.sources {
        println!("{:<12} {:<12} {:<4} {}", key, source.cik, source.flag, source.name);
    }
    Ok(())
}

fn run_signals(config: &AppConfig, key: &str, refresh: bool, json: bool) -> Result<()> {
    let service = SignalService::from_config(config)?;
    let envelope = service.signals(key, refresh)?;

    if json {
        println!("{}", export_json(&envelope)?);
    } else {
        print_summary(&envelope.report);
        println!("Dataset Hash:   {}", envelope.dataset_hash);
    }
    Ok(())
}

fn run_analyze(input: &Path, label: &str, json: bool) -> Result<()> {
    let snapshots = load_snapshots(input)
        .with_context(|| format!("failed to load snapshots from {}", input.display()))?;
    let report = analyze_snapshots(&snapshots, label)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn run_generate(config: &AppConfig, output_dir: &Path) -> Result<()> {
    let service = SignalService::from_config(config)?;
    let keys: Vec<String> = service.registry().sources.keys().cloned().collect();
    let mut failures = 0usize;

    for key in &keys {
        match service.signals(key, true) {
            Ok(envelope) => {
                let paths = save_artifacts(&envelope, output_dir)?;
                println!("{key}: wrote {}", paths.json.display());
            }
            Err(e) => {
                eprintln!("Error for {key}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{failures} of {} sources failed", keys.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_serve(config: &AppConfig, port: u16) -> Result<()> {
    // The blocking HTTP client must be built and dropped outside the async runtime.
    let service = Arc::new(SignalService::from_config(config)?);
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(server::serve(Arc::clone(&service), port))?;
    drop(runtime);
    Ok(())
}

fn print_summary(report: &SignalReport) {
    let meta = &report.metadata;
    println!();
    println!("=== Signal Report ===");
    println!("Source:         {}", meta.source);
    println!("Periods:        {}", meta.analyzed_periods.join(", "));
    println!(
        "Latest:         {}",
        meta.latest_period.as_deref().unwrap_or("-")
    );
    println!("Positions:      {}", meta.total_positions);

    println!();
    println!("--- Exclusion List ({}) ---", report.exclusion_list.len());
    for item in &report.exclusion_list {
        println!(
            "  [{:?}] {:<40} {}",
            item.severity, item.name, item.detail
        );
    }

    println!();
    println!("--- Watchlist ({}) ---", report.watchlist.len());
    for item in &report.watchlist {
        println!("  {:<40} {}", item.name, item.detail);
    }

    println!();
    println!("--- Top Holdings ---");
    for (i, item) in report.portfolio.iter().take(10).enumerate() {
        let change = item
            .most_recent_transition
            .as_ref()
            .map(|t| format!("{} {:+.2}%", t.kind, t.percent))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<40} ${:>10.2}M  {}",
            i + 1,
            item.name,
            item.value_in_millions,
            change
        );
    }
}
