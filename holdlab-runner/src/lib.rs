//! HoldLab Runner — pipeline orchestration, caching, configuration, export.
//!
//! This crate builds on `holdlab-core` to provide:
//! - Parallel filing retrieval into period snapshots
//! - A TTL response cache with an injectable clock
//! - TOML + environment configuration
//! - The signal service used by the CLI and HTTP server
//! - JSON and CSV export of signal reports
//! - Tracing subscriber setup

pub mod cache;
pub mod config;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod service;

pub use cache::{Clock, ManualClock, ResponseCache, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use export::{
    export_exclusion_csv, export_json, export_portfolio_csv, export_watchlist_csv, import_json,
    load_artifacts, save_artifacts, ArtifactPaths,
};
pub use logging::init_logging;
pub use pipeline::{analyze_snapshots, analyze_source, collect_snapshots, dataset_hash, PipelineError, SourceAnalysis};
pub use service::{ServiceError, SignalEnvelope, SignalService, SourceInfo, SCHEMA_VERSION};
