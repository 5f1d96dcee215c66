//! Export of signal envelopes: JSON and per-list CSV.
//!
//! Persisted JSON carries a `schemaVersion`; newer versions are rejected on
//! load. Artifact files are written to a temporary name and renamed into
//! place, so readers never observe a partial file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use holdlab_core::signals::{ExclusionItem, PortfolioItem, ReportedChange, WatchlistItem};

use crate::service::{SignalEnvelope, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an envelope to pretty JSON.
pub fn export_json(envelope: &SignalEnvelope) -> Result<String> {
    serde_json::to_string_pretty(envelope).context("failed to serialize SignalEnvelope to JSON")
}

/// Deserialize an envelope, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SignalEnvelope> {
    let envelope: SignalEnvelope =
        serde_json::from_str(json).context("failed to deserialize SignalEnvelope from JSON")?;
    if envelope.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            envelope.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(envelope)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn changes_cell(changes: &[ReportedChange]) -> String {
    changes
        .iter()
        .map(|c| format!("{} {} {:.2}%", c.period, c.kind, c.percent))
        .collect::<Vec<_>>()
        .join("; ")
}

fn opt_cell(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: id, name, reason, severity, detail, current_shares,
/// current_value, previous_value, changes
pub fn export_exclusion_csv(items: &[ExclusionItem]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "name",
        "reason",
        "severity",
        "detail",
        "current_shares",
        "current_value",
        "previous_value",
        "changes",
    ])?;
    for item in items {
        wtr.write_record([
            item.id.as_str(),
            &item.name,
            &serde_plain(&item.reason)?,
            &serde_plain(&item.severity)?,
            &item.detail,
            &item.current_shares.to_string(),
            &opt_cell(item.current_value),
            &opt_cell(item.previous_value),
            &changes_cell(&item.changes),
        ])?;
    }
    finish(wtr)
}

/// Columns: id, name, signal, detail, current_shares, current_value, changes
pub fn export_watchlist_csv(items: &[WatchlistItem]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "name",
        "signal",
        "detail",
        "current_shares",
        "current_value",
        "changes",
    ])?;
    for item in items {
        wtr.write_record([
            item.id.as_str(),
            &item.name,
            &serde_plain(&item.signal)?,
            &item.detail,
            &item.current_shares.to_string(),
            &item.current_value.to_string(),
            &item.changes.as_deref().map(changes_cell).unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

/// Columns: rank, id, name, shares, value, value_in_millions,
/// last_change_type, last_change_percent
pub fn export_portfolio_csv(items: &[PortfolioItem]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "id",
        "name",
        "shares",
        "value",
        "value_in_millions",
        "last_change_type",
        "last_change_percent",
    ])?;
    for (i, item) in items.iter().enumerate() {
        let (kind, percent) = match &item.most_recent_transition {
            Some(t) => (t.kind.to_string(), format!("{:.2}", t.percent)),
            None => (String::new(), String::new()),
        };
        let rank = (i + 1).to_string();
        wtr.write_record([
            rank.as_str(),
            item.id.as_str(),
            &item.name,
            &item.shares.to_string(),
            &item.value.to_string(),
            &format!("{:.2}", item.value_in_millions),
            &kind,
            &percent,
        ])?;
    }
    finish(wtr)
}

/// Wire name of a unit enum variant (`"HIGH"`, `"NEW_POSITION"`, ...).
fn serde_plain<T: serde::Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => bail!("expected a string-valued enum, got {other}"),
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub exclusion_csv: PathBuf,
    pub watchlist_csv: PathBuf,
    pub portfolio_csv: PathBuf,
}

/// Write `{key}.json` and `{key}_{exclusion,watchlist,portfolio}.csv`
/// under `output_dir`, replacing any previous artifacts for the source.
pub fn save_artifacts(envelope: &SignalEnvelope, output_dir: &Path) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let key = &envelope.source_key;
    let paths = ArtifactPaths {
        json: output_dir.join(format!("{key}.json")),
        exclusion_csv: output_dir.join(format!("{key}_exclusion.csv")),
        watchlist_csv: output_dir.join(format!("{key}_watchlist.csv")),
        portfolio_csv: output_dir.join(format!("{key}_portfolio.csv")),
    };

    write_atomic(&paths.json, &export_json(envelope)?)?;
    write_atomic(
        &paths.exclusion_csv,
        &export_exclusion_csv(&envelope.report.exclusion_list)?,
    )?;
    write_atomic(
        &paths.watchlist_csv,
        &export_watchlist_csv(&envelope.report.watchlist)?,
    )?;
    write_atomic(
        &paths.portfolio_csv,
        &export_portfolio_csv(&envelope.report.portfolio)?,
    )?;

    Ok(paths)
}

/// Load an envelope previously written by [`save_artifacts`].
pub fn load_artifacts(output_dir: &Path, source_key: &str) -> Result<SignalEnvelope> {
    let path = output_dir.join(format!("{source_key}.json"));
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", path.display()))?;
    Ok(())
}
