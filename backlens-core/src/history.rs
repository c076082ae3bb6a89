// Read-only browsing of the backend's saved analyses
//
// Layout: <data_dir>/<domain>/index.json lists the <timestamp>.json files.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(default)]
    pub date: String,
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainIndex {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub analyses: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: String,
    pub analyses_count: usize,
    /// Date of the most recent analysis, empty when there is none
    pub last_analysis: String,
}

fn read_index(path: &Path) -> Result<DomainIndex> {
    let contents = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| CoreError::json(path, e))
}

/// Every domain directory that has an index, most recently analysed first.
/// A missing data directory yields an empty list.
pub fn list_domains(data_dir: &Path) -> Result<Vec<DomainSummary>> {
    if !data_dir.exists() {
        debug!("Data directory {} does not exist", data_dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(data_dir).map_err(|e| CoreError::io(data_dir, e))?;
    let mut domains = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(data_dir, e))?;
        let path = entry.path();
        let index_path = path.join(INDEX_FILE);
        if !path.is_dir() || !index_path.exists() {
            continue;
        }

        let index = match read_index(&index_path) {
            Ok(index) => index,
            Err(e) => {
                warn!("Skipping unreadable index: {}", e);
                continue;
            }
        };

        domains.push(DomainSummary {
            domain: entry.file_name().to_string_lossy().into_owned(),
            analyses_count: index.analyses.len(),
            last_analysis: index
                .analyses
                .last()
                .map(|a| a.date.clone())
                .unwrap_or_default(),
        });
    }

    // ISO dates order lexically
    domains.sort_by(|a, b| b.last_analysis.cmp(&a.last_analysis));
    Ok(domains)
}

/// Saved analyses for `domain`, newest first. Missing index yields an empty list.
pub fn list_snapshots(data_dir: &Path, domain: &str) -> Result<Vec<HistoryEntry>> {
    check_component(domain)?;
    let index_path = data_dir.join(domain).join(INDEX_FILE);
    if !index_path.exists() {
        return Ok(Vec::new());
    }

    let mut analyses = read_index(&index_path)?.analyses;
    analyses.reverse();
    Ok(analyses)
}

/// Path of one saved analysis, refusing anything that would escape the
/// domain directory.
pub fn snapshot_path(data_dir: &Path, domain: &str, filename: &str) -> Result<PathBuf> {
    check_component(domain)?;
    check_component(filename)?;

    let path = data_dir.join(domain).join(filename);
    if !path.is_file() {
        return Err(CoreError::NotFound(format!(
            "analysis {}/{} not found",
            domain, filename
        )));
    }
    Ok(path)
}

/// Latest saved analysis for `domain`.
pub fn latest_snapshot(data_dir: &Path, domain: &str) -> Result<PathBuf> {
    let entry = list_snapshots(data_dir, domain)?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NotFound(format!("no saved analyses for {}", domain)))?;
    snapshot_path(data_dir, domain, &entry.filename)
}

fn check_component(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CoreError::Config(format!("invalid path component '{}'", name)));
    }
    Ok(())
}
