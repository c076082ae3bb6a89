// Saved analysis files as written by the data backend

use crate::error::{CoreError, Result};
use backlens_client::{BacklinkRecord, MetricMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub saved_at: String,
}

/// One saved analysis: the backlinks response plus the domain metrics that
/// were fetched alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub backlinks: Vec<BacklinkRecord>,
    #[serde(default)]
    pub metrics: MetricMap,
    #[serde(rename = "domainMetrics", default)]
    pub domain_metrics: MetricMap,
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SnapshotMetadata>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let snapshot = Self::from_json(&contents).map_err(|e| CoreError::json(path, e))?;
        debug!(
            "Loaded snapshot {} with {} backlinks",
            path.display(),
            snapshot.backlinks.len()
        );
        Ok(snapshot)
    }

    pub fn from_json(contents: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Domain recorded in the metadata block, if any.
    pub fn domain(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|m| m.domain.as_str())
            .filter(|d| !d.is_empty())
    }
}
