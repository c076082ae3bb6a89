use crate::analysis::{
    AnchorBucket, DomainBucket, PageBucket, aggregate_by_anchor, aggregate_by_domain,
    aggregate_by_page,
};
use crate::error::Result;
use crate::filter::{FilterCriteria, filter_records};
use crate::snapshot::Snapshot;
use backlens_client::{ApiClient, BacklinkRecord, MetricMap};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub const METRICS_UNAVAILABLE: &str = "Domain metrics unavailable, showing backlinks only";

/// Options for running an analysis against the provider
pub struct AnalysisOptions {
    pub domain: String,
    /// Ask the provider for at most one backlink per referring domain
    pub one_per_domain: bool,
    pub show_progress: bool,
}

/// Everything fetched for one domain. Summaries are always recomputed from
/// `backlinks`, never cached here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub domain: String,
    pub backlinks: Vec<BacklinkRecord>,
    /// Provider summary metrics that came with the backlinks
    pub metrics: MetricMap,
    /// Authority metrics, empty when they could not be fetched
    pub domain_metrics: MetricMap,
    pub warnings: Vec<String>,
}

impl Analysis {
    pub fn new(domain: impl Into<String>, backlinks: Vec<BacklinkRecord>) -> Self {
        Self {
            domain: domain.into(),
            backlinks,
            ..Default::default()
        }
    }

    /// Rebuild an analysis from a saved file. `fallback_domain` is used when
    /// the snapshot carries no metadata.
    pub fn from_snapshot(snapshot: Snapshot, fallback_domain: &str) -> Self {
        let domain = snapshot
            .domain()
            .unwrap_or(fallback_domain)
            .to_string();

        let mut warnings = Vec::new();
        if snapshot.domain_metrics.is_empty() {
            warnings.push(METRICS_UNAVAILABLE.to_string());
        }

        Self {
            domain,
            backlinks: snapshot.backlinks,
            metrics: snapshot.metrics,
            domain_metrics: snapshot.domain_metrics,
            warnings,
        }
    }

    pub fn anchors(&self) -> Vec<AnchorBucket> {
        aggregate_by_anchor(&self.backlinks)
    }

    pub fn domains(&self) -> Vec<DomainBucket> {
        aggregate_by_domain(&self.backlinks)
    }

    pub fn pages(&self) -> Vec<PageBucket> {
        aggregate_by_page(&self.backlinks)
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<BacklinkRecord> {
        filter_records(&self.backlinks, criteria)
    }

    pub fn has_authority_metrics(&self) -> bool {
        !self.domain_metrics.is_empty()
    }
}

/// Fetch backlinks and authority metrics for one domain concurrently.
///
/// A failed backlink fetch aborts the analysis. A failed metrics fetch only
/// adds a warning; the backlinks are still returned.
pub async fn execute_analysis(client: &ApiClient, options: AnalysisOptions) -> Result<Analysis> {
    let AnalysisOptions {
        domain,
        one_per_domain,
        show_progress,
    } = options;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching backlinks and metrics for {}...", domain));
        Some(pb)
    } else {
        None
    };

    let (backlinks, metrics) = tokio::join!(
        client.backlinks(&domain, one_per_domain),
        client.domain_metrics(&domain)
    );

    let backlinks = match backlinks {
        Ok(response) => response,
        Err(e) => {
            if let Some(pb) = &progress_bar {
                pb.finish_and_clear();
            }
            return Err(e.into());
        }
    };

    let mut warnings = Vec::new();
    let domain_metrics = match metrics {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!("Domain metrics fetch failed for {}: {}", domain, e);
            warnings.push(METRICS_UNAVAILABLE.to_string());
            MetricMap::new()
        }
    };

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Analysis complete! {} backlinks for {}",
            backlinks.backlinks.len(),
            domain
        ));
    }
    info!(
        "Analysed {}: {} backlinks, {} authority metrics",
        domain,
        backlinks.backlinks.len(),
        domain_metrics.len()
    );

    Ok(Analysis {
        domain,
        backlinks: backlinks.backlinks,
        metrics: backlinks.metrics,
        domain_metrics,
        warnings,
    })
}
