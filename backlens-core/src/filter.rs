// Backlink filter: link type, free-text search, one link per referring domain

use crate::host::referring_domain;
use backlens_client::BacklinkRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    All,
    Dofollow,
    Nofollow,
}

impl LinkType {
    pub fn matches(&self, record: &BacklinkRecord) -> bool {
        match self {
            LinkType::All => true,
            LinkType::Dofollow => !record.is_nofollow(),
            LinkType::Nofollow => record.is_nofollow(),
        }
    }

    /// all -> dofollow -> nofollow -> all
    pub fn next(self) -> Self {
        match self {
            LinkType::All => LinkType::Dofollow,
            LinkType::Dofollow => LinkType::Nofollow,
            LinkType::Nofollow => LinkType::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::All => "all",
            LinkType::Dofollow => "dofollow",
            LinkType::Nofollow => "nofollow",
        }
    }
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LinkType::All),
            "dofollow" | "follow" => Ok(LinkType::Dofollow),
            "nofollow" => Ok(LinkType::Nofollow),
            other => Err(format!(
                "invalid link type '{}' (expected all, dofollow or nofollow)",
                other
            )),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub link_type: LinkType,
    pub search_text: String,
    pub hide_multiple_per_domain: bool,
}

impl FilterCriteria {
    pub fn is_pass_through(&self) -> bool {
        self.link_type == LinkType::All
            && self.search_text.is_empty()
            && !self.hide_multiple_per_domain
    }

    fn matches(&self, record: &BacklinkRecord, needle: &str) -> bool {
        self.link_type.matches(record) && (needle.is_empty() || haystack(record).contains(needle))
    }
}

/// Lowercased anchor, title, source and target joined by spaces. Missing
/// fields contribute an empty string.
fn haystack(record: &BacklinkRecord) -> String {
    format!(
        "{} {} {} {}",
        record.anchor.as_deref().unwrap_or_default(),
        record.title.as_deref().unwrap_or_default(),
        record.source,
        record.target
    )
    .to_lowercase()
}

/// Apply `criteria` to `records`, preserving their relative order.
///
/// Records whose source cannot be parsed are never dropped by the
/// one-per-domain pass.
pub fn filter_records(records: &[BacklinkRecord], criteria: &FilterCriteria) -> Vec<BacklinkRecord> {
    if criteria.is_pass_through() {
        return records.to_vec();
    }

    let needle = criteria.search_text.to_lowercase();

    let matched = records
        .iter()
        .filter(|record| criteria.matches(record, &needle));

    if !criteria.hide_multiple_per_domain {
        return matched.cloned().collect();
    }

    let mut seen: HashSet<String> = HashSet::new();
    matched
        .filter(|record| match referring_domain(&record.source) {
            Ok(domain) => seen.insert(domain),
            Err(e) => {
                debug!("Keeping backlink with unparseable source: {}", e);
                true
            }
        })
        .cloned()
        .collect()
}
