// Display heuristics: anchor categories, authority ratings, notable TLDs

use crate::analysis::AnchorBucket;
use backlens_client::MetricMap;
use backlens_client::record::metric_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anchor phrases that say nothing about the linked page.
pub const GENERIC_ANCHORS: [&str; 6] = ["click here", "here", "link", "website", "read more", "more"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorCategory {
    Branded,
    Generic,
    Other,
}

/// Branded when the text mentions the first label of `domain`, generic when
/// it is one of [`GENERIC_ANCHORS`], otherwise other.
pub fn classify_anchor(text: &str, domain: &str) -> AnchorCategory {
    let lowered = text.to_lowercase();
    let brand = domain
        .split('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if !brand.is_empty() && lowered.contains(&brand) {
        AnchorCategory::Branded
    } else if GENERIC_ANCHORS.contains(&lowered.as_str()) {
        AnchorCategory::Generic
    } else {
        AnchorCategory::Other
    }
}

/// Number of distinct anchor buckets per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDistribution {
    pub branded: usize,
    pub generic: usize,
    pub other: usize,
}

pub fn anchor_distribution(buckets: &[AnchorBucket], domain: &str) -> AnchorDistribution {
    buckets
        .iter()
        .fold(AnchorDistribution::default(), |mut dist, bucket| {
            match classify_anchor(&bucket.text, domain) {
                AnchorCategory::Branded => dist.branded += 1,
                AnchorCategory::Generic => dist.generic += 1,
                AnchorCategory::Other => dist.other += 1,
            }
            dist
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityStatus {
    Excellent,
    Good,
    Poor,
}

impl AuthorityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityStatus::Excellent => "excellent",
            AuthorityStatus::Good => "good",
            AuthorityStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for AuthorityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating for 0-100 authority style scores where higher is better.
pub fn authority_status(score: f64) -> AuthorityStatus {
    if score >= 70.0 {
        AuthorityStatus::Excellent
    } else if score >= 40.0 {
        AuthorityStatus::Good
    } else {
        AuthorityStatus::Poor
    }
}

/// Rating for spam scores where lower is better.
pub fn spam_status(score: f64) -> AuthorityStatus {
    if score <= 5.0 {
        AuthorityStatus::Excellent
    } else if score <= 30.0 {
        AuthorityStatus::Good
    } else {
        AuthorityStatus::Poor
    }
}

/// Education and government TLDs get highlighted in domain tables.
pub fn is_institutional_tld(tld: &str) -> bool {
    matches!(tld.to_ascii_lowercase().as_str(), "edu" | "gov")
}

/// How a metric row is rated.
#[derive(Debug, Clone, Copy)]
enum Rating {
    Authority,
    Spam,
    Presence,
    Info,
}

/// One row of the authority metrics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorityRow {
    pub source: &'static str,
    pub metric: &'static str,
    pub value: String,
    /// `None` for purely informational rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AuthorityStatus>,
}

const AUTHORITY_TABLE: &[(&str, &str, &str, Rating)] = &[
    ("Moz", "Domain Authority (DA)", "mozDA", Rating::Authority),
    ("Moz", "Page Authority (PA)", "mozPA", Rating::Authority),
    ("Moz", "MozRank", "mozRank", Rating::Authority),
    ("Moz", "MozTrust", "mozTrust", Rating::Authority),
    ("Moz", "Spam Score", "mozSpam", Rating::Spam),
    ("Moz", "Total Links", "mozLinks", Rating::Info),
    ("Majestic", "Citation Flow (CF)", "majesticCF", Rating::Authority),
    ("Majestic", "Trust Flow (TF)", "majesticTF", Rating::Authority),
    ("Majestic", "Total Links", "majesticLinks", Rating::Info),
    ("Majestic", "Referring Domains", "majesticRefDomains", Rating::Info),
    ("Majestic", "Referring IPs", "majesticIPs", Rating::Info),
    ("Majestic", "Referring Subnets", "majesticRefSubnets", Rating::Info),
    ("Majestic", "EDU Backlinks", "majesticRefEDU", Rating::Presence),
    ("Majestic", "GOV Backlinks", "majesticRefGov", Rating::Presence),
    ("Majestic", "Top Topic", "majesticTTF0Name", Rating::Info),
    ("Majestic", "Top Topic Score", "majesticTTF0Value", Rating::Info),
];

/// Rated rows for the authority metrics a provider returned. Missing numeric
/// metrics read as zero, a missing topic name as `N/A`.
pub fn authority_rows(metrics: &MetricMap) -> Vec<AuthorityRow> {
    AUTHORITY_TABLE
        .iter()
        .map(|&(source, metric, key, rating)| {
            let score = metric_number(metrics, key);
            let value = match metrics.get(key) {
                Some(v) => v.to_string(),
                None if key == "majesticTTF0Name" => "N/A".to_string(),
                None => "0".to_string(),
            };
            let status = match rating {
                Rating::Authority => Some(authority_status(score)),
                Rating::Spam => Some(spam_status(score)),
                Rating::Presence if score > 0.0 => Some(AuthorityStatus::Excellent),
                Rating::Presence => Some(AuthorityStatus::Poor),
                Rating::Info => None,
            };
            AuthorityRow {
                source,
                metric,
                value,
                status,
            }
        })
        .collect()
}

/// Headline numbers from the provider's summary metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
    pub subtext: String,
}

pub fn summary_cards(domain: &str, backlink_count: usize, metrics: &MetricMap) -> Vec<SummaryCard> {
    let number = |key: &str| format!("{}", metric_number(metrics, key) as i64);
    let nofollow_ratio = metric_number(metrics, "nofollow_ratio");

    let card = |label, value: String, subtext: &str| SummaryCard {
        label,
        value,
        subtext: subtext.to_string(),
    };

    vec![
        card("Domain", domain.to_string(), "Target domain"),
        card("Total Backlinks", backlink_count.to_string(), "Total links found"),
        card("Total Pages", number("page_count"), "Indexed pages"),
        card("Links In", number("links_in"), "Incoming links"),
        card("Links Out", number("links_out"), "Outgoing links"),
        card(
            "Dofollow",
            number("backlinks_follow"),
            &format!("{}% of backlinks", (100.0 - nofollow_ratio).round()),
        ),
        card(
            "Nofollow",
            number("backlinks_nofollow"),
            &format!("{}% of backlinks", nofollow_ratio.round()),
        ),
        card("Referring Domains", number("ref_domains"), "Unique domains"),
        card("EDU Links", number("links_from_edu"), "Education sites"),
        card("GOV Links", number("links_from_gov"), "Government sites"),
    ]
}
