use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Anchor text used when a backlink carries neither an anchor nor a title.
pub const NO_ANCHOR_TEXT: &str = "No anchor text";

/// A single backlink as reported by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklinkRecord {
    /// URL of the page containing the link
    #[serde(default)]
    pub source: String,
    /// URL being linked to
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `1` marks a nofollow link, anything else is dofollow
    #[serde(
        default,
        deserialize_with = "lenient_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub nf: Option<i64>,
}

impl BacklinkRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            anchor: None,
            title: None,
            nf: None,
        }
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_nf(mut self, nf: i64) -> Self {
        self.nf = Some(nf);
        self
    }

    pub fn is_nofollow(&self) -> bool {
        self.nf == Some(1)
    }

    pub fn follow_label(&self) -> &'static str {
        if self.is_nofollow() { "nofollow" } else { "dofollow" }
    }

    /// Anchor, falling back to title, falling back to [`NO_ANCHOR_TEXT`].
    /// Blank values are skipped and the result is trimmed.
    pub fn anchor_text(&self) -> &str {
        [self.anchor.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .unwrap_or(NO_ANCHOR_TEXT)
    }
}

// Providers are not consistent about the flag's JSON type; only integral
// numbers are meaningful.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    })
}

/// An opaque metric value. Providers mix numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Other(serde_json::Value),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{:.2}", n),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Bool(b) => write!(f, "{}", b),
            MetricValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Metrics keyed by name, passed through to presentation untouched.
pub type MetricMap = BTreeMap<String, MetricValue>;

/// Numeric lookup into a [`MetricMap`], treating absent or non-numeric values as zero.
pub fn metric_number(metrics: &MetricMap, key: &str) -> f64 {
    metrics.get(key).and_then(MetricValue::as_f64).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacklinksResponse {
    #[serde(default)]
    pub backlinks: Vec<BacklinkRecord>,
    #[serde(default)]
    pub metrics: MetricMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub credits_remaining: u64,
}
