// Backlink aggregation: by anchor text, by referring domain, by target page

use crate::host::{referring_domain, top_level_domain};
use backlens_client::BacklinkRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Follow/nofollow split for one bucket. `dofollow + nofollow == count` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub count: usize,
    pub dofollow: usize,
    pub nofollow: usize,
}

impl LinkCounts {
    pub fn record(&mut self, link: &BacklinkRecord) {
        self.count += 1;
        if link.is_nofollow() {
            self.nofollow += 1;
        } else {
            self.dofollow += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorBucket {
    pub text: String,
    #[serde(flatten)]
    pub counts: LinkCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainBucket {
    pub domain: String,
    pub tld: String,
    #[serde(flatten)]
    pub counts: LinkCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBucket {
    pub url: String,
    #[serde(flatten)]
    pub counts: LinkCounts,
}

/// Anything carrying a [`LinkCounts`].
pub trait Counted {
    fn counts(&self) -> &LinkCounts;

    fn counts_mut(&mut self) -> &mut LinkCounts;

    fn count(&self) -> usize {
        self.counts().count
    }
}

macro_rules! impl_counted {
    ($($bucket:ty),+) => {
        $(
            impl Counted for $bucket {
                fn counts(&self) -> &LinkCounts {
                    &self.counts
                }

                fn counts_mut(&mut self) -> &mut LinkCounts {
                    &mut self.counts
                }
            }
        )+
    };
}

impl_counted!(AnchorBucket, DomainBucket, PageBucket);

/// Sum of counts across buckets, used as the percentage denominator.
pub fn total_count<T: Counted>(buckets: &[T]) -> usize {
    buckets.iter().map(Counted::count).sum()
}

/// Percentage of `total` held by `count`, zero when there is nothing to divide.
pub fn share_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Group `records` by the key `key_of` yields, keeping first-encounter order,
/// then rank by count. Records for which `key_of` returns `None` are skipped.
fn aggregate<T, K, B>(records: &[BacklinkRecord], key_of: K, new_bucket: B) -> Vec<T>
where
    T: Counted,
    K: Fn(&BacklinkRecord) -> Option<String>,
    B: Fn(String) -> T,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<T> = Vec::new();

    for record in records {
        let Some(key) = key_of(record) else {
            continue;
        };

        let position = *index.entry(key).or_insert_with_key(|key| {
            buckets.push(new_bucket(key.clone()));
            buckets.len() - 1
        });
        buckets[position].counts_mut().record(record);
    }

    // sort_by is stable: equal counts keep first-encounter order
    buckets.sort_by(|a, b| b.count().cmp(&a.count()));
    buckets
}

/// Group backlinks by trimmed anchor text (case-sensitive).
pub fn aggregate_by_anchor(records: &[BacklinkRecord]) -> Vec<AnchorBucket> {
    aggregate(
        records,
        |record| Some(record.anchor_text().to_string()),
        |text| AnchorBucket {
            text,
            counts: LinkCounts::default(),
        },
    )
}

/// Group backlinks by referring hostname. Records whose source is not a
/// usable URL contribute to no bucket.
pub fn aggregate_by_domain(records: &[BacklinkRecord]) -> Vec<DomainBucket> {
    aggregate(
        records,
        |record| match referring_domain(&record.source) {
            Ok(domain) => Some(domain),
            Err(e) => {
                debug!("Skipping backlink in domain view: {}", e);
                None
            }
        },
        |domain| DomainBucket {
            tld: top_level_domain(&domain).to_string(),
            domain,
            counts: LinkCounts::default(),
        },
    )
}

/// Group backlinks by the raw target URL.
pub fn aggregate_by_page(records: &[BacklinkRecord]) -> Vec<PageBucket> {
    aggregate(
        records,
        |record| Some(record.target.clone()),
        |url| PageBucket {
            url,
            counts: LinkCounts::default(),
        },
    )
}
