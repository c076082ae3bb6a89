// Tests for backlink aggregation by anchor, domain and page

use backlens_client::BacklinkRecord;
use backlens_client::record::NO_ANCHOR_TEXT;
use backlens_core::analysis::{
    Counted, aggregate_by_anchor, aggregate_by_domain, aggregate_by_page, total_count,
};

fn link(source: &str, target: &str, nf: i64) -> BacklinkRecord {
    BacklinkRecord::new(source, target).with_nf(nf)
}

fn sample() -> Vec<BacklinkRecord> {
    vec![
        link("http://www.a.com/1", "https://x.com/", 0).with_anchor("Widgets"),
        link("http://b.com/2", "https://x.com/p", 1).with_anchor("  Widgets  "),
        link("not a url", "https://x.com/p", 0).with_title("Great page"),
        link("http://c.org/3", "https://x.com/", 1),
        link("http://a.com/4", "https://x.com/p", 0).with_anchor("widgets"),
        link("https://news.c.org/5", "https://x.com/q", 0).with_anchor("Read more"),
    ]
}

// ============================================================================
// Anchor Aggregation Tests
// ============================================================================

#[test]
fn test_anchor_every_record_lands_in_one_bucket() {
    let records = sample();
    let buckets = aggregate_by_anchor(&records);
    assert_eq!(total_count(&buckets), records.len());
}

#[test]
fn test_anchor_trims_but_keeps_case() {
    let buckets = aggregate_by_anchor(&sample());
    let widgets = buckets.iter().find(|b| b.text == "Widgets").unwrap();
    assert_eq!(widgets.counts.count, 2);
    assert_eq!(widgets.counts.dofollow, 1);
    assert_eq!(widgets.counts.nofollow, 1);
    assert!(buckets.iter().any(|b| b.text == "widgets"));
}

#[test]
fn test_anchor_falls_back_to_title_then_placeholder() {
    let buckets = aggregate_by_anchor(&sample());
    assert!(buckets.iter().any(|b| b.text == "Great page"));
    let placeholder = buckets.iter().find(|b| b.text == NO_ANCHOR_TEXT).unwrap();
    assert_eq!(placeholder.counts.count, 1);
}

#[test]
fn test_anchor_placeholder_for_bare_record() {
    let buckets = aggregate_by_anchor(&[BacklinkRecord::new("http://a.com/", "t")]);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].text, "No anchor text");
}

#[test]
fn test_anchor_blank_anchor_uses_title() {
    let record = BacklinkRecord::new("http://a.com/", "t")
        .with_anchor("   ")
        .with_title("Title text");
    let buckets = aggregate_by_anchor(&[record]);
    assert_eq!(buckets[0].text, "Title text");
}

#[test]
fn test_anchor_ties_keep_first_encounter_order() {
    let records = vec![
        link("http://a.com/", "t", 0).with_anchor("first"),
        link("http://b.com/", "t", 0).with_anchor("second"),
        link("http://c.com/", "t", 0).with_anchor("third"),
        link("http://d.com/", "t", 0).with_anchor("third"),
    ];
    let texts: Vec<String> = aggregate_by_anchor(&records)
        .into_iter()
        .map(|b| b.text)
        .collect();
    assert_eq!(texts, vec!["third", "first", "second"]);
}

// ============================================================================
// Domain Aggregation Tests
// ============================================================================

#[test]
fn test_domain_merges_www_variants() {
    let records = vec![
        link("http://www.example.com/a", "t", 0),
        link("http://example.com/b", "t2", 1),
    ];
    let buckets = aggregate_by_domain(&records);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].domain, "example.com");
    assert_eq!(buckets[0].tld, "com");
    assert_eq!(buckets[0].counts.count, 2);
    assert_eq!(buckets[0].counts.dofollow, 1);
    assert_eq!(buckets[0].counts.nofollow, 1);
}

#[test]
fn test_domain_skips_unparseable_sources() {
    let buckets = aggregate_by_domain(&[link("not a url", "t", 0)]);
    assert!(buckets.is_empty());
}

#[test]
fn test_domain_skipped_records_missing_from_total() {
    let records = sample();
    let buckets = aggregate_by_domain(&records);
    assert_eq!(total_count(&buckets), records.len() - 1);
}

#[test]
fn test_domain_subdomains_are_separate() {
    let buckets = aggregate_by_domain(&sample());
    assert!(buckets.iter().any(|b| b.domain == "c.org"));
    assert!(buckets.iter().any(|b| b.domain == "news.c.org"));
}

#[test]
fn test_domain_without_dot_uses_whole_host_as_tld() {
    let buckets = aggregate_by_domain(&[link("http://localhost:8080/x", "t", 0)]);
    assert_eq!(buckets[0].domain, "localhost");
    assert_eq!(buckets[0].tld, "localhost");
}

// ============================================================================
// Page Aggregation Tests
// ============================================================================

#[test]
fn test_page_counts_repeated_target() {
    let records = vec![
        link("http://a.com/", "https://x.com/p", 0),
        link("http://b.com/", "https://x.com/p", 1),
        link("http://c.com/", "https://x.com/p", 0),
    ];
    let buckets = aggregate_by_page(&records);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].url, "https://x.com/p");
    assert_eq!(buckets[0].count(), 3);
}

#[test]
fn test_page_keys_are_raw_strings() {
    let records = vec![
        link("http://a.com/", "https://x.com/p", 0),
        link("http://a.com/", "https://x.com/p/", 0),
        link("http://a.com/", "not even a url", 0),
    ];
    assert_eq!(aggregate_by_page(&records).len(), 3);
}

// ============================================================================
// Shared Invariants
// ============================================================================

#[test]
fn test_follow_split_adds_up() {
    let records = sample();
    for bucket in aggregate_by_anchor(&records) {
        assert_eq!(bucket.counts.dofollow + bucket.counts.nofollow, bucket.counts.count);
    }
    for bucket in aggregate_by_domain(&records) {
        assert_eq!(bucket.counts.dofollow + bucket.counts.nofollow, bucket.counts.count);
    }
    for bucket in aggregate_by_page(&records) {
        assert_eq!(bucket.counts.dofollow + bucket.counts.nofollow, bucket.counts.count);
    }
}

#[test]
fn test_outputs_sorted_by_count_descending() {
    let records = sample();
    let anchors = aggregate_by_anchor(&records);
    assert!(anchors.windows(2).all(|w| w[0].count() >= w[1].count()));
    let domains = aggregate_by_domain(&records);
    assert!(domains.windows(2).all(|w| w[0].count() >= w[1].count()));
    let pages = aggregate_by_page(&records);
    assert!(pages.windows(2).all(|w| w[0].count() >= w[1].count()));
}

#[test]
fn test_only_nf_one_is_nofollow() {
    let records = vec![
        link("http://a.com/", "t", 2),
        link("http://a.com/", "t", -1),
        BacklinkRecord::new("http://a.com/", "t"),
        link("http://a.com/", "t", 1),
    ];
    let buckets = aggregate_by_page(&records);
    assert_eq!(buckets[0].counts.dofollow, 3);
    assert_eq!(buckets[0].counts.nofollow, 1);
}

#[test]
fn test_empty_input() {
    assert!(aggregate_by_anchor(&[]).is_empty());
    assert!(aggregate_by_domain(&[]).is_empty());
    assert!(aggregate_by_page(&[]).is_empty());
}
