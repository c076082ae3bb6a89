// Tests for table sorting

use backlens_client::BacklinkRecord;
use backlens_core::analysis::{DomainBucket, LinkCounts, aggregate_by_anchor, aggregate_by_domain};
use backlens_core::sort::{
    AnchorColumn, BacklinkColumn, DomainColumn, PageColumn, SortDirection, SortState,
    sort_buckets, sorted_by,
};

fn domain(name: &str, count: usize, nofollow: usize) -> DomainBucket {
    DomainBucket {
        domain: name.to_string(),
        tld: name.rsplit('.').next().unwrap().to_string(),
        counts: LinkCounts {
            count,
            dofollow: count - nofollow,
            nofollow,
        },
    }
}

fn buckets() -> Vec<DomainBucket> {
    vec![
        domain("beta.org", 5, 1),
        domain("Alpha.com", 9, 0),
        domain("gamma.edu", 2, 2),
        domain("delta.com", 7, 3),
    ]
}

fn names(items: &[DomainBucket]) -> Vec<&str> {
    items.iter().map(|b| b.domain.as_str()).collect()
}

// ============================================================================
// Toggle Tests
// ============================================================================

#[test]
fn test_default_state_is_count_descending() {
    let state = SortState::<DomainColumn>::default();
    assert_eq!(state.column, DomainColumn::Count);
    assert_eq!(state.direction, SortDirection::Descending);
}

#[test]
fn test_same_column_flips_direction() {
    let state = SortState::new(DomainColumn::Count, SortDirection::Descending);
    let next = state.toggle(DomainColumn::Count);
    assert_eq!(next, SortState::new(DomainColumn::Count, SortDirection::Ascending));
    assert_eq!(next.toggle(DomainColumn::Count), state);
}

#[test]
fn test_new_column_resets_to_descending() {
    let state = SortState::new(DomainColumn::Count, SortDirection::Ascending);
    let next = state.toggle(DomainColumn::Domain);
    assert_eq!(next, SortState::new(DomainColumn::Domain, SortDirection::Descending));
}

// ============================================================================
// Ordering Tests
// ============================================================================

#[test]
fn test_repeat_sort_reverses_count_order() {
    let items = buckets();
    let (desc, state) = sort_buckets(&items, DomainColumn::Count, SortState::new(DomainColumn::Domain, SortDirection::Descending));
    assert_eq!(state.direction, SortDirection::Descending);
    assert_eq!(names(&desc), vec!["Alpha.com", "delta.com", "beta.org", "gamma.edu"]);

    let (asc, state) = sort_buckets(&desc, DomainColumn::Count, state);
    assert_eq!(state, SortState::new(DomainColumn::Count, SortDirection::Ascending));
    let mut reversed = names(&desc);
    reversed.reverse();
    assert_eq!(names(&asc), reversed);
}

#[test]
fn test_text_columns_ignore_case() {
    let items = buckets();
    let asc = sorted_by(&items, SortState::new(DomainColumn::Domain, SortDirection::Ascending));
    assert_eq!(names(&asc), vec!["Alpha.com", "beta.org", "delta.com", "gamma.edu"]);
}

#[test]
fn test_numeric_columns_compare_by_value() {
    let items = vec![domain("a.com", 10, 0), domain("b.com", 9, 0), domain("c.com", 100, 0)];
    let desc = sorted_by(&items, SortState::new(DomainColumn::Count, SortDirection::Descending));
    assert_eq!(names(&desc), vec!["c.com", "a.com", "b.com"]);
}

#[test]
fn test_sort_by_nofollow_and_tld() {
    let items = buckets();
    let by_nofollow = sorted_by(&items, SortState::new(DomainColumn::Nofollow, SortDirection::Descending));
    assert_eq!(by_nofollow[0].domain, "delta.com");

    let by_tld = sorted_by(&items, SortState::new(DomainColumn::Tld, SortDirection::Ascending));
    assert_eq!(by_tld[0].tld, "com");
    assert_eq!(by_tld.last().unwrap().tld, "org");
}

#[test]
fn test_source_is_not_mutated() {
    let items = buckets();
    let before = items.clone();
    let _ = sort_buckets(&items, DomainColumn::Domain, SortState::default());
    assert_eq!(items, before);
}

#[test]
fn test_sort_anchor_buckets() {
    let records = vec![
        BacklinkRecord::new("http://a.com/", "t").with_anchor("zeta"),
        BacklinkRecord::new("http://b.com/", "t").with_anchor("Alpha"),
        BacklinkRecord::new("http://c.com/", "t").with_anchor("Alpha"),
    ];
    let anchors = aggregate_by_anchor(&records);
    let (sorted, state) = sort_buckets(&anchors, AnchorColumn::Text, SortState::default());
    assert_eq!(state.direction, SortDirection::Descending);
    assert_eq!(sorted[0].text, "zeta");
}

#[test]
fn test_sort_raw_backlinks_by_type() {
    let records = vec![
        BacklinkRecord::new("http://a.com/", "t").with_nf(1),
        BacklinkRecord::new("http://b.com/", "t").with_nf(0),
    ];
    let sorted = sorted_by(&records, SortState::new(BacklinkColumn::Type, SortDirection::Ascending));
    assert_eq!(sorted[0].source, "http://b.com/");
}

#[test]
fn test_sort_empty_is_noop() {
    let (sorted, state) = sort_buckets(&aggregate_by_domain(&[]), DomainColumn::Count, SortState::default());
    assert!(sorted.is_empty());
    assert_eq!(state.direction, SortDirection::Ascending);
}

// ============================================================================
// Column Parsing Tests
// ============================================================================

#[test]
fn test_column_from_str() {
    assert_eq!("count".parse::<AnchorColumn>().unwrap(), AnchorColumn::Count);
    assert_eq!("Anchor".parse::<AnchorColumn>().unwrap(), AnchorColumn::Text);
    assert_eq!("tld".parse::<DomainColumn>().unwrap(), DomainColumn::Tld);
    assert_eq!("page".parse::<PageColumn>().unwrap(), PageColumn::Url);
    assert_eq!("nf".parse::<BacklinkColumn>().unwrap(), BacklinkColumn::Type);
}

#[test]
fn test_column_from_str_invalid() {
    let err = "size".parse::<DomainColumn>().unwrap_err();
    assert_eq!(err.name, "size");
    assert!(err.to_string().contains("domain, count, tld, dofollow, nofollow"));
}

#[test]
fn test_column_display_round_trips() {
    for column in DomainColumn::ALL {
        assert_eq!(column.to_string().parse::<DomainColumn>().unwrap(), *column);
    }
}
