// Tests for loading saved analyses from a data directory

use backlens_core::analyze::Analysis;
use backlens_core::error::CoreError;
use backlens_core::history::{latest_snapshot, list_domains, list_snapshots, snapshot_path};
use backlens_core::snapshot::Snapshot;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_domain(data_dir: &Path, domain: &str, entries: &[(&str, &str)]) {
    let dir = data_dir.join(domain);
    fs::create_dir_all(&dir).unwrap();

    let analyses: Vec<serde_json::Value> = entries
        .iter()
        .map(|(timestamp, date)| {
            serde_json::json!({
                "timestamp": timestamp,
                "date": date,
                "filename": format!("{}.json", timestamp),
            })
        })
        .collect();
    let index = serde_json::json!({ "domain": domain, "analyses": analyses });
    fs::write(dir.join("index.json"), index.to_string()).unwrap();

    for (timestamp, _) in entries {
        let snapshot = serde_json::json!({
            "backlinks": [
                {"source": "http://www.a.com/", "target": format!("https://{}/", domain), "anchor": timestamp, "nf": 0},
                {"source": "http://a.com/x", "target": format!("https://{}/", domain), "nf": 1}
            ],
            "metrics": {},
            "domainMetrics": {"mozDA": 33},
            "_metadata": {"domain": domain, "timestamp": timestamp, "saved_at": "2024-01-01T00:00:00"}
        });
        fs::write(dir.join(format!("{}.json", timestamp)), snapshot.to_string()).unwrap();
    }
}

// ============================================================================
// Domain Listing Tests
// ============================================================================

#[test]
fn test_list_domains_missing_dir() {
    let dir = TempDir::new().unwrap();
    let domains = list_domains(&dir.path().join("nope")).unwrap();
    assert!(domains.is_empty());
}

#[test]
fn test_list_domains_newest_first() {
    let dir = TempDir::new().unwrap();
    write_domain(dir.path(), "old.com", &[("2024-01-01_10-00-00", "2024-01-01T10:00:00")]);
    write_domain(
        dir.path(),
        "new.com",
        &[
            ("2024-02-01_10-00-00", "2024-02-01T10:00:00"),
            ("2024-03-01_10-00-00", "2024-03-01T10:00:00"),
        ],
    );
    // directories without an index are ignored
    fs::create_dir_all(dir.path().join("stray")).unwrap();

    let domains = list_domains(dir.path()).unwrap();
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[0].domain, "new.com");
    assert_eq!(domains[0].analyses_count, 2);
    assert_eq!(domains[0].last_analysis, "2024-03-01T10:00:00");
    assert_eq!(domains[1].domain, "old.com");
}

#[test]
fn test_list_domains_skips_broken_index() {
    let dir = TempDir::new().unwrap();
    write_domain(dir.path(), "good.com", &[("2024-01-01_10-00-00", "2024-01-01T10:00:00")]);
    fs::create_dir_all(dir.path().join("bad.com")).unwrap();
    fs::write(dir.path().join("bad.com").join("index.json"), "{oops").unwrap();

    let domains = list_domains(dir.path()).unwrap();
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].domain, "good.com");
}

// ============================================================================
// Snapshot Listing Tests
// ============================================================================

#[test]
fn test_list_snapshots_newest_first() {
    let dir = TempDir::new().unwrap();
    write_domain(
        dir.path(),
        "example.com",
        &[
            ("2024-02-01_10-00-00", "2024-02-01T10:00:00"),
            ("2024-03-01_10-00-00", "2024-03-01T10:00:00"),
        ],
    );

    let entries = list_snapshots(dir.path(), "example.com").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].filename, "2024-03-01_10-00-00.json");
}

#[test]
fn test_list_snapshots_unknown_domain() {
    let dir = TempDir::new().unwrap();
    assert!(list_snapshots(dir.path(), "unknown.com").unwrap().is_empty());
}

#[test]
fn test_snapshot_path_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        snapshot_path(dir.path(), "..", "secret.json"),
        Err(CoreError::Config(_))
    ));
    assert!(matches!(
        snapshot_path(dir.path(), "example.com", "../../etc/passwd"),
        Err(CoreError::Config(_))
    ));
}

#[test]
fn test_snapshot_path_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        snapshot_path(dir.path(), "example.com", "missing.json"),
        Err(CoreError::NotFound(_))
    ));
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_load_latest_rebuilds_summaries() {
    let dir = TempDir::new().unwrap();
    write_domain(
        dir.path(),
        "example.com",
        &[
            ("2024-02-01_10-00-00", "2024-02-01T10:00:00"),
            ("2024-03-01_10-00-00", "2024-03-01T10:00:00"),
        ],
    );

    let path = latest_snapshot(dir.path(), "example.com").unwrap();
    let snapshot = Snapshot::load(&path).unwrap();
    let analysis = Analysis::from_snapshot(snapshot, "ignored.com");

    assert_eq!(analysis.domain, "example.com");
    assert!(analysis.has_authority_metrics());
    assert!(analysis.warnings.is_empty());

    let domains = analysis.domains();
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].domain, "a.com");
    assert_eq!(domains[0].counts.count, 2);

    let anchors = analysis.anchors();
    assert!(anchors.iter().any(|a| a.text == "2024-03-01_10-00-00"));
    assert!(anchors.iter().any(|a| a.text == "No anchor text"));
}

#[test]
fn test_latest_snapshot_without_history() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        latest_snapshot(dir.path(), "example.com"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn test_load_invalid_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(Snapshot::load(&path), Err(CoreError::Json { .. })));
    assert!(matches!(
        Snapshot::load(&dir.path().join("absent.json")),
        Err(CoreError::Io { .. })
    ));
}
