// Report generation from an analysis

use crate::analysis::{
    AnchorBucket, DomainBucket, LinkCounts, PageBucket, share_percent, total_count,
};
use crate::analyze::Analysis;
use crate::classify::{
    AnchorDistribution, AuthorityRow, SummaryCard, anchor_distribution, authority_rows,
    is_institutional_tld, summary_cards,
};
use crate::filter::FilterCriteria;
use crate::sort::{
    AnchorColumn, BacklinkColumn, DomainColumn, PageColumn, SortState, sorted_by,
};
use backlens_client::BacklinkRecord;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

const CSV_HEADERS: [&str; 4] = ["Anchor Text", "Type", "Source URL", "Target URL"];

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// How the tables in a report are filtered, ordered and cut off.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub criteria: FilterCriteria,
    /// Rows per table; `None` keeps everything
    pub top: Option<usize>,
    pub anchor_sort: SortState<AnchorColumn>,
    pub domain_sort: SortState<DomainColumn>,
    pub page_sort: SortState<PageColumn>,
    /// `None` keeps the provider's order
    pub backlink_sort: Option<SortState<BacklinkColumn>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub domain: String,
    pub totals: ReportTotals,
    pub criteria: FilterCriteria,
    pub summary: Vec<SummaryCard>,
    pub authority: Vec<AuthorityRow>,
    pub anchor_types: AnchorDistribution,
    pub anchors: Vec<AnchorBucket>,
    pub domains: Vec<DomainBucket>,
    pub pages: Vec<PageBucket>,
    /// Filtered backlinks, limited to `top` rows
    pub backlinks: Vec<BacklinkRecord>,
    /// Filtered backlinks in full, for export
    #[serde(skip)]
    pub export: Vec<BacklinkRecord>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub backlinks: usize,
    pub dofollow: usize,
    pub nofollow: usize,
    pub filtered: usize,
    pub unique_anchors: usize,
    pub referring_domains: usize,
    pub target_pages: usize,
    /// Denominators for the share columns
    pub anchor_links: usize,
    pub domain_links: usize,
    pub page_links: usize,
}

fn limit<T>(mut items: Vec<T>, top: Option<usize>) -> Vec<T> {
    if let Some(top) = top {
        items.truncate(top);
    }
    items
}

/// Compute every summary of `analysis` once.
pub fn gather_report_data(analysis: &Analysis, options: &ReportOptions) -> ReportData {
    let anchors = sorted_by(&analysis.anchors(), options.anchor_sort);
    let domains = sorted_by(&analysis.domains(), options.domain_sort);
    let pages = sorted_by(&analysis.pages(), options.page_sort);

    let filtered = analysis.filtered(&options.criteria);
    let export = match options.backlink_sort {
        Some(state) => sorted_by(&filtered, state),
        None => filtered,
    };

    let mut link_counts = LinkCounts::default();
    for record in &analysis.backlinks {
        link_counts.record(record);
    }

    let totals = ReportTotals {
        backlinks: analysis.backlinks.len(),
        dofollow: link_counts.dofollow,
        nofollow: link_counts.nofollow,
        filtered: export.len(),
        unique_anchors: anchors.len(),
        referring_domains: domains.len(),
        target_pages: pages.len(),
        anchor_links: total_count(&anchors),
        domain_links: total_count(&domains),
        page_links: total_count(&pages),
    };

    let authority = if analysis.has_authority_metrics() {
        authority_rows(&analysis.domain_metrics)
    } else {
        Vec::new()
    };

    ReportData {
        domain: analysis.domain.clone(),
        totals,
        criteria: options.criteria.clone(),
        summary: summary_cards(&analysis.domain, analysis.backlinks.len(), &analysis.metrics),
        authority,
        anchor_types: anchor_distribution(&anchors, &analysis.domain),
        anchors: limit(anchors, options.top),
        domains: limit(domains, options.top),
        pages: limit(pages, options.top),
        backlinks: limit(export.clone(), options.top),
        export,
        warnings: analysis.warnings.clone(),
    }
}

pub fn render_report(data: &ReportData, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => Ok(generate_json_report(data)?),
        ReportFormat::Csv => generate_csv_report(data),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

fn section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          BACKLENS BACKLINK REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Domain:       {}\n", data.domain));
    report.push_str(&format!("Backlinks:    {}\n", data.totals.backlinks));
    report.push_str(&format!(
        "Dofollow:     {} ({})\n",
        data.totals.dofollow,
        format_percent(data.totals.dofollow, data.totals.backlinks)
    ));
    report.push_str(&format!(
        "Nofollow:     {} ({})\n",
        data.totals.nofollow,
        format_percent(data.totals.nofollow, data.totals.backlinks)
    ));
    report.push_str(&format!("Domains:      {}\n", data.totals.referring_domains));
    report.push_str(&format!("Anchors:      {}\n", data.totals.unique_anchors));
    report.push_str(&format!("Pages:        {}\n", data.totals.target_pages));
    report.push('\n');

    for warning in &data.warnings {
        report.push_str(&format!("[WARNING] {}\n", warning));
    }
    if !data.warnings.is_empty() {
        report.push('\n');
    }

    // Provider summary
    section(&mut report, "SUMMARY METRICS");
    for card in &data.summary {
        report.push_str(&format!(
            "  {:<20} {:>12}  {}\n",
            card.label, card.value, card.subtext
        ));
    }
    report.push('\n');

    if !data.authority.is_empty() {
        section(&mut report, "AUTHORITY METRICS");
        for row in &data.authority {
            let status = row
                .status
                .map(|s| format!("[{}]", s.as_str().to_uppercase()))
                .unwrap_or_default();
            report.push_str(&format!(
                "  {:<9} {:<24} {:>12}  {}\n",
                row.source,
                row.metric,
                truncate(&row.value, 12),
                status
            ));
        }
        report.push('\n');
    }

    section(&mut report, "ANCHOR TEXT");
    report.push_str(&format!(
        "Branded: {}   Generic: {}   Other: {}\n\n",
        data.anchor_types.branded, data.anchor_types.generic, data.anchor_types.other
    ));
    if data.anchors.is_empty() {
        report.push_str("  (none)\n");
    }
    for (idx, anchor) in data.anchors.iter().enumerate() {
        report.push_str(&format!(
            "{:>4}. {:<40} {:>6} {:>7}  follow {:>5}  nofollow {:>5}\n",
            idx + 1,
            truncate(&anchor.text, 40),
            anchor.counts.count,
            format_percent(anchor.counts.count, data.totals.anchor_links),
            anchor.counts.dofollow,
            anchor.counts.nofollow
        ));
    }
    report.push('\n');

    section(&mut report, "REFERRING DOMAINS");
    if data.domains.is_empty() {
        report.push_str("  (none)\n");
    }
    for (idx, domain) in data.domains.iter().enumerate() {
        let marker = if is_institutional_tld(&domain.tld) { "*" } else { " " };
        report.push_str(&format!(
            "{:>4}. {:<40}{} .{:<6} {:>6} {:>7}  follow {:>5}  nofollow {:>5}\n",
            idx + 1,
            truncate(&domain.domain, 40),
            marker,
            domain.tld,
            domain.counts.count,
            format_percent(domain.counts.count, data.totals.domain_links),
            domain.counts.dofollow,
            domain.counts.nofollow
        ));
    }
    report.push('\n');

    section(&mut report, "TOP PAGES");
    if data.pages.is_empty() {
        report.push_str("  (none)\n");
    }
    for (idx, page) in data.pages.iter().enumerate() {
        report.push_str(&format!(
            "{:>4}. {:<50} {:>6} {:>7}\n",
            idx + 1,
            truncate(&page.url, 50),
            page.counts.count,
            format_percent(page.counts.count, data.totals.page_links)
        ));
    }
    report.push('\n');

    section(&mut report, "BACKLINKS");
    report.push_str(&format!(
        "Showing {} of {} (type: {}, search: {}, one per domain: {})\n\n",
        data.backlinks.len(),
        data.totals.filtered,
        data.criteria.link_type,
        if data.criteria.search_text.is_empty() {
            "-"
        } else {
            data.criteria.search_text.as_str()
        },
        if data.criteria.hide_multiple_per_domain { "yes" } else { "no" }
    ));
    for record in &data.backlinks {
        report.push_str(&format!(
            "[{}] {}\n",
            record.follow_label(),
            truncate(record.anchor_text(), 70)
        ));
        report.push_str(&format!("  from {}\n", record.source));
        report.push_str(&format!("  to   {}\n", record.target));
        report.push_str(THIN_RULE);
        report.push('\n');
    }

    // Footer
    report.push('\n');
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                               End of Report\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str("\nGenerated by Backlens\n\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Backlens",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "domain": data.domain,
            "totals": data.totals,
            "filter": data.criteria,
            "warnings": data.warnings,
            "summary": data.summary,
            "authority": data.authority,
            "anchor_types": data.anchor_types,
            "anchors": data.anchors,
            "domains": data.domains,
            "pages": data.pages,
            "backlinks": data.backlinks
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Export of the filtered backlink list, one row per link, every field quoted.
pub fn generate_csv_report(data: &ReportData) -> Result<String, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for record in &data.export {
        writer.write_record([
            record.anchor_text(),
            record.follow_label(),
            record.source.as_str(),
            record.target.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Backlink Report: {}\n\n", md_cell(&data.domain)));
    md.push_str(&format!(
        "_Generated by Backlens {} on {}_\n\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for warning in &data.warnings {
        md.push_str(&format!("> **Warning:** {}\n\n", warning));
    }

    md.push_str("## Summary\n\n| Metric | Value | |\n|---|---:|---|\n");
    for card in &data.summary {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            card.label,
            md_cell(&card.value),
            card.subtext
        ));
    }
    md.push('\n');

    if !data.authority.is_empty() {
        md.push_str("## Authority Metrics\n\n| Source | Metric | Value | Status |\n|---|---|---:|---|\n");
        for row in &data.authority {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.source,
                row.metric,
                md_cell(&row.value),
                row.status.map(|s| s.as_str()).unwrap_or("info")
            ));
        }
        md.push('\n');
    }

    md.push_str(&format!(
        "## Anchor Text\n\nBranded: {} · Generic: {} · Other: {}\n\n",
        data.anchor_types.branded, data.anchor_types.generic, data.anchor_types.other
    ));
    md.push_str("| Anchor | Count | Share | Dofollow | Nofollow |\n|---|---:|---:|---:|---:|\n");
    for anchor in &data.anchors {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            md_cell(&anchor.text),
            anchor.counts.count,
            format_percent(anchor.counts.count, data.totals.anchor_links),
            anchor.counts.dofollow,
            anchor.counts.nofollow
        ));
    }
    md.push('\n');

    md.push_str("## Referring Domains\n\n| Domain | TLD | Count | Share | Dofollow | Nofollow |\n|---|---|---:|---:|---:|---:|\n");
    for domain in &data.domains {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            md_cell(&domain.domain),
            domain.tld,
            domain.counts.count,
            format_percent(domain.counts.count, data.totals.domain_links),
            domain.counts.dofollow,
            domain.counts.nofollow
        ));
    }
    md.push('\n');

    md.push_str("## Top Pages\n\n| Page | Count | Share |\n|---|---:|---:|\n");
    for page in &data.pages {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            md_cell(&page.url),
            page.counts.count,
            format_percent(page.counts.count, data.totals.page_links)
        ));
    }
    md.push('\n');

    md.push_str(&format!(
        "## Backlinks\n\nShowing {} of {}.\n\n| Anchor | Type | Source | Target |\n|---|---|---|---|\n",
        data.backlinks.len(),
        data.totals.filtered
    ));
    for record in &data.backlinks {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            md_cell(record.anchor_text()),
            record.follow_label(),
            md_cell(&record.source),
            md_cell(&record.target)
        ));
    }

    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// `count / total` as a percentage with one decimal.
pub fn format_percent(count: usize, total: usize) -> String {
    format!("{:.1}%", share_percent(count, total))
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
