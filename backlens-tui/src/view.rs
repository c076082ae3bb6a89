use crate::dashboard::{Dashboard, Mode, Tab};
use backlens_core::analysis::share_percent;
use backlens_core::analyze::METRICS_UNAVAILABLE;
use backlens_core::classify::{
    AuthorityStatus, anchor_distribution, authority_rows, is_institutional_tld, summary_cards,
};
use backlens_core::sort::{
    AnchorColumn, BacklinkColumn, DomainColumn, PageColumn, SortState,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
};
use std::fmt::Display;

pub(crate) fn ui(f: &mut Frame, dash: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(1), // Filter status
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Hints
        ])
        .split(f.area());

    render_tabs(f, dash, chunks[0]);
    render_filter_status(f, dash, chunks[1]);

    match dash.tab {
        Tab::Overview => render_overview(f, dash, chunks[2]),
        Tab::Anchors => render_anchors(f, dash, chunks[2]),
        Tab::Domains => render_domains(f, dash, chunks[2]),
        Tab::Pages => render_pages(f, dash, chunks[2]),
        Tab::Metrics => render_metrics(f, dash, chunks[2]),
    }

    render_hints(f, dash, chunks[3]);
}

fn render_tabs(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| Line::from(format!(" {} {} ", idx + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Backlens: {} ", dash.analysis.domain))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(dash.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_filter_status(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let search = match dash.mode {
        Mode::Search => format!("{}_", dash.search_input),
        Mode::Normal if dash.criteria.search_text.is_empty() => "-".to_string(),
        Mode::Normal => dash.criteria.search_text.clone(),
    };

    let line = Line::from(vec![
        Span::styled(" Type: ", Style::default().fg(Color::DarkGray)),
        Span::styled(dash.criteria.link_type.as_str(), Style::default().fg(Color::Cyan)),
        Span::styled("  Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            search,
            if dash.mode == Mode::Search {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            },
        ),
        Span::styled("  One per domain: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if dash.criteria.hide_multiple_per_domain { "on" } else { "off" },
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  Showing {} of {} backlinks", dash.backlinks.len(), dash.analysis.backlinks.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Header cells for the sortable columns: the active one carries an arrow,
/// the highlighted one is reversed.
fn header_cells<C: Copy + PartialEq + Display>(
    columns: &[C],
    labels: &[&str],
    state: Option<SortState<C>>,
    selected: usize,
) -> Vec<Cell<'static>> {
    columns
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(idx, (column, label))| {
            let arrow = match state {
                Some(s) if s.column == *column => format!(" {}", s.direction.arrow()),
                _ => String::new(),
            };
            let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
            if idx == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Cell::from(format!("{}{}", label, arrow)).style(style)
        })
        .collect()
}

fn table_block(title: String, state_label: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(state_label).right_aligned())
        .border_style(Style::default().fg(Color::Cyan))
}

fn sort_label<C: Display>(state: Option<SortState<C>>) -> String {
    match state {
        Some(s) => format!(" sorted by {} {} ", s.column, s.direction.as_str()),
        None => " provider order ".to_string(),
    }
}

/// Rows visible for a table drawn inside `area` with borders and a header.
fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

/// Draws a track and thumb on the right border when `total` rows don't fit.
fn render_scrollbar(f: &mut Frame, area: Rect, total: usize, visible: usize, offset: usize) {
    let track = area.height.saturating_sub(2) as usize;
    if track == 0 || total <= visible {
        return;
    }

    let thumb = ((visible as f32 / total as f32) * track as f32).max(1.0).floor() as usize;
    let ratio = offset.min(total - visible) as f32 / (total - visible) as f32;
    let position = (ratio * track.saturating_sub(thumb) as f32).floor() as usize;

    let x = area.x + area.width.saturating_sub(1);
    for i in 0..track {
        let on_thumb = i >= position && i < position + thumb;
        let (symbol, style) = if on_thumb {
            ("█", Style::default().fg(Color::Cyan))
        } else {
            ("│", Style::default().fg(Color::DarkGray))
        };
        f.render_widget(
            Paragraph::new(symbol).style(style),
            Rect {
                x,
                y: area.y + 1 + i as u16,
                width: 1,
                height: 1,
            },
        );
    }
}

fn follow_style(nofollow: bool) -> Style {
    if nofollow {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

fn empty_message(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_overview(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let cards = summary_cards(&dash.analysis.domain, dash.analysis.backlinks.len(), &dash.analysis.metrics);
    let dist = anchor_distribution(&dash.anchors, &dash.analysis.domain);

    let mut lines: Vec<Line> = cards
        .chunks(5)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|card| {
                    vec![
                        Span::styled(format!("{}: ", card.label), Style::default().fg(Color::DarkGray)),
                        Span::styled(
                            format!("{}  ", card.value),
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                        ),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled("Anchor types: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "branded {}  generic {}  other {}",
            dist.branded, dist.generic, dist.other
        )),
    ]));
    for warning in &dash.analysis.warnings {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", warning),
            Style::default().fg(Color::Yellow),
        )));
    }

    let summary = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Summary ")
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(summary, chunks[0]);

    if dash.backlinks.is_empty() {
        empty_message(f, chunks[1], "Backlinks", "No backlinks match the current filter.");
        return;
    }

    let height = visible_rows(chunks[1]);
    let rows: Vec<Row> = dash
        .backlinks
        .iter()
        .skip(dash.scroll())
        .take(height)
        .map(|record| {
            Row::new(vec![
                Cell::from(record.anchor_text().to_string()),
                Cell::from(record.follow_label()).style(follow_style(record.is_nofollow())),
                Cell::from(record.source.clone()),
                Cell::from(record.target.clone()),
            ])
        })
        .collect();

    let header = Row::new(header_cells(
        BacklinkColumn::ALL,
        &["Anchor", "Type", "Source", "Target"],
        dash.backlink_sort,
        dash.selected_column(),
    ));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(table_block(
        format!(" Backlinks ({}) ", dash.backlinks.len()),
        sort_label(dash.backlink_sort),
    ));
    f.render_widget(table, chunks[1]);
    render_scrollbar(f, chunks[1], dash.backlinks.len(), height, dash.scroll());
}

fn count_cells(count: usize, dofollow: usize, nofollow: usize) -> [Cell<'static>; 3] {
    [
        Cell::from(count.to_string()),
        Cell::from(dofollow.to_string()).style(follow_style(false)),
        Cell::from(nofollow.to_string()).style(follow_style(true)),
    ]
}

fn share_cell(count: usize, total: usize) -> Cell<'static> {
    Cell::from(format!("{:.1}%", share_percent(count, total)))
        .style(Style::default().fg(Color::DarkGray))
}

fn render_anchors(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if dash.anchors.is_empty() {
        empty_message(f, area, "Anchors", "No anchor text data.");
        return;
    }

    let rows: Vec<Row> = dash
        .anchors
        .iter()
        .skip(dash.scroll())
        .take(visible_rows(area))
        .map(|bucket| {
            let [count, dofollow, nofollow] =
                count_cells(bucket.counts.count, bucket.counts.dofollow, bucket.counts.nofollow);
            Row::new(vec![
                Cell::from(bucket.text.clone()),
                count,
                dofollow,
                nofollow,
                share_cell(bucket.counts.count, dash.anchor_total),
            ])
        })
        .collect();

    let mut header = header_cells(
        AnchorColumn::ALL,
        &["Anchor Text", "Count", "Dofollow", "Nofollow"],
        Some(dash.anchor_sort),
        dash.selected_column(),
    );
    header.push(Cell::from("Share").style(Style::default().fg(Color::DarkGray)));

    let table = Table::new(
        rows,
        [
            Constraint::Min(30),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(header))
    .block(table_block(
        format!(" Anchor Text ({}) ", dash.anchors.len()),
        sort_label(Some(dash.anchor_sort)),
    ));
    f.render_widget(table, area);
    render_scrollbar(f, area, dash.anchors.len(), visible_rows(area), dash.scroll());
}

fn render_domains(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if dash.domains.is_empty() {
        empty_message(f, area, "Referring Domains", "No referring domain data.");
        return;
    }

    let rows: Vec<Row> = dash
        .domains
        .iter()
        .skip(dash.scroll())
        .take(visible_rows(area))
        .map(|bucket| {
            let [count, dofollow, nofollow] =
                count_cells(bucket.counts.count, bucket.counts.dofollow, bucket.counts.nofollow);
            let tld_style = if is_institutional_tld(&bucket.tld) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(bucket.domain.clone()),
                count,
                Cell::from(format!(".{}", bucket.tld)).style(tld_style),
                dofollow,
                nofollow,
                share_cell(bucket.counts.count, dash.domain_total),
            ])
        })
        .collect();

    let mut header = header_cells(
        DomainColumn::ALL,
        &["Domain", "Count", "TLD", "Dofollow", "Nofollow"],
        Some(dash.domain_sort),
        dash.selected_column(),
    );
    header.push(Cell::from("Share").style(Style::default().fg(Color::DarkGray)));

    let table = Table::new(
        rows,
        [
            Constraint::Min(30),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(header))
    .block(table_block(
        format!(" Referring Domains ({}) ", dash.domains.len()),
        sort_label(Some(dash.domain_sort)),
    ));
    f.render_widget(table, area);
    render_scrollbar(f, area, dash.domains.len(), visible_rows(area), dash.scroll());
}

fn render_pages(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if dash.pages.is_empty() {
        empty_message(f, area, "Top Pages", "No target page data.");
        return;
    }

    let rows: Vec<Row> = dash
        .pages
        .iter()
        .skip(dash.scroll())
        .take(visible_rows(area))
        .map(|bucket| {
            let [count, dofollow, nofollow] =
                count_cells(bucket.counts.count, bucket.counts.dofollow, bucket.counts.nofollow);
            Row::new(vec![
                Cell::from(bucket.url.clone()),
                count,
                dofollow,
                nofollow,
                share_cell(bucket.counts.count, dash.page_total),
            ])
        })
        .collect();

    let mut header = header_cells(
        PageColumn::ALL,
        &["Page", "Count", "Dofollow", "Nofollow"],
        Some(dash.page_sort),
        dash.selected_column(),
    );
    header.push(Cell::from("Share").style(Style::default().fg(Color::DarkGray)));

    let table = Table::new(
        rows,
        [
            Constraint::Min(40),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(header))
    .block(table_block(
        format!(" Top Pages ({}) ", dash.pages.len()),
        sort_label(Some(dash.page_sort)),
    ));
    f.render_widget(table, area);
    render_scrollbar(f, area, dash.pages.len(), visible_rows(area), dash.scroll());
}

fn status_style(status: Option<AuthorityStatus>) -> Style {
    match status {
        Some(AuthorityStatus::Excellent) => Style::default().fg(Color::Green),
        Some(AuthorityStatus::Good) => Style::default().fg(Color::Yellow),
        Some(AuthorityStatus::Poor) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    }
}

fn render_metrics(f: &mut Frame, dash: &Dashboard, area: Rect) {
    if !dash.analysis.has_authority_metrics() {
        empty_message(
            f,
            area,
            "Authority Metrics",
            METRICS_UNAVAILABLE,
        );
        return;
    }

    let rows: Vec<Row> = authority_rows(&dash.analysis.domain_metrics)
        .into_iter()
        .map(|row| {
            let style = status_style(row.status);
            Row::new(vec![
                Cell::from(row.source),
                Cell::from(row.metric),
                Cell::from(row.value),
                Cell::from(row.status.map(|s| s.as_str()).unwrap_or("info")).style(style),
            ])
        })
        .collect();

    let header = Row::new(
        ["Source", "Metric", "Value", "Status"]
            .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(26),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Authority Metrics ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, area);
}

fn render_hints(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Black).bg(Color::Gray));

    let hints = match dash.mode {
        Mode::Search => Line::from(vec![
            key(" Enter "),
            Span::raw(" Apply  "),
            key(" Esc "),
            Span::raw(" Cancel  "),
            key(" Backspace "),
            Span::raw(" Delete"),
        ]),
        Mode::Normal => Line::from(vec![
            key(" q/ESC "),
            Span::raw(" Exit  "),
            key(" Tab/1-5 "),
            Span::raw(" View  "),
            key(" ←/→ "),
            Span::raw(" Column  "),
            key(" s/Enter "),
            Span::raw(" Sort  "),
            key(" t "),
            Span::raw(" Type  "),
            key(" d "),
            Span::raw(" Per domain  "),
            key(" / "),
            Span::raw(" Search  "),
            key(" ↑/↓ PgUp/PgDn "),
            Span::raw(" Scroll"),
        ]),
    };

    let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}
