// Dashboard state and key handling. No terminal I/O happens here.

use backlens_client::BacklinkRecord;
use backlens_core::analysis::{AnchorBucket, DomainBucket, PageBucket, total_count};
use backlens_core::filter::{FilterCriteria, filter_records};
use backlens_core::sort::{
    AnchorColumn, BacklinkColumn, DomainColumn, PageColumn, SortDirection, SortState,
    sort_buckets, sorted_by,
};
use backlens_core::Analysis;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Anchors,
    Domains,
    Pages,
    Metrics,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Overview, Tab::Anchors, Tab::Domains, Tab::Pages, Tab::Metrics];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Anchors => "Anchors",
            Tab::Domains => "Domains",
            Tab::Pages => "Pages",
            Tab::Metrics => "Metrics",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Number of sortable columns the tab's table has.
    pub fn column_count(&self) -> usize {
        match self {
            Tab::Overview => BacklinkColumn::ALL.len(),
            Tab::Anchors => AnchorColumn::ALL.len(),
            Tab::Domains => DomainColumn::ALL.len(),
            Tab::Pages => PageColumn::ALL.len(),
            Tab::Metrics => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Editing the search text; Enter applies, Esc cancels
    Search,
}

pub struct Dashboard {
    pub analysis: Analysis,
    pub tab: Tab,
    pub mode: Mode,
    pub criteria: FilterCriteria,
    pub search_input: String,

    // last computed views, re-sorted in place of recomputation
    pub backlinks: Vec<BacklinkRecord>,
    pub anchors: Vec<AnchorBucket>,
    pub domains: Vec<DomainBucket>,
    pub pages: Vec<PageBucket>,

    pub backlink_sort: Option<SortState<BacklinkColumn>>,
    pub anchor_sort: SortState<AnchorColumn>,
    pub domain_sort: SortState<DomainColumn>,
    pub page_sort: SortState<PageColumn>,

    /// Share denominators
    pub anchor_total: usize,
    pub domain_total: usize,
    pub page_total: usize,

    selected_column: [usize; 5],
    scroll: [usize; 5],
    pub should_quit: bool,
}

impl Dashboard {
    pub fn new(analysis: Analysis) -> Self {
        let anchors = analysis.anchors();
        let domains = analysis.domains();
        let pages = analysis.pages();
        let criteria = FilterCriteria::default();
        let backlinks = analysis.filtered(&criteria);

        Self {
            anchor_total: total_count(&anchors),
            domain_total: total_count(&domains),
            page_total: total_count(&pages),
            analysis,
            tab: Tab::Overview,
            mode: Mode::Normal,
            criteria,
            search_input: String::new(),
            backlinks,
            anchors,
            domains,
            pages,
            backlink_sort: None,
            anchor_sort: SortState::default(),
            domain_sort: SortState::default(),
            page_sort: SortState::default(),
            selected_column: [0; 5],
            scroll: [0; 5],
            should_quit: false,
        }
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column[self.tab.index()]
    }

    pub fn scroll(&self) -> usize {
        self.scroll[self.tab.index()]
    }

    /// Rows in the current tab's table.
    pub fn row_count(&self) -> usize {
        match self.tab {
            Tab::Overview => self.backlinks.len(),
            Tab::Anchors => self.anchors.len(),
            Tab::Domains => self.domains.len(),
            Tab::Pages => self.pages.len(),
            Tab::Metrics => 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Search => self.handle_search_key(key.code),
            Mode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.search_input.push(c),
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Enter => {
                self.criteria.search_text = self.search_input.clone();
                self.mode = Mode::Normal;
                self.refilter();
            }
            KeyCode::Esc => {
                self.search_input = self.criteria.search_text.clone();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.previous(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Left => {
                let idx = self.tab.index();
                self.selected_column[idx] = self.selected_column[idx].saturating_sub(1);
            }
            KeyCode::Right => {
                let idx = self.tab.index();
                let last = self.tab.column_count().saturating_sub(1);
                self.selected_column[idx] = (self.selected_column[idx] + 1).min(last);
            }
            KeyCode::Char('s') | KeyCode::Enter => self.sort_selected(),
            KeyCode::Char('t') => {
                self.criteria.link_type = self.criteria.link_type.next();
                self.refilter();
            }
            KeyCode::Char('d') => {
                self.criteria.hide_multiple_per_domain = !self.criteria.hide_multiple_per_domain;
                self.refilter();
            }
            KeyCode::Char('/') => {
                self.search_input = self.criteria.search_text.clone();
                self.mode = Mode::Search;
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE_SIZE as isize)),
            KeyCode::PageDown => self.scroll_by(PAGE_SIZE as isize),
            KeyCode::Home => self.scroll[self.tab.index()] = 0,
            KeyCode::End => self.scroll[self.tab.index()] = self.row_count().saturating_sub(1),
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let idx = self.tab.index();
        let max = self.row_count().saturating_sub(1);
        let next = self.scroll[idx].saturating_add_signed(delta);
        self.scroll[idx] = next.min(max);
    }

    /// Sort the current tab by its highlighted column, toggling on repeats.
    fn sort_selected(&mut self) {
        let column = self.selected_column();
        match self.tab {
            Tab::Overview => {
                let Some(&column) = BacklinkColumn::ALL.get(column) else {
                    return;
                };
                let (items, state) = match self.backlink_sort {
                    Some(state) => sort_buckets(&self.backlinks, column, state),
                    None => {
                        let state = SortState::new(column, SortDirection::Descending);
                        (sorted_by(&self.backlinks, state), state)
                    }
                };
                self.backlinks = items;
                self.backlink_sort = Some(state);
            }
            Tab::Anchors => {
                let Some(&column) = AnchorColumn::ALL.get(column) else {
                    return;
                };
                (self.anchors, self.anchor_sort) = sort_buckets(&self.anchors, column, self.anchor_sort);
            }
            Tab::Domains => {
                let Some(&column) = DomainColumn::ALL.get(column) else {
                    return;
                };
                (self.domains, self.domain_sort) = sort_buckets(&self.domains, column, self.domain_sort);
            }
            Tab::Pages => {
                let Some(&column) = PageColumn::ALL.get(column) else {
                    return;
                };
                (self.pages, self.page_sort) = sort_buckets(&self.pages, column, self.page_sort);
            }
            Tab::Metrics => {}
        }
    }

    /// Re-run the filter over the full backlink list, keeping the current order.
    fn refilter(&mut self) {
        let filtered = filter_records(&self.analysis.backlinks, &self.criteria);
        self.backlinks = match self.backlink_sort {
            Some(state) => sorted_by(&filtered, state),
            None => filtered,
        };
        self.scroll[Tab::Overview.index()] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlens_core::filter::LinkType;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard() -> Dashboard {
        let backlinks = vec![
            BacklinkRecord::new("http://www.a.com/1", "https://x.com/").with_anchor("zeta").with_nf(0),
            BacklinkRecord::new("http://a.com/2", "https://x.com/p").with_anchor("alpha").with_nf(1),
            BacklinkRecord::new("http://b.com/3", "https://x.com/p").with_anchor("alpha").with_nf(0),
            BacklinkRecord::new("junk", "https://x.com/q").with_anchor("Mid").with_nf(1),
        ];
        Dashboard::new(Analysis::new("x.com", backlinks))
    }

    #[test]
    fn test_initial_state() {
        let dash = dashboard();
        assert_eq!(dash.tab, Tab::Overview);
        assert_eq!(dash.backlinks.len(), 4);
        assert_eq!(dash.anchors[0].text, "alpha");
        assert_eq!(dash.domain_total, 3);
    }

    #[test]
    fn test_tab_navigation() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Tab));
        assert_eq!(dash.tab, Tab::Anchors);
        dash.handle_key(key(KeyCode::BackTab));
        dash.handle_key(key(KeyCode::BackTab));
        assert_eq!(dash.tab, Tab::Metrics);
        dash.handle_key(key(KeyCode::Char('3')));
        assert_eq!(dash.tab, Tab::Domains);
    }

    #[test]
    fn test_sort_toggles_on_repeat() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('2')));
        // column 1 is count, already the active column
        dash.handle_key(key(KeyCode::Right));
        dash.handle_key(key(KeyCode::Char('s')));
        assert_eq!(dash.anchor_sort, SortState::new(AnchorColumn::Count, SortDirection::Ascending));
        assert_eq!(dash.anchors.last().unwrap().text, "alpha");

        dash.handle_key(key(KeyCode::Enter));
        assert_eq!(dash.anchor_sort.direction, SortDirection::Descending);
        assert_eq!(dash.anchors[0].text, "alpha");
    }

    #[test]
    fn test_sort_new_column_starts_descending() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('2')));
        dash.handle_key(key(KeyCode::Char('s')));
        assert_eq!(dash.anchor_sort, SortState::new(AnchorColumn::Text, SortDirection::Descending));
        let texts: Vec<&str> = dash.anchors.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["zeta", "Mid", "alpha"]);
    }

    #[test]
    fn test_column_cursor_is_clamped() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Left));
        assert_eq!(dash.selected_column(), 0);
        for _ in 0..10 {
            dash.handle_key(key(KeyCode::Right));
        }
        assert_eq!(dash.selected_column(), BacklinkColumn::ALL.len() - 1);
    }

    #[test]
    fn test_link_type_cycles_and_filters() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('t')));
        assert_eq!(dash.criteria.link_type, LinkType::Dofollow);
        assert_eq!(dash.backlinks.len(), 2);
        dash.handle_key(key(KeyCode::Char('t')));
        assert_eq!(dash.backlinks.len(), 2);
        assert!(dash.backlinks.iter().all(|r| r.is_nofollow()));
        dash.handle_key(key(KeyCode::Char('t')));
        assert_eq!(dash.backlinks.len(), 4);
    }

    #[test]
    fn test_one_per_domain_toggle() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('d')));
        assert!(dash.criteria.hide_multiple_per_domain);
        // a.com once, b.com once, unparseable kept
        assert_eq!(dash.backlinks.len(), 3);
        dash.handle_key(key(KeyCode::Char('d')));
        assert_eq!(dash.backlinks.len(), 4);
    }

    #[test]
    fn test_search_mode() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('/')));
        assert_eq!(dash.mode, Mode::Search);
        for c in "ALPHAq".chars() {
            dash.handle_key(key(KeyCode::Char(c)));
        }
        dash.handle_key(key(KeyCode::Backspace));
        // 'q' is text while searching
        assert!(!dash.should_quit);
        dash.handle_key(key(KeyCode::Enter));
        assert_eq!(dash.mode, Mode::Normal);
        assert_eq!(dash.criteria.search_text, "ALPHA");
        assert_eq!(dash.backlinks.len(), 2);
    }

    #[test]
    fn test_search_escape_cancels() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('/')));
        dash.handle_key(key(KeyCode::Char('z')));
        dash.handle_key(key(KeyCode::Esc));
        assert_eq!(dash.mode, Mode::Normal);
        assert!(!dash.should_quit);
        assert!(dash.criteria.search_text.is_empty());
        assert_eq!(dash.backlinks.len(), 4);
    }

    #[test]
    fn test_filtered_list_keeps_sort() {
        let mut dash = dashboard();
        // sort overview by anchor, descending
        dash.handle_key(key(KeyCode::Char('s')));
        assert_eq!(dash.backlinks[0].anchor.as_deref(), Some("zeta"));
        dash.handle_key(key(KeyCode::Char('t')));
        assert_eq!(dash.backlinks[0].anchor.as_deref(), Some("zeta"));
        assert_eq!(dash.backlinks[1].anchor.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_scrolling_is_bounded() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Up));
        assert_eq!(dash.scroll(), 0);
        dash.handle_key(key(KeyCode::PageDown));
        assert_eq!(dash.scroll(), 3);
        dash.handle_key(key(KeyCode::Home));
        assert_eq!(dash.scroll(), 0);
        dash.handle_key(key(KeyCode::End));
        assert_eq!(dash.scroll(), 3);
    }

    #[test]
    fn test_quit_keys() {
        let mut dash = dashboard();
        dash.handle_key(key(KeyCode::Char('q')));
        assert!(dash.should_quit);

        let mut dash = dashboard();
        dash.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(dash.should_quit);
    }
}
