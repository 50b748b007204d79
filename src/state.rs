//! View state engine
//!
//! One mutable state record per browsing session, plus the derivations the
//! presentation layer reads from it. Every setter that changes something
//! bumps [`ViewState::revision`]; observers poll the revision and re-read
//! what they render (or take a [`ViewSnapshot`]).
//!
//! Nothing here returns an error. Out-of-range requests are ignored or
//! clamped and logged, and an empty store degrades every view to empty.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::breakdown::{breakdown, Breakdown};
use crate::config::ViewConfig;
use crate::page::{Page, Pager};
use crate::ranking::{clamp_rank_size, derive_ranking, resolve_bar, Ranking, RankingQuery};
use crate::record::{Field, Metric, Record, RecordId};
use crate::selection::Selection;
use crate::sort::{sorted_ids, SortSpec, SortState};
use crate::store::RecordStore;
use crate::table::{self, Header, TableRow};

/// Scalar view state at one revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    /// State revision this snapshot was taken at
    pub revision: u64,
    /// Records in the store
    pub record_count: usize,
    /// Active sort
    pub sort: Option<SortSpec>,
    /// Current page (0 when empty)
    pub current_page: usize,
    /// Total pages
    pub total_pages: usize,
    /// Rows per page
    pub page_size: usize,
    /// Focused record
    pub selected: Option<RecordId>,
    /// Ranking group (year)
    pub rank_group: Option<i32>,
    /// Ranking metric
    pub rank_metric: Metric,
    /// Ranking size (N)
    pub rank_size: usize,
}

/// Session state: table sort and paging, selection, ranking parameters
///
/// # Example
///
/// ```
/// use vitrina::{Field, Record, RecordStore, ViewConfig, ViewState};
/// use vitrina::record::Metric;
///
/// let store = RecordStore::from_records(vec![
///     Record::named("A").with_year(2000).with_metric(Metric::GlobalSales, 5.0),
///     Record::named("B").with_year(2000).with_metric(Metric::GlobalSales, 9.0),
/// ]);
/// let mut view = ViewState::new(ViewConfig::default().with_rank_size(1));
/// view.load(store);
///
/// // First record is focused and its year picked as the ranking group
/// assert_eq!(view.rank_group(), Some(2000));
/// let ranking = view.ranking().unwrap();
/// assert_eq!(ranking.labels(), vec!["B", "A"]);
///
/// view.sort_by(Field::Name);
/// assert_eq!(view.pager_label(), "Page 1 of 1");
/// ```
#[derive(Debug, Clone)]
pub struct ViewState {
    config: ViewConfig,
    store: RecordStore,
    sort: SortState,
    /// Store handles in current sort order
    ordered: Vec<RecordId>,
    pager: Pager,
    selection: Selection,
    rank_group: Option<i32>,
    rank_metric: Metric,
    /// Requested N, bounded by `max_rank_size` only
    rank_size: usize,
    revision: u64,
}

impl ViewState {
    /// Create an empty session (no records loaded yet)
    pub fn new(config: ViewConfig) -> Self {
        let max_rank = config.max_rank_size.max(1);
        let rank_size = config.rank_size.clamp(1, max_rank);
        Self {
            pager: Pager::new(0, config.page_size),
            rank_metric: config.rank_metric,
            rank_size,
            config,
            store: RecordStore::empty(),
            sort: SortState::new(),
            ordered: Vec::new(),
            selection: Selection::new(),
            rank_group: None,
            revision: 0,
        }
    }

    /// Create a session and load a store into it
    pub fn with_store(config: ViewConfig, store: RecordStore) -> Self {
        let mut view = Self::new(config);
        view.load(store);
        view
    }

    /// Replace the record store
    ///
    /// Rebuilds the ordered view under the current sort and clamps the page.
    /// Handles never carry over between stores, so the selection is cleared
    /// and the first record of the new store is focused, with its year as
    /// the ranking group.
    pub fn load(&mut self, store: RecordStore) {
        info!(records = store.len(), "record store loaded");
        self.store = store;
        self.ordered = sorted_ids(&self.store, self.sort.spec());
        self.pager.set_total_items(self.ordered.len());

        self.selection.clear();
        self.rank_group = None;
        if let Some(id) = self.selection.apply_default(&self.store) {
            self.rank_group = self.store.get(id).and_then(|r| r.year);
            debug!(record = %id, group = ?self.rank_group, "default selection applied");
        }
        self.touch();
    }

    // Accessors

    /// Session configuration
    #[inline]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Loaded records
    #[inline]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Active sort
    #[inline]
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// All handles in current sort order
    #[inline]
    pub fn ordered(&self) -> &[RecordId] {
        &self.ordered
    }

    /// Page cursor
    #[inline]
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Focused record handle
    #[inline]
    pub fn selected(&self) -> Option<RecordId> {
        self.selection.get()
    }

    /// Focused record
    pub fn selected_record(&self) -> Option<&Record> {
        self.selection.get().and_then(|id| self.store.get(id))
    }

    /// Ranking group (year)
    #[inline]
    pub fn rank_group(&self) -> Option<i32> {
        self.rank_group
    }

    /// Ranking metric
    #[inline]
    pub fn rank_metric(&self) -> Metric {
        self.rank_metric
    }

    /// Ranking size (N) in effect for the loaded store
    #[inline]
    pub fn rank_size(&self) -> usize {
        clamp_rank_size(self.rank_size, self.store.len(), self.config.max_rank_size)
    }

    /// Ranking size as last requested, before clamping to the record count
    #[inline]
    pub fn requested_rank_size(&self) -> usize {
        self.rank_size
    }

    /// Monotonic change counter
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // Sorting

    /// Apply a header click on `field` (toggle rule of [`SortState::toggle`])
    pub fn sort_by(&mut self, field: Field) -> SortSpec {
        let spec = self.sort.toggle(field);
        self.reorder();
        spec
    }

    /// Return to ingestion order
    pub fn clear_sort(&mut self) {
        if self.sort.spec().is_none() {
            return;
        }
        self.sort.clear();
        self.reorder();
    }

    fn reorder(&mut self) {
        self.ordered = sorted_ids(&self.store, self.sort.spec());
        self.pager.set_total_items(self.ordered.len());
        self.touch();
    }

    // Paging

    /// Navigate to a page; out-of-range requests are ignored
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.pager.go_to(page);
        self.touch_if(moved)
    }

    /// Navigate to the next page if there is one
    pub fn next_page(&mut self) -> bool {
        let moved = self.pager.next();
        self.touch_if(moved)
    }

    /// Navigate to the previous page if there is one
    pub fn prev_page(&mut self) -> bool {
        let moved = self.pager.prev();
        self.touch_if(moved)
    }

    /// Change rows per page (0 is raised to 1), clamping the current page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pager.set_page_size(page_size);
        self.touch();
    }

    /// Handles on the current page
    pub fn current_page(&self) -> Page<'_, RecordId> {
        self.pager.page(&self.ordered)
    }

    /// Pager text, e.g. `"Page 1 of 1103"`
    pub fn pager_label(&self) -> String {
        self.pager.label()
    }

    /// Column headers with the sort glyph
    pub fn table_headers(&self) -> Vec<Header> {
        table::headers(&self.sort)
    }

    /// Formatted rows of the current page
    pub fn table_rows(&self) -> Vec<TableRow> {
        table::rows(
            &self.store,
            self.current_page().items(),
            &self.selection,
            self.config.cell_width,
        )
    }

    /// Jump to the page showing the focused record
    pub fn reveal_selection(&mut self) -> bool {
        let Some(id) = self.selection.get() else {
            return false;
        };
        let Some(page) = self
            .ordered
            .iter()
            .position(|&o| o == id)
            .and_then(|idx| self.pager.page_of(idx))
        else {
            return false;
        };
        if page == self.pager.current() {
            return true;
        }
        let moved = self.pager.go_to(page);
        self.touch_if(moved)
    }

    // Selection

    /// Focus a record; handles not in the store are ignored
    pub fn select(&mut self, id: RecordId) -> bool {
        if !self.store.contains(id) {
            warn!(record = %id, "selection of unknown record ignored");
            return false;
        }
        if self.selection.is_selected(id) {
            return true;
        }
        self.selection.select(id);
        self.touch();
        true
    }

    /// Focus the record shown at `row` of the current page
    pub fn select_row(&mut self, row: usize) -> Option<RecordId> {
        let id = self.current_page().items().get(row).copied()?;
        self.select(id).then_some(id)
    }

    /// Focus the record behind a ranking bar
    ///
    /// The bar index is resolved by re-running the ranking derivation with
    /// the current parameters.
    pub fn select_ranking_bar(&mut self, index: usize) -> Option<RecordId> {
        let query = self.ranking_query()?;
        let Some(id) = resolve_bar(&self.store, query, self.selection.get(), index) else {
            warn!(index, "ranking bar index out of range ignored");
            return None;
        };
        self.select(id).then_some(id)
    }

    // Ranking parameters

    /// Set the ranking group (year)
    pub fn set_rank_group(&mut self, year: i32) {
        if self.rank_group != Some(year) {
            self.rank_group = Some(year);
            self.touch();
        }
    }

    /// Set the ranking metric
    pub fn set_rank_metric(&mut self, metric: Metric) {
        if self.rank_metric != metric {
            self.rank_metric = metric;
            self.touch();
        }
    }

    /// Set the ranking size
    ///
    /// The request is kept (bounded by `max_rank_size`) and clamped to
    /// `[1, min(record count, max_rank_size)]` whenever a ranking is
    /// derived, so it survives a later load. Returns the size in effect
    /// for the current store.
    pub fn set_rank_size(&mut self, requested: usize) -> usize {
        let kept = requested.clamp(1, self.config.max_rank_size.max(1));
        if kept != self.rank_size {
            self.rank_size = kept;
            self.touch();
        }
        let applied = self.rank_size();
        if applied != requested {
            warn!(requested, applied, "rank size clamped");
        }
        applied
    }

    /// Current ranking parameters, `None` until a group is known
    pub fn ranking_query(&self) -> Option<RankingQuery> {
        self.rank_group
            .map(|group| RankingQuery::new(group, self.rank_metric, self.rank_size()))
    }

    // Derived views

    /// Ranking chart dataset, `None` until a group is known
    pub fn ranking(&self) -> Option<Ranking> {
        self.ranking_query()
            .map(|q| derive_ranking(&self.store, q, self.selection.get()))
    }

    /// Regional breakdown of the focused record
    pub fn breakdown(&self) -> Option<Breakdown> {
        let id = self.selection.get()?;
        self.store.get(id).map(|r| breakdown(id, r))
    }

    /// Scalar state at the current revision
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            revision: self.revision,
            record_count: self.store.len(),
            sort: self.sort.spec(),
            current_page: self.pager.current(),
            total_pages: self.pager.total_pages(),
            page_size: self.pager.page_size(),
            selected: self.selection.get(),
            rank_group: self.rank_group,
            rank_metric: self.rank_metric,
            rank_size: self.rank_size(),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn touch_if(&mut self, changed: bool) -> bool {
        if changed {
            self.touch();
        }
        changed
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str, year: i32, global: f64) -> Record {
        Record::named(name)
            .with_year(year)
            .with_metric(Metric::GlobalSales, global)
    }

    fn loaded(n: usize, page_size: usize) -> ViewState {
        let records = (0..n)
            .map(|i| game(&format!("g{i}"), 2000 + (i % 3) as i32, i as f64))
            .collect();
        ViewState::with_store(
            ViewConfig::default().with_page_size(page_size),
            RecordStore::from_records(records),
        )
    }

    #[test]
    fn test_new_is_empty() {
        let view = ViewState::default();
        assert_eq!(view.selected(), None);
        assert_eq!(view.rank_group(), None);
        assert_eq!(view.pager_label(), "Page 0 of 0");
        assert!(view.current_page().is_empty());
        assert!(view.ranking().is_none());
        assert!(view.breakdown().is_none());
        assert_eq!(view.requested_rank_size(), 10);
        assert_eq!(view.rank_size(), 1, "nothing to rank yet");
        assert_eq!(view.rank_metric(), Metric::GlobalSales);
    }

    #[test]
    fn test_load_empty_store_degrades() {
        let mut view = ViewState::default();
        view.load(RecordStore::empty());
        assert_eq!(view.selected(), None);
        assert_eq!(view.snapshot().total_pages, 0);
        assert!(view.table_rows().is_empty());
        assert!(!view.next_page());
        assert_eq!(view.select_ranking_bar(0), None);
    }

    #[test]
    fn test_load_defaults_selection_and_group() {
        let view = loaded(5, 2);
        assert_eq!(view.selected(), Some(RecordId::new(0)));
        assert_eq!(view.rank_group(), Some(2000));
        assert_eq!(view.pager_label(), "Page 1 of 3");
        assert!(view.breakdown().is_some());
    }

    #[test]
    fn test_select_does_not_change_group() {
        let mut view = loaded(5, 2);
        assert!(view.select(RecordId::new(1)));
        assert_eq!(view.rank_group(), Some(2000));
        assert_eq!(
            view.selected_record().map(|r| r.name.as_str()),
            Some("g1")
        );
    }

    #[test]
    fn test_select_unknown_ignored() {
        let mut view = loaded(3, 2);
        let before = view.revision();
        assert!(!view.select(RecordId::new(42)));
        assert_eq!(view.selected(), Some(RecordId::new(0)));
        assert_eq!(view.revision(), before);
    }

    #[test]
    fn test_reload_refocuses_first_record_of_new_store() {
        let mut view = loaded(5, 2);
        view.select(RecordId::new(1));
        view.set_rank_group(2001);
        view.load(RecordStore::from_records(vec![
            game("Halo", 2001, 6.4),
            game("Zelda", 1998, 7.6),
        ]));
        assert_eq!(view.selected(), Some(RecordId::new(0)));
        assert_eq!(
            view.selected_record().map(|r| r.name.as_str()),
            Some("Halo")
        );
        assert_eq!(view.rank_group(), Some(2001));
        let ranking = view.ranking().unwrap();
        assert_eq!(ranking.labels(), vec!["Halo"]);
        assert_eq!(ranking.highlight_flags(), vec![true]);
    }

    #[test]
    fn test_reload_never_reattaches_by_index() {
        let mut view = loaded(5, 2);
        view.select(RecordId::new(4));
        view.set_rank_group(2002);
        view.load(RecordStore::from_records(
            (0..6).map(|i| game(&format!("n{i}"), 1990, 1.0)).collect(),
        ));
        assert_eq!(view.selected(), Some(RecordId::new(0)));
        assert_eq!(view.rank_group(), Some(1990));
        assert_eq!(view.ranking().map(|r| r.len()), Some(6));
    }

    #[test]
    fn test_reload_then_select_keeps_new_group() {
        let mut view = loaded(3, 2);
        view.load(RecordStore::from_records(vec![
            game("a", 1995, 1.0),
            game("b", 1996, 2.0),
        ]));
        assert_eq!(view.rank_group(), Some(1995));
        assert!(view.select(RecordId::new(1)));
        assert_eq!(view.rank_group(), Some(1995));
    }

    #[test]
    fn test_reload_into_empty_store_clears_focus() {
        let mut view = loaded(3, 2);
        view.load(RecordStore::empty());
        assert_eq!(view.selected(), None);
        assert_eq!(view.rank_group(), None);
        assert!(view.ranking().is_none());
    }

    #[test]
    fn test_paging_bounds() {
        let mut view = loaded(5, 2);
        assert!(!view.go_to_page(4));
        assert!(view.go_to_page(3));
        assert_eq!(view.current_page().items(), &[RecordId::new(4)]);
        assert!(!view.next_page());
        assert!(view.prev_page());
        assert_eq!(view.pager().current(), 2);
    }

    #[test]
    fn test_page_size_change_clamps() {
        let mut view = loaded(10, 2);
        view.go_to_page(5);
        view.set_page_size(5);
        assert_eq!(view.pager().current(), 2);
        assert_eq!(view.pager().total_pages(), 2);
    }

    #[test]
    fn test_sort_toggle_reorders() {
        let mut view = loaded(4, 10);
        let spec = view.sort_by(Field::GlobalSales);
        assert_eq!(spec, SortSpec::ascending(Field::GlobalSales));
        assert_eq!(view.ordered()[0], RecordId::new(0));
        view.sort_by(Field::GlobalSales);
        assert_eq!(view.ordered()[0], RecordId::new(3));
        assert_eq!(view.table_headers()[10].indicator, Some('▼'));
        view.clear_sort();
        assert_eq!(view.ordered(), view.store().ids().as_slice());
    }

    #[test]
    fn test_select_row_on_current_page() {
        let mut view = loaded(5, 2);
        view.go_to_page(2);
        assert_eq!(view.select_row(1), Some(RecordId::new(3)));
        assert_eq!(view.select_row(2), None);
        let rows = view.table_rows();
        assert!(rows[1].selected);
        assert!(!rows[0].selected);
    }

    #[test]
    fn test_reveal_selection() {
        let mut view = loaded(5, 2);
        view.select(RecordId::new(4));
        assert!(view.reveal_selection());
        assert_eq!(view.pager().current(), 3);
    }

    #[test]
    fn test_rank_size_clamped() {
        let mut view = loaded(5, 2);
        assert_eq!(view.set_rank_size(0), 1);
        assert_eq!(view.set_rank_size(50), 5);
        assert_eq!(view.set_rank_size(3), 3);
        assert_eq!(view.rank_size(), 3);
    }

    #[test]
    fn test_rank_size_set_before_load_survives() {
        let mut view = ViewState::default();
        assert_eq!(view.set_rank_size(10), 1);
        view.load(RecordStore::from_records(
            (0..50).map(|i| game(&format!("g{i}"), 2000, (50 - i) as f64)).collect(),
        ));
        assert_eq!(view.rank_size(), 10);
        assert_eq!(view.snapshot().rank_size, 10);
        assert_eq!(view.ranking().unwrap().len(), 10);
    }

    #[test]
    fn test_rank_size_follows_record_count_across_loads() {
        let mut view = loaded(5, 2);
        view.set_rank_size(8);
        assert_eq!(view.rank_size(), 5);
        view.load(RecordStore::from_records(
            (0..20).map(|i| game(&format!("g{i}"), 2000, i as f64)).collect(),
        ));
        assert_eq!(view.rank_size(), 8);
    }

    #[test]
    fn test_ranking_bar_click_selects_record() {
        // years cycle 2000, 2001, 2002; group 2000 holds g0 (0.0) and g3 (3.0)
        let mut view = loaded(6, 10);
        view.set_rank_size(1);
        let ranking = view.ranking().unwrap();
        assert_eq!(ranking.labels(), vec!["g3", "g0"]);
        assert_eq!(view.select_ranking_bar(0), Some(RecordId::new(3)));
        assert_eq!(view.selected(), Some(RecordId::new(3)));
        let ranking = view.ranking().unwrap();
        assert_eq!(ranking.labels(), vec!["g3"]);
        assert_eq!(ranking.highlight_flags(), vec![true]);
        assert_eq!(view.select_ranking_bar(5), None);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut view = loaded(5, 2);
        let r0 = view.revision();
        view.set_rank_metric(Metric::GlobalSales);
        assert_eq!(view.revision(), r0, "no-op must not bump");
        view.set_rank_metric(Metric::EuSales);
        assert!(view.revision() > r0);
        let r1 = view.revision();
        view.go_to_page(99);
        assert_eq!(view.revision(), r1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut view = loaded(5, 2);
        view.sort_by(Field::Name);
        view.go_to_page(2);
        let snap = view.snapshot();
        assert_eq!(snap.record_count, 5);
        assert_eq!(snap.sort, Some(SortSpec::ascending(Field::Name)));
        assert_eq!(snap.current_page, 2);
        assert_eq!(snap.total_pages, 3);
        assert_eq!(snap.selected, Some(RecordId::new(0)));
        assert_eq!(snap.rank_group, Some(2000));
        assert_eq!(snap.revision, view.revision());
        assert!(serde_json::to_string(&snap).is_ok());
    }

    #[test]
    fn test_initial_rank_size_bounded_by_config() {
        let view = ViewState::new(ViewConfig::default().with_rank_size(500).with_max_rank_size(20));
        assert_eq!(view.requested_rank_size(), 20);
    }
}
