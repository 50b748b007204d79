//! Ranking derivation engine
//!
//! Builds the "top N by metric within a year" chart dataset. The focused
//! record is appended when it belongs to the group but missed the cut, so
//! the chart always shows where the focus stands.
//!
//! The derivation runs in two independent stages:
//! 1. [`compute_base_ranking`] filters the group, sorts descending by the
//!    metric (ties keep ingestion order) and keeps the first N
//! 2. [`ensure_inclusion`] appends the focused record if it is missing
//!
//! Bar clicks are resolved by re-running the same two stages
//! ([`resolve_bar`]), never from a cached index.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ChartPalette;
use crate::record::{Metric, RecordId};
use crate::sort::{sort_ids, SortSpec};
use crate::store::RecordStore;

/// Parameters of a ranking chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingQuery {
    /// Year whose records form the comparison pool
    pub group: i32,
    /// Metric to rank by
    pub metric: Metric,
    /// Number of leaders to keep (N)
    pub size: usize,
}

impl RankingQuery {
    /// Create a query
    pub fn new(group: i32, metric: Metric, size: usize) -> Self {
        Self {
            group,
            metric,
            size,
        }
    }
}

/// One bar of the ranking chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// Record behind the bar
    pub id: RecordId,
    /// Bar label (record name)
    pub label: String,
    /// Metric value
    pub value: f64,
    /// Whether this is the focused record
    pub highlighted: bool,
}

/// Derived ranking chart dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    query: RankingQuery,
    entries: Vec<RankedEntry>,
    forced: bool,
}

impl Ranking {
    /// Query this ranking was built for
    #[inline]
    pub fn query(&self) -> RankingQuery {
        self.query
    }

    /// Bars in display order
    #[inline]
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// Number of bars
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there is nothing to chart
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the focused record was appended after the top N
    #[inline]
    pub fn forced_inclusion(&self) -> bool {
        self.forced
    }

    /// Bar labels
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Bar values
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// Per-bar highlight flags
    pub fn highlight_flags(&self) -> Vec<bool> {
        self.entries.iter().map(|e| e.highlighted).collect()
    }

    /// Per-bar colors
    pub fn colors<'p>(&self, palette: &'p ChartPalette) -> Vec<&'p str> {
        self.entries
            .iter()
            .map(|e| {
                if e.highlighted {
                    palette.highlight.as_str()
                } else {
                    palette.base.as_str()
                }
            })
            .collect()
    }

    /// Record behind a bar index
    pub fn resolve(&self, index: usize) -> Option<RecordId> {
        self.entries.get(index).map(|e| e.id)
    }

    /// Dataset label, e.g. `"Global Sales (millions)"`
    pub fn dataset_label(&self) -> &'static str {
        self.query.metric.chart_label()
    }

    /// Chart heading, e.g. `"Total Global Sales Comparison (Top 10 in 2006)"`
    ///
    /// Counts the leaders actually charted: a short pool lowers the number
    /// and an appended focused record does not raise it.
    pub fn title(&self) -> String {
        format!(
            "Total {} Comparison (Top {} in {})",
            self.query.metric.title(),
            self.entries.len() - usize::from(self.forced),
            self.query.group
        )
    }
}

/// Stage 1: leaders of the group by metric
///
/// Records outside the group or without a value for the metric are not
/// part of the pool.
pub fn compute_base_ranking(store: &RecordStore, query: RankingQuery) -> Vec<RecordId> {
    let mut pool: Vec<RecordId> = store
        .iter()
        .filter(|(_, r)| in_pool(r.year, r.metric(query.metric), query.group))
        .map(|(id, _)| id)
        .collect();

    sort_ids(store, &mut pool, SortSpec::descending(query.metric.field()));
    pool.truncate(query.size);
    pool
}

/// Stage 2: append the focused record when it is in the pool but missed the cut
///
/// Membership is by handle, never by name. A focused record outside the
/// pool (other year, or missing metric) is not appended.
pub fn ensure_inclusion(
    mut base: Vec<RecordId>,
    store: &RecordStore,
    query: RankingQuery,
    selected: Option<RecordId>,
) -> Vec<RecordId> {
    let Some(id) = selected else {
        return base;
    };
    let Some(record) = store.get(id) else {
        warn!(record = %id, "focused record not in store");
        return base;
    };
    if in_pool(record.year, record.metric(query.metric), query.group) && !base.contains(&id) {
        debug!(record = %id, "focused record appended to ranking");
        base.push(id);
    }
    base
}

/// Full derivation: base ranking, forced inclusion, chart rows
pub fn derive_ranking(
    store: &RecordStore,
    query: RankingQuery,
    selected: Option<RecordId>,
) -> Ranking {
    let base = compute_base_ranking(store, query);
    let base_len = base.len();
    let ids = ensure_inclusion(base, store, query, selected);
    let forced = ids.len() > base_len;

    let entries = ids
        .into_iter()
        .filter_map(|id| {
            let record = store.get(id)?;
            Some(RankedEntry {
                id,
                label: record.name.clone(),
                value: record.metric(query.metric)?,
                highlighted: selected == Some(id),
            })
        })
        .collect();

    Ranking {
        query,
        entries,
        forced,
    }
}

/// Map a clicked bar back to its record by re-deriving the ranking
pub fn resolve_bar(
    store: &RecordStore,
    query: RankingQuery,
    selected: Option<RecordId>,
    index: usize,
) -> Option<RecordId> {
    let base = compute_base_ranking(store, query);
    ensure_inclusion(base, store, query, selected)
        .get(index)
        .copied()
}

/// Clamp a requested top-N size to `[1, max(1, min(record_count, max))]`
pub fn clamp_rank_size(requested: usize, record_count: usize, max: usize) -> usize {
    let upper = record_count.min(max).max(1);
    requested.clamp(1, upper)
}

fn in_pool(year: Option<i32>, value: Option<f64>, group: i32) -> bool {
    year == Some(group) && value.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn game(name: &str, year: i32, global: f64) -> Record {
        Record::named(name)
            .with_year(year)
            .with_metric(Metric::GlobalSales, global)
    }

    fn abc() -> RecordStore {
        RecordStore::from_records(vec![
            game("A", 2000, 5.0),
            game("B", 2000, 9.0),
            game("C", 2001, 1.0),
        ])
    }

    #[test]
    fn test_forced_inclusion_scenario() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(0)));
        assert_eq!(ranking.labels(), vec!["B", "A"]);
        assert_eq!(ranking.values(), vec![9.0, 5.0]);
        assert_eq!(ranking.highlight_flags(), vec![false, true]);
        assert!(ranking.forced_inclusion());
    }

    #[test]
    fn test_selected_already_leader_not_duplicated() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(1)));
        assert_eq!(ranking.labels(), vec!["B"]);
        assert_eq!(ranking.highlight_flags(), vec![true]);
        assert!(!ranking.forced_inclusion());
    }

    #[test]
    fn test_selected_outside_group_not_appended() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(2)));
        assert_eq!(ranking.labels(), vec!["B"]);
        assert_eq!(ranking.highlight_flags(), vec![false]);
    }

    #[test]
    fn test_duplicate_names_resolved_by_identity() {
        let store = RecordStore::from_records(vec![
            game("Twin", 2005, 8.0),
            game("Other", 2005, 6.0),
            game("Twin", 2005, 1.0),
        ]);
        let query = RankingQuery::new(2005, Metric::GlobalSales, 2);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(2)));
        assert_eq!(ranking.labels(), vec!["Twin", "Other", "Twin"]);
        assert_eq!(ranking.highlight_flags(), vec![false, false, true]);
        assert_eq!(ranking.resolve(2), Some(RecordId::new(2)));
    }

    #[test]
    fn test_missing_metric_excluded() {
        let store = RecordStore::from_records(vec![
            game("A", 2000, 3.0),
            Record::named("NoSales").with_year(2000),
        ]);
        let query = RankingQuery::new(2000, Metric::GlobalSales, 10);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(1)));
        assert_eq!(ranking.labels(), vec!["A"]);
        assert_eq!(ranking.highlight_flags(), vec![false]);
    }

    #[test]
    fn test_ties_keep_ingestion_order() {
        let store = RecordStore::from_records(vec![
            game("first", 2010, 2.0),
            game("second", 2010, 2.0),
            game("third", 2010, 2.0),
        ]);
        let query = RankingQuery::new(2010, Metric::GlobalSales, 2);
        assert_eq!(
            compute_base_ranking(&store, query),
            vec![RecordId::new(0), RecordId::new(1)]
        );
    }

    #[test]
    fn test_ranking_by_regional_metric() {
        let store = RecordStore::from_records(vec![
            game("A", 2000, 5.0).with_metric(Metric::JpSales, 0.1),
            game("B", 2000, 9.0).with_metric(Metric::JpSales, 3.0),
            game("C", 2000, 1.0),
        ]);
        let query = RankingQuery::new(2000, Metric::JpSales, 5);
        let ranking = derive_ranking(&store, query, None);
        assert_eq!(ranking.labels(), vec!["B", "A"]);
        assert_eq!(ranking.dataset_label(), "JP Sales (millions)");
    }

    #[test]
    fn test_empty_store_yields_empty_ranking() {
        let store = RecordStore::empty();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 10);
        let ranking = derive_ranking(&store, query, None);
        assert!(ranking.is_empty());
        assert_eq!(ranking.resolve(0), None);
    }

    #[test]
    fn test_unknown_selection_ignored() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(99)));
        assert_eq!(ranking.labels(), vec!["B"]);
    }

    #[test]
    fn test_resolve_bar_matches_derivation() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let selected = Some(RecordId::new(0));
        let ranking = derive_ranking(&store, query, selected);
        for i in 0..ranking.len() {
            assert_eq!(resolve_bar(&store, query, selected, i), ranking.resolve(i));
        }
        assert_eq!(resolve_bar(&store, query, selected, ranking.len()), None);
    }

    #[test]
    fn test_colors_follow_highlight() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(0)));
        let palette = ChartPalette::default();
        assert_eq!(ranking.colors(&palette), vec!["#8884d8", "#36A2EB"]);
    }

    #[test]
    fn test_title() {
        let store = abc();
        let ranking = derive_ranking(&store, RankingQuery::new(2000, Metric::GlobalSales, 10), None);
        assert_eq!(
            ranking.title(),
            "Total Global Sales Comparison (Top 2 in 2000)"
        );
    }

    #[test]
    fn test_title_ignores_forced_entry() {
        let store = abc();
        let query = RankingQuery::new(2000, Metric::GlobalSales, 1);
        let ranking = derive_ranking(&store, query, Some(RecordId::new(0)));
        assert_eq!(ranking.len(), 2);
        assert_eq!(
            ranking.title(),
            "Total Global Sales Comparison (Top 1 in 2000)"
        );
    }

    #[test]
    fn test_clamp_rank_size() {
        assert_eq!(clamp_rank_size(0, 50, 100), 1);
        assert_eq!(clamp_rank_size(10, 50, 100), 10);
        assert_eq!(clamp_rank_size(500, 50, 100), 50);
        assert_eq!(clamp_rank_size(500, 5000, 100), 100);
        assert_eq!(clamp_rank_size(3, 0, 100), 1);
    }
}
