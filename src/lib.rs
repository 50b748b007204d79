//! vitrina - In-memory catalog views
//!
//! Browse a flat catalog dataset (one row per item, categorical and
//! numeric fields) through a sortable, paginated table, and compare the
//! focused row against its peers with a derived top-N ranking and a
//! regional breakdown.
//!
//! # Architecture
//!
//! - [`RecordStore`] - immutable decoded dataset, records addressed by [`RecordId`]
//! - [`sort`] - stable, non-mutating ordered views (missing numbers last)
//! - [`page`] - fixed-size pages and a bounded page cursor
//! - [`Selection`] - the one focused record
//! - [`ranking`] - top-N by metric within a year, with forced inclusion
//! - [`breakdown`] - per-record regional projection
//! - [`ViewState`] - the session state tying it together
//!
//! Decoding (CSV and friends) and rendering are left to the caller: records
//! arrive as Arrow `RecordBatch`es or as deserialized [`Record`]s, and views
//! leave as plain data.
//!
//! # Quick Start
//!
//! ```
//! use vitrina::{Record, RecordStore, ViewConfig, ViewState};
//! use vitrina::record::Metric;
//!
//! let store = RecordStore::from_records(vec![
//!     Record::named("A").with_year(2000).with_metric(Metric::GlobalSales, 5.0),
//!     Record::named("B").with_year(2000).with_metric(Metric::GlobalSales, 9.0),
//!     Record::named("C").with_year(2001).with_metric(Metric::GlobalSales, 1.0),
//! ]);
//!
//! let mut view = ViewState::new(ViewConfig::default().with_page_size(2));
//! view.load(store);
//!
//! assert_eq!(view.pager_label(), "Page 1 of 2");
//! assert_eq!(view.current_page().len(), 2);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::float_cmp,
        clippy::too_many_lines
    )
)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod adapter;
pub mod breakdown;
pub mod config;
pub mod error;
pub mod page;
pub mod ranking;
pub mod record;
pub mod selection;
pub mod sort;
pub mod state;
pub mod store;
pub mod table;

// Re-export the batch type decoders hand over
pub use arrow::array::RecordBatch;
pub use breakdown::{Breakdown, BreakdownSlice, Region};
pub use config::{ChartPalette, ViewConfig};
pub use error::{Error, Result};
pub use page::{paginate, Page, Pager};
pub use ranking::{
    compute_base_ranking, derive_ranking, ensure_inclusion, RankedEntry, Ranking, RankingQuery,
};
pub use record::{Field, Metric, Record, RecordId};
pub use selection::Selection;
pub use sort::{SortDirection, SortSpec, SortState};
pub use state::{ViewSnapshot, ViewState};
pub use store::RecordStore;
pub use table::{Header, TableRow};
