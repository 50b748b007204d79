//! Sort engine
//!
//! Produces ordered views of a [`RecordStore`] as handle sequences. The
//! store itself is never reordered.
//!
//! Ordering policy:
//! - numeric fields compare numerically, missing values always sort last
//!   (in both directions)
//! - text fields compare case-insensitively first, then by code point
//! - ties keep ingestion order (stable sort)

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{Field, FieldValue, Record, RecordId};
use crate::store::RecordStore;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// The opposite direction
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Column header indicator
    pub const fn glyph(self) -> char {
        match self {
            Self::Ascending => '▲',
            Self::Descending => '▼',
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A column and direction to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort by
    pub field: Field,
    /// Direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on a field
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a field
    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Compare two records under a sort spec
pub fn compare(a: &Record, b: &Record, spec: SortSpec) -> Ordering {
    match (a.value(spec.field), b.value(spec.field)) {
        (FieldValue::Number(x), FieldValue::Number(y)) => compare_numbers(x, y, spec.direction),
        (FieldValue::Text(x), FieldValue::Text(y)) => spec.direction.apply(locale_cmp(x, y)),
        // a field always yields the same variant for every record
        _ => Ordering::Equal,
    }
}

/// Compare optional numbers, missing last regardless of direction
pub fn compare_numbers(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => direction.apply(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Locale-style string comparison
///
/// Case-insensitive on Unicode lowercase, falling back to code point order
/// so the result is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Sort all records of a store, returning handles in sorted order
pub fn sort(store: &RecordStore, spec: SortSpec) -> Vec<RecordId> {
    let mut ids = store.ids();
    sort_ids(store, &mut ids, spec);
    ids
}

/// Sort a handle sequence in place (stable); unknown handles sort last
pub fn sort_ids(store: &RecordStore, ids: &mut [RecordId], spec: SortSpec) {
    ids.sort_by(|&a, &b| match (store.get(a), store.get(b)) {
        (Some(ra), Some(rb)) => compare(ra, rb, spec),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Ordered view: sorted when a spec is given, ingestion order otherwise
pub fn sorted_ids(store: &RecordStore, spec: Option<SortSpec>) -> Vec<RecordId> {
    match spec {
        Some(spec) => sort(store, spec),
        None => store.ids(),
    }
}

/// Active sort column with header-click toggling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    /// No sort active (natural order)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sort, if any
    #[inline]
    pub fn spec(&self) -> Option<SortSpec> {
        self.active
    }

    /// Current sort column, if any
    #[inline]
    pub fn field(&self) -> Option<Field> {
        self.active.map(|s| s.field)
    }

    /// Current direction (ascending when no sort is active)
    #[inline]
    pub fn direction(&self) -> SortDirection {
        self.active.map(|s| s.direction).unwrap_or_default()
    }

    /// Apply a header click
    ///
    /// Clicking the active column flips its direction; clicking another
    /// column makes it active in ascending order.
    pub fn toggle(&mut self, field: Field) -> SortSpec {
        let next = match self.active {
            Some(spec) if spec.field == field => SortSpec {
                field,
                direction: spec.direction.flip(),
            },
            _ => SortSpec::ascending(field),
        };
        debug!(field = %next.field, direction = ?next.direction, "sort toggled");
        self.active = Some(next);
        next
    }

    /// Return to natural order
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Header glyph for a column, `None` when it is not the active column
    pub fn indicator(&self, field: Field) -> Option<char> {
        self.active
            .filter(|s| s.field == field)
            .map(|s| s.direction.glyph())
    }
}
