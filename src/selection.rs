//! Focused-record selection

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::RecordId;
use crate::store::RecordStore;

/// Tracks the one focused record
///
/// Written by table-row clicks and ranking-bar clicks, read by the table
/// (row highlight) and the ranking/breakdown derivations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<RecordId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently focused record
    #[inline]
    pub fn get(&self) -> Option<RecordId> {
        self.selected
    }

    /// Focus a record unconditionally
    pub fn select(&mut self, id: RecordId) {
        debug!(record = %id, "record selected");
        self.selected = Some(id);
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Check whether `id` is the focused record (identity, not field equality)
    #[inline]
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected == Some(id)
    }

    /// Focus the first record if nothing is focused yet
    ///
    /// Returns the newly focused record, or `None` when a selection already
    /// exists or the store is empty.
    pub fn apply_default(&mut self, store: &RecordStore) -> Option<RecordId> {
        if self.selected.is_some() {
            return None;
        }
        let first = store.first_id()?;
        self.select(first);
        Some(first)
    }
}
