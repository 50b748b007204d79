//! Immutable record store
//!
//! Holds one decoded dataset snapshot. A reload builds a new store; an
//! existing store is never mutated.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::RecordBatch;

use crate::adapter::records_from_batches;
use crate::error::Result;
use crate::record::{Record, RecordId};

/// Immutable, cheaply cloneable snapshot of decoded records
///
/// # Example
///
/// ```
/// use vitrina::{Record, RecordStore};
///
/// let store = RecordStore::from_records(vec![Record::named("Tetris").with_year(1989)]);
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.years(), vec![1989]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl RecordStore {
    /// Create an empty store (the pre-load state)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a store from records in ingestion order
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Create a store from decoded Arrow batches
    ///
    /// # Errors
    ///
    /// Returns an error if a batch lacks the `Name` column or carries a
    /// column type that cannot be mapped onto [`Record`].
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        Ok(Self::from_records(records_from_batches(batches)?))
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by handle
    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Check whether a handle resolves in this store
    #[inline]
    pub fn contains(&self, id: RecordId) -> bool {
        id.index() < self.records.len()
    }

    /// Handle of the first record in ingestion order
    pub fn first_id(&self) -> Option<RecordId> {
        (!self.is_empty()).then_some(RecordId::new(0))
    }

    /// Iterate records with their handles in ingestion order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId::new(i), r))
    }

    /// All handles in ingestion order
    pub fn ids(&self) -> Vec<RecordId> {
        (0..self.records.len()).map(RecordId::new).collect()
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records whose stored total disagrees with the sum of their regions
    ///
    /// Records without a total are skipped. Totals are never corrected,
    /// this only reports them.
    pub fn total_mismatches(&self, tolerance: f64) -> Vec<RecordId> {
        self.iter()
            .filter(|(_, r)| {
                r.global_sales
                    .is_some_and(|total| (total - r.regional_sum()).abs() > tolerance)
            })
            .map(|(id, _)| id)
            .collect()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self::from_records(records)
    }
}
