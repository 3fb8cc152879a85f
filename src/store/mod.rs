//! The record store collaborator.
//!
//! The query engine reads records only through [`RecordStore`]. Two
//! implementations ship with the crate: [`DuckDbStore`] (embedded DuckDB
//! table) and [`MemoryStore`] (records held in process).

mod duckdb_store;
mod memory_store;

pub use self::duckdb_store::DuckDbStore;
pub use self::memory_store::MemoryStore;

use std::collections::{BTreeMap, HashSet};

use crate::error::{Result, SalesError};
use crate::filter::RecordFilter;
use crate::models::Record;

/// Numeric record fields that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Price,
}

/// Grouping keys supported by [`RecordStore::group_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category,
    /// `(year, month)` of `dateOfSale` in UTC.
    YearMonth,
}

/// One group produced by a [`GroupKey`].
///
/// Ordered by category name, or chronologically for `YearMonth`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Category(String),
    YearMonth { year: i32, month: u32 },
}

/// Read access to product-sale records, plus the one-shot import.
///
/// Implementations must tolerate concurrent calls: the combined view and the
/// histogram issue several queries in parallel against the same store.
/// Every method other than [`replace_all`](Self::replace_all) is a pure read.
pub trait RecordStore: Send + Sync {
    /// Number of records matching `filter`.
    fn count(&self, filter: &RecordFilter) -> Result<u64>;

    /// Matching records in natural (insertion) order, skipping `skip` and
    /// returning at most `limit`.
    fn find(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<Vec<Record>>;

    /// Sum of `field` over matching records; 0 when nothing matches.
    fn sum_where(&self, filter: &RecordFilter, field: RecordField) -> Result<f64>;

    /// Count of matching records per group.
    fn group_by(&self, filter: &RecordFilter, key: GroupKey) -> Result<BTreeMap<GroupValue, u64>>;

    /// Sum of `field` over matching records per group.
    fn group_sum(
        &self,
        filter: &RecordFilter,
        key: GroupKey,
        field: RecordField,
    ) -> Result<BTreeMap<GroupValue, f64>>;

    /// Replace the entire contents of the store with `records`.
    ///
    /// Returns the number of records imported.
    fn replace_all(&self, records: &[Record]) -> Result<usize>;
}

impl RecordField {
    fn value(self, record: &Record) -> f64 {
        match self {
            RecordField::Price => record.price,
        }
    }

    fn column(self) -> &'static str {
        match self {
            RecordField::Price => "price",
        }
    }
}

/// Reject imports that would break record-id uniqueness.
fn ensure_unique_ids(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().find(|r| !seen.insert(r.id)) {
        Some(dup) => Err(SalesError::InvalidArgument(format!(
            "duplicate record id: {}",
            dup.id
        ))),
        None => Ok(()),
    }
}
