use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use chrono::Datelike;

use super::{ensure_unique_ids, GroupKey, GroupValue, RecordField, RecordStore};
use crate::error::{Result, SalesError};
use crate::filter::RecordFilter;
use crate::models::Record;

/// Record store holding every record in process, in insertion order.
///
/// Reads share an `RwLock`, so concurrent queries run in parallel;
/// [`replace_all`](RecordStore::replace_all) takes the write side.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Record>>> {
        self.records
            .read()
            .map_err(|_| SalesError::Store("memory store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn count(&self, filter: &RecordFilter) -> Result<u64> {
        Ok(self.read()?.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    fn find(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<Vec<Record>> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| filter.matches(r))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn sum_where(&self, filter: &RecordFilter, field: RecordField) -> Result<f64> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| field.value(r))
            .sum())
    }

    fn group_by(&self, filter: &RecordFilter, key: GroupKey) -> Result<BTreeMap<GroupValue, u64>> {
        let mut out = BTreeMap::new();
        for r in self.read()?.iter().filter(|r| filter.matches(r)) {
            *out.entry(group_of(r, key)).or_insert(0) += 1;
        }
        Ok(out)
    }

    fn group_sum(
        &self,
        filter: &RecordFilter,
        key: GroupKey,
        field: RecordField,
    ) -> Result<BTreeMap<GroupValue, f64>> {
        let mut out = BTreeMap::new();
        for r in self.read()?.iter().filter(|r| filter.matches(r)) {
            *out.entry(group_of(r, key)).or_insert(0.0) += field.value(r);
        }
        Ok(out)
    }

    fn replace_all(&self, records: &[Record]) -> Result<usize> {
        ensure_unique_ids(records)?;

        let mut guard = self
            .records
            .write()
            .map_err(|_| SalesError::Store("memory store lock poisoned".into()))?;
        *guard = records.to_vec();
        log::info!("Imported {} records into memory store", records.len());
        Ok(records.len())
    }
}

fn group_of(record: &Record, key: GroupKey) -> GroupValue {
    match key {
        GroupKey::Category => GroupValue::Category(record.category.clone()),
        GroupKey::YearMonth => GroupValue::YearMonth {
            year: record.date_of_sale.year(),
            month: record.date_of_sale.month(),
        },
    }
}
