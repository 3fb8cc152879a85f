//! Shared test fixtures for the sales analytics integration tests.
//!
//! Provides a small sample catalog plus engine constructors over both
//! store implementations, and stores that fail or count their calls.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use sales_analytics::filter::RecordFilter;
use sales_analytics::models::Record;
use sales_analytics::store::{GroupKey, GroupValue, RecordField};
use sales_analytics::{DuckDbStore, MemoryStore, RecordStore, Result, SalesAnalytics, SalesError};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
}

pub fn record(
    id: i64,
    title: &str,
    price: f64,
    description: &str,
    category: &str,
    sold: bool,
    date_of_sale: DateTime<Utc>,
) -> Record {
    Record {
        id,
        title: title.to_string(),
        price,
        description: description.to_string(),
        category: category.to_string(),
        image: format!("https://img.example.com/{}.jpg", id),
        sold,
        date_of_sale,
    }
}

/// Twelve records spread over March, April and December 2022, with one
/// record each in March 2021 and January 2023.
///
/// | month   | ids            | sold ids | sold amount |
/// |---------|----------------|----------|-------------|
/// | 2021-03 | 10             | 10       | 109.95      |
/// | 2022-03 | 1, 2, 3, 4, 12 | 1, 3     | 187         |
/// | 2022-04 | 5, 6, 7        | 5, 6     | 1039.98     |
/// | 2022-12 | 8, 9           | 8        | 599         |
/// | 2023-01 | 11             | 11       | 695         |
pub fn sample_records() -> Vec<Record> {
    vec![
        record(1, "Blue Shirt", 19.0, "Cotton tee for everyday wear", "men's clothing", true, at(2022, 3, 5, 10, 0, 0)),
        record(2, "Mens Casual Slim Fit", 15.99, "The color could be slightly different", "men's clothing", false, at(2022, 3, 10, 8, 30, 0)),
        record(3, "Solid Gold Petite Micropave", 168.0, "Satisfaction Guaranteed. Return or exchange", "jewelery", true, at(2022, 3, 21, 12, 0, 0)),
        record(4, "WD 2TB Elements Portable Hard Drive", 64.0, "USB 3.0 and USB 2.0 compatibility", "electronics", false, at(2022, 3, 31, 23, 59, 59)),
        record(5, "Samsung 49-Inch Gaming Monitor", 999.99, "49 inch super ultrawide monitor", "electronics", true, at(2022, 4, 1, 0, 0, 0)),
        record(6, "Rain Jacket Women Windbreaker", 39.99, "Lightweight perfect for trip", "women's clothing", true, at(2022, 4, 15, 9, 0, 0)),
        record(7, "Pierced Owl Rose Gold Plated", 10.99, "Double flared tunnel plug earrings", "jewelery", false, at(2022, 4, 20, 16, 45, 0)),
        record(8, "Acer SB220Q 21.5 inch Monitor", 599.0, "Full HD widescreen IPS display", "electronics", true, at(2022, 12, 31, 23, 0, 0)),
        record(9, "Silicon Power 256GB SSD", 109.0, "3D NAND flash are applied", "electronics", false, at(2022, 12, 1, 0, 0, 0)),
        record(10, "Fjallraven Backpack", 109.95, "Your perfect pack for everyday use", "men's clothing", true, at(2021, 3, 15, 11, 0, 0)),
        record(11, "John Hardy Chain Bracelet", 695.0, "From our Legends Collection", "jewelery", true, at(2023, 1, 1, 0, 0, 0)),
        record(12, "Short Sleeve Moisture Tee", 100.0, "100% Polyester, machine wash", "women's clothing", false, at(2022, 3, 3, 0, 0, 0)),
    ]
}

pub fn memory_store(records: Vec<Record>) -> MemoryStore {
    MemoryStore::with_records(records)
}

pub fn duckdb_store(records: &[Record]) -> DuckDbStore {
    let store = DuckDbStore::open_in_memory().unwrap();
    store.replace_all(records).unwrap();
    store
}

pub fn engine_over<S: RecordStore + 'static>(store: S) -> SalesAnalytics {
    SalesAnalytics::builder().store(store).build().unwrap()
}

/// The sample catalog behind both store implementations.
pub fn engines() -> Vec<(&'static str, SalesAnalytics)> {
    engines_with(sample_records())
}

pub fn engines_with(records: Vec<Record>) -> Vec<(&'static str, SalesAnalytics)> {
    init_logging();
    vec![
        ("duckdb", engine_over(duckdb_store(&records))),
        ("memory", engine_over(memory_store(records))),
    ]
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ---------------------------------------------------------------------------
// FailingStore
// ---------------------------------------------------------------------------

/// A store whose every operation fails.
pub struct FailingStore;

fn unavailable<T>() -> Result<T> {
    Err(SalesError::Store("store unavailable".into()))
}

impl RecordStore for FailingStore {
    fn count(&self, _filter: &RecordFilter) -> Result<u64> {
        unavailable()
    }

    fn find(&self, _filter: &RecordFilter, _skip: usize, _limit: usize) -> Result<Vec<Record>> {
        unavailable()
    }

    fn sum_where(&self, _filter: &RecordFilter, _field: RecordField) -> Result<f64> {
        unavailable()
    }

    fn group_by(&self, _filter: &RecordFilter, _key: GroupKey) -> Result<BTreeMap<GroupValue, u64>> {
        unavailable()
    }

    fn group_sum(
        &self,
        _filter: &RecordFilter,
        _key: GroupKey,
        _field: RecordField,
    ) -> Result<BTreeMap<GroupValue, f64>> {
        unavailable()
    }

    fn replace_all(&self, _records: &[Record]) -> Result<usize> {
        unavailable()
    }
}

// ---------------------------------------------------------------------------
// CountingStore
// ---------------------------------------------------------------------------

/// Wraps a [`MemoryStore`] and counts every read, optionally failing
/// `group_by` calls to simulate a single broken aggregate.
pub struct CountingStore {
    inner: MemoryStore,
    pub calls: AtomicUsize,
    pub fail_group_by: bool,
}

impl CountingStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            inner: MemoryStore::with_records(records),
            calls: AtomicUsize::new(0),
            fail_group_by: false,
        }
    }

    pub fn failing_group_by(records: Vec<Record>) -> Self {
        Self {
            fail_group_by: true,
            ..Self::new(records)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl RecordStore for CountingStore {
    fn count(&self, filter: &RecordFilter) -> Result<u64> {
        self.tick();
        self.inner.count(filter)
    }

    fn find(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<Vec<Record>> {
        self.tick();
        self.inner.find(filter, skip, limit)
    }

    fn sum_where(&self, filter: &RecordFilter, field: RecordField) -> Result<f64> {
        self.tick();
        self.inner.sum_where(filter, field)
    }

    fn group_by(&self, filter: &RecordFilter, key: GroupKey) -> Result<BTreeMap<GroupValue, u64>> {
        self.tick();
        if self.fail_group_by {
            return Err(SalesError::Store("group_by failed".into()));
        }
        self.inner.group_by(filter, key)
    }

    fn group_sum(
        &self,
        filter: &RecordFilter,
        key: GroupKey,
        field: RecordField,
    ) -> Result<BTreeMap<GroupValue, f64>> {
        self.tick();
        self.inner.group_sum(filter, key, field)
    }

    fn replace_all(&self, records: &[Record]) -> Result<usize> {
        self.inner.replace_all(records)
    }
}
