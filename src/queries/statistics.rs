//! Sale totals and sold/unsold counts, per month.

use std::collections::BTreeMap;

use crate::calendar::{self, TimeWindow};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::models::{MonthlyStats, Statistics, StatsResult};
use crate::store::{GroupKey, GroupValue, RecordField, RecordStore};

/// Query interface for the statistics view.
pub struct StatisticsQuery<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> StatisticsQuery<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Statistics for one month, or for every `(year, month)` when `month`
    /// is absent or empty.
    pub fn get(&self, month: Option<&str>) -> Result<Statistics> {
        match calendar::resolve_optional(month, self.config.reference_year)? {
            Some(window) => self.for_window(&window).map(Statistics::Month),
            None => self.by_month().map(Statistics::ByMonth),
        }
    }

    /// Statistics for a named month of the reference year.
    pub fn for_month(&self, month: &str) -> Result<StatsResult> {
        let window = calendar::resolve_month(month, self.config.reference_year)?;
        self.for_window(&window)
    }

    pub fn for_window(&self, window: &TimeWindow) -> Result<StatsResult> {
        let in_window = RecordFilter::new().window(Some(*window));
        let sold = in_window.clone().sold(true);
        let not_sold = in_window.sold(false);

        Ok(StatsResult {
            total_sale_amount: self.store.sum_where(&sold, RecordField::Price)?,
            total_sold: self.store.count(&sold)?,
            total_not_sold: self.store.count(&not_sold)?,
        })
    }

    /// Statistics for every `(year, month)` present in the store, ascending.
    ///
    /// Covers all records regardless of the reference year.
    pub fn by_month(&self) -> Result<Vec<MonthlyStats>> {
        let sold = RecordFilter::new().sold(true);
        let not_sold = RecordFilter::new().sold(false);

        let amounts = self
            .store
            .group_sum(&sold, GroupKey::YearMonth, RecordField::Price)?;
        let sold_counts = self.store.group_by(&sold, GroupKey::YearMonth)?;
        let not_sold_counts = self.store.group_by(&not_sold, GroupKey::YearMonth)?;

        let mut groups: BTreeMap<(i32, u32), MonthlyStats> = BTreeMap::new();
        let keys = amounts
            .keys()
            .chain(sold_counts.keys())
            .chain(not_sold_counts.keys());
        for key in keys {
            if let GroupValue::YearMonth { year, month } = *key {
                groups.entry((year, month)).or_insert_with(|| MonthlyStats {
                    year,
                    month,
                    total_sale_amount: amounts.get(key).copied().unwrap_or(0.0),
                    total_sold: sold_counts.get(key).copied().unwrap_or(0),
                    total_not_sold: not_sold_counts.get(key).copied().unwrap_or(0),
                });
            }
        }

        Ok(groups.into_values().collect())
    }
}
