//! Record counts per category.

use crate::calendar::{self, TimeWindow};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::models::CategoryCount;
use crate::store::{GroupKey, GroupValue, RecordStore};

/// Query interface for the category breakdown.
pub struct CategoryQuery<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> CategoryQuery<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Category counts for a month, or across all records when `month` is
    /// absent or empty.
    ///
    /// Callers should not rely on the order of the returned entries.
    pub fn get(&self, month: Option<&str>) -> Result<Vec<CategoryCount>> {
        let window = calendar::resolve_optional(month, self.config.reference_year)?;
        self.for_window(window.as_ref())
    }

    pub fn for_window(&self, window: Option<&TimeWindow>) -> Result<Vec<CategoryCount>> {
        let filter = RecordFilter::new().window(window.copied());
        let groups = self.store.group_by(&filter, GroupKey::Category)?;

        Ok(groups
            .into_iter()
            .filter_map(|(key, count)| match key {
                GroupValue::Category(category) => Some(CategoryCount { category, count }),
                GroupValue::YearMonth { .. } => None,
            })
            .collect())
    }
}
