//! Fixed price-range histogram over one month.

use rayon::prelude::*;

use crate::calendar::{self, TimeWindow};
use crate::config::{EngineConfig, PRICE_BUCKETS};
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::models::HistogramEntry;
use crate::store::RecordStore;

/// Query interface for the price histogram.
pub struct HistogramQuery<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> HistogramQuery<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Histogram for a month of the reference year.
    ///
    /// Fails with `MissingMonth` when `month` is absent or empty and with
    /// `InvalidMonth` when it is not a month name.
    pub fn get(&self, month: Option<&str>) -> Result<Vec<HistogramEntry>> {
        let window = calendar::require_month(month, self.config.reference_year)?;
        self.for_window(&window)
    }

    /// Count records per [`PRICE_BUCKETS`] entry within `window`.
    ///
    /// Buckets are counted in parallel; entries come back in bucket order.
    pub fn for_window(&self, window: &TimeWindow) -> Result<Vec<HistogramEntry>> {
        PRICE_BUCKETS[..]
            .par_iter()
            .map(|bucket| -> Result<HistogramEntry> {
                let filter = RecordFilter::new()
                    .window(Some(*window))
                    .price(bucket.range());
                Ok(HistogramEntry {
                    range: bucket.label.to_string(),
                    count: self.store.count(&filter)?,
                })
            })
            .collect()
    }
}
