//! Statistics, histogram and category breakdown for one month in one call.

use crate::calendar::{self, TimeWindow};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::CombinedResult;
use crate::queries::{CategoryQuery, HistogramQuery, StatisticsQuery};
use crate::store::RecordStore;

/// Query interface for the combined view.
pub struct CombinedQuery<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> CombinedQuery<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Combined view for a month of the reference year.
    ///
    /// The month is validated before any sub-query starts.
    pub fn get(&self, month: Option<&str>) -> Result<CombinedResult> {
        let window = calendar::require_month(month, self.config.reference_year)?;
        self.for_window(&window)
    }

    /// Run the three sub-queries concurrently and join them.
    ///
    /// Fails with the first error in statistics, histogram, categories order;
    /// no partial result is returned.
    pub fn for_window(&self, window: &TimeWindow) -> Result<CombinedResult> {
        let statistics = StatisticsQuery::new(self.store, self.config);
        let histogram = HistogramQuery::new(self.store, self.config);
        let categories = CategoryQuery::new(self.store, self.config);

        let (stats, (hist, cats)) = rayon::join(
            || statistics.for_window(window),
            || {
                rayon::join(
                    || histogram.for_window(window),
                    || categories.for_window(Some(window)),
                )
            },
        );

        for (name, failed) in [
            ("statistics", stats.as_ref().err()),
            ("histogram", hist.as_ref().err()),
            ("categories", cats.as_ref().err()),
        ] {
            if let Some(e) = failed {
                log::warn!("Combined view sub-query '{}' failed: {}", name, e);
            }
        }

        Ok(CombinedResult {
            statistics: stats?,
            histogram: hist?,
            categories: cats?,
        })
    }
}
