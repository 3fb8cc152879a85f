//! Sales analytics engine for Rust.
//!
//! Reports over a catalog of product-sale records: paginated and searchable
//! listings, monthly sale totals with sold/unsold counts, a fixed price-range
//! histogram, per-category counts, and a combined view that runs three of
//! these concurrently. Records are read through the [`RecordStore`] trait;
//! an embedded DuckDB store and an in-memory store are provided.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_analytics::{DuckDbStore, SalesAnalytics};
//!
//! let store = DuckDbStore::open_in_memory().unwrap();
//! store.import_json_file("product_transaction.json").unwrap();
//!
//! let engine = SalesAnalytics::builder()
//!     .reference_year(2022)
//!     .store(store)
//!     .build()
//!     .unwrap();
//!
//! let march = engine.get_combined(Some("March")).unwrap();
//! println!("sold {} items", march.statistics.total_sold);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncSalesAnalytics;
pub use calendar::{Month, TimeWindow};
pub use config::EngineConfig;
pub use error::{Result, SalesError};
pub use filter::RecordFilter;
pub use queries::ListingParams;
pub use sql_builder::SqlBuilder;
pub use store::{DuckDbStore, MemoryStore, RecordStore};

use std::fmt;
use std::sync::Arc;

use models::{CategoryCount, CombinedResult, HistogramEntry, Page, Record, Statistics};

// ---------------------------------------------------------------------------
// SalesAnalyticsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesAnalytics`] engine.
///
/// Use [`SalesAnalytics::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SalesAnalyticsBuilder::build).
#[derive(Default)]
pub struct SalesAnalyticsBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn RecordStore>>,
}

impl SalesAnalyticsBuilder {
    /// Year that month names resolve against. Defaults to 2022.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.config.reference_year = year;
        self
    }

    /// Listing page size used when a request does not give a valid one.
    ///
    /// Defaults to 10.
    pub fn default_per_page(mut self, per_page: usize) -> Self {
        self.config.default_per_page = per_page;
        self
    }

    /// Query the given store.
    pub fn store<S: RecordStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Query a store that is shared with other owners (e.g. an importer).
    pub fn shared_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the engine.
    ///
    /// Without an explicit store, an empty in-memory [`DuckDbStore`] is
    /// opened.
    pub fn build(self) -> Result<SalesAnalytics> {
        if self.config.default_per_page == 0 {
            return Err(SalesError::InvalidArgument(
                "default_per_page must be at least 1".into(),
            ));
        }
        // Both ends of the reference year must be representable
        TimeWindow::for_month(self.config.reference_year, 1)?;
        TimeWindow::for_month(self.config.reference_year, 12)?;

        let store = match self.store {
            Some(store) => store,
            None => Arc::new(DuckDbStore::open_in_memory()?),
        };
        Ok(SalesAnalytics {
            store,
            config: self.config,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesAnalytics
// ---------------------------------------------------------------------------

/// The main entry point of the engine.
///
/// Owns a shared [`RecordStore`] handle and the [`EngineConfig`], and exposes
/// the query interfaces as lightweight borrowing wrappers. Holds no mutable
/// state, so one instance can serve concurrent requests.
pub struct SalesAnalytics {
    store: Arc<dyn RecordStore>,
    config: EngineConfig,
}

impl SalesAnalytics {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> SalesAnalyticsBuilder {
        SalesAnalyticsBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the paginated listing interface.
    pub fn listing(&self) -> queries::ListingQuery<'_> {
        queries::ListingQuery::new(self.store.as_ref(), &self.config)
    }

    /// Access the statistics interface.
    pub fn statistics(&self) -> queries::StatisticsQuery<'_> {
        queries::StatisticsQuery::new(self.store.as_ref(), &self.config)
    }

    /// Access the price histogram interface.
    pub fn histogram(&self) -> queries::HistogramQuery<'_> {
        queries::HistogramQuery::new(self.store.as_ref(), &self.config)
    }

    /// Access the category breakdown interface.
    pub fn categories(&self) -> queries::CategoryQuery<'_> {
        queries::CategoryQuery::new(self.store.as_ref(), &self.config)
    }

    /// Access the combined view interface.
    pub fn combined(&self) -> queries::CombinedQuery<'_> {
        queries::CombinedQuery::new(self.store.as_ref(), &self.config)
    }

    // -- Logical operations ------------------------------------------------

    /// One page of records, optionally windowed to a month and searched.
    pub fn list_records(&self, params: &ListingParams) -> Result<Page<Record>> {
        log::debug!("list_records {:?}", params);
        self.listing().list(params)
    }

    /// Statistics for a month, or grouped by every `(year, month)` when
    /// `month` is `None`.
    pub fn get_statistics(&self, month: Option<&str>) -> Result<Statistics> {
        log::debug!("get_statistics month={:?}", month);
        self.statistics().get(month)
    }

    /// Price histogram for a month. The month is required.
    pub fn get_histogram(&self, month: Option<&str>) -> Result<Vec<HistogramEntry>> {
        log::debug!("get_histogram month={:?}", month);
        self.histogram().get(month)
    }

    /// Category counts for a month, or across all records.
    pub fn get_category_breakdown(&self, month: Option<&str>) -> Result<Vec<CategoryCount>> {
        log::debug!("get_category_breakdown month={:?}", month);
        self.categories().get(month)
    }

    /// Statistics, histogram and categories for a month. The month is
    /// required.
    pub fn get_combined(&self, month: Option<&str>) -> Result<CombinedResult> {
        log::debug!("get_combined month={:?}", month);
        self.combined().get(month)
    }

    // -- Accessors ---------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying record store, e.g. for imports.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// A clone of the shared store handle.
    pub fn shared_store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesAnalytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SalesAnalytics(reference_year={}, default_per_page={})",
            self.config.reference_year, self.config.default_per_page
        )
    }
}
