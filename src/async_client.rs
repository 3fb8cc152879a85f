//! Async wrapper around [`SalesAnalytics`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all engine operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Record store calls block, so they must stay off the async workers.
//!
//! # Example
//!
//! ```no_run
//! use sales_analytics::{AsyncSalesAnalytics, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = AsyncSalesAnalytics::builder()
//!         .store(MemoryStore::new())
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let combined = engine.get_combined(Some("March")).await.unwrap();
//!     println!("{} categories", combined.categories.len());
//! }
//! ```

use std::sync::Arc;

use crate::calendar;
use crate::error::{Result, SalesError};
use crate::models::{CategoryCount, CombinedResult, HistogramEntry, Page, Record, Statistics};
use crate::queries::ListingParams;
use crate::store::RecordStore;
use crate::{SalesAnalytics, SalesAnalyticsBuilder};

// ---------------------------------------------------------------------------
// AsyncSalesAnalyticsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesAnalytics`] instance.
#[derive(Default)]
pub struct AsyncSalesAnalyticsBuilder {
    inner: SalesAnalyticsBuilder,
}

impl AsyncSalesAnalyticsBuilder {
    /// Year that month names resolve against.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.inner = self.inner.reference_year(year);
        self
    }

    /// Listing page size used when a request does not give a valid one.
    pub fn default_per_page(mut self, per_page: usize) -> Self {
        self.inner = self.inner.default_per_page(per_page);
        self
    }

    /// Query the given store.
    pub fn store<S: RecordStore + 'static>(mut self, store: S) -> Self {
        self.inner = self.inner.store(store);
        self
    }

    /// Query a store shared with other owners.
    pub fn shared_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.inner = self.inner.shared_store(store);
        self
    }

    /// Build the async engine.
    ///
    /// Initialization runs on the blocking thread pool since opening the
    /// default DuckDB store touches the database.
    pub async fn build(self) -> Result<AsyncSalesAnalytics> {
        let inner = self.inner;
        let engine = tokio::task::spawn_blocking(move || inner.build())
            .await
            .map_err(|e| SalesError::Store(format!("Task join error: {e}")))??;
        Ok(AsyncSalesAnalytics::new(engine))
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesAnalytics
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesAnalytics`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The engine is shared through an [`Arc`];
/// it holds no mutable state, so no lock is needed.
#[derive(Clone)]
pub struct AsyncSalesAnalytics {
    inner: Arc<SalesAnalytics>,
}

impl AsyncSalesAnalytics {
    /// Create a new builder for configuring the async engine.
    pub fn builder() -> AsyncSalesAnalyticsBuilder {
        AsyncSalesAnalyticsBuilder::default()
    }

    /// Wrap an already-built engine.
    pub fn new(engine: SalesAnalytics) -> Self {
        Self {
            inner: Arc::new(engine),
        }
    }

    /// Run a sync engine operation on the blocking thread pool.
    ///
    /// The closure receives an `&SalesAnalytics` reference and should return
    /// a `Result<T>`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sales_analytics::AsyncSalesAnalytics;
    /// # async fn example() -> sales_analytics::Result<()> {
    /// # let engine = AsyncSalesAnalytics::builder().build().await?;
    /// let april = engine.run(|e| e.statistics().for_month("April")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesAnalytics) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&engine))
            .await
            .map_err(|e| SalesError::Store(format!("Task join error: {e}")))?
    }

    pub async fn list_records(&self, params: ListingParams) -> Result<Page<Record>> {
        self.run(move |e| e.list_records(&params)).await
    }

    pub async fn get_statistics(&self, month: Option<&str>) -> Result<Statistics> {
        let month = month.map(str::to_string);
        self.run(move |e| e.get_statistics(month.as_deref())).await
    }

    pub async fn get_histogram(&self, month: Option<&str>) -> Result<Vec<HistogramEntry>> {
        let month = month.map(str::to_string);
        self.run(move |e| e.get_histogram(month.as_deref())).await
    }

    pub async fn get_category_breakdown(&self, month: Option<&str>) -> Result<Vec<CategoryCount>> {
        let month = month.map(str::to_string);
        self.run(move |e| e.get_category_breakdown(month.as_deref()))
            .await
    }

    /// Combined view with each sub-query on its own blocking task.
    ///
    /// The month is validated up front. The first failing sub-query ends the
    /// call; tasks still running are detached and their results discarded.
    pub async fn get_combined(&self, month: Option<&str>) -> Result<CombinedResult> {
        let window = calendar::require_month(month, self.inner.config().reference_year)?;

        let (statistics, histogram, categories) = tokio::try_join!(
            self.run(move |e| e.statistics().for_window(&window)),
            self.run(move |e| e.histogram().for_window(&window)),
            self.run(move |e| e.categories().for_window(Some(&window))),
        )?;

        Ok(CombinedResult {
            statistics,
            histogram,
            categories,
        })
    }

    /// Borrow the wrapped engine for synchronous use.
    pub fn engine(&self) -> &SalesAnalytics {
        &self.inner
    }
}
