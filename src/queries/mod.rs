//! Query modules for the sales analytics engine.
//!
//! Each module provides a query struct that borrows a
//! [`RecordStore`](crate::store::RecordStore) and the engine's
//! [`EngineConfig`](crate::config::EngineConfig), and exposes methods
//! returning `Result<T>` with typed result payloads.

pub mod categories;
pub mod combined;
pub mod histogram;
pub mod listing;
pub mod statistics;

pub use categories::CategoryQuery;
pub use combined::CombinedQuery;
pub use histogram::HistogramQuery;
pub use listing::{ListingParams, ListingQuery};
pub use statistics::StatisticsQuery;
