use crate::models::PriceBucket;

/// Year the seed dataset was recorded in. Month names resolve against it.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2022;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;

/// DuckDB table backing [`DuckDbStore`](crate::store::DuckDbStore).
pub const SALES_TABLE: &str = "product_sales";

/// Fixed histogram buckets, in output order. Both ends are inclusive.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::new("0-100", 0.0, Some(100.0)),
    PriceBucket::new("101-200", 101.0, Some(200.0)),
    PriceBucket::new("201-300", 201.0, Some(300.0)),
    PriceBucket::new("301-400", 301.0, Some(400.0)),
    PriceBucket::new("401-500", 401.0, Some(500.0)),
    PriceBucket::new("501-600", 501.0, Some(600.0)),
    PriceBucket::new("601-700", 601.0, Some(700.0)),
    PriceBucket::new("701-800", 701.0, Some(800.0)),
    PriceBucket::new("801-900", 801.0, Some(900.0)),
    PriceBucket::new("901-above", 901.0, None),
];

/// Per-engine settings shared by every query interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Year that bare month names ("March") are anchored to.
    ///
    /// Month names carry no year, so every windowed query is scoped to this
    /// single year. Datasets spanning several years are only fully visible
    /// through the unwindowed statistics and category views.
    pub reference_year: i32,
    /// Page size used when a listing request omits `perPage` or sends
    /// a non-positive value.
    pub default_per_page: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}
