use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StatsResult: Sale totals for one month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub total_sale_amount: f64,
    pub total_sold: u64,
    pub total_not_sold: u64,
}

// ---------------------------------------------------------------------------
// MonthlyStats: Sale totals for one (year, month) group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub total_sale_amount: f64,
    pub total_sold: u64,
    pub total_not_sold: u64,
}

// ---------------------------------------------------------------------------
// Statistics: Either mode of the statistics view
// ---------------------------------------------------------------------------

/// Result of [`SalesAnalytics::get_statistics`](crate::SalesAnalytics::get_statistics).
///
/// A single month yields one [`StatsResult`]; no month yields every
/// `(year, month)` present in the store, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Statistics {
    Month(StatsResult),
    ByMonth(Vec<MonthlyStats>),
}

// ---------------------------------------------------------------------------
// HistogramEntry / CategoryCount
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    pub range: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// CombinedResult: Statistics + histogram + categories for one month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub statistics: StatsResult,
    pub histogram: Vec<HistogramEntry>,
    pub categories: Vec<CategoryCount>,
}

// ---------------------------------------------------------------------------
// Page: One page of a listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: usize,
    pub per_page: usize,
    pub items: Vec<T>,
}
